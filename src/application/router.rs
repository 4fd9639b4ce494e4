//! # Command Router
//!
//! Routes incoming messages to the appropriate command handler (in `interface/commands`).
//! It parses the command string (e.g., `.set_goal`) and dispatches it with the necessary context.
//! While a sender has a fitness form open in a room, their messages answer the form instead.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::fitness::FitnessService;
use crate::application::goals::GoalService;
use crate::application::leisure::LeisureService;
use crate::application::parsing::split_command;
use crate::application::reminders::ReminderQueue;
use crate::application::state::BotState;
use crate::application::time::TimeService;
use crate::domain::traits::ChatProvider;
use crate::interface::commands;

pub struct Services {
    pub fitness: Arc<FitnessService>,
    pub goals: Arc<GoalService>,
    pub time: Arc<TimeService>,
    pub leisure: Arc<LeisureService>,
    pub reminders: ReminderQueue,
}

pub struct CommandRouter {
    services: Services,
    state: Arc<Mutex<BotState>>,
}

impl CommandRouter {
    pub fn new(services: Services, state: Arc<Mutex<BotState>>) -> Self {
        Self { services, state }
    }

    pub async fn route<C>(&self, chat: &C, message: &str, sender: &str) -> Result<()>
    where
        C: ChatProvider + Clone + Send + Sync + 'static,
    {
        let msg = message.trim();
        let (cmd, args) = split_command(msg);

        // 1. Open fitness form intercepts everything except .cancel
        if cmd != ".cancel" {
            let form_open = self.state.lock().await.has_form(&chat.room_id(), sender);
            if form_open {
                tracing::info!("Form answer from '{}'", sender);
                return commands::fitness::handle_form_answer(
                    &self.state,
                    &self.services.fitness,
                    chat,
                    sender,
                    msg,
                )
                .await;
            }
        }

        if !cmd.starts_with('.') {
            return Ok(());
        }

        tracing::info!(
            "Router dispatching cmd='{}' args='{}' sender='{}'",
            cmd,
            args,
            sender
        );

        let s = &self.services;
        match cmd {
            ".hello" => commands::misc::handle_hello(chat, sender).await?,
            ".help" => commands::misc::handle_help(chat).await?,

            ".fitness_form" => commands::fitness::handle_fitness_form(&self.state, chat, sender).await?,
            ".cancel" => commands::fitness::handle_cancel(&self.state, chat, sender).await?,
            ".log_fitness" => commands::fitness::handle_log_fitness(&s.fitness, chat, sender, args).await?,
            ".fitness_stats" => commands::fitness::handle_fitness_stats(&s.fitness, chat, sender, args).await?,

            ".set_goal" => commands::goals::handle_set_goal(&s.goals, chat, sender, args).await?,
            ".update_goal" => commands::goals::handle_update_goal(&s.goals, chat, sender, args).await?,
            ".delete_goal" => commands::goals::handle_delete_goal(&s.goals, chat, sender, args).await?,
            ".view_goals" => commands::goals::handle_view_goals(&s.goals, chat, sender, false).await?,
            ".view_completed_goals" => commands::goals::handle_view_goals(&s.goals, chat, sender, true).await?,

            ".start_timer" => commands::time::handle_start_timer(&s.time, chat, sender, args).await?,
            ".check_timer" => commands::time::handle_check_timer(&s.time, chat, sender).await?,
            ".end_timer" => commands::time::handle_end_timer(&s.time, chat, sender).await?,
            ".set_schedule" => commands::time::handle_set_schedule(&s.time, chat, sender, args).await?,
            ".view_schedule" => commands::time::handle_view_schedule(&s.time, chat, sender).await?,
            ".delete_schedule" => commands::time::handle_delete_schedule(&s.time, chat, sender, args).await?,
            ".set_reminder" => commands::time::handle_set_reminder(&s.reminders, chat, sender, args).await?,
            ".pomodoro" => commands::time::handle_pomodoro(&s.reminders, chat, sender).await?,
            ".view_productivity" => {
                commands::time::handle_view_productivity(&s.time, chat, sender, args).await?
            }
            ".daily_goal" => commands::time::handle_daily_goal(&s.time, chat, sender).await?,
            ".timex" => commands::time::handle_timex(&s.time, chat, sender).await?,

            ".quote" => commands::leisure::handle_quote(&s.leisure, chat).await?,
            _ => {
                if let Some(query) = commands::leisure::meme_query(cmd) {
                    commands::leisure::handle_meme(&s.leisure, chat, query).await?;
                } else {
                    let _ = chat
                        .send_message(crate::strings::messages::UNKNOWN_COMMAND)
                        .await;
                }
            }
        }
        Ok(())
    }
}
