//! # Fitness Commands
//!
//! Handles `.fitness_form`, `.log_fitness`, `.fitness_stats` and `.cancel`,
//! plus the answers typed while a form is open.

use std::sync::{Arc, LazyLock};

use anyhow::Result;
use regex::Regex;
use tokio::sync::Mutex;

use crate::application::fitness::{FitnessService, parse_workout};
use crate::application::parsing::split_args;
use crate::application::state::{BotState, FormProgress};
use crate::domain::error::BotError;
use crate::domain::traits::ChatProvider;
use crate::interface::commands::reply;
use crate::strings::messages;

static USER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@[^:\s]+:\S+$").expect("user id pattern"));

pub async fn handle_fitness_form(
    state: &Arc<Mutex<BotState>>,
    chat: &impl ChatProvider,
    sender: &str,
) -> Result<()> {
    let step = state.lock().await.open_form(&chat.room_id(), sender);
    let prompt = format!("{}\n{}", messages::form_opened(sender), messages::form_question(step));
    reply(chat, Ok(prompt)).await
}

/// Consumes one message typed while the sender has a form open.
pub async fn handle_form_answer(
    state: &Arc<Mutex<BotState>>,
    fitness: &FitnessService,
    chat: &impl ChatProvider,
    sender: &str,
    input: &str,
) -> Result<()> {
    let progress = state.lock().await.answer_form(&chat.room_id(), sender, input);
    match progress {
        Ok(None) => Ok(()),
        Ok(Some(FormProgress::Next(step))) => chat
            .send_notification(messages::form_question(step))
            .await
            .map_err(|e| anyhow::anyhow!(e)),
        Ok(Some(FormProgress::Completed(workout))) => {
            let result = fitness
                .record_exercise(sender, workout)
                .await
                .map(|(points, outcome)| messages::workout_recorded(sender, &points, &outcome));
            reply(chat, result).await
        }
        Err(BotError::Validation(reason)) => reply(chat, Ok(messages::form_rejected(sender, &reason))).await,
        Err(e) => reply(chat, Err(e)).await,
    }
}

pub async fn handle_cancel(
    state: &Arc<Mutex<BotState>>,
    chat: &impl ChatProvider,
    sender: &str,
) -> Result<()> {
    let cancelled = state.lock().await.cancel_form(&chat.room_id(), sender);
    let text = if cancelled {
        messages::FORM_CANCELLED
    } else {
        messages::NOTHING_TO_CANCEL
    };
    reply(chat, Ok(text.to_string())).await
}

pub async fn handle_log_fitness(
    fitness: &FitnessService,
    chat: &impl ChatProvider,
    sender: &str,
    args: &str,
) -> Result<()> {
    let result = match parse_workout(&split_args(args)) {
        Ok(workout) => fitness
            .record_exercise(sender, workout)
            .await
            .map(|(points, outcome)| messages::workout_recorded(sender, &points, &outcome)),
        Err(e) => Err(e),
    };
    reply(chat, result).await
}

pub async fn handle_fitness_stats(
    fitness: &FitnessService,
    chat: &impl ChatProvider,
    sender: &str,
    args: &str,
) -> Result<()> {
    let target = match split_args(args).first() {
        None => sender.to_string(),
        Some(user) if USER_ID.is_match(user) => user.clone(),
        Some(_) => return reply(chat, Ok(messages::FITNESS_STATS_USAGE.to_string())).await,
    };
    let result = match fitness.get_stats(&target).await {
        Err(BotError::NotFound(_)) if target != sender => Ok(messages::no_fitness_data_for(&target)),
        other => other.map(|record| messages::fitness_card(&record)),
    };
    reply(chat, result).await
}
