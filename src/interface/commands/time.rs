//! # Time Commands
//!
//! Timers, schedules, reminders, Pomodoro, the daily bonus and Timex reports.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;

use crate::application::parsing::split_args;
use crate::application::reminders::{ReminderQueue, delay_until, next_occurrence};
use crate::application::time::{TIME_FORMAT, TimeService, parse_period, parse_time, parse_weekly};
use crate::domain::error::{BotError, BotResult};
use crate::domain::traits::ChatProvider;
use crate::interface::commands::reply;
use crate::strings::messages;

const POMODORO_WORK: Duration = Duration::from_secs(25 * 60);
const POMODORO_BREAK_END: Duration = Duration::from_secs(30 * 60);

pub async fn handle_start_timer(time: &TimeService, chat: &impl ChatProvider, sender: &str, args: &str) -> Result<()> {
    let task = split_args(args).join(" ");
    let result = if task.trim().is_empty() {
        Err(BotError::validation(messages::START_TIMER_USAGE))
    } else {
        time.start_timer(sender, &task, Utc::now())
            .await
            .map(|_| messages::timer_started(&task))
    };
    reply(chat, result).await
}

pub async fn handle_check_timer(time: &TimeService, chat: &impl ChatProvider, sender: &str) -> Result<()> {
    let result = time
        .check_timer(sender, Utc::now())
        .await
        .map(|(timer, minutes)| messages::timer_running(&timer.task_name, minutes));
    reply(chat, result).await
}

pub async fn handle_end_timer(time: &TimeService, chat: &impl ChatProvider, sender: &str) -> Result<()> {
    let result = time.end_timer(sender, Utc::now()).await.map(|summary| messages::timer_ended(&summary));
    reply(chat, result).await
}

pub async fn handle_set_schedule(time: &TimeService, chat: &impl ChatProvider, sender: &str, args: &str) -> Result<()> {
    reply(chat, set_schedule(time, sender, &split_args(args)).await).await
}

async fn set_schedule(time: &TimeService, sender: &str, args: &[String]) -> BotResult<String> {
    let (task, at, weekly) = match args {
        [task, at] => (task, at, false),
        [task, at, weekly] => (task, at, parse_weekly(weekly)?),
        _ => return Err(BotError::validation(messages::SET_SCHEDULE_USAGE)),
    };
    let at = parse_time(at)?;
    time.set_schedule(sender, task, at, weekly, Utc::now().date_naive()).await?;
    Ok(messages::schedule_set(task, &at.format(TIME_FORMAT).to_string(), weekly))
}

pub async fn handle_view_schedule(time: &TimeService, chat: &impl ChatProvider, sender: &str) -> Result<()> {
    let result = time.view_schedule(sender, Utc::now().date_naive()).await.map(|entries| {
        if entries.is_empty() {
            messages::EMPTY_SCHEDULE.to_string()
        } else {
            messages::schedule_card(&entries, TIME_FORMAT)
        }
    });
    reply(chat, result).await
}

pub async fn handle_delete_schedule(time: &TimeService, chat: &impl ChatProvider, sender: &str, args: &str) -> Result<()> {
    let result = match split_args(args).as_slice() {
        [task, at] => match parse_time(at) {
            Ok(at) => time
                .delete_schedule(sender, task, at)
                .await
                .map(|_| messages::schedule_deleted(task, &at.format(TIME_FORMAT).to_string())),
            Err(e) => Err(e),
        },
        _ => Err(BotError::validation(messages::DELETE_SCHEDULE_USAGE)),
    };
    reply(chat, result).await
}

/// `.set_reminder <text> <HH:MM>`: the last argument is the time, everything
/// before it is the reminder text.
pub async fn handle_set_reminder<C>(reminders: &ReminderQueue, chat: &C, sender: &str, args: &str) -> Result<()>
where
    C: ChatProvider + Clone + 'static,
{
    let args = split_args(args);
    let result = match args.split_last() {
        Some((at, text)) if !text.is_empty() => parse_time(at).map(|at| {
            let now = Utc::now();
            let due = next_occurrence(now, at);
            let text = text.join(" ");
            let target: Arc<dyn ChatProvider> = Arc::new(chat.clone());
            if reminders.schedule_in(delay_until(now, due), messages::reminder_due(sender, &text), target) {
                messages::reminder_set(&text, &at.format(TIME_FORMAT).to_string())
            } else {
                messages::REMINDER_QUEUE_CLOSED.to_string()
            }
        }),
        _ => Err(BotError::validation(messages::SET_REMINDER_USAGE)),
    };
    reply(chat, result).await
}

pub async fn handle_pomodoro<C>(reminders: &ReminderQueue, chat: &C, sender: &str) -> Result<()>
where
    C: ChatProvider + Clone + 'static,
{
    let target: Arc<dyn ChatProvider> = Arc::new(chat.clone());
    let queued = reminders.schedule_in(POMODORO_WORK, messages::pomodoro_break(sender), target.clone())
        && reminders.schedule_in(POMODORO_BREAK_END, messages::pomodoro_over(sender), target);
    let text = if queued {
        messages::POMODORO_STARTED
    } else {
        messages::REMINDER_QUEUE_CLOSED
    };
    reply(chat, Ok(text.to_string())).await
}

pub async fn handle_view_productivity(time: &TimeService, chat: &impl ChatProvider, sender: &str, args: &str) -> Result<()> {
    let args = split_args(args);
    let result = match parse_period(args.first().map(String::as_str)) {
        Ok(period) => time
            .productivity(sender, period, Utc::now())
            .await
            .map(|tasks| messages::productivity_card(period, &tasks)),
        Err(e) => Err(e),
    };
    reply(chat, result).await
}

pub async fn handle_daily_goal(time: &TimeService, chat: &impl ChatProvider, sender: &str) -> Result<()> {
    let result = time
        .claim_daily_goal(sender, Utc::now().date_naive())
        .await
        .map(|outcome| messages::daily_goal_claimed(&outcome));
    reply(chat, result).await
}

pub async fn handle_timex(time: &TimeService, chat: &impl ChatProvider, sender: &str) -> Result<()> {
    let result = time.time_stats(sender).await.map(|record| messages::timex_card(&record));
    reply(chat, result).await
}
