//! # Goal Commands
//!
//! Handles `.set_goal`, `.update_goal`, `.delete_goal`, `.view_goals` and
//! `.view_completed_goals`.

use anyhow::Result;

use crate::application::goals::{DATE_FORMAT, GoalService, parse_date, parse_update};
use crate::application::parsing::split_args;
use crate::domain::error::{BotError, BotResult};
use crate::domain::traits::ChatProvider;
use crate::interface::commands::reply;
use crate::strings::messages;

pub async fn handle_set_goal(goals: &GoalService, chat: &impl ChatProvider, sender: &str, args: &str) -> Result<()> {
    reply(chat, set_goal(goals, sender, &split_args(args)).await).await
}

async fn set_goal(goals: &GoalService, sender: &str, args: &[String]) -> BotResult<String> {
    let [name, deadline, priority @ ..] = args else {
        return Err(BotError::validation(messages::SET_GOAL_USAGE));
    };
    let priority = priority.join(" ");
    if name.trim().is_empty() || priority.is_empty() {
        return Err(BotError::validation(messages::SET_GOAL_USAGE));
    }
    let deadline = parse_date(deadline)?;
    goals.create(sender, name, deadline, &priority).await?;
    Ok(messages::goal_created(name, &deadline.format(DATE_FORMAT).to_string(), &priority))
}

pub async fn handle_update_goal(goals: &GoalService, chat: &impl ChatProvider, sender: &str, args: &str) -> Result<()> {
    reply(chat, update_goal(goals, sender, &split_args(args)).await).await
}

async fn update_goal(goals: &GoalService, sender: &str, args: &[String]) -> BotResult<String> {
    let [name, field, value @ ..] = args else {
        return Err(BotError::validation(messages::UPDATE_GOAL_USAGE));
    };
    let update = parse_update(field, &value.join(" "))?;
    let goal = goals.update(sender, name, update.clone()).await?;
    Ok(messages::goal_updated(&goal, &update))
}

pub async fn handle_delete_goal(goals: &GoalService, chat: &impl ChatProvider, sender: &str, args: &str) -> Result<()> {
    let args = split_args(args);
    let result = match args.first() {
        Some(name) => goals.delete(sender, name).await.map(|_| messages::goal_deleted(name)),
        None => Err(BotError::validation(messages::DELETE_GOAL_USAGE)),
    };
    reply(chat, result).await
}

pub async fn handle_view_goals(
    goals: &GoalService,
    chat: &impl ChatProvider,
    sender: &str,
    only_completed: bool,
) -> Result<()> {
    let result = goals.list(sender, only_completed).await.map(|list| match (only_completed, list.is_empty()) {
        (false, true) => messages::NO_ACTIVE_GOALS.to_string(),
        (true, true) => messages::NO_COMPLETED_GOALS.to_string(),
        (false, false) => messages::goals_card(&list, DATE_FORMAT),
        (true, false) => messages::completed_goals_card(&list, DATE_FORMAT),
    });
    reply(chat, result).await
}
