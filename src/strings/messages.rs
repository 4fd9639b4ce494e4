//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.
//! Includes error messages, command replies and the markdown "cards".

use crate::domain::types::{
    CompletedTask, FitnessRecord, Goal, GoalUpdate, LevelOutcome, Ledger, MemePost, Period, PointsBreakdown,
    Quote, ScheduleEntry, TimeRecord, TimerSummary,
};

pub const UNKNOWN_COMMAND: &str = "❓ Unknown command. Try `.help`.";
pub const GENERIC_FAILURE: &str = "❌ Something went wrong while talking to the database. Please try again.";
pub const FETCH_FAILED: &str = "⚠️ Unable to fetch post, try again later.";

// Fitness
pub const NO_FITNESS_DATA: &str = "No fitness data found. Log a workout with `.fitness_form` first.";
pub fn no_fitness_data_for(user: &str) -> String {
    format!("{user} doesn't have any fitness data yet.")
}

pub const NUMERIC_ONLY: &str = "Invalid input. Please enter numeric values only.";
pub const LOG_FITNESS_USAGE: &str = "Usage: `.log_fitness <pushups> <situps> <pullups> <run_km>`";
pub const FITNESS_STATS_USAGE: &str = "Usage: `.fitness_stats [@user:server]`";
pub const FORM_CANCELLED: &str = "❌ Fitness form cancelled.";
pub const NOTHING_TO_CANCEL: &str = "Nothing to cancel.";

pub fn form_opened(user: &str) -> String {
    format!("📝 **Fitness form** for {user}. Answer each question with a number, or `.cancel` to stop.")
}

pub fn form_question(step: crate::application::state::FormStep) -> &'static str {
    use crate::application::state::FormStep;
    match step {
        FormStep::Pushups => "How many **pushups** did you do?",
        FormStep::Situps => "How many **sit-ups** did you do?",
        FormStep::Pullups => "How many **pull-ups** did you do?",
        FormStep::Run => "How many **km** did you run?",
    }
}

pub fn form_rejected(user: &str, reason: &str) -> String {
    format!("{user} {reason}")
}

pub fn workout_recorded(user: &str, points: &PointsBreakdown, outcome: &LevelOutcome) -> String {
    format!(
        "🏋️ **Workout logged** for {user}\n\
         * Pushups: +{}\n* Sit-ups: +{}\n* Pull-ups: +{}\n* Run: +{}\n\
         **Total**: {} {} (level {}, {}/{})",
        points.pushups,
        points.situps,
        points.pullups,
        points.run,
        points.total(),
        Ledger::Fitness.currency(),
        outcome.power_level,
        outcome.points,
        outcome.power_level * crate::domain::types::POINTS_PER_LEVEL,
    )
}

pub fn fitness_card(record: &FitnessRecord) -> String {
    format!(
        "**💪 Fitness Stats: {}**\n\
         **Power level**: {}\n**Strength**: {}/{}\n\n\
         * Pushups: {}\n* Sit-ups: {}\n* Pull-ups: {}\n* Run: {} km",
        record.user_id,
        record.progress.power_level,
        record.progress.points,
        record.progress.threshold(),
        record.pushups,
        record.situps,
        record.pullups,
        record.run_km,
    )
}

pub fn level_up(user: &str, ledger: Ledger, level: i64) -> String {
    match ledger {
        Ledger::Fitness => format!("🎉 {user} leveled up to level {level}!"),
        Ledger::Time => format!("⏳ {user} leveled up to Timex level {level}!"),
    }
}

// Goals
pub const SET_GOAL_USAGE: &str = "Usage: `.set_goal \"<name>\" <DD-MM-YYYY> <priority>`";
pub const UPDATE_GOAL_USAGE: &str = "Usage: `.update_goal \"<name>\" <progress|deadline|priority> <value>`";
pub const DELETE_GOAL_USAGE: &str = "Usage: `.delete_goal \"<name>\"`";
pub const INVALID_PROGRESS: &str = "Progress must be a whole number between 0 and 100.";
pub const INVALID_GOAL_FIELD: &str = "Invalid field. Choose one of: progress, deadline, priority.";
pub const NO_ACTIVE_GOALS: &str = "You have no active goals. Add one with `.set_goal`.";
pub const NO_COMPLETED_GOALS: &str = "You have not completed any goals yet.";

pub fn goal_exists(name: &str) -> String {
    format!("A goal named '{name}' already exists.")
}

pub fn goal_not_found(name: &str) -> String {
    format!("Goal '{name}' not found.")
}

pub fn invalid_date(raw: &str) -> String {
    format!("Invalid date '{raw}'. Use DD-MM-YYYY.")
}

pub fn goal_created(goal: &str, deadline: &str, priority: &str) -> String {
    format!("🎯 Goal **{goal}** set (deadline {deadline}, priority {priority}).")
}

/// Announces completion only when this update finished the goal.
pub fn goal_updated(goal: &Goal, update: &GoalUpdate) -> String {
    if goal.completed && matches!(update, GoalUpdate::Progress(100)) {
        format!("🏆 Goal **{}** completed!", goal.name)
    } else {
        format!("✏️ Goal **{}** updated. {}", goal.name, progress_bar(goal.progress))
    }
}

pub fn goal_deleted(name: &str) -> String {
    format!("🗑️ Goal **{name}** deleted.")
}

/// Twenty-block bar, one block per 5%.
pub fn progress_bar(progress: i64) -> String {
    let filled = (progress.clamp(0, 100) / 5) as usize;
    format!("[{}{}] {}%", "█".repeat(filled), "░".repeat(20 - filled), progress)
}

pub fn goals_card(goals: &[Goal], date_format: &str) -> String {
    let mut out = String::from("**🎯 Active Goals**\n");
    for goal in goals {
        out.push_str(&format!(
            "\n**{}** ({} priority, due {})\n{}\n",
            goal.name,
            goal.priority,
            goal.deadline.format(date_format),
            progress_bar(goal.progress),
        ));
    }
    out
}

pub fn completed_goals_card(goals: &[Goal], date_format: &str) -> String {
    let mut out = String::from("**🏆 Completed Goals**\n");
    for goal in goals {
        out.push_str(&format!("\n* {} (due {})", goal.name, goal.deadline.format(date_format)));
    }
    out
}

// Timers & schedules
pub const START_TIMER_USAGE: &str = "Usage: `.start_timer \"<task>\"`";
pub const SET_SCHEDULE_USAGE: &str = "Usage: `.set_schedule \"<task>\" <HH:MM> [weekly|daily]`";
pub const DELETE_SCHEDULE_USAGE: &str = "Usage: `.delete_schedule \"<task>\" <HH:MM>`";
pub const SET_REMINDER_USAGE: &str = "Usage: `.set_reminder \"<text>\" <HH:MM>`";
pub const TIMER_ALREADY_RUNNING: &str = "You already have a timer running. End it with `.end_timer` first.";
pub const NO_RUNNING_TIMER: &str = "You have no timer running.";
pub const NO_TIMER_TO_END: &str = "There is no running timer to end.";
pub const DAILY_GOAL_ALREADY_CLAIMED: &str = "You already claimed today's daily goal bonus. Come back tomorrow!";
pub const NO_TIME_DATA: &str = "No time data found. Start a timer with `.start_timer`.";
pub const INVALID_PERIOD: &str = "Invalid period. Choose one of: day, week, month, year.";
pub const EMPTY_SCHEDULE: &str = "Nothing scheduled for today.";
pub const REMINDER_QUEUE_CLOSED: &str = "⚠️ Reminders are unavailable right now.";
pub const POMODORO_STARTED: &str = "🍅 **Pomodoro started!** Focus for 25 minutes.";

pub fn invalid_time(raw: &str) -> String {
    format!("Invalid time '{raw}'. Use HH:MM.")
}

pub fn schedule_exists(task: &str) -> String {
    format!("'{task}' is already scheduled for today.")
}

pub fn schedule_not_found(task: &str, time: &str) -> String {
    format!("No schedule entry '{task}' at {time}.")
}

pub fn timer_started(task: &str) -> String {
    format!("⏱️ Timer started for **{task}**.")
}

pub fn timer_running(task: &str, minutes: i64) -> String {
    format!("⏱️ **{task}** has been running for {minutes} minute(s).")
}

pub fn timer_ended(summary: &TimerSummary) -> String {
    format!(
        "✅ **{}** finished after {} minute(s). +{} {} (level {}, {}/{}).",
        summary.task_name,
        summary.minutes,
        summary.points,
        Ledger::Time.currency(),
        summary.outcome.power_level,
        summary.outcome.points,
        summary.outcome.power_level * crate::domain::types::POINTS_PER_LEVEL,
    )
}

pub fn schedule_set(task: &str, time: &str, weekly: bool) -> String {
    let cadence = if weekly { "weekly" } else { "today" };
    format!("📅 **{task}** scheduled at {time} ({cadence}).")
}

pub fn schedule_deleted(task: &str, time: &str) -> String {
    format!("🗑️ Removed **{task}** at {time}.")
}

pub fn schedule_card(entries: &[ScheduleEntry], time_format: &str) -> String {
    let mut out = String::from("**📅 Today's Schedule**\n");
    for entry in entries {
        let weekly = if entry.is_weekly { " (weekly)" } else { "" };
        out.push_str(&format!(
            "\n* {} {}{}",
            entry.task_time.format(time_format),
            entry.task_name,
            weekly
        ));
    }
    out
}

pub fn reminder_set(text: &str, time: &str) -> String {
    format!("⏰ Reminder set for {time}: {text}")
}

pub fn reminder_due(user: &str, text: &str) -> String {
    format!("⏰ {user} reminder: {text}")
}

pub fn pomodoro_break(user: &str) -> String {
    format!("☕ {user} time for a 5-minute break!")
}

pub fn pomodoro_over(user: &str) -> String {
    format!("🍅 {user} break is over, back to work!")
}

pub fn productivity_card(period: Period, tasks: &[CompletedTask]) -> String {
    if tasks.is_empty() {
        return format!("No completed tasks in the last {period}.");
    }
    let total: i64 = tasks.iter().map(|t| t.duration).sum();
    let mut out = format!("**📈 Productivity (last {period})**\n");
    for task in tasks {
        out.push_str(&format!("\n* {}: {} min", task.task_name, task.duration));
    }
    out.push_str(&format!("\n\n**Total**: {total} min"));
    out
}

pub fn daily_goal_claimed(outcome: &LevelOutcome) -> String {
    format!(
        "🌞 Daily goal bonus claimed: +50 Timex (level {}, {}/{}).",
        outcome.power_level,
        outcome.points,
        outcome.power_level * crate::domain::types::POINTS_PER_LEVEL,
    )
}

pub fn timex_card(record: &TimeRecord) -> String {
    format!(
        "**⏳ Timex: {}**\n**Level**: {}\n**Timex**: {}/{}\n**Focused time**: {} min",
        record.user_id,
        record.progress.power_level,
        record.progress.points,
        record.progress.threshold(),
        record.total_minutes,
    )
}

// Leisure & misc
pub fn quote(quote: &Quote) -> String {
    format!("\"{}\" - {}", quote.text, quote.author)
}

pub fn meme(post: &MemePost) -> String {
    let author = post.author.as_deref().unwrap_or_default();
    if post.title.is_empty() {
        format!("{}\n(by u/{author})", post.url)
    } else {
        format!("**{}**\n{}\n(by u/{author})", post.title, post.url)
    }
}

pub fn hello(user: &str) -> String {
    format!("👋 Hello {user}! Type `.help` to see what I can do.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0), format!("[{}] 0%", "░".repeat(20)));
        assert_eq!(progress_bar(100), format!("[{}] 100%", "█".repeat(20)));
        assert_eq!(progress_bar(47), format!("[{}{}] 47%", "█".repeat(9), "░".repeat(11)));
    }

    #[test]
    fn test_level_up_mentions_user_and_level() {
        let notice = level_up("@ann:hs", Ledger::Fitness, 3);
        assert!(notice.contains("@ann:hs"));
        assert!(notice.contains("level 3"));
    }

    #[test]
    fn test_productivity_card_totals() {
        let tasks = vec![
            CompletedTask { task_name: "read".into(), duration: 30 },
            CompletedTask { task_name: "code".into(), duration: 45 },
        ];
        let card = productivity_card(Period::Week, &tasks);
        assert!(card.contains("read: 30 min"));
        assert!(card.contains("**Total**: 75 min"));
        assert_eq!(productivity_card(Period::Day, &[]), "No completed tasks in the last day.");
    }

    #[test]
    fn test_goals_card_lists_each_goal() {
        let goals = vec![Goal {
            name: "Run a marathon".into(),
            deadline: NaiveDate::from_ymd_opt(2027, 6, 1).unwrap(),
            priority: "high".into(),
            progress: 50,
            completed: false,
        }];
        let card = goals_card(&goals, "%d-%m-%Y");
        assert!(card.contains("**Run a marathon** (high priority, due 01-06-2027)"));
        assert!(card.contains("50%"));
    }

    #[test]
    fn test_goal_updated_depends_on_update_kind() {
        let goal = Goal {
            name: "Read".into(),
            deadline: NaiveDate::from_ymd_opt(2027, 6, 1).unwrap(),
            priority: "low".into(),
            progress: 100,
            completed: true,
        };
        assert_eq!(goal_updated(&goal, &GoalUpdate::Progress(100)), "🏆 Goal **Read** completed!");

        let text = goal_updated(&goal, &GoalUpdate::Priority("high".into()));
        assert!(text.starts_with("✏️ Goal **Read** updated."));
        assert!(text.contains("100%"));
    }
}
