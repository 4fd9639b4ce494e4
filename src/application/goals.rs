//! # Goal Management
//!
//! CRUD over the `goals` table keyed by (user, goal name). A goal becomes
//! completed in the same statement that sets its progress to 100 and never reopens.

use chrono::NaiveDate;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::domain::error::{BotError, BotResult};
use crate::domain::types::{Goal, GoalUpdate};
use crate::infrastructure::storage::Database;
use crate::strings::messages;

pub const DATE_FORMAT: &str = "%d-%m-%Y";

pub struct GoalService {
    db: Database,
}

impl GoalService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: &str,
        name: &str,
        deadline: NaiveDate,
        priority: &str,
    ) -> BotResult<()> {
        let result = sqlx::query(
            "INSERT INTO goals (user_id, name, deadline, priority, progress, completed) VALUES (?, ?, ?, ?, 0, FALSE)",
        )
        .bind(user_id)
        .bind(name)
        .bind(deadline)
        .bind(priority)
        .execute(self.db.pool())
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(BotError::conflict(messages::goal_exists(name)))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(&self, user_id: &str, name: &str) -> BotResult<Goal> {
        let row = sqlx::query(
            "SELECT name, deadline, priority, progress, completed FROM goals WHERE user_id = ? AND name = ?",
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| BotError::not_found(messages::goal_not_found(name)))?;
        goal_from_row(&row)
    }

    /// Applies one field change and returns the goal as stored afterwards.
    pub async fn update(&self, user_id: &str, name: &str, update: GoalUpdate) -> BotResult<Goal> {
        let result = match &update {
            GoalUpdate::Progress(progress) => {
                sqlx::query(
                    "UPDATE goals SET progress = ?, completed = (completed OR ? = 100) WHERE user_id = ? AND name = ?",
                )
                .bind(progress)
                .bind(progress)
                .bind(user_id)
                .bind(name)
                .execute(self.db.pool())
                .await?
            }
            GoalUpdate::Deadline(deadline) => {
                sqlx::query("UPDATE goals SET deadline = ? WHERE user_id = ? AND name = ?")
                    .bind(deadline)
                    .bind(user_id)
                    .bind(name)
                    .execute(self.db.pool())
                    .await?
            }
            GoalUpdate::Priority(priority) => {
                sqlx::query("UPDATE goals SET priority = ? WHERE user_id = ? AND name = ?")
                    .bind(priority)
                    .bind(user_id)
                    .bind(name)
                    .execute(self.db.pool())
                    .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(BotError::not_found(messages::goal_not_found(name)));
        }
        self.get(user_id, name).await
    }

    pub async fn delete(&self, user_id: &str, name: &str) -> BotResult<()> {
        let result = sqlx::query("DELETE FROM goals WHERE user_id = ? AND name = ?")
            .bind(user_id)
            .bind(name)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(BotError::not_found(messages::goal_not_found(name)));
        }
        Ok(())
    }

    /// Active goals by (priority, deadline); completed ones by deadline.
    pub async fn list(&self, user_id: &str, only_completed: bool) -> BotResult<Vec<Goal>> {
        let sql = if only_completed {
            "SELECT name, deadline, priority, progress, completed FROM goals WHERE user_id = ? AND completed = TRUE ORDER BY deadline"
        } else {
            "SELECT name, deadline, priority, progress, completed FROM goals WHERE user_id = ? AND completed = FALSE ORDER BY priority, deadline"
        };

        let rows = sqlx::query(sql).bind(user_id).fetch_all(self.db.pool()).await?;
        rows.iter().map(goal_from_row).collect()
    }
}

fn goal_from_row(row: &SqliteRow) -> BotResult<Goal> {
    Ok(Goal {
        name: row.try_get("name")?,
        deadline: row.try_get("deadline")?,
        priority: row.try_get("priority")?,
        progress: row.try_get("progress")?,
        completed: row.try_get("completed")?,
    })
}

pub fn parse_date(raw: &str) -> BotResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| BotError::validation(messages::invalid_date(raw)))
}

/// Validates a `.update_goal` field/value pair before touching the store.
pub fn parse_update(field: &str, value: &str) -> BotResult<GoalUpdate> {
    match field.trim().to_lowercase().as_str() {
        "progress" => {
            let progress = value
                .trim()
                .trim_end_matches('%')
                .parse::<i64>()
                .map_err(|_| BotError::validation(messages::INVALID_PROGRESS))?;
            if !(0..=100).contains(&progress) {
                return Err(BotError::validation(messages::INVALID_PROGRESS));
            }
            Ok(GoalUpdate::Progress(progress))
        }
        "deadline" => Ok(GoalUpdate::Deadline(parse_date(value)?)),
        "priority" => {
            let priority = value.trim();
            if priority.is_empty() {
                return Err(BotError::validation(messages::UPDATE_GOAL_USAGE));
            }
            Ok(GoalUpdate::Priority(priority.to_string()))
        }
        _ => Err(BotError::validation(messages::INVALID_GOAL_FIELD)),
    }
}
