//! # Time Management
//!
//! Running timers, schedules, the daily-goal bonus and the productivity report.
//! Timex earned here goes through the time ledger of the Progression Service.
//!
//! Running timers are process-local: they live in [`TimerRegistry`] and are
//! not recovered from the `timers` table after a restart.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::Row;
use tokio::sync::Mutex;

use crate::application::progression::{self, ProgressionService};
use crate::domain::error::{BotError, BotResult};
use crate::domain::types::{
    CompletedTask, Ledger, LevelOutcome, Period, ProgressRecord, RunningTimer, ScheduleEntry,
    TimeRecord, TimerSummary, timer_points,
};
use crate::strings::messages;

pub const TIME_FORMAT: &str = "%H:%M";
pub const DAILY_GOAL_BONUS: i64 = 50;

/// At most one running timer per user. Every operation holds the lock for its
/// whole duration so start/check/end never interleave.
#[derive(Default)]
pub struct TimerRegistry {
    running: Mutex<HashMap<String, RunningTimer>>,
}

pub struct TimeService {
    progression: Arc<ProgressionService>,
    timers: TimerRegistry,
}

impl TimeService {
    pub fn new(progression: Arc<ProgressionService>) -> Self {
        Self {
            progression,
            timers: TimerRegistry::default(),
        }
    }

    fn pool(&self) -> &sqlx::SqlitePool {
        self.progression.database().pool()
    }

    pub async fn start_timer(&self, user_id: &str, task_name: &str, now: DateTime<Utc>) -> BotResult<()> {
        let mut running = self.timers.running.lock().await;
        if running.contains_key(user_id) {
            return Err(BotError::conflict(messages::TIMER_ALREADY_RUNNING));
        }

        sqlx::query(
            "INSERT INTO timers (user_id, task_name, start_time, completed) VALUES (?, ?, ?, FALSE)
             ON CONFLICT (user_id, task_name) DO UPDATE SET start_time = excluded.start_time, completed = FALSE",
        )
        .bind(user_id)
        .bind(task_name)
        .bind(now)
        .execute(self.pool())
        .await?;

        running.insert(
            user_id.to_string(),
            RunningTimer {
                task_name: task_name.to_string(),
                started_at: now,
            },
        );
        tracing::info!(user = %user_id, task = %task_name, "timer started");
        Ok(())
    }

    /// Returns the running timer and its elapsed whole minutes.
    pub async fn check_timer(&self, user_id: &str, now: DateTime<Utc>) -> BotResult<(RunningTimer, i64)> {
        let running = self.timers.running.lock().await;
        let timer = running
            .get(user_id)
            .cloned()
            .ok_or_else(|| BotError::not_found(messages::NO_RUNNING_TIMER))?;
        let minutes = timer.elapsed_minutes(now);
        Ok((timer, minutes))
    }

    /// Stops the running timer, awards Timex and stores this session's
    /// duration on the task row. The timer stays registered if persisting fails.
    pub async fn end_timer(&self, user_id: &str, now: DateTime<Utc>) -> BotResult<TimerSummary> {
        let mut running = self.timers.running.lock().await;
        let timer = running
            .get(user_id)
            .cloned()
            .ok_or_else(|| BotError::not_found(messages::NO_TIMER_TO_END))?;

        let minutes = timer.elapsed_minutes(now);
        let points = timer_points(minutes);

        let mut tx = self.pool().begin().await?;
        let outcome = progression::apply_in(&mut tx, Ledger::Time, user_id, points).await?;
        sqlx::query("UPDATE time_management SET total_minutes = total_minutes + ? WHERE user_id = ?")
            .bind(minutes)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "UPDATE timers SET duration = ?, completed = TRUE WHERE user_id = ? AND task_name = ?",
        )
        .bind(minutes)
        .bind(user_id)
        .bind(&timer.task_name)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        running.remove(user_id);
        drop(running);

        tracing::info!(user = %user_id, task = %timer.task_name, minutes, points, "timer ended");
        self.progression.announce(Ledger::Time, user_id, &outcome).await;

        Ok(TimerSummary {
            task_name: timer.task_name,
            minutes,
            points,
            outcome,
        })
    }

    #[cfg(test)]
    async fn running_count(&self) -> usize {
        self.timers.running.lock().await.len()
    }

    pub async fn set_schedule(
        &self,
        user_id: &str,
        task_name: &str,
        task_time: NaiveTime,
        is_weekly: bool,
        today: NaiveDate,
    ) -> BotResult<()> {
        let result = sqlx::query(
            "INSERT INTO schedules (user_id, schedule_date, task_name, task_time, is_weekly) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(today)
        .bind(task_name)
        .bind(task_time)
        .bind(is_weekly)
        .execute(self.pool())
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(BotError::conflict(messages::schedule_exists(task_name)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Today's entries plus every weekly entry, earliest first.
    pub async fn view_schedule(&self, user_id: &str, today: NaiveDate) -> BotResult<Vec<ScheduleEntry>> {
        let rows = sqlx::query(
            "SELECT task_name, task_time, is_weekly FROM schedules
             WHERE user_id = ? AND (schedule_date = ? OR is_weekly = TRUE)
             ORDER BY task_time, task_name",
        )
        .bind(user_id)
        .bind(today)
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| {
                Ok(ScheduleEntry {
                    task_name: row.try_get("task_name")?,
                    task_time: row.try_get("task_time")?,
                    is_weekly: row.try_get("is_weekly")?,
                })
            })
            .collect()
    }

    pub async fn delete_schedule(&self, user_id: &str, task_name: &str, task_time: NaiveTime) -> BotResult<()> {
        let result = sqlx::query("DELETE FROM schedules WHERE user_id = ? AND task_name = ? AND task_time = ?")
            .bind(user_id)
            .bind(task_name)
            .bind(task_time)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(BotError::not_found(messages::schedule_not_found(
                task_name,
                &task_time.format(TIME_FORMAT).to_string(),
            )));
        }
        Ok(())
    }

    /// Awards the daily bonus once per calendar day.
    pub async fn claim_daily_goal(&self, user_id: &str, today: NaiveDate) -> BotResult<LevelOutcome> {
        let mut tx = self.pool().begin().await?;
        progression::find_or_create(&mut tx, Ledger::Time, user_id).await?;

        let claimed_on: Option<NaiveDate> =
            sqlx::query("SELECT daily_goal_on FROM time_management WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?
                .try_get("daily_goal_on")?;
        if claimed_on == Some(today) {
            return Err(BotError::conflict(messages::DAILY_GOAL_ALREADY_CLAIMED));
        }

        sqlx::query("UPDATE time_management SET daily_goal_on = ? WHERE user_id = ?")
            .bind(today)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        let outcome = progression::apply_in(&mut tx, Ledger::Time, user_id, DAILY_GOAL_BONUS).await?;
        tx.commit().await?;

        self.progression.announce(Ledger::Time, user_id, &outcome).await;
        Ok(outcome)
    }

    pub async fn time_stats(&self, user_id: &str) -> BotResult<TimeRecord> {
        let row = sqlx::query(
            "SELECT power_level, points, total_minutes, daily_goal_on FROM time_management WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| BotError::not_found(messages::NO_TIME_DATA))?;

        Ok(TimeRecord {
            user_id: user_id.to_string(),
            progress: ProgressRecord {
                power_level: row.try_get("power_level")?,
                points: row.try_get("points")?,
            },
            total_minutes: row.try_get("total_minutes")?,
            daily_goal_on: row.try_get("daily_goal_on")?,
        })
    }

    /// Completed timers started within `period` before `now`.
    pub async fn productivity(
        &self,
        user_id: &str,
        period: Period,
        now: DateTime<Utc>,
    ) -> BotResult<Vec<CompletedTask>> {
        let since = now - period.duration();
        let rows = sqlx::query(
            "SELECT task_name, duration FROM timers
             WHERE user_id = ? AND completed = TRUE AND start_time > ?
             ORDER BY start_time",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| {
                Ok(CompletedTask {
                    task_name: row.try_get("task_name")?,
                    duration: row.try_get::<Option<i64>, _>("duration")?.unwrap_or(0),
                })
            })
            .collect()
    }
}

pub fn parse_time(raw: &str) -> BotResult<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT)
        .map_err(|_| BotError::validation(messages::invalid_time(raw)))
}

/// Accepts the usual spellings of the weekly flag.
pub fn parse_weekly(raw: &str) -> BotResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "weekly" | "true" | "yes" | "y" | "1" | "on" => Ok(true),
        "daily" | "false" | "no" | "n" | "0" | "off" => Ok(false),
        _ => Err(BotError::validation(messages::SET_SCHEDULE_USAGE)),
    }
}

pub fn parse_period(raw: Option<&str>) -> BotResult<Period> {
    match raw {
        None => Ok(Period::Week),
        Some(raw) => Period::parse(raw).ok_or_else(|| BotError::validation(messages::INVALID_PERIOD)),
    }
}
