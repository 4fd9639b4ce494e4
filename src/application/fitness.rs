//! # Fitness Logging
//!
//! Records workouts: bumps the lifetime exercise counters and feeds the summed
//! points into the fitness ledger.

use std::sync::Arc;

use sqlx::Row;

use crate::application::progression::{self, ProgressionService};
use crate::domain::error::{BotError, BotResult};
use crate::domain::types::{FitnessRecord, Ledger, LevelOutcome, PointsBreakdown, ProgressRecord, Workout};
use crate::strings::messages;

pub struct FitnessService {
    progression: Arc<ProgressionService>,
}

impl FitnessService {
    pub fn new(progression: Arc<ProgressionService>) -> Self {
        Self { progression }
    }

    pub async fn record_exercise(
        &self,
        user_id: &str,
        workout: Workout,
    ) -> BotResult<(PointsBreakdown, LevelOutcome)> {
        let breakdown = workout.points();

        let mut tx = self.progression.database().pool().begin().await?;
        let outcome = progression::apply_in(&mut tx, Ledger::Fitness, user_id, breakdown.total()).await?;
        sqlx::query(
            "UPDATE leveling SET pushup = pushup + ?, pullup = pullup + ?, situp = situp + ?, run = run + ? WHERE user_id = ?",
        )
        .bind(i64::from(workout.pushups))
        .bind(i64::from(workout.pullups))
        .bind(i64::from(workout.situps))
        .bind(i64::from(workout.run_km))
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!(user = %user_id, points = breakdown.total(), "workout recorded");
        self.progression.announce(Ledger::Fitness, user_id, &outcome).await;
        Ok((breakdown, outcome))
    }

    pub async fn get_stats(&self, user_id: &str) -> BotResult<FitnessRecord> {
        let row = sqlx::query(
            "SELECT power_level, points, pushup, pullup, situp, run FROM leveling WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.progression.database().pool())
        .await?
        .ok_or_else(|| BotError::not_found(messages::NO_FITNESS_DATA))?;

        Ok(FitnessRecord {
            user_id: user_id.to_string(),
            progress: ProgressRecord {
                power_level: row.try_get("power_level")?,
                points: row.try_get("points")?,
            },
            pushups: row.try_get("pushup")?,
            pullups: row.try_get("pullup")?,
            situps: row.try_get("situp")?,
            run_km: row.try_get("run")?,
        })
    }
}

/// Parses one count as entered in the form or on the command line.
pub fn parse_count(raw: &str) -> BotResult<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| BotError::validation(messages::NUMERIC_ONLY))
}

/// Parses `<pushups> <situps> <pullups> <run_km>` (form order).
pub fn parse_workout(args: &[String]) -> BotResult<Workout> {
    let [pushups, situps, pullups, run_km] = args else {
        return Err(BotError::validation(messages::LOG_FITNESS_USAGE));
    };
    Ok(Workout {
        pushups: parse_count(pushups)?,
        situps: parse_count(situps)?,
        pullups: parse_count(pullups)?,
        run_km: parse_count(run_km)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::StorageConfig;
    use crate::infrastructure::storage::Database;
    use crate::testing::RecordingNotifier;

    async fn service() -> (FitnessService, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let progression = Arc::new(ProgressionService::new(Database::in_memory().await, notifier.clone()));
        (FitnessService::new(progression), notifier)
    }

    #[tokio::test]
    async fn test_record_exercise_awards_weighted_points() {
        let (service, _) = service().await;
        let workout = Workout { pushups: 5, pullups: 2, situps: 10, run_km: 1 };

        let (breakdown, outcome) = service.record_exercise("@ann:hs", workout).await.unwrap();
        assert_eq!(breakdown.total(), 36);
        assert_eq!(outcome.points, 36);

        let stats = service.get_stats("@ann:hs").await.unwrap();
        assert_eq!(stats.pushups, 5);
        assert_eq!(stats.pullups, 2);
        assert_eq!(stats.situps, 10);
        assert_eq!(stats.run_km, 1);
        assert_eq!(stats.progress, ProgressRecord { power_level: 1, points: 36 });
    }

    #[tokio::test]
    async fn test_counters_accumulate_and_level_up() {
        let (service, notifier) = service().await;
        let workout = Workout { pushups: 30, pullups: 0, situps: 0, run_km: 5 };

        service.record_exercise("@ann:hs", workout).await.unwrap();
        let (_, outcome) = service.record_exercise("@ann:hs", workout).await.unwrap();

        // 110 levels once (10 left), then 10 + 110 stays below the level-2 threshold of 200
        assert_eq!(outcome.power_level, 2);
        assert_eq!(outcome.points, 120);
        let stats = service.get_stats("@ann:hs").await.unwrap();
        assert_eq!(stats.pushups, 60);
        assert_eq!(stats.run_km, 10);
        assert_eq!(notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_stats_for_unknown_user_is_not_found() {
        let (service, _) = service().await;
        let err = service.get_stats("@nobody:hs").await.unwrap_err();
        assert!(matches!(err, BotError::NotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_workouts_from_different_users() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            database_url: format!("sqlite:{}", dir.path().join("bot.db").display()),
            max_connections: 5,
        };
        let db = Database::connect(&config).await.unwrap();
        let progression = Arc::new(ProgressionService::new(db, Arc::new(RecordingNotifier::default())));
        let service = Arc::new(FitnessService::new(progression));

        let workout = Workout { pushups: 5, pullups: 2, situps: 10, run_km: 1 };
        let handles: Vec<_> = (0..40)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move { service.record_exercise(&format!("@user{i}:hs"), workout).await })
            })
            .collect();

        for handle in handles {
            let (_, outcome) = handle.await.unwrap().unwrap();
            assert_eq!(outcome.points, 36);
        }
        for i in 0..40 {
            let stats = service.get_stats(&format!("@user{i}:hs")).await.unwrap();
            assert_eq!(stats.pushups, 5);
        }
    }

    #[test]
    fn test_parse_workout() {
        let args: Vec<String> = ["10", "20", "3", "2"].iter().map(|s| s.to_string()).collect();
        let workout = parse_workout(&args).unwrap();
        assert_eq!(workout, Workout { pushups: 10, situps: 20, pullups: 3, run_km: 2 });
    }

    #[test]
    fn test_parse_workout_rejects_non_numeric() {
        let args: Vec<String> = ["10", "lots", "3", "2"].iter().map(|s| s.to_string()).collect();
        assert!(matches!(parse_workout(&args), Err(BotError::Validation(_))));
        assert!(matches!(parse_count("-4"), Err(BotError::Validation(_))));
        assert!(matches!(parse_workout(&args[..2]), Err(BotError::Validation(_))));
    }
}
