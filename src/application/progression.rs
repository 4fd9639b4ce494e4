//! # Progression Service
//!
//! Applies earned points to a user's ledger row (fitness or time), converting
//! full thresholds into power levels, and announces level-ups on the broadcast room.

use std::sync::Arc;

use sqlx::{AssertSqlSafe, Row, SqliteConnection};

use crate::domain::error::BotResult;
use crate::domain::traits::Notifier;
use crate::domain::types::{Ledger, LevelOutcome, Lookup, ProgressRecord};
use crate::infrastructure::storage::Database;
use crate::strings::messages;

pub struct ProgressionService {
    db: Database,
    notifier: Arc<dyn Notifier>,
}

impl ProgressionService {
    pub fn new(db: Database, notifier: Arc<dyn Notifier>) -> Self {
        Self { db, notifier }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Adds `points` to the user's ledger in its own transaction.
    pub async fn apply_points(
        &self,
        ledger: Ledger,
        user_id: &str,
        points: i64,
    ) -> BotResult<LevelOutcome> {
        let mut tx = self.db.pool().begin().await?;
        let outcome = apply_in(&mut tx, ledger, user_id, points).await?;
        tx.commit().await?;

        self.announce(ledger, user_id, &outcome).await;
        Ok(outcome)
    }

    /// Sends the level-up notice if `outcome` gained a level. Delivery
    /// failures are logged only.
    pub async fn announce(&self, ledger: Ledger, user_id: &str, outcome: &LevelOutcome) {
        if !outcome.leveled_up() {
            return;
        }
        tracing::info!(
            user = %user_id,
            ledger = ?ledger,
            level = outcome.power_level,
            "level up"
        );
        let notice = messages::level_up(user_id, ledger, outcome.power_level);
        if let Err(e) = self.notifier.notify(&notice).await {
            tracing::warn!("Failed to announce level-up for {}: {}", user_id, e);
        }
    }
}

/// Loads the ledger row for `user_id`, inserting a level-1 row when absent.
///
/// The insert runs first so a transaction opened with a plain `BEGIN` takes
/// the write lock before it reads.
pub(crate) async fn find_or_create(
    conn: &mut SqliteConnection,
    ledger: Ledger,
    user_id: &str,
) -> BotResult<Lookup<ProgressRecord>> {
    let insert = format!(
        "INSERT INTO {} (user_id, power_level, points) VALUES (?, 1, 0) ON CONFLICT (user_id) DO NOTHING",
        ledger.table()
    );
    let inserted = sqlx::query(AssertSqlSafe(insert))
        .bind(user_id)
        .execute(&mut *conn)
        .await?
        .rows_affected()
        == 1;

    let select = format!(
        "SELECT power_level, points FROM {} WHERE user_id = ?",
        ledger.table()
    );
    let row = sqlx::query(AssertSqlSafe(select)).bind(user_id).fetch_one(&mut *conn).await?;
    let record = ProgressRecord {
        power_level: row.try_get("power_level")?,
        points: row.try_get("points")?,
    };

    Ok(if inserted {
        Lookup::Created(record)
    } else {
        Lookup::Existing(record)
    })
}

/// Read-modify-write of the leveling columns on an open connection/transaction.
pub(crate) async fn apply_in(
    conn: &mut SqliteConnection,
    ledger: Ledger,
    user_id: &str,
    points: i64,
) -> BotResult<LevelOutcome> {
    let lookup = find_or_create(conn, ledger, user_id).await?;
    if lookup.was_created() {
        tracing::debug!("Created {} record for {}", ledger.table(), user_id);
    }

    let mut record = lookup.into_inner();
    let levels_gained = record.bank(points.max(0));

    let update = format!(
        "UPDATE {} SET power_level = ?, points = ? WHERE user_id = ?",
        ledger.table()
    );
    sqlx::query(AssertSqlSafe(update))
        .bind(record.power_level)
        .bind(record.points)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    Ok(LevelOutcome {
        power_level: record.power_level,
        points: record.points,
        levels_gained,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingNotifier;

    async fn service() -> (ProgressionService, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let db = Database::in_memory().await;
        (ProgressionService::new(db, notifier.clone()), notifier)
    }

    #[tokio::test]
    async fn test_first_award_creates_record() {
        let (service, notifier) = service().await;
        let outcome = service.apply_points(Ledger::Fitness, "@ann:hs", 40).await.unwrap();
        assert_eq!(outcome, LevelOutcome { power_level: 1, points: 40, levels_gained: 0 });
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_exact_threshold_levels_up_and_notifies() {
        let (service, notifier) = service().await;
        service.apply_points(Ledger::Fitness, "@ann:hs", 100).await.unwrap();
        let outcome = service.apply_points(Ledger::Fitness, "@ann:hs", 200).await.unwrap();

        assert_eq!(outcome.power_level, 3);
        assert_eq!(outcome.points, 0);
        assert_eq!(outcome.levels_gained, 1);

        let sent = notifier.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[1].contains("@ann:hs"));
        assert!(sent[1].contains("level 3"));
    }

    #[tokio::test]
    async fn test_ledgers_are_independent() {
        let (service, _) = service().await;
        service.apply_points(Ledger::Fitness, "@ann:hs", 150).await.unwrap();
        let time = service.apply_points(Ledger::Time, "@ann:hs", 20).await.unwrap();
        assert_eq!(time, LevelOutcome { power_level: 1, points: 20, levels_gained: 0 });
    }

    #[tokio::test]
    async fn test_invariant_after_every_call() {
        let (service, _) = service().await;
        for earned in [5, 95, 0, 250, 999, 1, 3_000] {
            let outcome = service.apply_points(Ledger::Time, "@bo:hs", earned).await.unwrap();
            assert!(outcome.points < 100 * outcome.power_level);
        }
    }

    #[tokio::test]
    async fn test_find_or_create_tags_lookup() {
        let (service, _) = service().await;
        let mut conn = service.database().pool().acquire().await.unwrap();
        let first = find_or_create(&mut conn, Ledger::Fitness, "@cy:hs").await.unwrap();
        let second = find_or_create(&mut conn, Ledger::Fitness, "@cy:hs").await.unwrap();
        assert_eq!(first, Lookup::Created(ProgressRecord::default()));
        assert_eq!(second, Lookup::Existing(ProgressRecord::default()));
    }
}
