//! # Presence Rotation
//!
//! Cycles the bot's Matrix status message through a fixed list.

use std::time::Duration;

use matrix_sdk::Client;
use matrix_sdk::ruma::api::client::presence::set_presence::v3::Request as SetPresence;
use matrix_sdk::ruma::presence::PresenceState;

/// Endless round-robin over the configured statuses.
pub struct StatusCycle {
    statuses: Vec<String>,
    next: usize,
}

impl StatusCycle {
    pub fn new(statuses: Vec<String>) -> Self {
        Self { statuses, next: 0 }
    }
}

impl Iterator for StatusCycle {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.statuses.is_empty() {
            return None;
        }
        let status = self.statuses[self.next].clone();
        self.next = (self.next + 1) % self.statuses.len();
        Some(status)
    }
}

/// Updates the status every `interval`. Failures are logged and retried on
/// the next tick.
pub async fn rotate(client: Client, statuses: Vec<String>, interval: Duration) {
    let Some(user_id) = client.user_id().map(|id| id.to_owned()) else {
        tracing::warn!("Presence rotation skipped: client is not logged in");
        return;
    };

    let mut ticker = tokio::time::interval(interval);
    for status in StatusCycle::new(statuses) {
        ticker.tick().await;
        let mut request = SetPresence::new(user_id.clone(), PresenceState::Online);
        request.status_msg = Some(status.clone());
        match client.send(request).await {
            Ok(_) => tracing::debug!("Presence set to '{}'", status),
            Err(e) => tracing::warn!("{}", crate::strings::logs::presence_failed(&e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps_around() {
        let cycle = StatusCycle::new(vec!["a".into(), "b".into(), "c".into()]);
        let seen: Vec<String> = cycle.take(7).collect();
        assert_eq!(seen, ["a", "b", "c", "a", "b", "c", "a"]);
    }

    #[test]
    fn test_empty_cycle_ends() {
        assert_eq!(StatusCycle::new(Vec::new()).next(), None);
    }
}
