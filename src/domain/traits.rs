//! # Domain Traits
//!
//! Abstract interfaces for the external collaborators (chat rooms, the broadcast
//! channel, content APIs). Concrete implementations live in the Infrastructure layer.

use crate::domain::error::BotResult;
use crate::domain::types::{MemePost, MemeQuery, Quote};
use async_trait::async_trait;

/// Abstract interface for a Chat Provider (e.g., Matrix, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a message to the room, returning the event id.
    async fn send_message(&self, content: &str) -> Result<String, String>;

    /// Send a short notice (not tracked)
    async fn send_notification(&self, content: &str) -> Result<(), String>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// Delivers announcements (level-ups) to the configured broadcast room.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, content: &str) -> Result<(), String>;
}

#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn random_quote(&self) -> BotResult<Quote>;
}

#[async_trait]
pub trait MemeSource: Send + Sync {
    /// Fetches up to `limit` candidate posts for the query (unfiltered).
    async fn fetch_posts(&self, query: &MemeQuery, limit: u32) -> BotResult<Vec<MemePost>>;
}
