//! # Command Handlers
//!
//! Contains specific handler functions for each supported command (e.g., .set_goal, .end_timer, .meme).
//! These handlers are invoked by the Router.

pub mod fitness;
pub mod goals;
pub mod leisure;
pub mod misc;
pub mod time;

use anyhow::Result;

use crate::domain::error::{BotError, BotResult};
use crate::domain::traits::ChatProvider;
use crate::strings::messages;

/// Sends the reply text, or the user-facing rendering of the error.
pub async fn reply(chat: &impl ChatProvider, result: BotResult<String>) -> Result<()> {
    let text = match result {
        Ok(text) => text,
        Err(err) => error_reply(&err),
    };
    chat.send_message(&text).await.map(|_| ()).map_err(|e| anyhow::anyhow!(e))
}

pub fn error_reply(err: &BotError) -> String {
    match err {
        BotError::Validation(msg) | BotError::NotFound(msg) | BotError::Conflict(msg) => msg.clone(),
        BotError::DataAccess(e) => {
            tracing::error!("Database error: {}", e);
            messages::GENERIC_FAILURE.to_string()
        }
        BotError::ExternalService { service, message } => {
            tracing::warn!("{} unavailable: {}", service, message);
            messages::FETCH_FAILED.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_reply_hides_storage_detail() {
        let err = BotError::DataAccess(sqlx::Error::RowNotFound);
        assert_eq!(error_reply(&err), messages::GENERIC_FAILURE);
        assert_eq!(error_reply(&BotError::external("reddit", "503")), messages::FETCH_FAILED);
        assert_eq!(error_reply(&BotError::conflict("busy")), "busy");
    }
}
