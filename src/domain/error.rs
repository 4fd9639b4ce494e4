//! # Domain Errors
//!
//! Error taxonomy shared by every command. Handlers never abort the process;
//! the router turns each variant into a user-facing reply.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    /// Bad user input (non-numeric fields, unknown update field, malformed date/time).
    #[error("{0}")]
    Validation(String),

    /// Referenced goal, schedule, timer or record is absent.
    #[error("{0}")]
    NotFound(String),

    /// The request collides with existing state and was rejected without mutation.
    #[error("{0}")]
    Conflict(String),

    #[error("data access failed: {0}")]
    DataAccess(#[from] sqlx::Error),

    #[error("{service} request failed: {message}")]
    ExternalService { service: &'static str, message: String },
}

impl BotError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn external(service: &'static str, message: impl ToString) -> Self {
        Self::ExternalService {
            service,
            message: message.to_string(),
        }
    }
}

pub type BotResult<T> = Result<T, BotError>;
