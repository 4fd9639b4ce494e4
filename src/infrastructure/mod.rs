//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (ChatProvider, Notifier,
//! QuoteSource, MemeSource) and owns the database pool.

pub mod health;
pub mod matrix;
pub mod presence;
pub mod quotes;
pub mod reddit;
pub mod storage;
