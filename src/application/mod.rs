//! # Application Layer
//!
//! Contains the core business logic and orchestration of the bot.
//! This includes the progression protocol, the per-feature services, the
//! reminder queue, command routing and transient form state.

pub mod fitness;
pub mod goals;
pub mod leisure;
pub mod parsing;
pub mod progression;
pub mod reminders;
pub mod router;
pub mod state;
pub mod time;
