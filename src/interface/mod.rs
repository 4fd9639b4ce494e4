//! # Interface Layer
//!
//! Chat-facing command handlers.

pub mod commands;
