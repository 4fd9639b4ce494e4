//! # Strings Module
//!
//! Centralizes user-facing strings, log templates and help text.

pub mod help;
pub mod logs;
pub mod messages;
