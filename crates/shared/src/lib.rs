//! Shared types and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Typed chat and calendar-day identifiers
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
pub use types::{ChatId, DateKey};
