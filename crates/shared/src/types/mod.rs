//! Core type definitions.

pub mod date_key;
pub mod id;

pub use date_key::DateKey;
pub use id::ChatId;
