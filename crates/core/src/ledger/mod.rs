//! The single-document ledger.
//!
//! This module implements the core ledger functionality:
//! - The mutable ledger state (balance, monthly spending, day buckets)
//! - Month rollover
//! - The storage port the state is persisted through
//! - The service that serializes all access to the live state
//! - Input validation for user-supplied amounts

pub mod error;
pub mod service;
pub mod state;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod state_props;

pub use error::LedgerError;
pub use service::Ledger;
pub use state::{DayBucket, LedgerState};
pub use store::{LedgerStore, MemoryStore, StoreError};
pub use types::LedgerSnapshot;
pub use validation::parse_amount;
