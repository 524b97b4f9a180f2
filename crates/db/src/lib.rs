//! Storage layer persisting the ledger document to MongoDB.
//!
//! This crate provides:
//! - The wire format of the single ledger document
//! - A repository implementing the core storage port
//! - Retry handling for flaky connections

pub mod document;
pub mod repository;
pub mod retry;

pub use document::LedgerDocument;
pub use repository::LedgerRepository;
pub use retry::RetryPolicy;

use mongodb::Client;
use mongodb::error::Error;

/// Establishes a connection to the database.
///
/// The driver connects lazily; the first operation surfaces
/// reachability problems.
///
/// # Errors
///
/// Returns an error if the connection string cannot be parsed.
pub async fn connect(database_url: &str) -> Result<Client, Error> {
    Client::with_uri_str(database_url).await
}
