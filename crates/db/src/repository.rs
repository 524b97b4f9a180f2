//! MongoDB-backed implementation of the ledger store.

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::{Client, Collection};
use tally_core::ledger::{LedgerState, LedgerStore, StoreError};

use crate::document::LedgerDocument;
use crate::retry::RetryPolicy;

/// Persists the single ledger document in a MongoDB collection.
///
/// Reads and writes go through the retry policy; the caller only sees
/// an error once the attempt budget is spent.
pub struct LedgerRepository {
    collection: Collection<LedgerDocument>,
    document_id: String,
    retry: RetryPolicy,
}

impl LedgerRepository {
    /// Creates a repository over `database`/`collection`, addressing
    /// the document with `document_id`.
    #[must_use]
    pub fn new(client: &Client, database: &str, collection: &str, document_id: String) -> Self {
        Self {
            collection: client.database(database).collection(collection),
            document_id,
            retry: RetryPolicy::default(),
        }
    }

    /// Overrides the default retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

fn into_store_error(error: mongodb::error::Error) -> StoreError {
    use mongodb::error::ErrorKind;
    match *error.kind {
        ErrorKind::BsonDeserialization(ref inner) => StoreError::Corrupt(inner.to_string()),
        _ => StoreError::Unavailable(error.to_string()),
    }
}

#[async_trait]
impl LedgerStore for LedgerRepository {
    async fn load(&self) -> Result<Option<LedgerState>, StoreError> {
        let document = self
            .retry
            .run(|| {
                let filter = doc! { "_id": &self.document_id };
                async move { self.collection.find_one(filter).await }
            })
            .await
            .map_err(into_store_error)?;
        Ok(document.map(LedgerDocument::into_state))
    }

    async fn save(&self, state: &LedgerState) -> Result<(), StoreError> {
        let document = LedgerDocument::from_state(&self.document_id, state);
        self.retry
            .run(|| {
                let filter = doc! { "_id": &self.document_id };
                let document = &document;
                async move {
                    self.collection
                        .replace_one(filter, document)
                        .upsert(true)
                        .await
                }
            })
            .await
            .map_err(into_store_error)?;
        Ok(())
    }
}
