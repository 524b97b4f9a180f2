//! Telegram transport layer.
//!
//! This crate provides:
//! - `client` - A minimal Bot API client (long polling and sendMessage)
//! - `command` - Slash-command and free-text parsing
//! - `dispatch` - Routing updates onto the ledger
//! - `reporter` - The scheduled daily report task

pub mod client;
pub mod command;
pub mod dispatch;
pub mod reporter;

use std::sync::Arc;
use std::time::Duration;

use tally_core::ledger::Ledger;

use crate::client::TelegramClient;

/// Application state shared across update handling.
#[derive(Clone)]
pub struct AppState {
    /// The single ledger behind every chat.
    pub ledger: Arc<Ledger>,
    /// Client used for replies.
    pub client: TelegramClient,
    /// Bot username without `@`, used to detect mentions in groups.
    pub bot_username: String,
    /// Long-poll timeout passed to `getUpdates`, in seconds.
    pub poll_timeout_secs: u32,
}

/// Runs the long-polling loop forever.
///
/// Transport errors are logged and answered with a short backoff; no
/// error terminates the loop.
pub async fn run_polling(state: AppState) {
    let mut offset: Option<i64> = None;
    loop {
        match state
            .client
            .get_updates(offset, state.poll_timeout_secs)
            .await
        {
            Ok(updates) => {
                for update in updates {
                    offset = Some(update.update_id + 1);
                    if let Err(error) = dispatch::handle_update(&state, update).await {
                        tracing::warn!(error = %error, "failed to handle update");
                    }
                }
            }
            Err(error) => {
                tracing::warn!(error = %error, "polling failed, backing off");
                tokio::time::sleep(Duration::from_secs(3)).await;
            }
        }
    }
}
