//! Scheduled daily report task.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use tally_core::ledger::{Ledger, LedgerSnapshot};
use tally_core::schedule::ReportSchedule;
use tally_shared::ChatId;

use crate::client::{ClientError, TelegramClient};

/// Outbound channel the daily report is pushed through.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Delivers `text` to `chat`.
    async fn deliver(&self, chat: ChatId, text: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl ReportSink for TelegramClient {
    async fn deliver(&self, chat: ChatId, text: &str) -> Result<(), ClientError> {
        self.send_message(chat, text).await
    }
}

#[async_trait]
impl<S: ReportSink + ?Sized> ReportSink for Arc<S> {
    async fn deliver(&self, chat: ChatId, text: &str) -> Result<(), ClientError> {
        self.as_ref().deliver(chat, text).await
    }
}

/// Drives the report schedule and pushes the daily summary.
pub struct Reporter<S> {
    ledger: Arc<Ledger>,
    sink: S,
    schedule: ReportSchedule,
}

impl<S: ReportSink> Reporter<S> {
    /// Creates a reporter over an idle schedule.
    #[must_use]
    pub fn new(ledger: Arc<Ledger>, sink: S, schedule: ReportSchedule) -> Self {
        Self {
            ledger,
            sink,
            schedule,
        }
    }

    /// Runs forever: sleep until the armed instant, fire, re-arm.
    pub async fn run(mut self) {
        let mut at = self.schedule.arm(self.ledger.now());
        tracing::info!(next = %at, "daily report armed");
        loop {
            let wait = at
                .signed_duration_since(Utc::now())
                .to_std()
                .unwrap_or(Duration::ZERO);
            tokio::time::sleep(wait).await;
            self.fire_once().await;
            at = self.schedule.rearm(self.ledger.now());
            tracing::debug!(next = %at, "daily report re-armed");
        }
    }

    /// One firing: roll the month forward, then deliver if a target chat
    /// has registered.
    ///
    /// Failures are logged and dropped; the next cycle runs on its own
    /// schedule regardless.
    pub async fn fire_once(&self) {
        let now = self.ledger.now();
        match self.ledger.report_snapshot(now).await {
            Ok((Some(chat), snapshot)) => {
                let text = format_report(&snapshot);
                match self.sink.deliver(chat, &text).await {
                    Ok(()) => tracing::info!(chat = %chat, "daily report delivered"),
                    Err(error) => {
                        tracing::error!(chat = %chat, error = %error, "daily report delivery failed");
                    }
                }
            }
            Ok((None, _)) => {
                tracing::debug!("no report target registered, skipping daily report");
            }
            Err(error) => {
                tracing::error!(error = %error, "rollover persistence failed, skipping daily report");
            }
        }
    }
}

fn format_report(snapshot: &LedgerSnapshot) -> String {
    format!(
        "Daily report:\nCurrent balance: {}\nSpent this month: {}",
        snapshot.balance, snapshot.monthly_spending
    )
}
