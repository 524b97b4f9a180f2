//! Ledger service: serialized mutation with write-through persistence.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use tally_shared::{ChatId, DateKey};
use tokio::sync::Mutex;

use super::error::LedgerError;
use super::state::{DayBucket, LedgerState};
use super::store::LedgerStore;
use super::types::LedgerSnapshot;

/// Owns the single live [`LedgerState`] together with its storage handle.
///
/// Every operation holds the state lock from the first read through the
/// persistence write, so updates arriving from concurrent chat messages
/// and from the report timer apply one at a time. Recording operations
/// apply the month rollover first, then register the requesting chat as
/// the report target, then mutate and persist.
pub struct Ledger {
    state: Mutex<LedgerState>,
    store: Arc<dyn LedgerStore>,
    tz: Tz,
}

impl Ledger {
    /// Loads the ledger from `store`, creating and persisting an empty
    /// one when no document exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error when the initial load or write fails.
    pub async fn init(store: Arc<dyn LedgerStore>, tz: Tz) -> Result<Self, LedgerError> {
        let state = match store.load().await? {
            Some(state) => state,
            None => {
                let state = LedgerState::new(Utc::now().with_timezone(&tz).month());
                store.save(&state).await?;
                state
            }
        };
        Ok(Self {
            state: Mutex::new(state),
            store,
            tz,
        })
    }

    /// Current instant in the ledger's reference timezone.
    #[must_use]
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    // ========== Recording ==========

    /// Records an expense and persists the new state.
    ///
    /// The requesting chat becomes the daily report target. On a store
    /// failure the mutation stays in memory and rides along with the
    /// next successful save.
    pub async fn record_expense(
        &self,
        chat: ChatId,
        amount: Decimal,
        now: DateTime<Tz>,
    ) -> Result<LedgerSnapshot, LedgerError> {
        ensure_positive(amount)?;
        let mut state = self.state.lock().await;
        state.roll_over(now);
        state.set_notify_target(chat);
        state.apply_expense(amount, DateKey::from_datetime(&now));
        let snapshot = state.snapshot();
        self.store.save(&state).await?;
        Ok(snapshot)
    }

    /// Records an income and persists the new state.
    ///
    /// Mirrors [`Self::record_expense`] in every other respect.
    pub async fn record_income(
        &self,
        chat: ChatId,
        amount: Decimal,
        now: DateTime<Tz>,
    ) -> Result<LedgerSnapshot, LedgerError> {
        ensure_positive(amount)?;
        let mut state = self.state.lock().await;
        state.roll_over(now);
        state.set_notify_target(chat);
        state.apply_income(amount, DateKey::from_datetime(&now));
        let snapshot = state.snapshot();
        self.store.save(&state).await?;
        Ok(snapshot)
    }

    // ========== Queries ==========

    /// Reads the headline figures.
    ///
    /// A query can still change state: the month may roll over and the
    /// requesting chat becomes the report target. Persistence happens
    /// only when one of those actually changed something.
    pub async fn balance(
        &self,
        chat: ChatId,
        now: DateTime<Tz>,
    ) -> Result<LedgerSnapshot, LedgerError> {
        let mut state = self.state.lock().await;
        let rolled = state.roll_over(now);
        let retargeted = state.set_notify_target(chat);
        let snapshot = state.snapshot();
        if rolled || retargeted {
            self.store.save(&state).await?;
        }
        Ok(snapshot)
    }

    /// Totals recorded for one calendar day; zeroes when the day has no
    /// bucket.
    pub async fn day_totals(&self, day: DateKey) -> DayBucket {
        self.state.lock().await.day_totals(day)
    }

    // ========== Maintenance ==========

    /// Discards everything and persists a fresh ledger anchored to the
    /// current month. The report target is cleared as well.
    pub async fn clear(&self, now: DateTime<Tz>) -> Result<(), LedgerError> {
        let mut state = self.state.lock().await;
        *state = LedgerState::new(now.month());
        self.store.save(&state).await?;
        Ok(())
    }

    /// Rolls the month over if due, then captures what the daily report
    /// needs: the registered target and the current figures. All of it
    /// happens under one lock acquisition.
    pub async fn report_snapshot(
        &self,
        now: DateTime<Tz>,
    ) -> Result<(Option<ChatId>, LedgerSnapshot), LedgerError> {
        let mut state = self.state.lock().await;
        if state.roll_over(now) {
            self.store.save(&state).await?;
        }
        Ok((state.notify_target, state.snapshot()))
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount.to_string()));
    }
    Ok(())
}
