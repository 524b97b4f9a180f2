//! Mutable ledger state and its primitive transitions.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use tally_shared::{ChatId, DateKey};

use super::types::LedgerSnapshot;

/// Income and expense totals for one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayBucket {
    /// Income recorded on the day.
    pub income: Decimal,
    /// Expenses recorded on the day.
    pub expense: Decimal,
}

/// The complete in-memory ledger.
///
/// `LedgerState` is a plain value: it knows how to transition itself but
/// nothing about persistence or locking. [`Ledger`](super::service::Ledger)
/// owns the single live instance and serializes all access to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerState {
    /// Running balance: income ever recorded minus expenses ever recorded.
    pub balance: Decimal,
    /// Expenses accumulated during the current calendar month.
    pub monthly_spending: Decimal,
    /// Month (1-12) that `monthly_spending` belongs to.
    pub last_rollover_month: u32,
    /// Chat the scheduled daily report is delivered to, if one has been
    /// registered.
    pub notify_target: Option<ChatId>,
    /// Per-day totals keyed by calendar day.
    pub daily: BTreeMap<DateKey, DayBucket>,
}

impl LedgerState {
    /// Creates an empty ledger anchored to the given month.
    #[must_use]
    pub fn new(month: u32) -> Self {
        Self {
            balance: Decimal::ZERO,
            monthly_spending: Decimal::ZERO,
            last_rollover_month: month,
            notify_target: None,
            daily: BTreeMap::new(),
        }
    }

    /// Resets the monthly spending total when the calendar month has
    /// changed since the last rollover.
    ///
    /// Returns `true` when a reset happened and the state should be
    /// persisted. Repeated calls within the same month are no-ops.
    pub fn roll_over(&mut self, now: DateTime<Tz>) -> bool {
        let month = now.month();
        if month == self.last_rollover_month {
            return false;
        }
        self.monthly_spending = Decimal::ZERO;
        self.last_rollover_month = month;
        true
    }

    /// Applies an expense: monthly spending and the day's expense bucket
    /// grow by `amount`, the balance shrinks by it.
    pub fn apply_expense(&mut self, amount: Decimal, day: DateKey) {
        self.monthly_spending += amount;
        self.balance -= amount;
        self.daily.entry(day).or_default().expense += amount;
    }

    /// Applies an income: the balance and the day's income bucket grow
    /// by `amount`.
    pub fn apply_income(&mut self, amount: Decimal, day: DateKey) {
        self.balance += amount;
        self.daily.entry(day).or_default().income += amount;
    }

    /// Returns the totals recorded for a day, zeroes when the day has
    /// no bucket.
    #[must_use]
    pub fn day_totals(&self, day: DateKey) -> DayBucket {
        self.daily.get(&day).copied().unwrap_or_default()
    }

    /// Points the daily report at `chat`. Returns `true` when this
    /// changed the target; the most recent chat always wins.
    pub fn set_notify_target(&mut self, chat: ChatId) -> bool {
        if self.notify_target == Some(chat) {
            return false;
        }
        self.notify_target = Some(chat);
        true
    }

    /// Captures the headline figures reported back to users.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            balance: self.balance,
            monthly_spending: self.monthly_spending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;
    use rust_decimal_macros::dec;

    const TZ: Tz = chrono_tz::Asia::Ho_Chi_Minh;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Tz> {
        TZ.with_ymd_and_hms(year, month, day, 10, 0, 0)
            .single()
            .expect("valid instant")
    }

    fn day(year: i32, month: u32, day: u32) -> DateKey {
        DateKey::from_datetime(&at(year, month, day))
    }

    #[test]
    fn income_then_expense_tracks_running_sums() {
        let mut state = LedgerState::new(3);
        let today = day(2025, 3, 15);

        state.apply_income(dec!(100), today);
        state.apply_expense(dec!(30), today);

        assert_eq!(state.balance, dec!(70));
        assert_eq!(state.monthly_spending, dec!(30));
        assert_eq!(
            state.day_totals(today),
            DayBucket {
                income: dec!(100),
                expense: dec!(30),
            }
        );
    }

    #[test]
    fn expenses_accumulate_per_day() {
        let mut state = LedgerState::new(3);
        state.apply_expense(dec!(10), day(2025, 3, 1));
        state.apply_expense(dec!(2.5), day(2025, 3, 1));
        state.apply_expense(dec!(4), day(2025, 3, 2));

        assert_eq!(state.day_totals(day(2025, 3, 1)).expense, dec!(12.5));
        assert_eq!(state.day_totals(day(2025, 3, 2)).expense, dec!(4));
        assert_eq!(state.monthly_spending, dec!(16.5));
        assert_eq!(state.balance, dec!(-16.5));
    }

    #[test]
    fn absent_day_reads_as_zeroes() {
        let state = LedgerState::new(3);
        assert_eq!(state.day_totals(day(2025, 3, 9)), DayBucket::default());
    }

    #[test]
    fn rollover_resets_spending_once_per_month() {
        let mut state = LedgerState::new(3);
        state.apply_expense(dec!(40), day(2025, 3, 31));

        assert!(state.roll_over(at(2025, 4, 1)));
        assert_eq!(state.monthly_spending, Decimal::ZERO);
        assert_eq!(state.last_rollover_month, 4);
        // The balance and day buckets survive the rollover.
        assert_eq!(state.balance, dec!(-40));
        assert_eq!(state.day_totals(day(2025, 3, 31)).expense, dec!(40));

        // Second check within the same month changes nothing.
        assert!(!state.roll_over(at(2025, 4, 20)));
        assert_eq!(state.last_rollover_month, 4);
    }

    #[test]
    fn rollover_is_noop_within_month() {
        let mut state = LedgerState::new(3);
        state.apply_expense(dec!(5), day(2025, 3, 2));
        assert!(!state.roll_over(at(2025, 3, 28)));
        assert_eq!(state.monthly_spending, dec!(5));
    }

    #[test]
    fn notify_target_follows_last_writer() {
        let mut state = LedgerState::new(3);
        assert!(state.set_notify_target(ChatId::new(1)));
        assert!(!state.set_notify_target(ChatId::new(1)));
        assert!(state.set_notify_target(ChatId::new(2)));
        assert_eq!(state.notify_target, Some(ChatId::new(2)));
    }

    #[test]
    fn new_state_is_empty() {
        let state = LedgerState::new(7);
        assert_eq!(state.balance, Decimal::ZERO);
        assert_eq!(state.monthly_spending, Decimal::ZERO);
        assert_eq!(state.last_rollover_month, 7);
        assert_eq!(state.notify_target, None);
        assert!(state.daily.is_empty());
    }
}
