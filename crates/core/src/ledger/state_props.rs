//! Property-based tests for the ledger state.
//!
//! - Running sums: balance, monthly spending, and day buckets stay
//!   consistent under any sequence of recordings
//! - Rollover: fires exactly when the month changes, at most once
//! - Absent days always read as zeroes

use chrono::{DateTime, NaiveDate, TimeZone as _};
use chrono_tz::Tz;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::DateKey;

use super::state::LedgerState;

const TZ: Tz = chrono_tz::Asia::Ho_Chi_Minh;

fn day_key(day: u32) -> DateKey {
    DateKey::new(NaiveDate::from_ymd_opt(2025, 3, day).expect("valid day"))
}

fn mid_month(month: u32) -> DateTime<Tz> {
    TZ.with_ymd_and_hms(2025, month, 15, 8, 0, 0)
        .single()
        .expect("valid instant")
}

/// Strategy for positive amounts (0.01 to 10,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for one recording: income flag, amount, day of March.
fn op() -> impl Strategy<Value = (bool, Decimal, u32)> {
    (any::<bool>(), amount(), 1u32..=28)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* sequence of recordings, the balance equals total income
    /// minus total expenses, monthly spending equals total expenses, and
    /// the day buckets partition both totals exactly.
    #[test]
    fn prop_running_sums_hold(ops in prop::collection::vec(op(), 0..40)) {
        let mut state = LedgerState::new(3);
        let mut income_total = Decimal::ZERO;
        let mut expense_total = Decimal::ZERO;

        for (is_income, amount, day) in ops {
            let key = day_key(day);
            if is_income {
                state.apply_income(amount, key);
                income_total += amount;
            } else {
                state.apply_expense(amount, key);
                expense_total += amount;
            }
        }

        prop_assert_eq!(state.balance, income_total - expense_total);
        prop_assert_eq!(state.monthly_spending, expense_total);

        let bucket_income: Decimal = state.daily.values().map(|b| b.income).sum();
        let bucket_expense: Decimal = state.daily.values().map(|b| b.expense).sum();
        prop_assert_eq!(bucket_income, income_total);
        prop_assert_eq!(bucket_expense, expense_total);
    }

    /// *For any* pair of months, the rollover fires exactly when they
    /// differ, resets only the monthly spending, and never fires twice
    /// for the same month.
    #[test]
    fn prop_rollover_fires_exactly_on_month_change(
        start in 1u32..=12,
        next in 1u32..=12,
        spending in amount(),
    ) {
        let mut state = LedgerState::new(start);
        state.monthly_spending = spending;
        let now = mid_month(next);

        let rolled = state.roll_over(now);
        prop_assert_eq!(rolled, start != next);
        prop_assert_eq!(state.last_rollover_month, next);
        if rolled {
            prop_assert_eq!(state.monthly_spending, Decimal::ZERO);
        } else {
            prop_assert_eq!(state.monthly_spending, spending);
        }

        // A second check within the same month never fires.
        prop_assert!(!state.roll_over(now));
    }

    /// *For any* recorded history, a day nothing touched reads as zero
    /// income and zero expense.
    #[test]
    fn prop_untouched_day_reads_zero(ops in prop::collection::vec(op(), 0..20)) {
        let mut state = LedgerState::new(3);
        for (is_income, amount, day) in ops {
            if is_income {
                state.apply_income(amount, day_key(day));
            } else {
                state.apply_expense(amount, day_key(day));
            }
        }

        let untouched = DateKey::new(NaiveDate::from_ymd_opt(2025, 5, 1).expect("valid day"));
        let bucket = state.day_totals(untouched);
        prop_assert_eq!(bucket.income, Decimal::ZERO);
        prop_assert_eq!(bucket.expense, Decimal::ZERO);
    }
}
