//! Read-model types returned by ledger operations.

use rust_decimal::Decimal;

/// Point-in-time view of the headline ledger figures.
///
/// Operations hand this back after mutating under the lock, so replies
/// never re-read state that another update may have changed since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSnapshot {
    /// Net balance.
    pub balance: Decimal,
    /// Spending accumulated in the current month.
    pub monthly_spending: Decimal,
}
