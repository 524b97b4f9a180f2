//! Calendar-day key for daily ledger buckets.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};

/// A calendar day in the ledger's reference timezone, rendered on the
/// wire as `YYYY-MM-DD`.
///
/// Keys order chronologically, so a `BTreeMap` keyed by `DateKey`
/// iterates days in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Creates a key for the given calendar date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Derives the key for the calendar day an instant falls on, in
    /// that instant's timezone.
    #[must_use]
    pub fn from_datetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self(instant.date_naive())
    }

    /// Returns the key for the previous calendar day, saturating at the
    /// first representable date.
    #[must_use]
    pub fn previous(self) -> Self {
        self.0.pred_opt().map_or(self, Self)
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Returns the underlying date.
    #[must_use]
    pub const fn into_inner(self) -> NaiveDate {
        self.0
    }
}

impl std::fmt::Display for DateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // NaiveDate renders as ISO-8601 `YYYY-MM-DD`.
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DateKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Self)
    }
}
