//! Wire format of the ledger document.

use std::collections::BTreeMap;
use std::str::FromStr as _;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_core::ledger::{DayBucket, LedgerState};
use tally_shared::{ChatId, DateKey};

/// Version written into new documents.
pub const SCHEMA_VERSION: u32 = 1;

/// Totals for one day as stored on the wire.
///
/// Field names are fixed by the deployed documents: `thu` is income,
/// `chi` is expense.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTotalsDoc {
    /// Income total.
    #[serde(default, with = "rust_decimal::serde::str")]
    pub thu: Decimal,
    /// Expense total.
    #[serde(default, with = "rust_decimal::serde::str")]
    pub chi: Decimal,
}

/// The single ledger document.
///
/// Every field except `_id` defaults when absent, so documents written
/// before a field existed load cleanly and pick it up on the next save.
/// Amounts travel as strings to keep decimal values exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerDocument {
    /// Document identifier within the collection.
    #[serde(rename = "_id")]
    pub id: String,
    /// Schema version; 0 marks documents predating the version field.
    #[serde(default)]
    pub schema_version: u32,
    /// Net balance.
    #[serde(default, with = "rust_decimal::serde::str")]
    pub balance: Decimal,
    /// Spending in the current month.
    #[serde(default, with = "rust_decimal::serde::str")]
    pub monthly_spending: Decimal,
    /// Month the spending belongs to; 0 forces a rollover on first use.
    #[serde(default)]
    pub last_month: u32,
    /// Chat receiving the daily report.
    #[serde(default)]
    pub user_chat_id: Option<ChatId>,
    /// Per-day totals keyed by `YYYY-MM-DD`.
    #[serde(default)]
    pub daily_data: BTreeMap<String, DayTotalsDoc>,
}

impl LedgerDocument {
    /// Builds the wire document for `state` under the given id.
    #[must_use]
    pub fn from_state(id: &str, state: &LedgerState) -> Self {
        Self {
            id: id.to_string(),
            schema_version: SCHEMA_VERSION,
            balance: state.balance,
            monthly_spending: state.monthly_spending,
            last_month: state.last_rollover_month,
            user_chat_id: state.notify_target,
            daily_data: state
                .daily
                .iter()
                .map(|(day, bucket)| {
                    (
                        day.to_string(),
                        DayTotalsDoc {
                            thu: bucket.income,
                            chi: bucket.expense,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Rebuilds the in-memory state.
    ///
    /// Day keys that fail to parse are dropped with a warning rather
    /// than poisoning the whole load.
    #[must_use]
    pub fn into_state(self) -> LedgerState {
        let mut daily = BTreeMap::new();
        for (raw_key, totals) in self.daily_data {
            match DateKey::from_str(&raw_key) {
                Ok(day) => {
                    daily.insert(
                        day,
                        DayBucket {
                            income: totals.thu,
                            expense: totals.chi,
                        },
                    );
                }
                Err(error) => {
                    tracing::warn!(key = %raw_key, error = %error, "dropping unparsable day bucket");
                }
            }
        }
        LedgerState {
            balance: self.balance,
            monthly_spending: self.monthly_spending,
            last_rollover_month: self.last_month,
            notify_target: self.user_chat_id,
            daily,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document, to_document};
    use rust_decimal_macros::dec;

    fn sample_state() -> LedgerState {
        let mut state = LedgerState::new(3);
        state.balance = dec!(70.5);
        state.monthly_spending = dec!(30);
        state.notify_target = Some(ChatId::new(42));
        state.daily.insert(
            "2025-03-07".parse().expect("key"),
            DayBucket {
                income: dec!(100),
                expense: dec!(29.5),
            },
        );
        state
    }

    #[test]
    fn state_survives_bson_round_trip() {
        let state = sample_state();

        let document = LedgerDocument::from_state("primary", &state);
        let bson = to_document(&document).expect("serialize");
        let back: LedgerDocument = from_document(bson).expect("deserialize");

        assert_eq!(back, document);
        assert_eq!(back.into_state(), state);
    }

    #[test]
    fn amounts_travel_as_strings() {
        let document = LedgerDocument::from_state("primary", &sample_state());
        let bson = to_document(&document).expect("serialize");

        assert_eq!(bson.get_str("balance").expect("balance"), "70.5");
        assert_eq!(
            bson.get_str("monthly_spending").expect("monthly_spending"),
            "30"
        );
        let day = bson
            .get_document("daily_data")
            .expect("daily_data")
            .get_document("2025-03-07")
            .expect("bucket");
        assert_eq!(day.get_str("thu").expect("thu"), "100");
        assert_eq!(day.get_str("chi").expect("chi"), "29.5");
    }

    #[test]
    fn wire_field_names_are_stable() {
        let bson = doc! {
            "_id": "primary",
            "balance": "12.5",
            "monthly_spending": "2",
            "last_month": 3_i64,
            "user_chat_id": 42_i64,
            "daily_data": {
                "2025-03-07": { "thu": "100", "chi": "30" },
            },
        };

        let state = from_document::<LedgerDocument>(bson)
            .expect("deserialize")
            .into_state();

        assert_eq!(state.balance, dec!(12.5));
        assert_eq!(state.monthly_spending, dec!(2));
        assert_eq!(state.last_rollover_month, 3);
        assert_eq!(state.notify_target, Some(ChatId::new(42)));
        let bucket = state.day_totals("2025-03-07".parse().expect("key"));
        assert_eq!(bucket.income, dec!(100));
        assert_eq!(bucket.expense, dec!(30));
    }

    #[test]
    fn missing_fields_default() {
        let bson = doc! { "_id": "primary" };
        let document: LedgerDocument = from_document(bson).expect("deserialize");

        assert_eq!(document.schema_version, 0);
        assert_eq!(document.balance, Decimal::ZERO);
        assert_eq!(document.monthly_spending, Decimal::ZERO);
        assert_eq!(document.last_month, 0);
        assert_eq!(document.user_chat_id, None);
        assert!(document.daily_data.is_empty());
    }

    #[test]
    fn unparsable_day_keys_are_dropped() {
        let bson = doc! {
            "_id": "primary",
            "daily_data": {
                "not-a-date": { "thu": "1", "chi": "0" },
                "2025-03-07": { "thu": "2", "chi": "0" },
            },
        };

        let state = from_document::<LedgerDocument>(bson)
            .expect("deserialize")
            .into_state();

        assert_eq!(state.daily.len(), 1);
        assert_eq!(
            state.day_totals("2025-03-07".parse().expect("key")).income,
            dec!(2)
        );
    }

    #[test]
    fn fresh_documents_carry_current_schema_version() {
        let document = LedgerDocument::from_state("primary", &LedgerState::new(1));
        assert_eq!(document.schema_version, SCHEMA_VERSION);
    }
}
