//! Core ledger logic for Tally.
//!
//! This crate contains pure business logic with ZERO transport or database
//! dependencies. All domain types, validation rules, and calculations live
//! here.
//!
//! # Modules
//!
//! - `ledger` - The single-document ledger: state, operations, storage port
//! - `schedule` - Daily report timing

pub mod ledger;
pub mod schedule;
