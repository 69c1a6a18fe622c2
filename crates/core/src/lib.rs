//! Core business logic for Bursar.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `catalog` - Fee heads, fee structures and the academic calendar
//! - `ledger` - Fee structure resolution and per-student ledgers
//! - `payment` - Payment validation, allocation and receipt numbers
//! - `reports` - Collection reports and balance statements

pub mod catalog;
pub mod ledger;
pub mod payment;
pub mod reports;

#[cfg(test)]
mod scenario_tests;
