//! Core business logic for Hearth.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Accounts, categories, economic events and their lines
//! - `investment` - Lot accounting for buys and sales
//! - `reports` - Balance sheet assembly
//! - `auth` - Password hashing and credential checks

pub mod auth;
pub mod investment;
pub mod ledger;
pub mod reports;
