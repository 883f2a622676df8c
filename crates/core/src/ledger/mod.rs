//! Ledger entities and the line engine.
//!
//! This module implements:
//! - Account types and category kinds
//! - Economic events and the lines they post
//! - Business rule validation for accounts, categories and amounts
//! - Category tree rules
//! - Ledger service tying lookups to validation
//! - Error types for ledger operations

pub mod category;
pub mod error;
pub mod event;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;

pub use error::{ErrorKind, LedgerError};
pub use event::{EconomicEvent, EntryEvent, TradeCharges, TradeEvent, TransferEvent, net_amount};
pub use service::LedgerService;
pub use types::{AccountInfo, AccountRole, AccountType, CategoryInfo, CategoryKind, LineDraft};
