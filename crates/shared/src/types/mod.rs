//! Common types used across the application.

pub mod pagination;

pub use pagination::{PageMeta, PageRequest, PageResponse};

/// Ledger used when a request omits `ledger_id`.
pub const DEFAULT_LEDGER_ID: i64 = 1;
