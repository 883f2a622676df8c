//! Balance sheet reporting.
//!
//! Pure assembly of point-in-time balances: the caller supplies each
//! account's latest snapshot and the line movements after it.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::ReportService;
pub use types::*;
