//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every multi-row write runs inside a single database transaction.

pub mod account;
pub mod category;
pub mod error;
pub mod investment;
pub mod posting;
pub mod report;
pub mod snapshot;
pub mod transaction;

pub use account::{AccountFilter, AccountRepository, CreateAccountInput, UpdateAccountInput};
pub use category::{CategoryRepository, CreateCategoryInput, UpdateCategoryInput};
pub use error::{RepoResult, RepositoryError};
pub use investment::{
    BuyInput, BuyResult, InvestmentRepository, LotFilter, LotView, SaleInput, SaleResult,
    SecurityRef,
};
pub use posting::TransactionHeader;
pub use report::ReportRepository;
pub use snapshot::{CreateSnapshotInput, SnapshotRepository, UpdateSnapshotInput};
pub use transaction::{
    CreateEntryInput, CreateTransferInput, EntryFilter, EntryPage, EntryRow, LineDetail,
    TransactionDetail, TransactionRepository, UpdateEntryInput,
};
