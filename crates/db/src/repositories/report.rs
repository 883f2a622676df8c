//! Report repository for the balance sheet.
//!
//! The database supplies one position per account (latest snapshot plus the
//! line movements after it); grouping and totals are done by
//! `hearth_core::reports::ReportService`.

use chrono::NaiveDate;
use hearth_core::reports::{AccountPosition, BalanceSheetReport, ReportService};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbBackend, FromQueryResult, Statement};
use tracing::debug;

use super::error::RepoResult;

/// Latest snapshot per account on or before `$2`, same-day rows summed, then
/// the live lines dated after that snapshot and up to `$2`.
const POSITIONS_SQL: &str = r"
WITH latest AS (
    SELECT account_id, MAX(as_of) AS as_of
    FROM account_snapshots
    WHERE deleted_at IS NULL AND ledger_id = $1 AND as_of <= $2
    GROUP BY account_id
),
snap AS (
    SELECT s.account_id, latest.as_of, SUM(s.amount) AS amount
    FROM account_snapshots s
    JOIN latest ON latest.account_id = s.account_id AND latest.as_of = s.as_of
    WHERE s.deleted_at IS NULL AND s.ledger_id = $1
    GROUP BY s.account_id, latest.as_of
)
SELECT a.id,
       a.name,
       a.account_type::text AS account_type,
       a.currency,
       a.is_active,
       snap.amount AS snapshot_amount,
       COALESCE((
           SELECT SUM(tl.amount)
           FROM transaction_lines tl
           JOIN transactions t ON t.id = tl.transaction_id AND t.deleted_at IS NULL
           WHERE tl.account_id = a.id
             AND tl.deleted_at IS NULL
             AND t.occurred_on <= $2
             AND (snap.as_of IS NULL OR t.occurred_on > snap.as_of)
       ), 0) AS delta
FROM accounts a
LEFT JOIN snap ON snap.account_id = a.id
WHERE a.deleted_at IS NULL AND a.ledger_id = $1
ORDER BY a.id
";

#[derive(Debug, FromQueryResult)]
struct PositionRow {
    id: i64,
    name: String,
    account_type: String,
    currency: String,
    is_active: bool,
    snapshot_amount: Option<Decimal>,
    delta: Decimal,
}

impl From<PositionRow> for AccountPosition {
    fn from(row: PositionRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            account_type: row.account_type,
            currency: row.currency,
            is_active: row.is_active,
            snapshot_amount: row.snapshot_amount,
            delta: row.delta,
        }
    }
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the balance sheet of a ledger as of a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn balance_sheet(
        &self,
        ledger_id: i64,
        as_of: NaiveDate,
    ) -> RepoResult<BalanceSheetReport> {
        let rows = PositionRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            POSITIONS_SQL,
            [ledger_id.into(), as_of.into()],
        ))
        .all(&self.db)
        .await?;

        debug!(ledger_id, %as_of, accounts = rows.len(), "balance sheet positions loaded");
        let positions = rows.into_iter().map(AccountPosition::from).collect();
        Ok(ReportService::generate_balance_sheet(ledger_id, as_of, positions))
    }
}
