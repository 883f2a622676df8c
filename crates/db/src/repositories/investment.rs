//! Investment repository: buys, buy edits, sales and lot listing.
//!
//! Every write runs in one database transaction. Lots touched by a sale or
//! an edit are read `FOR UPDATE` in ascending id order so that concurrent
//! sales over the same lots serialize instead of over-allocating.

use std::collections::HashMap;

use hearth_core::investment::{
    self, AllocationRequest, BuyAmounts, LotState, LotStatus, SecurityAction, SecuritySelector,
};
use hearth_core::ledger::{EconomicEvent, LedgerError, TradeCharges, TradeEvent};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Set, Statement, TransactionTrait,
    Value, sea_query::Expr,
};
use tracing::debug;

use super::error::RepoResult;
use super::posting::{self, Posted, TransactionHeader};
use super::transaction::find_transaction;
use crate::entities::{
    SoftDelete, investment_lot_allocations, investment_lots, investment_sales, securities,
    transaction_lines, transactions,
};

/// How a buy names its security.
#[derive(Debug, Clone, Default)]
pub struct SecurityRef {
    /// Existing security; wins when positive.
    pub security_id: Option<i64>,
    /// Ticker used when no id is given.
    pub ticker: String,
    /// Name used when no id is given.
    pub name: String,
    /// Currency for a security created on the fly.
    pub currency: String,
}

/// Input for creating or editing a buy.
#[derive(Debug, Clone)]
pub struct BuyInput {
    /// Transaction header.
    pub header: TransactionHeader,
    /// Security bought.
    pub security: SecurityRef,
    /// Account paying cash.
    pub cash_account_id: i64,
    /// Account receiving the holding.
    pub investment_account_id: i64,
    /// Units bought.
    pub quantity: Decimal,
    /// Executed price per unit.
    pub price: Decimal,
    /// Fee, tax and their categories.
    pub charges: TradeCharges,
}

/// Outcome of a buy.
#[derive(Debug, Clone)]
pub struct BuyResult {
    /// Owning transaction.
    pub transaction_id: i64,
    /// Lot created or edited.
    pub lot_id: i64,
    /// Security held.
    pub security_id: i64,
    /// Units bought.
    pub quantity: Decimal,
    /// Executed price.
    pub price: Decimal,
    /// Cost basis per unit.
    pub cost_price: Decimal,
    /// Quantity times price.
    pub gross_amount: Decimal,
    /// Gross plus fee and tax.
    pub cost_amount: Decimal,
    /// Fee.
    pub fee: Decimal,
    /// Tax.
    pub tax: Decimal,
}

/// Input for a sale.
#[derive(Debug, Clone)]
pub struct SaleInput {
    /// Transaction header.
    pub header: TransactionHeader,
    /// Security every lot must hold.
    pub security_id: i64,
    /// Account receiving cash.
    pub cash_account_id: i64,
    /// Account releasing the holding.
    pub investment_account_id: i64,
    /// Executed price per unit.
    pub price: Decimal,
    /// Fee, tax and their categories.
    pub charges: TradeCharges,
    /// Quantities drawn per lot; duplicates are summed.
    pub allocations: Vec<AllocationRequest>,
}

/// Outcome of a sale.
#[derive(Debug, Clone)]
pub struct SaleResult {
    /// Owning transaction.
    pub transaction_id: i64,
    /// Sale row.
    pub sale_id: i64,
    /// Units sold.
    pub quantity: Decimal,
    /// Executed price.
    pub price: Decimal,
    /// Quantity times price.
    pub gross_amount: Decimal,
    /// Cost basis released.
    pub cost_amount: Decimal,
    /// Fee.
    pub fee: Decimal,
    /// Tax.
    pub tax: Decimal,
    /// Gross less fee, tax and cost.
    pub realized_gain: Decimal,
}

#[derive(Debug, Clone, FromQueryResult)]
struct LotRow {
    lot_id: i64,
    ledger_id: i64,
    security_id: i64,
    security_ticker: String,
    security_name: String,
    quantity: Decimal,
    price: Decimal,
    trade_price: Decimal,
    fee: Decimal,
    tax: Decimal,
    transaction_line_id: i64,
    transaction_id: i64,
    occurred_on: chrono::NaiveDate,
    allocated_quantity: Decimal,
}

/// A lot with its allocation state.
#[derive(Debug, Clone)]
pub struct LotView {
    /// Lot ID.
    pub lot_id: i64,
    /// Ledger ID.
    pub ledger_id: i64,
    /// Security held.
    pub security_id: i64,
    /// Security ticker.
    pub security_ticker: String,
    /// Security name.
    pub security_name: String,
    /// Units bought.
    pub quantity: Decimal,
    /// Cost basis per unit.
    pub price: Decimal,
    /// Executed price.
    pub trade_price: Decimal,
    /// Fee.
    pub fee: Decimal,
    /// Tax.
    pub tax: Decimal,
    /// Investment leg of the buy.
    pub transaction_line_id: i64,
    /// Buy transaction.
    pub transaction_id: i64,
    /// Buy date.
    pub occurred_on: chrono::NaiveDate,
    /// Units consumed by live sales.
    pub allocated_quantity: Decimal,
    /// Units still held.
    pub remaining_quantity: Decimal,
    /// Open while units remain.
    pub status: LotStatus,
}

impl From<LotRow> for LotView {
    fn from(row: LotRow) -> Self {
        let remaining = row.quantity - row.allocated_quantity;
        Self {
            lot_id: row.lot_id,
            ledger_id: row.ledger_id,
            security_id: row.security_id,
            security_ticker: row.security_ticker,
            security_name: row.security_name,
            quantity: row.quantity,
            price: row.price,
            trade_price: row.trade_price,
            fee: row.fee,
            tax: row.tax,
            transaction_line_id: row.transaction_line_id,
            transaction_id: row.transaction_id,
            occurred_on: row.occurred_on,
            allocated_quantity: row.allocated_quantity,
            remaining_quantity: remaining,
            status: LotStatus::from_remaining(remaining),
        }
    }
}

/// Filters for listing lots.
#[derive(Debug, Clone, Default)]
pub struct LotFilter {
    /// Only lots of this security.
    pub security_id: Option<i64>,
    /// Only open or only closed lots.
    pub status: Option<LotStatus>,
}

/// Investment repository.
#[derive(Debug, Clone)]
pub struct InvestmentRepository {
    db: DatabaseConnection,
}

impl InvestmentRepository {
    /// Creates a new investment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a buy: transaction, lines and a new lot.
    ///
    /// The security is resolved by id, or looked up by ticker and created
    /// when missing.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad amounts, accounts, categories or
    /// security references. Nothing is written on failure.
    pub async fn create_buy(&self, input: BuyInput) -> RepoResult<BuyResult> {
        let amounts = investment::price_buy(
            input.quantity,
            input.price,
            input.charges.fee,
            input.charges.tax,
        )?;
        let selector = investment::select_security(
            input.security.security_id,
            &input.security.ticker,
            &input.security.name,
        )?;
        let ledger_id = input.header.ledger_id;

        let txn = self.db.begin().await?;
        let security_id =
            resolve_security(&txn, ledger_id, selector, &input.security.currency).await?;

        let event = buy_event(&input, &amounts);
        let posted = posting::post_event(&txn, &input.header, &event).await?;
        let anchor = anchor_line(&event, &posted)?;

        let lot = investment_lots::ActiveModel {
            ledger_id: Set(ledger_id),
            transaction_line_id: Set(anchor.id),
            security_id: Set(security_id),
            quantity: Set(input.quantity),
            price: Set(amounts.cost_price),
            trade_price: Set(input.price),
            fee: Set(input.charges.fee),
            tax: Set(input.charges.tax),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        debug!(lot_id = lot.id, transaction_id = posted.transaction.id, "buy recorded");

        Ok(buy_result(posted.transaction.id, lot.id, security_id, &input, &amounts))
    }

    /// Rewrites a buy whose lot has not been sold from.
    ///
    /// The lot is locked first. The transaction header, the investment line
    /// and the lot are updated in place; cash, fee and tax lines are
    /// replaced.
    ///
    /// # Errors
    ///
    /// Returns `buy lot already allocated, cannot edit` once any sale has
    /// drawn from the lot, plus every error of [`Self::create_buy`].
    pub async fn update_buy(&self, lot_id: i64, input: BuyInput) -> RepoResult<BuyResult> {
        let amounts = investment::price_buy(
            input.quantity,
            input.price,
            input.charges.fee,
            input.charges.tax,
        )?;
        let selector = investment::select_security(
            input.security.security_id,
            &input.security.ticker,
            &input.security.name,
        )?;
        let ledger_id = input.header.ledger_id;

        let txn = self.db.begin().await?;
        let lot = investment_lots::Entity::find_live_by_id(lot_id)
            .filter(investment_lots::Column::LedgerId.eq(ledger_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(LedgerError::LotNotFound)?;

        let allocated = allocated_quantities(&txn, &[lot_id]).await?;
        investment::check_editable(allocated.get(&lot_id).copied().unwrap_or_default())?;

        let security_id =
            resolve_security(&txn, ledger_id, selector, &input.security.currency).await?;

        let investment_line = transaction_lines::Entity::find_live_by_id(lot.transaction_line_id)
            .one(&txn)
            .await?
            .ok_or(LedgerError::TransactionLineNotFound)?;
        let transaction = find_transaction(&txn, investment_line.transaction_id).await?;

        let event = buy_event(&input, &amounts);
        let mut drafts = posting::prepare_event(&txn, ledger_id, &event).await?;
        let anchor_index = event
            .anchor_line(drafts.len())
            .ok_or(LedgerError::TransactionLineNotFound)?;
        let anchor = drafts.remove(anchor_index);

        let mut header: transactions::ActiveModel = transaction.into();
        header.occurred_on = Set(input.header.occurred_on);
        header.description = Set(input.header.description.trim().to_string());
        header.note = Set(input.header.note.trim().to_string());
        let transaction = header.update(&txn).await?;

        transaction_lines::Entity::soft_delete_many()
            .filter(transaction_lines::Column::TransactionId.eq(transaction.id))
            .filter(transaction_lines::Column::Id.ne(investment_line.id))
            .exec(&txn)
            .await?;
        posting::insert_lines(&txn, ledger_id, transaction.id, &drafts).await?;

        let mut line: transaction_lines::ActiveModel = investment_line.into();
        line.account_id = Set(anchor.account_id);
        line.amount = Set(anchor.amount);
        line.update(&txn).await?;

        let mut active: investment_lots::ActiveModel = lot.into();
        active.security_id = Set(security_id);
        active.quantity = Set(input.quantity);
        active.price = Set(amounts.cost_price);
        active.trade_price = Set(input.price);
        active.fee = Set(input.charges.fee);
        active.tax = Set(input.charges.tax);
        active.update(&txn).await?;

        txn.commit().await?;
        debug!(lot_id, transaction_id = transaction.id, "buy updated");

        Ok(buy_result(transaction.id, lot_id, security_id, &input, &amounts))
    }

    /// Records a sale drawing explicit quantities from buy lots.
    ///
    /// # Errors
    ///
    /// Returns `security not found` unless the security is live in the
    /// ledger, and a validation error when lots are missing, hold another
    /// security, or lack the requested quantity. Nothing is written on
    /// failure.
    pub async fn create_sale(&self, input: SaleInput) -> RepoResult<SaleResult> {
        investment::check_sale_terms(input.price, input.charges.fee, input.charges.tax)?;
        let requested = investment::aggregate_allocations(&input.allocations)?;
        let lot_ids: Vec<i64> = requested.keys().copied().collect();
        let ledger_id = input.header.ledger_id;

        let txn = self.db.begin().await?;
        securities::Entity::find_live_by_id(input.security_id)
            .filter(securities::Column::LedgerId.eq(ledger_id))
            .one(&txn)
            .await?
            .ok_or(LedgerError::SecurityNotFound)?;

        let lots = investment_lots::Entity::find_live()
            .filter(investment_lots::Column::Id.is_in(lot_ids.iter().copied()))
            .filter(investment_lots::Column::LedgerId.eq(ledger_id))
            .order_by_asc(investment_lots::Column::Id)
            .lock_exclusive()
            .all(&txn)
            .await?;

        let allocated = allocated_quantities(&txn, &lot_ids).await?;
        let states: Vec<LotState> = lots
            .iter()
            .map(|lot| LotState {
                id: lot.id,
                security_id: lot.security_id,
                quantity: lot.quantity,
                cost_price: lot.price,
                allocated: allocated.get(&lot.id).copied().unwrap_or_default(),
            })
            .collect();
        let plan = investment::plan_sale(input.security_id, input.price, &requested, &states)?;

        let event = EconomicEvent::Sell(TradeEvent {
            cash_account_id: input.cash_account_id,
            investment_account_id: input.investment_account_id,
            gross_amount: plan.gross_amount,
            cost_amount: plan.total_cost,
            charges: input.charges.clone(),
        });
        let realized_gain = event.expected_net();
        let posted = posting::post_event(&txn, &input.header, &event).await?;
        let anchor = anchor_line(&event, &posted)?;

        let sale = investment_sales::ActiveModel {
            ledger_id: Set(ledger_id),
            transaction_line_id: Set(anchor.id),
            security_id: Set(input.security_id),
            quantity: Set(plan.total_quantity),
            price: Set(input.price),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for allocation in &plan.allocations {
            investment_lot_allocations::ActiveModel {
                ledger_id: Set(ledger_id),
                buy_lot_id: Set(allocation.buy_lot_id),
                sale_id: Set(sale.id),
                quantity: Set(allocation.quantity),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        debug!(
            sale_id = sale.id,
            transaction_id = posted.transaction.id,
            lots = plan.allocations.len(),
            "sale recorded"
        );

        Ok(SaleResult {
            transaction_id: posted.transaction.id,
            sale_id: sale.id,
            quantity: plan.total_quantity,
            price: input.price,
            gross_amount: plan.gross_amount,
            cost_amount: plan.total_cost,
            fee: input.charges.fee,
            tax: input.charges.tax,
            realized_gain,
        })
    }

    /// Lists lots with allocated and remaining quantities.
    ///
    /// The status filter applies after aggregation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_lots(&self, ledger_id: i64, filter: LotFilter) -> RepoResult<Vec<LotView>> {
        let mut sql = String::from(
            "SELECT l.id AS lot_id, l.ledger_id, l.security_id, \
                    s.ticker AS security_ticker, s.name AS security_name, \
                    l.quantity, l.price, l.trade_price, l.fee, l.tax, \
                    l.transaction_line_id, tl.transaction_id, t.occurred_on, \
                    COALESCE(SUM(a.quantity), 0) AS allocated_quantity \
             FROM investment_lots l \
             JOIN transaction_lines tl ON tl.id = l.transaction_line_id AND tl.deleted_at IS NULL \
             JOIN transactions t ON t.id = tl.transaction_id AND t.deleted_at IS NULL \
             JOIN securities s ON s.id = l.security_id AND s.deleted_at IS NULL \
             LEFT JOIN investment_lot_allocations a \
                    ON a.buy_lot_id = l.id AND a.deleted_at IS NULL \
             WHERE l.deleted_at IS NULL AND l.ledger_id = $1",
        );
        let mut values: Vec<Value> = vec![ledger_id.into()];
        if let Some(security_id) = filter.security_id {
            values.push(security_id.into());
            sql.push_str(&format!(" AND l.security_id = ${}", values.len()));
        }
        sql.push_str(
            " GROUP BY l.id, s.ticker, s.name, tl.transaction_id, t.occurred_on \
              ORDER BY t.occurred_on, l.id",
        );

        let rows = LotRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            values,
        ))
        .all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(LotView::from)
            .filter(|lot| filter.status.is_none_or(|status| lot.status == status))
            .collect())
    }
}

fn buy_event(input: &BuyInput, amounts: &BuyAmounts) -> EconomicEvent {
    EconomicEvent::Buy(TradeEvent {
        cash_account_id: input.cash_account_id,
        investment_account_id: input.investment_account_id,
        gross_amount: amounts.gross_amount,
        cost_amount: amounts.cost_amount,
        charges: input.charges.clone(),
    })
}

fn buy_result(
    transaction_id: i64,
    lot_id: i64,
    security_id: i64,
    input: &BuyInput,
    amounts: &BuyAmounts,
) -> BuyResult {
    BuyResult {
        transaction_id,
        lot_id,
        security_id,
        quantity: input.quantity,
        price: input.price,
        cost_price: amounts.cost_price,
        gross_amount: amounts.gross_amount,
        cost_amount: amounts.cost_amount,
        fee: input.charges.fee,
        tax: input.charges.tax,
    }
}

fn anchor_line<'a>(
    event: &EconomicEvent,
    posted: &'a Posted,
) -> RepoResult<&'a transaction_lines::Model> {
    event
        .anchor_line(posted.lines.len())
        .and_then(|index| posted.lines.get(index))
        .ok_or_else(|| LedgerError::TransactionLineNotFound.into())
}

/// Sums live allocations per lot.
async fn allocated_quantities<C: ConnectionTrait>(
    conn: &C,
    lot_ids: &[i64],
) -> RepoResult<HashMap<i64, Decimal>> {
    let sums: Vec<(i64, Option<Decimal>)> = investment_lot_allocations::Entity::find_live()
        .filter(investment_lot_allocations::Column::BuyLotId.is_in(lot_ids.iter().copied()))
        .select_only()
        .column(investment_lot_allocations::Column::BuyLotId)
        .column_as(
            Expr::col(investment_lot_allocations::Column::Quantity).sum(),
            "allocated",
        )
        .group_by(investment_lot_allocations::Column::BuyLotId)
        .into_tuple()
        .all(conn)
        .await?;

    Ok(sums
        .into_iter()
        .map(|(lot_id, sum)| (lot_id, sum.unwrap_or_default()))
        .collect())
}

/// Resolves the security of a buy, creating or renaming it as needed.
async fn resolve_security<C: ConnectionTrait>(
    conn: &C,
    ledger_id: i64,
    selector: SecuritySelector,
    currency: &str,
) -> RepoResult<i64> {
    match selector {
        SecuritySelector::Id(id) => {
            let security = securities::Entity::find_live_by_id(id)
                .filter(securities::Column::LedgerId.eq(ledger_id))
                .one(conn)
                .await?
                .ok_or(LedgerError::SecurityNotFound)?;
            Ok(security.id)
        }
        SecuritySelector::Ticker { ticker, name } => {
            let existing = securities::Entity::find_live()
                .filter(securities::Column::Ticker.eq(&ticker))
                .one(conn)
                .await?;

            let Some(security) = existing else {
                let created = securities::ActiveModel {
                    ledger_id: Set(ledger_id),
                    ticker: Set(ticker),
                    name: Set(name),
                    currency: Set(currency.trim().to_uppercase()),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
                debug!(security_id = created.id, ticker = %created.ticker, "security created");
                return Ok(created.id);
            };

            let action =
                investment::reconcile_security(security.ledger_id, &security.name, ledger_id, &name)?;
            match action {
                SecurityAction::Reuse => Ok(security.id),
                SecurityAction::Rename(new_name) => {
                    let id = security.id;
                    let mut active: securities::ActiveModel = security.into();
                    active.name = Set(new_name);
                    active.update(conn).await?;
                    Ok(id)
                }
            }
        }
    }
}
