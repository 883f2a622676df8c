//! Economic events and the lines they post.
//!
//! Every money movement is one of a closed set of events. Each variant
//! validates its own shape and builds the lines that the persistence layer
//! writes under a single transaction.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::LineDraft;
use super::validation::{check_storable, fit_storage};

/// A plain income or expense entry.
#[derive(Debug, Clone)]
pub struct EntryEvent {
    /// Account moved.
    pub account_id: i64,
    /// Income or expense category.
    pub category_id: i64,
    /// Signed amount.
    pub amount: Decimal,
}

/// A movement between two cash accounts.
#[derive(Debug, Clone)]
pub struct TransferEvent {
    /// Account debited.
    pub from_account_id: i64,
    /// Account credited.
    pub to_account_id: i64,
    /// Positive amount moved.
    pub amount: Decimal,
}

/// Fee and tax charged on a trade, each with an optional expense category.
#[derive(Debug, Clone, Default)]
pub struct TradeCharges {
    /// Broker fee.
    pub fee: Decimal,
    /// Category for the fee line.
    pub fee_category_id: Option<i64>,
    /// Tax withheld.
    pub tax: Decimal,
    /// Category for the tax line.
    pub tax_category_id: Option<i64>,
}

impl TradeCharges {
    /// Sum of fee and tax.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.fee + self.tax
    }

    fn lines(&self, cash_account_id: i64) -> impl Iterator<Item = LineDraft> {
        let fee = (self.fee > Decimal::ZERO).then(|| LineDraft {
            account_id: cash_account_id,
            category_id: self.fee_category_id,
            amount: -self.fee,
        });
        let tax = (self.tax > Decimal::ZERO).then(|| LineDraft {
            account_id: cash_account_id,
            category_id: self.tax_category_id,
            amount: -self.tax,
        });
        fee.into_iter().chain(tax)
    }
}

/// One side of an investment trade.
#[derive(Debug, Clone)]
pub struct TradeEvent {
    /// Account paying or receiving cash.
    pub cash_account_id: i64,
    /// Account holding the security.
    pub investment_account_id: i64,
    /// Quantity times execution price.
    pub gross_amount: Decimal,
    /// Cost basis added (buy) or released (sell).
    pub cost_amount: Decimal,
    /// Fee and tax.
    pub charges: TradeCharges,
}

/// The closed set of events that post lines.
#[derive(Debug, Clone)]
pub enum EconomicEvent {
    /// Income or expense on one account.
    Entry(EntryEvent),
    /// Cash moved between two accounts.
    Transfer(TransferEvent),
    /// Security bought into a new lot.
    Buy(TradeEvent),
    /// Lots sold.
    Sell(TradeEvent),
}

impl EconomicEvent {
    /// Checks the event's own shape.
    ///
    /// Account and category lookups are the caller's job; this only covers
    /// what can be decided from the event alone. Every amount must be
    /// storable without truncation.
    pub fn validate(&self) -> Result<(), LedgerError> {
        match self {
            Self::Entry(entry) => {
                if entry.amount.is_zero() {
                    return Err(LedgerError::ZeroAmount);
                }
                check_storable(entry.amount)?;
            }
            Self::Transfer(transfer) => {
                if transfer.amount <= Decimal::ZERO {
                    return Err(LedgerError::NonPositiveAmount);
                }
                if transfer.from_account_id == transfer.to_account_id {
                    return Err(LedgerError::SameAccount);
                }
                check_storable(transfer.amount)?;
            }
            Self::Buy(trade) | Self::Sell(trade) => {
                if trade.charges.fee < Decimal::ZERO || trade.charges.tax < Decimal::ZERO {
                    return Err(LedgerError::NegativeFeeOrTax);
                }
                check_storable(trade.charges.fee)?;
                check_storable(trade.charges.tax)?;
                check_storable(trade.gross_amount)?;
                check_storable(trade.cost_amount)?;
                fit_storage(self.expected_net())?;
            }
        }
        Ok(())
    }

    /// Builds the lines of the event in posting order.
    ///
    /// Buy: cash −gross, fee, tax, investment +cost.
    /// Sell: cash +gross, fee, tax, investment −cost.
    #[must_use]
    pub fn lines(&self) -> Vec<LineDraft> {
        match self {
            Self::Entry(entry) => vec![LineDraft::categorized(
                entry.account_id,
                entry.category_id,
                entry.amount,
            )],
            Self::Transfer(transfer) => vec![
                LineDraft::new(transfer.from_account_id, -transfer.amount),
                LineDraft::new(transfer.to_account_id, transfer.amount),
            ],
            Self::Buy(trade) => {
                let mut lines = vec![LineDraft::new(trade.cash_account_id, -trade.gross_amount)];
                lines.extend(trade.charges.lines(trade.cash_account_id));
                lines.push(LineDraft::new(trade.investment_account_id, trade.cost_amount));
                lines
            }
            Self::Sell(trade) => {
                let mut lines = vec![LineDraft::new(trade.cash_account_id, trade.gross_amount)];
                lines.extend(trade.charges.lines(trade.cash_account_id));
                lines.push(LineDraft::new(
                    trade.investment_account_id,
                    -trade.cost_amount,
                ));
                lines
            }
        }
    }

    /// Signed total the lines must add up to.
    ///
    /// Zero for transfers and buys. For a sale this is the realized gain.
    #[must_use]
    pub fn expected_net(&self) -> Decimal {
        match self {
            Self::Entry(entry) => entry.amount,
            Self::Transfer(_) => Decimal::ZERO,
            Self::Buy(trade) => trade.cost_amount - trade.gross_amount - trade.charges.total(),
            Self::Sell(trade) => trade.gross_amount - trade.charges.total() - trade.cost_amount,
        }
    }

    /// Index of the line a lot or sale row points at.
    ///
    /// Trades anchor on the investment leg, which is always posted last.
    #[must_use]
    pub fn anchor_line(&self, line_count: usize) -> Option<usize> {
        match self {
            Self::Buy(_) | Self::Sell(_) => line_count.checked_sub(1),
            Self::Entry(_) | Self::Transfer(_) => None,
        }
    }
}

/// Sum of line amounts.
#[must_use]
pub fn net_amount(lines: &[LineDraft]) -> Decimal {
    lines.iter().map(|l| l.amount).sum()
}
