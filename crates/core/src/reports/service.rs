//! Report generation service.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{
    AccountPosition, BalanceGroup, BalanceSheetAccount, BalanceSheetGroup, BalanceSheetReport,
    BalanceSheetTotals,
};

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Maps a stored account type to its balance sheet group.
    ///
    /// `debt` is grouped with assets: it records money owed to the owner.
    #[must_use]
    pub fn classify(account_type: &str) -> BalanceGroup {
        match account_type {
            "cash" | "investment" | "other_asset" | "debt" => BalanceGroup::Asset,
            "liability" => BalanceGroup::Liability,
            _ => BalanceGroup::Other,
        }
    }

    /// Balance from an optional snapshot base plus later line movements.
    #[must_use]
    pub fn account_balance(snapshot_amount: Option<Decimal>, delta: Decimal) -> Decimal {
        snapshot_amount.unwrap_or(Decimal::ZERO) + delta
    }

    /// Generates a balance sheet from account positions.
    ///
    /// Accounts are listed by id inside their group; empty groups are left out.
    #[must_use]
    pub fn generate_balance_sheet(
        ledger_id: i64,
        as_of: NaiveDate,
        mut positions: Vec<AccountPosition>,
    ) -> BalanceSheetReport {
        positions.sort_by_key(|p| p.id);

        let mut groups: BTreeMap<BalanceGroup, BalanceSheetGroup> = BTreeMap::new();
        for position in positions {
            let group = Self::classify(&position.account_type);
            let balance = Self::account_balance(position.snapshot_amount, position.delta);

            let entry = groups.entry(group).or_insert_with(|| BalanceSheetGroup {
                key: group.key().to_string(),
                label: group.label().to_string(),
                total: Decimal::ZERO,
                accounts: Vec::new(),
            });
            entry.total += balance;
            entry.accounts.push(BalanceSheetAccount {
                id: position.id,
                name: position.name,
                account_type: position.account_type,
                currency: position.currency,
                is_active: position.is_active,
                balance,
            });
        }

        let total_of = |g: BalanceGroup| groups.get(&g).map_or(Decimal::ZERO, |s| s.total);
        let assets = total_of(BalanceGroup::Asset);
        let liabilities = total_of(BalanceGroup::Liability);

        BalanceSheetReport {
            ledger_id,
            as_of,
            totals: BalanceSheetTotals {
                assets,
                liabilities,
                net_worth: assets - liabilities,
            },
            groups: groups.into_values().collect(),
        }
    }
}
