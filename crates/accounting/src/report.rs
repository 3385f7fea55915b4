//! Ledger reports derived from account balances.

use serde::{Deserialize, Serialize};

use ledgerdesk_core::Money;

use crate::account::{Account, AccountKind, NormalSide};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub account_code: String,
    pub account_name: String,
    pub kind: AccountKind,
    pub debit: Money,
    pub credit: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    pub rows: Vec<TrialBalanceRow>,
    pub total_debit: Money,
    pub total_credit: Money,
}

impl TrialBalance {
    pub fn is_balanced(&self) -> bool {
        self.total_debit == self.total_credit
    }

    pub fn difference(&self) -> Money {
        self.total_debit - self.total_credit
    }
}

/// Trial balance over active accounts, in input order.
///
/// A balance sits in its normal column; a negative balance flips to the other one.
pub fn trial_balance(accounts: &[Account]) -> TrialBalance {
    let rows: Vec<TrialBalanceRow> = accounts
        .iter()
        .filter(|a| a.is_active)
        .map(|a| {
            let (debit, credit) = match (a.kind.normal_side(), a.balance.is_negative()) {
                (NormalSide::Debit, false) => (a.balance, Money::ZERO),
                (NormalSide::Debit, true) => (Money::ZERO, a.balance.abs()),
                (NormalSide::Credit, false) => (Money::ZERO, a.balance),
                (NormalSide::Credit, true) => (a.balance.abs(), Money::ZERO),
            };
            TrialBalanceRow {
                account_code: a.code.clone(),
                account_name: a.name.clone(),
                kind: a.kind,
                debit,
                credit,
            }
        })
        .collect();

    let total_debit = rows.iter().map(|r| r.debit).sum();
    let total_credit = rows.iter().map(|r| r.credit).sum();

    TrialBalance {
        rows,
        total_debit,
        total_credit,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindSummary {
    pub kind: AccountKind,
    pub account_count: usize,
    pub active_count: usize,
    pub total: Money,
}

/// One entry per account kind (chart order), including kinds with no accounts.
pub fn summarize_by_kind(accounts: &[Account]) -> Vec<KindSummary> {
    AccountKind::ALL
        .iter()
        .map(|kind| {
            let of_kind = accounts.iter().filter(|a| a.kind == *kind);
            KindSummary {
                kind: *kind,
                account_count: of_kind.clone().count(),
                active_count: of_kind.clone().filter(|a| a.is_active).count(),
                total: of_kind.map(|a| a.balance).sum(),
            }
        })
        .collect()
}
