use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use ledgerdesk_core::{entity_id, DomainError, DomainResult, Entity, Money, Timestamps};

use crate::matcher::{
    difference, match_percentage, toggle_match, BalanceStatus, ReconciliationItem,
    ReconciliationItemId,
};

entity_id!(
    /// Reconciliation session identifier.
    ReconciliationId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    InProgress,
    Completed,
}

/// One statement period of one account: bank lines on one side, book lines on the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub id: ReconciliationId,
    pub account_code: String,
    pub statement_date: NaiveDate,
    pub bank_balance: Money,
    pub book_balance: Money,
    pub bank_items: Vec<ReconciliationItem>,
    pub book_items: Vec<ReconciliationItem>,
    pub status: ReconciliationStatus,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReconciliationItem {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    #[serde(default)]
    pub matched: bool,
}

impl NewReconciliationItem {
    fn into_item(self) -> ReconciliationItem {
        ReconciliationItem {
            id: ReconciliationItemId::generate(),
            date: self.date,
            description: self.description,
            amount: self.amount,
            matched: self.matched,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReconciliation {
    pub account_code: String,
    pub statement_date: NaiveDate,
    pub bank_balance: Money,
    pub book_balance: Money,
    pub bank_items: Vec<NewReconciliationItem>,
    pub book_items: Vec<NewReconciliationItem>,
}

/// Derived figures shown alongside a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub bank_balance: Money,
    pub book_balance: Money,
    pub difference: Money,
    pub balance_status: BalanceStatus,
    pub matched_count: usize,
    pub total_count: usize,
    pub match_percentage: u32,
    pub unmatched_bank_total: Money,
    pub unmatched_book_total: Money,
    pub can_complete: bool,
}

impl Entity for Reconciliation {
    type Id = ReconciliationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Reconciliation {
    pub fn open(new: NewReconciliation, now: DateTime<Utc>) -> DomainResult<Self> {
        let account_code = new.account_code.trim();
        if account_code.is_empty() {
            return Err(DomainError::validation("account code is required"));
        }
        new.bank_balance.ensure_within_limit("bank balance")?;
        new.book_balance.ensure_within_limit("book balance")?;
        for (idx, item) in new.bank_items.iter().chain(new.book_items.iter()).enumerate() {
            item.amount
                .ensure_within_limit(&format!("item {}: amount", idx + 1))?;
        }

        Ok(Self {
            id: ReconciliationId::generate(),
            account_code: account_code.to_string(),
            statement_date: new.statement_date,
            bank_balance: new.bank_balance,
            book_balance: new.book_balance,
            bank_items: new.bank_items.into_iter().map(NewReconciliationItem::into_item).collect(),
            book_items: new.book_items.into_iter().map(NewReconciliationItem::into_item).collect(),
            status: ReconciliationStatus::InProgress,
            timestamps: Timestamps::new(now),
        })
    }

    pub fn difference(&self) -> Money {
        difference(self.bank_balance, self.book_balance)
    }

    /// Bank items followed by book items.
    pub fn items(&self) -> impl Iterator<Item = &ReconciliationItem> {
        self.bank_items.iter().chain(self.book_items.iter())
    }

    pub fn summary(&self) -> ReconciliationSummary {
        let all: Vec<ReconciliationItem> = self.items().cloned().collect();
        let diff = self.difference();
        let unmatched = |items: &[ReconciliationItem]| -> Money {
            items.iter().filter(|i| !i.matched).map(|i| i.amount).sum()
        };

        ReconciliationSummary {
            bank_balance: self.bank_balance,
            book_balance: self.book_balance,
            difference: diff,
            balance_status: BalanceStatus::of(diff),
            matched_count: all.iter().filter(|i| i.matched).count(),
            total_count: all.len(),
            match_percentage: match_percentage(&all),
            unmatched_bank_total: unmatched(&self.bank_items),
            unmatched_book_total: unmatched(&self.book_items),
            can_complete: self.status == ReconciliationStatus::InProgress
                && diff.is_zero()
                && all.iter().all(|i| i.matched),
        }
    }

    /// Flip one item's `matched` flag (bank or book side). Returns the new flag.
    pub fn toggle(&mut self, item_id: ReconciliationItemId, now: DateTime<Utc>) -> DomainResult<bool> {
        if self.status == ReconciliationStatus::Completed {
            return Err(DomainError::conflict("reconciliation is already completed"));
        }

        let side = if self.bank_items.iter().any(|i| i.id == item_id) {
            &mut self.bank_items
        } else if self.book_items.iter().any(|i| i.id == item_id) {
            &mut self.book_items
        } else {
            return Err(DomainError::not_found(format!(
                "reconciliation item {item_id}"
            )));
        };

        let toggled = toggle_match(side, item_id);
        *side = toggled;
        let matched = side.iter().any(|i| i.id == item_id && i.matched);
        self.timestamps.touch(now);
        Ok(matched)
    }

    pub fn complete(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == ReconciliationStatus::Completed {
            return Err(DomainError::conflict("reconciliation is already completed"));
        }
        let diff = self.difference();
        if !diff.is_zero() {
            return Err(DomainError::invariant(format!(
                "bank and book balances differ by {diff}"
            )));
        }
        if self.items().any(|i| !i.matched) {
            return Err(DomainError::invariant("all items must be matched"));
        }
        self.status = ReconciliationStatus::Completed;
        self.timestamps.touch(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(description: &str, amount: &str) -> NewReconciliationItem {
        NewReconciliationItem {
            date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
            description: description.to_string(),
            amount: amount.parse().unwrap(),
            matched: false,
        }
    }

    fn session(bank: &str, book: &str) -> Reconciliation {
        Reconciliation::open(
            NewReconciliation {
                account_code: "1010".to_string(),
                statement_date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
                bank_balance: bank.parse().unwrap(),
                book_balance: book.parse().unwrap(),
                bank_items: vec![line("Deposit", "2500.00"), line("Bank fee", "-25.00")],
                book_items: vec![line("Deposit", "2500.00")],
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn summary_reports_difference_and_progress() {
        let mut rec = session("15420.75", "15320.75");
        let first = rec.bank_items[0].id;
        assert!(rec.toggle(first, Utc::now()).unwrap());

        let summary = rec.summary();
        assert_eq!(summary.difference, "100.00".parse().unwrap());
        assert_eq!(summary.balance_status, BalanceStatus::Over);
        assert_eq!(summary.matched_count, 1);
        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.match_percentage, 33);
        assert_eq!(summary.unmatched_bank_total, "-25.00".parse().unwrap());
        assert!(!summary.can_complete);
    }

    #[test]
    fn toggle_reaches_book_items_and_rejects_unknown_ids() {
        let mut rec = session("10.00", "10.00");
        let book = rec.book_items[0].id;
        assert!(rec.toggle(book, Utc::now()).unwrap());
        assert!(!rec.toggle(book, Utc::now()).unwrap());

        let err = rec.toggle(ReconciliationItemId::generate(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn complete_requires_zero_difference_and_all_matched() {
        let mut rec = session("10.00", "10.00");
        assert!(matches!(
            rec.complete(Utc::now()),
            Err(DomainError::InvariantViolation(_))
        ));

        let ids: Vec<_> = rec.items().map(|i| i.id).collect();
        for id in ids {
            rec.toggle(id, Utc::now()).unwrap();
        }
        assert!(rec.summary().can_complete);
        rec.complete(Utc::now()).unwrap();
        assert_eq!(rec.status, ReconciliationStatus::Completed);

        let any = rec.bank_items[0].id;
        assert!(matches!(rec.toggle(any, Utc::now()), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn out_of_range_balances_are_refused() {
        let mut new = NewReconciliation {
            account_code: "1010".to_string(),
            statement_date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
            bank_balance: Money::from_minor(i64::MIN),
            book_balance: Money::from_minor(1),
            bank_items: Vec::new(),
            book_items: Vec::new(),
        };
        let err = Reconciliation::open(new.clone(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.starts_with("bank balance")));

        new.bank_balance = Money::from_minor(1);
        new.book_items = vec![NewReconciliationItem {
            amount: Money::from_minor(i64::MAX),
            ..line("Deposit", "0")
        }];
        assert!(Reconciliation::open(new, Utc::now()).is_err());
    }

    #[test]
    fn unequal_balances_block_completion() {
        let mut rec = session("10.00", "9.99");
        let ids: Vec<_> = rec.items().map(|i| i.id).collect();
        for id in ids {
            rec.toggle(id, Utc::now()).unwrap();
        }
        let err = rec.complete(Utc::now()).unwrap_err();
        assert!(err.to_string().contains("0.01"));
    }
}
