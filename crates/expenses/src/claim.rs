use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use ledgerdesk_core::{entity_id, DomainError, DomainResult, Entity, Money, Timestamps};

entity_id!(
    /// Expense claim identifier.
    ExpenseClaimId
);

/// Review lifecycle. Only `Pending` claims can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 3] = [
        ClaimStatus::Pending,
        ClaimStatus::Approved,
        ClaimStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "Pending",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
        }
    }
}

impl core::str::FromStr for ClaimStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ClaimStatus::Pending),
            "approved" => Ok(ClaimStatus::Approved),
            "rejected" => Ok(ClaimStatus::Rejected),
            _ => Err(DomainError::validation(
                "status must be one of: pending, approved, rejected",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub category: String,
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseClaim {
    pub id: ExpenseClaimId,
    pub employee: String,
    pub department: String,
    pub items: Vec<ExpenseItem>,
    /// Always Σ item amounts.
    pub total: Money,
    pub status: ClaimStatus,
    pub review_note: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpenseClaim {
    pub employee: String,
    pub department: String,
    pub items: Vec<ExpenseItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpensePatch {
    pub employee: Option<String>,
    pub department: Option<String>,
    pub items: Option<Vec<ExpenseItem>>,
}

impl Entity for ExpenseClaim {
    type Id = ExpenseClaimId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate_items(items: &[ExpenseItem]) -> DomainResult<Money> {
    if items.is_empty() {
        return Err(DomainError::validation("expense claim must have at least one item"));
    }
    let mut total = Money::ZERO;
    for (idx, item) in items.iter().enumerate() {
        let line_no = idx + 1;
        if item.category.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "item {line_no}: category is required"
            )));
        }
        if !item.amount.is_positive() {
            return Err(DomainError::validation(format!(
                "item {line_no}: amount must be positive"
            )));
        }
        total = total
            .checked_add(item.amount)
            .ok_or_else(|| DomainError::invariant("expense total overflow"))?;
    }
    Ok(total)
}

impl ExpenseClaim {
    pub fn submit(new: NewExpenseClaim, now: DateTime<Utc>) -> DomainResult<Self> {
        let employee = new.employee.trim();
        if employee.is_empty() {
            return Err(DomainError::validation("employee is required"));
        }
        let total = validate_items(&new.items)?;

        Ok(Self {
            id: ExpenseClaimId::generate(),
            employee: employee.to_string(),
            department: new.department.trim().to_string(),
            items: new.items,
            total,
            status: ClaimStatus::Pending,
            review_note: None,
            timestamps: Timestamps::new(now),
        })
    }

    fn ensure_pending(&self) -> DomainResult<()> {
        if self.status != ClaimStatus::Pending {
            return Err(DomainError::conflict(format!(
                "expense claim is already {}",
                self.status.as_str()
            )));
        }
        Ok(())
    }

    pub fn apply_patch(&mut self, patch: ExpensePatch, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_pending()?;

        let total = patch.items.as_deref().map(validate_items).transpose()?;
        if let Some(employee) = &patch.employee {
            if employee.trim().is_empty() {
                return Err(DomainError::validation("employee is required"));
            }
        }

        if let Some(employee) = patch.employee {
            self.employee = employee.trim().to_string();
        }
        if let Some(department) = patch.department {
            self.department = department.trim().to_string();
        }
        if let (Some(items), Some(total)) = (patch.items, total) {
            self.items = items;
            self.total = total;
        }
        self.timestamps.touch(now);
        Ok(())
    }

    pub fn approve(&mut self, note: Option<String>, now: DateTime<Utc>) -> DomainResult<()> {
        self.review(ClaimStatus::Approved, note, now)
    }

    pub fn reject(&mut self, note: Option<String>, now: DateTime<Utc>) -> DomainResult<()> {
        self.review(ClaimStatus::Rejected, note, now)
    }

    fn review(
        &mut self,
        outcome: ClaimStatus,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_pending()?;
        self.status = outcome;
        self.review_note = note.filter(|n| !n.trim().is_empty());
        self.timestamps.touch(now);
        Ok(())
    }
}
