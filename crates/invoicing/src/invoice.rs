use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use ledgerdesk_core::{entity_id, DomainError, DomainResult, Entity, Money, Timestamps};

entity_id!(
    /// Invoice identifier.
    InvoiceId
);

/// Invoice status lifecycle. `Paid` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 5] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Pending,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
        InvoiceStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
            InvoiceStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, InvoiceStatus::Paid | InvoiceStatus::Cancelled)
    }
}

impl core::str::FromStr for InvoiceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(InvoiceStatus::Draft),
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            "cancelled" | "canceled" => Ok(InvoiceStatus::Cancelled),
            _ => Err(DomainError::validation(
                "status must be one of: draft, pending, paid, overdue, cancelled",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl InvoiceItem {
    pub fn new(description: impl Into<String>, quantity: i64, unit_price: Money) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

/// Largest accepted tax rate: 100%.
const MAX_TAX_RATE_BPS: u32 = 10_000;

/// Subtotal = Σ quantity × unit price; tax = subtotal × rate, rounded to the
/// nearest minor unit; total = subtotal + tax.
pub fn compute_totals(items: &[InvoiceItem], tax_rate_bps: u32) -> DomainResult<InvoiceTotals> {
    if items.is_empty() {
        return Err(DomainError::validation("invoice must have at least one item"));
    }
    if tax_rate_bps > MAX_TAX_RATE_BPS {
        return Err(DomainError::validation("tax rate must be between 0 and 100%"));
    }

    let mut subtotal = Money::ZERO;
    for (idx, item) in items.iter().enumerate() {
        let line_no = idx + 1;
        if item.description.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "item {line_no}: description is required"
            )));
        }
        if item.quantity <= 0 {
            return Err(DomainError::validation(format!(
                "item {line_no}: quantity must be positive"
            )));
        }
        if item.unit_price.is_negative() {
            return Err(DomainError::validation(format!(
                "item {line_no}: unit price must not be negative"
            )));
        }
        let line_total = item
            .unit_price
            .checked_mul(item.quantity)
            .ok_or_else(|| DomainError::invariant("invoice line amount overflow"))?;
        subtotal = subtotal
            .checked_add(line_total)
            .ok_or_else(|| DomainError::invariant("invoice total overflow"))?;
    }

    let tax = subtotal.apply_rate_bps(tax_rate_bps);
    let total = subtotal
        .checked_add(tax)
        .ok_or_else(|| DomainError::invariant("invoice total overflow"))?;

    Ok(InvoiceTotals {
        subtotal,
        tax,
        total,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub customer: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub items: Vec<InvoiceItem>,
    /// Basis points: 825 = 8.25%.
    pub tax_rate_bps: u32,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInvoice {
    /// Generated by the store when absent.
    pub invoice_number: Option<String>,
    pub customer: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub items: Vec<InvoiceItem>,
    pub tax_rate_bps: u32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePatch {
    pub customer: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
    pub items: Option<Vec<InvoiceItem>>,
    pub tax_rate_bps: Option<u32>,
    pub notes: Option<String>,
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Invoice {
    pub fn create(new: NewInvoice, invoice_number: String, now: DateTime<Utc>) -> DomainResult<Self> {
        let customer = new.customer.trim();
        if customer.is_empty() {
            return Err(DomainError::validation("customer is required"));
        }
        if invoice_number.trim().is_empty() {
            return Err(DomainError::validation("invoice number must not be blank"));
        }
        ensure_dates(new.issue_date, new.due_date)?;
        let totals = compute_totals(&new.items, new.tax_rate_bps)?;

        Ok(Self {
            id: InvoiceId::generate(),
            invoice_number: invoice_number.trim().to_string(),
            customer: customer.to_string(),
            issue_date: new.issue_date,
            due_date: new.due_date,
            status: new.status,
            items: new.items,
            tax_rate_bps: new.tax_rate_bps,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            notes: new.notes,
            timestamps: Timestamps::new(now),
        })
    }

    /// Merge `patch` and recompute totals. On error `self` is left as it was.
    pub fn apply_patch(&mut self, patch: InvoicePatch, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::conflict(format!(
                "invoice {} is {} and can no longer change",
                self.invoice_number,
                self.status.as_str()
            )));
        }

        let mut next = self.clone();
        if let Some(customer) = patch.customer {
            let customer = customer.trim();
            if customer.is_empty() {
                return Err(DomainError::validation("customer is required"));
            }
            next.customer = customer.to_string();
        }
        if let Some(issue_date) = patch.issue_date {
            next.issue_date = issue_date;
        }
        if let Some(due_date) = patch.due_date {
            next.due_date = due_date;
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(items) = patch.items {
            next.items = items;
        }
        if let Some(rate) = patch.tax_rate_bps {
            next.tax_rate_bps = rate;
        }
        if let Some(notes) = patch.notes {
            next.notes = Some(notes);
        }

        ensure_dates(next.issue_date, next.due_date)?;
        let totals = compute_totals(&next.items, next.tax_rate_bps)?;
        next.subtotal = totals.subtotal;
        next.tax = totals.tax;
        next.total = totals.total;
        next.timestamps.touch(now);

        *self = next;
        Ok(())
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == InvoiceStatus::Pending && self.due_date < today
    }

    /// Flip a pending invoice past its due date to `Overdue`. Returns whether it changed.
    pub fn mark_overdue(&mut self, today: NaiveDate, now: DateTime<Utc>) -> bool {
        if !self.is_overdue(today) {
            return false;
        }
        self.status = InvoiceStatus::Overdue;
        self.timestamps.touch(now);
        true
    }
}

fn ensure_dates(issue_date: NaiveDate, due_date: NaiveDate) -> DomainResult<()> {
    if due_date < issue_date {
        return Err(DomainError::validation(
            "due date must not be before issue date",
        ));
    }
    Ok(())
}
