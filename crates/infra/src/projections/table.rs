//! Table rows plus the filter / search / sort pipeline shared by every list screen.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use ledgerdesk_accounting::{Account, AccountId, AccountKind, JournalEntry, JournalEntryId, JournalStatus};
use ledgerdesk_core::Money;
use ledgerdesk_expenses::{ClaimStatus, ExpenseClaim, ExpenseClaimId};
use ledgerdesk_invoicing::{Invoice, InvoiceId, InvoiceStatus};

use super::ProjectionError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Comparable cell value. A given column always yields the same variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    /// Lower-cased for case-insensitive ordering.
    Text(String),
    Money(Money),
    Date(NaiveDate),
    Flag(bool),
}

impl SortValue {
    fn text(s: &str) -> Self {
        SortValue::Text(s.to_lowercase())
    }
}

/// A row that can go through [`TableQuery::apply`].
pub trait TableRecord {
    /// Columns accepted by [`TableRecord::sort_value`].
    const SORT_COLUMNS: &'static [&'static str];

    /// Text fields matched by free-text search.
    fn search_fields(&self) -> Vec<&str>;

    fn sort_value(&self, column: &str) -> Option<SortValue>;

    /// Status key (`"paid"`, `"draft"`, ...) for records that have one.
    fn status_key(&self) -> Option<&'static str> {
        None
    }
}

/// What a list screen asks for. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TableQuery {
    /// Exact status key match, case-insensitive.
    pub status: Option<String>,
    /// Case-insensitive substring over [`TableRecord::search_fields`].
    pub search: Option<String>,
    pub sort: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
}

impl TableQuery {
    /// Filter, then search, then stable-sort. Unmatched order is input order.
    pub fn apply<T: TableRecord>(&self, mut rows: Vec<T>) -> Result<Vec<T>, ProjectionError> {
        if let Some(status) = self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            rows.retain(|row| {
                row.status_key()
                    .is_some_and(|key| key.eq_ignore_ascii_case(status))
            });
        }

        if let Some(needle) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = needle.to_lowercase();
            rows.retain(|row| {
                row.search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            });
        }

        if let Some(column) = self.sort.as_deref() {
            if !T::SORT_COLUMNS.iter().any(|c| *c == column) {
                return Err(ProjectionError::UnknownColumn {
                    column: column.to_string(),
                    expected: T::SORT_COLUMNS.join(", "),
                });
            }
            // `sort_by` is stable, so ties keep input order in both directions.
            rows.sort_by(|a, b| {
                let ord = a.sort_value(column).cmp(&b.sort_value(column));
                match self.order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }

        Ok(rows)
    }
}

// -------------------------
// Rows
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountRow {
    pub id: AccountId,
    pub code: String,
    pub name: String,
    pub kind: AccountKind,
    pub subtype: String,
    pub balance: Money,
    pub is_active: bool,
}

impl From<&Account> for AccountRow {
    fn from(a: &Account) -> Self {
        Self {
            id: a.id,
            code: a.code.clone(),
            name: a.name.clone(),
            kind: a.kind,
            subtype: a.subtype.clone(),
            balance: a.balance,
            is_active: a.is_active,
        }
    }
}

impl TableRecord for AccountRow {
    const SORT_COLUMNS: &'static [&'static str] = &["code", "name", "kind", "balance", "is_active"];

    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.name.as_str(), self.subtype.as_str()]
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "code" => Some(SortValue::text(&self.code)),
            "name" => Some(SortValue::text(&self.name)),
            "kind" => Some(SortValue::text(self.kind.as_str())),
            "balance" => Some(SortValue::Money(self.balance)),
            "is_active" => Some(SortValue::Flag(self.is_active)),
            _ => None,
        }
    }

    fn status_key(&self) -> Option<&'static str> {
        Some(if self.is_active { "active" } else { "inactive" })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalRow {
    pub id: JournalEntryId,
    pub date: NaiveDate,
    pub reference: String,
    pub description: String,
    pub status: JournalStatus,
    pub total_debit: Money,
    pub total_credit: Money,
    pub balanced: bool,
    pub line_count: usize,
}

impl From<&JournalEntry> for JournalRow {
    fn from(e: &JournalEntry) -> Self {
        let (total_debit, total_credit) = e.totals();
        Self {
            id: e.id,
            date: e.date,
            reference: e.reference.clone(),
            description: e.description.clone(),
            status: e.status,
            total_debit,
            total_credit,
            balanced: e.is_balanced(),
            line_count: e.lines.len(),
        }
    }
}

impl TableRecord for JournalRow {
    const SORT_COLUMNS: &'static [&'static str] = &["date", "reference", "amount"];

    fn search_fields(&self) -> Vec<&str> {
        vec![self.reference.as_str(), self.description.as_str()]
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "date" => Some(SortValue::Date(self.date)),
            "reference" => Some(SortValue::text(&self.reference)),
            "amount" => Some(SortValue::Money(self.total_debit)),
            _ => None,
        }
    }

    fn status_key(&self) -> Option<&'static str> {
        Some(self.status.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceRow {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub customer: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub total: Money,
}

impl From<&Invoice> for InvoiceRow {
    fn from(i: &Invoice) -> Self {
        Self {
            id: i.id,
            invoice_number: i.invoice_number.clone(),
            customer: i.customer.clone(),
            issue_date: i.issue_date,
            due_date: i.due_date,
            status: i.status,
            total: i.total,
        }
    }
}

impl TableRecord for InvoiceRow {
    const SORT_COLUMNS: &'static [&'static str] =
        &["invoice_number", "customer", "issue_date", "due_date", "total"];

    fn search_fields(&self) -> Vec<&str> {
        vec![self.invoice_number.as_str(), self.customer.as_str()]
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "invoice_number" => Some(SortValue::text(&self.invoice_number)),
            "customer" => Some(SortValue::text(&self.customer)),
            "issue_date" => Some(SortValue::Date(self.issue_date)),
            "due_date" => Some(SortValue::Date(self.due_date)),
            "total" => Some(SortValue::Money(self.total)),
            _ => None,
        }
    }

    fn status_key(&self) -> Option<&'static str> {
        Some(self.status.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseRow {
    pub id: ExpenseClaimId,
    pub employee: String,
    pub department: String,
    pub item_count: usize,
    pub total: Money,
    pub status: ClaimStatus,
    pub submitted_on: NaiveDate,
}

impl From<&ExpenseClaim> for ExpenseRow {
    fn from(c: &ExpenseClaim) -> Self {
        Self {
            id: c.id,
            employee: c.employee.clone(),
            department: c.department.clone(),
            item_count: c.items.len(),
            total: c.total,
            status: c.status,
            submitted_on: c.timestamps.created_at.date_naive(),
        }
    }
}

impl TableRecord for ExpenseRow {
    const SORT_COLUMNS: &'static [&'static str] = &["employee", "department", "total", "submitted_on"];

    fn search_fields(&self) -> Vec<&str> {
        vec![self.employee.as_str(), self.department.as_str()]
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "employee" => Some(SortValue::text(&self.employee)),
            "department" => Some(SortValue::text(&self.department)),
            "total" => Some(SortValue::Money(self.total)),
            "submitted_on" => Some(SortValue::Date(self.submitted_on)),
            _ => None,
        }
    }

    fn status_key(&self) -> Option<&'static str> {
        Some(self.status.as_str())
    }
}
