use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use ledgerdesk_accounting::{
    AccountKind, AccountPatch, JournalLine, JournalPatch, JournalStatus, NewAccount,
    NewJournalEntry,
};
use ledgerdesk_core::{DomainError, DomainResult, Money};
use ledgerdesk_expenses::{ExpenseItem, ExpensePatch, NewExpenseClaim};
use ledgerdesk_infra::projections::{SortOrder, TableQuery};
use ledgerdesk_invoicing::{InvoiceItem, InvoicePatch, InvoiceStatus, NewInvoice};
use ledgerdesk_reconciliation::{
    NewReconciliation, NewReconciliationItem, Reconciliation, ReconciliationSummary,
};

// -------------------------
// Parsing helpers
// -------------------------

/// Dates travel as `YYYY-MM-DD`.
pub fn parse_date(raw: &str, field: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::validation(format!("{field} must be a YYYY-MM-DD date")))
}

fn parse_opt_date(raw: Option<String>, field: &str) -> DomainResult<Option<NaiveDate>> {
    raw.map(|d| parse_date(&d, field)).transpose()
}

pub fn parse_id<T>(raw: &str) -> DomainResult<T>
where
    T: core::str::FromStr<Err = DomainError>,
{
    raw.trim().parse()
}

fn default_true() -> bool {
    true
}

// -------------------------
// Query strings
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    /// Accounts only.
    pub kind: Option<String>,
}

impl ListQuery {
    pub fn table_query(&self) -> DomainResult<TableQuery> {
        let order = match self.order.as_deref().map(str::trim) {
            None | Some("") => SortOrder::Asc,
            Some(o) if o.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            Some(o) if o.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            Some(o) => {
                return Err(DomainError::validation(format!(
                    "order must be asc or desc, got {o:?}"
                )));
            }
        };
        Ok(TableQuery {
            status: self.status.clone(),
            search: self.search.clone(),
            sort: self.sort.clone().filter(|s| !s.trim().is_empty()),
            order,
        })
    }

    pub fn account_kind(&self) -> DomainResult<Option<AccountKind>> {
        self.kind
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .map(str::parse)
            .transpose()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OverdueQuery {
    /// Defaults to today (UTC).
    pub as_of: Option<String>,
}

// -------------------------
// Accounts
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub code: String,
    pub name: String,
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub subtype: String,
    pub description: Option<String>,
    #[serde(default)]
    pub opening_balance: Money,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl CreateAccountRequest {
    pub fn into_domain(self) -> DomainResult<NewAccount> {
        Ok(NewAccount {
            code: self.code,
            name: self.name,
            kind: self.kind.parse()?,
            subtype: self.subtype,
            description: self.description,
            opening_balance: self.opening_balance,
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(alias = "type")]
    pub kind: Option<String>,
    pub subtype: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateAccountRequest {
    pub fn into_domain(self) -> DomainResult<AccountPatch> {
        Ok(AccountPatch {
            code: self.code,
            name: self.name,
            kind: self.kind.as_deref().map(str::parse).transpose()?,
            subtype: self.subtype,
            description: self.description,
            is_active: self.is_active,
        })
    }
}

// -------------------------
// Journal entries
// -------------------------

#[derive(Debug, Deserialize)]
pub struct JournalLineRequest {
    pub account_code: String,
    pub description: Option<String>,
    #[serde(default)]
    pub debit: Money,
    #[serde(default)]
    pub credit: Money,
}

impl From<JournalLineRequest> for JournalLine {
    fn from(l: JournalLineRequest) -> Self {
        JournalLine {
            account_code: l.account_code,
            description: l.description,
            debit: l.debit,
            credit: l.credit,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateJournalEntryRequest {
    pub date: String,
    pub reference: Option<String>,
    #[serde(default)]
    pub description: String,
    pub lines: Vec<JournalLineRequest>,
    /// `draft` (default) or `posted`.
    pub status: Option<String>,
}

impl CreateJournalEntryRequest {
    pub fn into_domain(self) -> DomainResult<NewJournalEntry> {
        let status = match self.status.as_deref() {
            Some(s) => s.parse()?,
            None => JournalStatus::Draft,
        };
        Ok(NewJournalEntry {
            date: parse_date(&self.date, "date")?,
            reference: self.reference,
            description: self.description,
            lines: self.lines.into_iter().map(JournalLine::from).collect(),
            status,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateJournalEntryRequest {
    pub date: Option<String>,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub lines: Option<Vec<JournalLineRequest>>,
}

impl UpdateJournalEntryRequest {
    pub fn into_domain(self) -> DomainResult<JournalPatch> {
        Ok(JournalPatch {
            date: parse_opt_date(self.date, "date")?,
            reference: self.reference,
            description: self.description,
            lines: self
                .lines
                .map(|lines| lines.into_iter().map(JournalLine::from).collect()),
        })
    }
}

// -------------------------
// Invoices
// -------------------------

#[derive(Debug, Deserialize)]
pub struct InvoiceItemRequest {
    pub description: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl From<InvoiceItemRequest> for InvoiceItem {
    fn from(i: InvoiceItemRequest) -> Self {
        InvoiceItem::new(i.description, i.quantity, i.unit_price)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub invoice_number: Option<String>,
    pub customer: String,
    pub issue_date: String,
    pub due_date: String,
    pub status: Option<String>,
    pub items: Vec<InvoiceItemRequest>,
    #[serde(default)]
    pub tax_rate_bps: u32,
    pub notes: Option<String>,
}

impl CreateInvoiceRequest {
    pub fn into_domain(self) -> DomainResult<NewInvoice> {
        let status = match self.status.as_deref() {
            Some(s) => s.parse()?,
            None => InvoiceStatus::Draft,
        };
        Ok(NewInvoice {
            invoice_number: self.invoice_number,
            customer: self.customer,
            issue_date: parse_date(&self.issue_date, "issue_date")?,
            due_date: parse_date(&self.due_date, "due_date")?,
            status,
            items: self.items.into_iter().map(InvoiceItem::from).collect(),
            tax_rate_bps: self.tax_rate_bps,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateInvoiceRequest {
    pub customer: Option<String>,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
    pub items: Option<Vec<InvoiceItemRequest>>,
    pub tax_rate_bps: Option<u32>,
    pub notes: Option<String>,
}

impl UpdateInvoiceRequest {
    pub fn into_domain(self) -> DomainResult<InvoicePatch> {
        Ok(InvoicePatch {
            customer: self.customer,
            issue_date: parse_opt_date(self.issue_date, "issue_date")?,
            due_date: parse_opt_date(self.due_date, "due_date")?,
            status: self.status.as_deref().map(str::parse).transpose()?,
            items: self
                .items
                .map(|items| items.into_iter().map(InvoiceItem::from).collect()),
            tax_rate_bps: self.tax_rate_bps,
            notes: self.notes,
        })
    }
}

// -------------------------
// Expense claims
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ExpenseItemRequest {
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub amount: Money,
    pub date: String,
}

impl ExpenseItemRequest {
    fn into_domain(self) -> DomainResult<ExpenseItem> {
        Ok(ExpenseItem {
            category: self.category,
            description: self.description,
            amount: self.amount,
            date: parse_date(&self.date, "item date")?,
        })
    }
}

fn expense_items(items: Vec<ExpenseItemRequest>) -> DomainResult<Vec<ExpenseItem>> {
    items.into_iter().map(ExpenseItemRequest::into_domain).collect()
}

#[derive(Debug, Deserialize)]
pub struct CreateExpenseClaimRequest {
    pub employee: String,
    #[serde(default)]
    pub department: String,
    pub items: Vec<ExpenseItemRequest>,
}

impl CreateExpenseClaimRequest {
    pub fn into_domain(self) -> DomainResult<NewExpenseClaim> {
        Ok(NewExpenseClaim {
            employee: self.employee,
            department: self.department,
            items: expense_items(self.items)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateExpenseClaimRequest {
    pub employee: Option<String>,
    pub department: Option<String>,
    pub items: Option<Vec<ExpenseItemRequest>>,
}

impl UpdateExpenseClaimRequest {
    pub fn into_domain(self) -> DomainResult<ExpensePatch> {
        Ok(ExpensePatch {
            employee: self.employee,
            department: self.department,
            items: self.items.map(expense_items).transpose()?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewRequest {
    pub note: Option<String>,
}

// -------------------------
// Reconciliations
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ReconciliationItemRequest {
    pub date: String,
    pub description: String,
    pub amount: Money,
    #[serde(default)]
    pub matched: bool,
}

impl ReconciliationItemRequest {
    fn into_domain(self) -> DomainResult<NewReconciliationItem> {
        Ok(NewReconciliationItem {
            date: parse_date(&self.date, "item date")?,
            description: self.description,
            amount: self.amount,
            matched: self.matched,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateReconciliationRequest {
    pub account_code: String,
    pub statement_date: String,
    pub bank_balance: Money,
    pub book_balance: Money,
    #[serde(default)]
    pub bank_items: Vec<ReconciliationItemRequest>,
    #[serde(default)]
    pub book_items: Vec<ReconciliationItemRequest>,
}

impl CreateReconciliationRequest {
    pub fn into_domain(self) -> DomainResult<NewReconciliation> {
        let items = |items: Vec<ReconciliationItemRequest>| -> DomainResult<Vec<NewReconciliationItem>> {
            items.into_iter().map(ReconciliationItemRequest::into_domain).collect()
        };
        Ok(NewReconciliation {
            account_code: self.account_code,
            statement_date: parse_date(&self.statement_date, "statement_date")?,
            bank_balance: self.bank_balance,
            book_balance: self.book_balance,
            bank_items: items(self.bank_items)?,
            book_items: items(self.book_items)?,
        })
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ReconciliationView {
    #[serde(flatten)]
    pub reconciliation: Reconciliation,
    pub summary: ReconciliationSummary,
}

impl From<Reconciliation> for ReconciliationView {
    fn from(reconciliation: Reconciliation) -> Self {
        let summary = reconciliation.summary();
        Self {
            reconciliation,
            summary,
        }
    }
}
