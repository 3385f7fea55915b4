//! The ledger store: every collection of the back office behind one handle.
//!
//! A store-wide gate orders access: mutations hold it exclusively, so
//! multi-step checks (unique codes, posting across accounts) observe and
//! produce a consistent state; reads hold it shared, so they never see half
//! of a mutation. A mutation that fails leaves every collection unchanged.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDate, Utc};

use ledgerdesk_accounting::{
    summarize_by_kind, trial_balance, Account, AccountId, AccountPatch, JournalEntry,
    JournalEntryId, JournalPatch, JournalStatus, KindSummary, NewAccount, NewJournalEntry,
    TrialBalance,
};
use ledgerdesk_core::{DomainError, DomainResult, Entity};
use ledgerdesk_expenses::{ExpenseClaim, ExpenseClaimId, ExpensePatch, NewExpenseClaim};
use ledgerdesk_invoicing::{Invoice, InvoiceId, InvoicePatch, NewInvoice};
use ledgerdesk_reconciliation::{
    NewReconciliation, Reconciliation, ReconciliationId, ReconciliationItemId,
};

use crate::repository::{InMemoryRepository, Repository};

/// Repository set backing a [`LedgerStore`].
#[derive(Clone)]
pub struct Repositories {
    pub accounts: Arc<dyn Repository<Account>>,
    pub journal_entries: Arc<dyn Repository<JournalEntry>>,
    pub invoices: Arc<dyn Repository<Invoice>>,
    pub expense_claims: Arc<dyn Repository<ExpenseClaim>>,
    pub reconciliations: Arc<dyn Repository<Reconciliation>>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            accounts: Arc::new(InMemoryRepository::<Account>::new()),
            journal_entries: Arc::new(InMemoryRepository::<JournalEntry>::new()),
            invoices: Arc::new(InMemoryRepository::<Invoice>::new()),
            expense_claims: Arc::new(InMemoryRepository::<ExpenseClaim>::new()),
            reconciliations: Arc::new(InMemoryRepository::<Reconciliation>::new()),
        }
    }
}

pub struct LedgerStore {
    repos: Repositories,
    gate: RwLock<()>,
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl LedgerStore {
    pub fn new(repos: Repositories) -> Self {
        Self {
            repos,
            gate: RwLock::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Repositories::in_memory())
    }

    // The guarded value is `()`, so a poisoned gate carries no torn state.
    fn write_guard(&self) -> RwLockWriteGuard<'_, ()> {
        self.gate.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read().unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------
    // Accounts
    // -------------------------

    pub fn list_accounts(&self) -> Vec<Account> {
        let _guard = self.read_guard();
        self.repos.accounts.list()
    }

    pub fn get_account(&self, id: AccountId) -> DomainResult<Account> {
        let _guard = self.read_guard();
        fetch(&self.repos.accounts, &id, "account")
    }

    pub fn find_account_by_code(&self, code: &str) -> Option<Account> {
        let _guard = self.read_guard();
        self.account_by_code(code)
    }

    fn account_by_code(&self, code: &str) -> Option<Account> {
        let code = code.trim();
        self.repos.accounts.find(&|a: &Account| a.code == code)
    }

    pub fn create_account(&self, new: NewAccount) -> DomainResult<Account> {
        let _guard = self.write_guard();

        let account = Account::create(new, Utc::now())?;
        self.ensure_code_free(&account.code, None)?;

        self.insert(&self.repos.accounts, account.clone(), "account")?;
        tracing::info!(account_id = %account.id, code = %account.code, kind = account.kind.as_str(), "account created");
        Ok(account)
    }

    pub fn update_account(&self, id: AccountId, patch: AccountPatch) -> DomainResult<Account> {
        let _guard = self.write_guard();

        let mut account = fetch(&self.repos.accounts, &id, "account")?;
        account.apply_patch(patch, Utc::now())?;
        self.ensure_code_free(&account.code, Some(id))?;

        self.replace(&self.repos.accounts, account, "account")
    }

    fn ensure_code_free(&self, code: &str, except: Option<AccountId>) -> DomainResult<()> {
        let taken = self
            .repos
            .accounts
            .find(&|a: &Account| a.code == code && Some(a.id) != except);
        if taken.is_some() {
            tracing::debug!(code, "duplicate account code rejected");
            return Err(DomainError::conflict(format!(
                "Account code {code} already exists"
            )));
        }
        Ok(())
    }

    // -------------------------
    // Journal entries
    // -------------------------

    pub fn list_journal_entries(&self) -> Vec<JournalEntry> {
        let _guard = self.read_guard();
        self.repos.journal_entries.list()
    }

    pub fn get_journal_entry(&self, id: JournalEntryId) -> DomainResult<JournalEntry> {
        let _guard = self.read_guard();
        fetch(&self.repos.journal_entries, &id, "journal entry")
    }

    /// Create a draft, or post immediately when `new.status` is `Posted`.
    pub fn create_journal_entry(&self, new: NewJournalEntry) -> DomainResult<JournalEntry> {
        let _guard = self.write_guard();
        let now = Utc::now();

        let reference = match new.reference.as_deref().map(str::trim) {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => {
                let taken: Vec<String> = self
                    .repos
                    .journal_entries
                    .list()
                    .into_iter()
                    .map(|e| e.reference)
                    .collect();
                next_sequence_number("JE", &taken)
            }
        };
        let post_now = new.status == JournalStatus::Posted;

        let mut entry = JournalEntry::draft(new, reference, now)?;
        let touched = if post_now {
            self.stage_posting(&mut entry)?
        } else {
            Vec::new()
        };

        self.apply_balances(touched)?;
        self.insert(&self.repos.journal_entries, entry.clone(), "journal entry")?;
        tracing::info!(entry_id = %entry.id, reference = %entry.reference, status = entry.status.as_str(), "journal entry created");
        Ok(entry)
    }

    pub fn update_journal_entry(
        &self,
        id: JournalEntryId,
        patch: JournalPatch,
    ) -> DomainResult<JournalEntry> {
        let _guard = self.write_guard();

        let mut entry = fetch(&self.repos.journal_entries, &id, "journal entry")?;
        entry.apply_patch(patch, Utc::now())?;
        self.replace(&self.repos.journal_entries, entry, "journal entry")
    }

    /// Draft → Posted. Applies every line to its account balance.
    pub fn post_journal_entry(&self, id: JournalEntryId) -> DomainResult<JournalEntry> {
        let _guard = self.write_guard();

        let mut entry = fetch(&self.repos.journal_entries, &id, "journal entry")?;
        let touched = self.stage_posting(&mut entry)?;
        self.apply_balances(touched)?;
        tracing::info!(entry_id = %entry.id, reference = %entry.reference, "journal entry posted");
        self.replace(&self.repos.journal_entries, entry, "journal entry")
    }

    pub fn reject_journal_entry(&self, id: JournalEntryId) -> DomainResult<JournalEntry> {
        let _guard = self.write_guard();

        let mut entry = fetch(&self.repos.journal_entries, &id, "journal entry")?;
        entry.reject(Utc::now())?;
        tracing::info!(entry_id = %entry.id, reference = %entry.reference, "journal entry rejected");
        self.replace(&self.repos.journal_entries, entry, "journal entry")
    }

    /// Validate `entry` against the chart, mark it posted, and return the
    /// accounts with updated balances. Nothing is written here, so an error
    /// leaves the store untouched.
    fn stage_posting(&self, entry: &mut JournalEntry) -> DomainResult<Vec<Account>> {
        entry.ensure_postable()?;
        let now = Utc::now();

        let mut touched: Vec<Account> = Vec::new();
        for line in &entry.lines {
            let code = line.account_code.trim();
            let idx = match touched.iter().position(|a| a.code == code) {
                Some(idx) => idx,
                None => {
                    let account = self.account_by_code(code).ok_or_else(|| {
                        DomainError::validation(format!("unknown account code {code}"))
                    })?;
                    if !account.is_active {
                        return Err(DomainError::validation(format!(
                            "account {code} is inactive"
                        )));
                    }
                    touched.push(account);
                    touched.len() - 1
                }
            };
            touched[idx].apply_posting(line.debit, line.credit, now)?;
        }

        entry.mark_posted(now)?;
        Ok(touched)
    }

    /// Write staged balances in one repository step.
    fn apply_balances(&self, touched: Vec<Account>) -> DomainResult<()> {
        if touched.is_empty() || self.repos.accounts.replace_all(touched) {
            Ok(())
        } else {
            Err(DomainError::invariant("account balances could not be updated"))
        }
    }

    // -------------------------
    // Invoices
    // -------------------------

    pub fn list_invoices(&self) -> Vec<Invoice> {
        let _guard = self.read_guard();
        self.repos.invoices.list()
    }

    pub fn get_invoice(&self, id: InvoiceId) -> DomainResult<Invoice> {
        let _guard = self.read_guard();
        fetch(&self.repos.invoices, &id, "invoice")
    }

    pub fn create_invoice(&self, new: NewInvoice) -> DomainResult<Invoice> {
        let _guard = self.write_guard();

        let taken: Vec<String> = self
            .repos
            .invoices
            .list()
            .into_iter()
            .map(|i| i.invoice_number)
            .collect();
        let number = match new.invoice_number.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => {
                if taken.iter().any(|t| t == n) {
                    return Err(DomainError::conflict(format!(
                        "Invoice number {n} already exists"
                    )));
                }
                n.to_string()
            }
            _ => next_sequence_number("INV", &taken),
        };

        let invoice = Invoice::create(new, number, Utc::now())?;
        self.insert(&self.repos.invoices, invoice.clone(), "invoice")?;
        tracing::info!(invoice_id = %invoice.id, number = %invoice.invoice_number, total = %invoice.total, "invoice created");
        Ok(invoice)
    }

    pub fn update_invoice(&self, id: InvoiceId, patch: InvoicePatch) -> DomainResult<Invoice> {
        let _guard = self.write_guard();

        let mut invoice = fetch(&self.repos.invoices, &id, "invoice")?;
        let previous = invoice.status;
        invoice.apply_patch(patch, Utc::now())?;
        if invoice.status != previous {
            tracing::info!(invoice_id = %invoice.id, from = previous.as_str(), to = invoice.status.as_str(), "invoice status changed");
        }
        self.replace(&self.repos.invoices, invoice, "invoice")
    }

    /// Flip every pending invoice due before `today` to overdue; returns the changed ones.
    pub fn mark_overdue_invoices(&self, today: NaiveDate) -> DomainResult<Vec<Invoice>> {
        let _guard = self.write_guard();
        let now = Utc::now();

        let changed: Vec<Invoice> = self
            .repos
            .invoices
            .list()
            .into_iter()
            .filter_map(|mut invoice| invoice.mark_overdue(today, now).then_some(invoice))
            .collect();
        if changed.is_empty() {
            return Ok(changed);
        }
        if !self.repos.invoices.replace_all(changed.clone()) {
            return Err(DomainError::invariant("overdue invoices could not be updated"));
        }
        tracing::info!(count = changed.len(), %today, "invoices marked overdue");
        Ok(changed)
    }

    // -------------------------
    // Expense claims
    // -------------------------

    pub fn list_expense_claims(&self) -> Vec<ExpenseClaim> {
        let _guard = self.read_guard();
        self.repos.expense_claims.list()
    }

    pub fn get_expense_claim(&self, id: ExpenseClaimId) -> DomainResult<ExpenseClaim> {
        let _guard = self.read_guard();
        fetch(&self.repos.expense_claims, &id, "expense claim")
    }

    pub fn submit_expense_claim(&self, new: NewExpenseClaim) -> DomainResult<ExpenseClaim> {
        let _guard = self.write_guard();

        let claim = ExpenseClaim::submit(new, Utc::now())?;
        self.insert(&self.repos.expense_claims, claim.clone(), "expense claim")?;
        tracing::info!(claim_id = %claim.id, employee = %claim.employee, total = %claim.total, "expense claim submitted");
        Ok(claim)
    }

    pub fn update_expense_claim(
        &self,
        id: ExpenseClaimId,
        patch: ExpensePatch,
    ) -> DomainResult<ExpenseClaim> {
        let _guard = self.write_guard();

        let mut claim = fetch(&self.repos.expense_claims, &id, "expense claim")?;
        claim.apply_patch(patch, Utc::now())?;
        self.replace(&self.repos.expense_claims, claim, "expense claim")
    }

    pub fn approve_expense_claim(
        &self,
        id: ExpenseClaimId,
        note: Option<String>,
    ) -> DomainResult<ExpenseClaim> {
        let _guard = self.write_guard();

        let mut claim = fetch(&self.repos.expense_claims, &id, "expense claim")?;
        claim.approve(note, Utc::now())?;
        tracing::info!(claim_id = %claim.id, "expense claim approved");
        self.replace(&self.repos.expense_claims, claim, "expense claim")
    }

    pub fn reject_expense_claim(
        &self,
        id: ExpenseClaimId,
        note: Option<String>,
    ) -> DomainResult<ExpenseClaim> {
        let _guard = self.write_guard();

        let mut claim = fetch(&self.repos.expense_claims, &id, "expense claim")?;
        claim.reject(note, Utc::now())?;
        tracing::info!(claim_id = %claim.id, "expense claim rejected");
        self.replace(&self.repos.expense_claims, claim, "expense claim")
    }

    // -------------------------
    // Reconciliations
    // -------------------------

    pub fn list_reconciliations(&self) -> Vec<Reconciliation> {
        let _guard = self.read_guard();
        self.repos.reconciliations.list()
    }

    pub fn get_reconciliation(&self, id: ReconciliationId) -> DomainResult<Reconciliation> {
        let _guard = self.read_guard();
        fetch(&self.repos.reconciliations, &id, "reconciliation")
    }

    pub fn open_reconciliation(&self, new: NewReconciliation) -> DomainResult<Reconciliation> {
        let _guard = self.write_guard();

        if self.account_by_code(&new.account_code).is_none() {
            return Err(DomainError::validation(format!(
                "unknown account code {}",
                new.account_code.trim()
            )));
        }
        let reconciliation = Reconciliation::open(new, Utc::now())?;
        let difference = reconciliation.difference();
        self.insert(&self.repos.reconciliations, reconciliation.clone(), "reconciliation")?;
        tracing::info!(
            reconciliation_id = %reconciliation.id,
            account = %reconciliation.account_code,
            %difference,
            "reconciliation opened"
        );
        Ok(reconciliation)
    }

    pub fn toggle_reconciliation_item(
        &self,
        id: ReconciliationId,
        item_id: ReconciliationItemId,
    ) -> DomainResult<Reconciliation> {
        let _guard = self.write_guard();

        let mut reconciliation = fetch(&self.repos.reconciliations, &id, "reconciliation")?;
        let matched = reconciliation.toggle(item_id, Utc::now())?;
        tracing::debug!(reconciliation_id = %id, %item_id, matched, "reconciliation item toggled");
        self.replace(&self.repos.reconciliations, reconciliation, "reconciliation")
    }

    pub fn complete_reconciliation(&self, id: ReconciliationId) -> DomainResult<Reconciliation> {
        let _guard = self.write_guard();

        let mut reconciliation = fetch(&self.repos.reconciliations, &id, "reconciliation")?;
        reconciliation.complete(Utc::now())?;
        tracing::info!(reconciliation_id = %id, "reconciliation completed");
        self.replace(&self.repos.reconciliations, reconciliation, "reconciliation")
    }

    // -------------------------
    // Reports
    // -------------------------

    pub fn trial_balance(&self) -> TrialBalance {
        trial_balance(&self.list_accounts())
    }

    pub fn summary_by_kind(&self) -> Vec<KindSummary> {
        summarize_by_kind(&self.list_accounts())
    }

    fn insert<T>(&self, repo: &Arc<dyn Repository<T>>, value: T, what: &str) -> DomainResult<()>
    where
        T: Entity,
    {
        if repo.insert(value) {
            Ok(())
        } else {
            Err(DomainError::invariant(format!("{what} could not be stored")))
        }
    }

    fn replace<T>(
        &self,
        repo: &Arc<dyn Repository<T>>,
        value: T,
        what: &str,
    ) -> DomainResult<T>
    where
        T: Entity + Clone,
        T::Id: core::fmt::Display,
    {
        let id = value.id().clone();
        repo.replace(value.clone())
            .map(|_| value)
            .ok_or_else(|| DomainError::not_found(format!("{what} {id}")))
    }
}

fn fetch<T>(repo: &Arc<dyn Repository<T>>, id: &T::Id, what: &str) -> DomainResult<T>
where
    T: Entity,
    T::Id: core::fmt::Display,
{
    repo.get(id)
        .ok_or_else(|| DomainError::not_found(format!("{what} {id}")))
}

/// `PREFIX-0001`, skipping numbers already taken.
fn next_sequence_number(prefix: &str, taken: &[String]) -> String {
    let mut n = taken.len() + 1;
    loop {
        let candidate = format!("{prefix}-{n:04}");
        if !taken.iter().any(|t| *t == candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerdesk_accounting::{AccountKind, JournalLine};
    use ledgerdesk_core::Money;
    use ledgerdesk_invoicing::{InvoiceItem, InvoiceStatus};

    fn store_with_chart() -> LedgerStore {
        let store = LedgerStore::in_memory();
        store
            .create_account(NewAccount::new("1000", "Cash", AccountKind::Asset))
            .unwrap();
        store
            .create_account(NewAccount::new("4000", "Sales", AccountKind::Revenue))
            .unwrap();
        store
    }

    fn entry(lines: Vec<JournalLine>, status: JournalStatus) -> NewJournalEntry {
        NewJournalEntry {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            reference: None,
            description: "Cash sale".to_string(),
            lines,
            status,
        }
    }

    fn invoice(number: Option<&str>) -> NewInvoice {
        NewInvoice {
            invoice_number: number.map(str::to_string),
            customer: "Acme Corp".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            status: InvoiceStatus::Pending,
            items: vec![InvoiceItem::new("Service", 1, Money::from_minor(10_000))],
            tax_rate_bps: 0,
            notes: None,
        }
    }

    #[test]
    fn duplicate_account_code_is_rejected_and_store_unchanged() {
        let store = store_with_chart();
        let before = store.list_accounts();

        let err = store
            .create_account(NewAccount::new("1000", "Petty Cash", AccountKind::Asset))
            .unwrap_err();
        assert_eq!(err, DomainError::conflict("Account code 1000 already exists"));
        assert_eq!(store.list_accounts(), before);
    }

    #[test]
    fn update_merges_fields_and_touches_timestamp() {
        let store = store_with_chart();
        let cash = store.find_account_by_code("1000").unwrap();

        let updated = store
            .update_account(
                cash.id,
                AccountPatch {
                    name: Some("Cash on Hand".to_string()),
                    ..AccountPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Cash on Hand");
        assert_eq!(updated.code, "1000");
        assert_eq!(updated.timestamps.created_at, cash.timestamps.created_at);
        assert!(updated.timestamps.updated_at >= cash.timestamps.updated_at);
        assert_eq!(store.get_account(cash.id).unwrap(), updated);
    }

    #[test]
    fn renaming_code_onto_existing_code_conflicts() {
        let store = store_with_chart();
        let sales = store.find_account_by_code("4000").unwrap();
        let err = store
            .update_account(
                sales.id,
                AccountPatch {
                    code: Some("1000".to_string()),
                    ..AccountPatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(store.get_account(sales.id).unwrap(), sales);
    }

    #[test]
    fn update_of_missing_account_is_not_found() {
        let store = store_with_chart();
        let err = store
            .update_account(AccountId::generate(), AccountPatch::default())
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn posting_moves_balances() {
        let store = store_with_chart();
        let draft = store
            .create_journal_entry(entry(
                vec![
                    JournalLine::debit("1000", Money::from_minor(2_500)),
                    JournalLine::credit("4000", Money::from_minor(2_500)),
                ],
                JournalStatus::Draft,
            ))
            .unwrap();
        assert_eq!(draft.reference, "JE-0001");
        assert_eq!(store.find_account_by_code("1000").unwrap().balance, Money::ZERO);

        let posted = store.post_journal_entry(draft.id).unwrap();
        assert_eq!(posted.status, JournalStatus::Posted);
        assert_eq!(
            store.find_account_by_code("1000").unwrap().balance,
            Money::from_minor(2_500)
        );
        assert_eq!(
            store.find_account_by_code("4000").unwrap().balance,
            Money::from_minor(2_500)
        );
        assert!(store.trial_balance().is_balanced());
    }

    #[test]
    fn posting_with_unknown_account_changes_nothing() {
        let store = store_with_chart();
        let accounts_before = store.list_accounts();

        let err = store
            .create_journal_entry(entry(
                vec![
                    JournalLine::debit("1000", Money::from_minor(100)),
                    JournalLine::credit("9999", Money::from_minor(100)),
                ],
                JournalStatus::Posted,
            ))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(store.list_journal_entries().is_empty());
        assert_eq!(store.list_accounts(), accounts_before);
    }

    #[test]
    fn unbalanced_entry_can_be_drafted_but_not_posted() {
        let store = store_with_chart();
        let draft = store
            .create_journal_entry(entry(
                vec![
                    JournalLine::debit("1000", Money::from_minor(100)),
                    JournalLine::credit("4000", Money::from_minor(99)),
                ],
                JournalStatus::Draft,
            ))
            .unwrap();

        let err = store.post_journal_entry(draft.id).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(
            store.get_journal_entry(draft.id).unwrap().status,
            JournalStatus::Draft
        );
    }

    #[test]
    fn invoice_numbers_are_generated_and_unique() {
        let store = LedgerStore::in_memory();
        let first = store.create_invoice(invoice(None)).unwrap();
        assert_eq!(first.invoice_number, "INV-0001");

        let manual = store.create_invoice(invoice(Some("INV-0002"))).unwrap();
        assert_eq!(manual.invoice_number, "INV-0002");

        let third = store.create_invoice(invoice(None)).unwrap();
        assert_eq!(third.invoice_number, "INV-0003");

        let err = store.create_invoice(invoice(Some("INV-0001"))).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(store.list_invoices().len(), 3);
    }

    #[test]
    fn overdue_sweep_only_touches_pending_past_due() {
        let store = LedgerStore::in_memory();
        let pending = store.create_invoice(invoice(None)).unwrap();
        let mut draft = invoice(None);
        draft.status = InvoiceStatus::Draft;
        let draft = store.create_invoice(draft).unwrap();

        let changed = store
            .mark_overdue_invoices(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
            .unwrap();
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].id, pending.id);
        assert_eq!(
            store.get_invoice(draft.id).unwrap().status,
            InvoiceStatus::Draft
        );
    }

    #[test]
    fn reconciliation_requires_known_account() {
        let store = store_with_chart();
        let err = store
            .open_reconciliation(NewReconciliation {
                account_code: "1010".to_string(),
                statement_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
                bank_balance: Money::ZERO,
                book_balance: Money::ZERO,
                bank_items: vec![],
                book_items: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn oversized_draft_is_refused_and_listing_still_works() {
        let store = store_with_chart();
        let err = store
            .create_journal_entry(entry(
                vec![
                    JournalLine::debit("1000", Money::from_minor(i64::MAX)),
                    JournalLine::debit("1000", Money::from_minor(1)),
                ],
                JournalStatus::Draft,
            ))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(store.list_journal_entries().is_empty());
    }

    #[test]
    fn posting_past_the_balance_limit_changes_nothing() {
        let store = LedgerStore::in_memory();
        store
            .create_account(
                NewAccount::new("1000", "Cash", AccountKind::Asset)
                    .opening_balance(Money::MAX_AMOUNT),
            )
            .unwrap();
        store
            .create_account(NewAccount::new("4000", "Sales", AccountKind::Revenue))
            .unwrap();
        let accounts_before = store.list_accounts();

        let draft = store
            .create_journal_entry(entry(
                vec![
                    JournalLine::debit("1000", Money::from_minor(1)),
                    JournalLine::credit("4000", Money::from_minor(1)),
                ],
                JournalStatus::Draft,
            ))
            .unwrap();
        let err = store.post_journal_entry(draft.id).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(store.list_accounts(), accounts_before);
        assert_eq!(
            store.get_journal_entry(draft.id).unwrap().status,
            JournalStatus::Draft
        );
    }

    #[test]
    fn reclassifying_a_posted_account_keeps_the_ledger_balanced() {
        let store = store_with_chart();
        store
            .create_journal_entry(entry(
                vec![
                    JournalLine::debit("1000", Money::from_minor(2_500)),
                    JournalLine::credit("4000", Money::from_minor(2_500)),
                ],
                JournalStatus::Posted,
            ))
            .unwrap();
        let cash = store.find_account_by_code("1000").unwrap();

        let err = store
            .update_account(
                cash.id,
                AccountPatch {
                    kind: Some(AccountKind::Liability),
                    ..AccountPatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let err = store
            .update_account(
                cash.id,
                AccountPatch {
                    is_active: Some(false),
                    ..AccountPatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        assert_eq!(store.get_account(cash.id).unwrap(), cash);
        assert!(store.trial_balance().is_balanced());
    }

    /// Accepts reads but refuses to store anything new.
    struct FullRepository;

    impl Repository<Account> for FullRepository {
        fn get(&self, _id: &AccountId) -> Option<Account> {
            None
        }

        fn find(&self, _predicate: &dyn Fn(&Account) -> bool) -> Option<Account> {
            None
        }

        fn list(&self) -> Vec<Account> {
            Vec::new()
        }

        fn insert(&self, _value: Account) -> bool {
            false
        }

        fn replace(&self, _value: Account) -> Option<Account> {
            None
        }

        fn replace_all(&self, _values: Vec<Account>) -> bool {
            false
        }

        fn len(&self) -> usize {
            0
        }
    }

    #[test]
    fn failed_insert_is_reported() {
        let store = LedgerStore::new(Repositories {
            accounts: Arc::new(FullRepository),
            ..Repositories::in_memory()
        });
        let err = store
            .create_account(NewAccount::new("1000", "Cash", AccountKind::Asset))
            .unwrap_err();
        assert_eq!(err, DomainError::invariant("account could not be stored"));
    }

    #[test]
    fn sequence_numbers_skip_taken_values() {
        let taken = vec!["JE-0002".to_string()];
        assert_eq!(next_sequence_number("JE", &taken), "JE-0003");
        assert_eq!(next_sequence_number("JE", &[]), "JE-0001");
    }
}
