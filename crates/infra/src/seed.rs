//! Sample dataset: a small company's books, as shown on first launch.

use chrono::NaiveDate;

use ledgerdesk_accounting::{AccountKind, JournalLine, JournalStatus, NewAccount, NewJournalEntry};
use ledgerdesk_core::{DomainError, DomainResult, Money};
use ledgerdesk_expenses::{ExpenseItem, NewExpenseClaim};
use ledgerdesk_invoicing::{InvoiceItem, InvoiceStatus, NewInvoice};
use ledgerdesk_reconciliation::{NewReconciliation, NewReconciliationItem};

use crate::store::LedgerStore;

/// Sales tax applied to every sample invoice (8%).
const SAMPLE_TAX_BPS: u32 = 800;

fn date(y: i32, m: u32, d: u32) -> DomainResult<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| DomainError::validation(format!("invalid date {y}-{m:02}-{d:02}")))
}

fn money(s: &str) -> DomainResult<Money> {
    s.parse()
}

/// Load the sample chart, journal, invoices, claims and one open
/// reconciliation into `store`.
pub fn seed_sample_data(store: &LedgerStore) -> DomainResult<()> {
    seed_accounts(store)?;
    seed_journal(store)?;
    seed_invoices(store)?;
    seed_expenses(store)?;
    seed_reconciliation(store)?;

    tracing::info!(
        accounts = store.list_accounts().len(),
        journal_entries = store.list_journal_entries().len(),
        invoices = store.list_invoices().len(),
        expense_claims = store.list_expense_claims().len(),
        "sample data loaded"
    );
    Ok(())
}

fn seed_accounts(store: &LedgerStore) -> DomainResult<()> {
    let chart = [
        ("1000", "Cash", AccountKind::Asset, "Current Assets", "25000.00"),
        ("1010", "Bank - Operating", AccountKind::Asset, "Current Assets", "15320.75"),
        ("1200", "Accounts Receivable", AccountKind::Asset, "Current Assets", "8450.00"),
        ("1500", "Equipment", AccountKind::Asset, "Fixed Assets", "12000.00"),
        ("2000", "Accounts Payable", AccountKind::Liability, "Current Liabilities", "5200.00"),
        ("2100", "Sales Tax Payable", AccountKind::Liability, "Current Liabilities", "845.00"),
        ("3000", "Owner's Equity", AccountKind::Equity, "Capital", "40000.00"),
        ("4000", "Sales Revenue", AccountKind::Revenue, "Operating Revenue", "14725.75"),
        ("4100", "Service Revenue", AccountKind::Revenue, "Operating Revenue", "0"),
        ("5000", "Rent Expense", AccountKind::Expense, "Operating Expenses", "0"),
        ("5100", "Utilities Expense", AccountKind::Expense, "Operating Expenses", "0"),
        ("5200", "Travel Expense", AccountKind::Expense, "Operating Expenses", "0"),
    ];

    for (code, name, kind, subtype, balance) in chart {
        store.create_account(
            NewAccount::new(code, name, kind)
                .subtype(subtype)
                .opening_balance(money(balance)?),
        )?;
    }
    Ok(())
}

fn seed_journal(store: &LedgerStore) -> DomainResult<()> {
    let rent = money("2500.00")?;
    store.create_journal_entry(NewJournalEntry {
        date: date(2024, 5, 1)?,
        reference: None,
        description: "May office rent".to_string(),
        lines: vec![JournalLine::debit("5000", rent), JournalLine::credit("1000", rent)],
        status: JournalStatus::Posted,
    })?;

    let utilities = money("320.50")?;
    store.create_journal_entry(NewJournalEntry {
        date: date(2024, 5, 15)?,
        reference: None,
        description: "Electricity bill".to_string(),
        lines: vec![
            JournalLine::debit("5100", utilities),
            JournalLine::credit("2000", utilities),
        ],
        status: JournalStatus::Draft,
    })?;

    let travel = money("845.20")?;
    store.create_journal_entry(NewJournalEntry {
        date: date(2024, 5, 20)?,
        reference: None,
        description: "Client visit travel".to_string(),
        lines: vec![JournalLine::debit("5200", travel), JournalLine::credit("1000", travel)],
        status: JournalStatus::Draft,
    })?;
    Ok(())
}

fn seed_invoices(store: &LedgerStore) -> DomainResult<()> {
    let invoices = [
        ("Acme Corp", (2024, 4, 1), (2024, 5, 1), InvoiceStatus::Paid, "Consulting services", 10, "150.00"),
        ("Globex Ltd", (2024, 4, 15), (2024, 5, 15), InvoiceStatus::Pending, "Website redesign", 1, "3200.00"),
        ("Initech", (2024, 3, 10), (2024, 4, 10), InvoiceStatus::Overdue, "Support retainer", 3, "450.00"),
        ("Umbrella Inc", (2024, 5, 20), (2024, 6, 20), InvoiceStatus::Draft, "Training workshop", 2, "1200.00"),
        ("Stark Industries", (2024, 2, 1), (2024, 3, 1), InvoiceStatus::Pending, "Hardware audit", 1, "980.00"),
    ];

    for (customer, issued, due, status, description, quantity, unit_price) in invoices {
        store.create_invoice(NewInvoice {
            invoice_number: None,
            customer: customer.to_string(),
            issue_date: date(issued.0, issued.1, issued.2)?,
            due_date: date(due.0, due.1, due.2)?,
            status,
            items: vec![InvoiceItem::new(description, quantity, money(unit_price)?)],
            tax_rate_bps: SAMPLE_TAX_BPS,
            notes: None,
        })?;
    }
    Ok(())
}

fn seed_expenses(store: &LedgerStore) -> DomainResult<()> {
    let item = |category: &str, description: &str, amount: &str, day: u32| -> DomainResult<ExpenseItem> {
        Ok(ExpenseItem {
            category: category.to_string(),
            description: description.to_string(),
            amount: money(amount)?,
            date: date(2024, 5, day)?,
        })
    };

    let travel = store.submit_expense_claim(NewExpenseClaim {
        employee: "Priya Shah".to_string(),
        department: "Sales".to_string(),
        items: vec![
            item("Travel", "Flight to client site", "412.30", 6)?,
            item("Meals", "Client dinner", "86.40", 7)?,
        ],
    })?;
    store.approve_expense_claim(travel.id, Some("Within policy".to_string()))?;

    let supplies = store.submit_expense_claim(NewExpenseClaim {
        employee: "Marcus Lee".to_string(),
        department: "Operations".to_string(),
        items: vec![item("Supplies", "Printer toner", "64.99", 12)?],
    })?;
    store.reject_expense_claim(supplies.id, Some("Order through procurement".to_string()))?;

    store.submit_expense_claim(NewExpenseClaim {
        employee: "Priya Shah".to_string(),
        department: "Sales".to_string(),
        items: vec![item("Travel", "Taxi to airport", "48.00", 21)?],
    })?;
    Ok(())
}

fn seed_reconciliation(store: &LedgerStore) -> DomainResult<()> {
    let line = |description: &str, amount: &str, day: u32, matched: bool| -> DomainResult<NewReconciliationItem> {
        Ok(NewReconciliationItem {
            date: date(2024, 5, day)?,
            description: description.to_string(),
            amount: money(amount)?,
            matched,
        })
    };

    store.open_reconciliation(NewReconciliation {
        account_code: "1010".to_string(),
        statement_date: date(2024, 5, 31)?,
        bank_balance: money("15420.75")?,
        book_balance: money("15320.75")?,
        bank_items: vec![
            line("Customer deposit - Acme Corp", "1620.00", 3, true)?,
            line("Bank service fee", "-25.00", 28, false)?,
            line("Interest earned", "125.00", 30, false)?,
        ],
        book_items: vec![
            line("Deposit - Acme Corp", "1620.00", 3, true)?,
            line("Check #1042 - Office supplies", "-210.00", 18, false)?,
        ],
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerdesk_expenses::ClaimStatus;
    use ledgerdesk_reconciliation::BalanceStatus;

    #[test]
    fn sample_data_is_consistent() {
        let store = LedgerStore::in_memory();
        seed_sample_data(&store).unwrap();

        assert_eq!(store.list_accounts().len(), 12);

        // The posted rent entry moved Cash and Rent.
        assert_eq!(
            store.find_account_by_code("1000").unwrap().balance,
            money("22500.00").unwrap()
        );
        assert_eq!(
            store.find_account_by_code("5000").unwrap().balance,
            money("2500.00").unwrap()
        );

        let entries = store.list_journal_entries();
        let refs: Vec<_> = entries.iter().map(|e| e.reference.as_str()).collect();
        assert_eq!(refs, vec!["JE-0001", "JE-0002", "JE-0003"]);
        assert_eq!(entries[0].status, JournalStatus::Posted);

        let invoices = store.list_invoices();
        assert_eq!(invoices.len(), 5);
        assert_eq!(invoices[0].invoice_number, "INV-0001");
        assert_eq!(invoices[0].status, InvoiceStatus::Paid);
        assert_eq!(invoices[0].total, money("1620.00").unwrap());

        let statuses: Vec<_> = store.list_expense_claims().iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![ClaimStatus::Approved, ClaimStatus::Rejected, ClaimStatus::Pending]
        );

        let reconciliation = &store.list_reconciliations()[0];
        let summary = reconciliation.summary();
        assert_eq!(summary.difference, money("100.00").unwrap());
        assert_eq!(summary.balance_status, BalanceStatus::Over);
        assert_eq!(summary.matched_count, 2);
        assert_eq!(summary.total_count, 5);
        assert_eq!(summary.match_percentage, 40);
    }
}
