//! Kanban boards: one column per status, in workflow order.

use serde::Serialize;

use ledgerdesk_accounting::JournalStatus;
use ledgerdesk_core::Money;
use ledgerdesk_expenses::ClaimStatus;
use ledgerdesk_invoicing::InvoiceStatus;

/// A status enum that can lay out a board.
pub trait BoardStatus: Copy + Eq + 'static {
    /// Every column, in display order.
    fn columns() -> &'static [Self];
    fn key(&self) -> &'static str;
    fn title(&self) -> &'static str;
}

impl BoardStatus for InvoiceStatus {
    fn columns() -> &'static [Self] {
        &InvoiceStatus::ALL
    }

    fn key(&self) -> &'static str {
        self.as_str()
    }

    fn title(&self) -> &'static str {
        self.label()
    }
}

impl BoardStatus for JournalStatus {
    fn columns() -> &'static [Self] {
        &JournalStatus::ALL
    }

    fn key(&self) -> &'static str {
        self.as_str()
    }

    fn title(&self) -> &'static str {
        self.label()
    }
}

impl BoardStatus for ClaimStatus {
    fn columns() -> &'static [Self] {
        &ClaimStatus::ALL
    }

    fn key(&self) -> &'static str {
        self.as_str()
    }

    fn title(&self) -> &'static str {
        self.label()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KanbanColumn<T> {
    pub status: &'static str,
    pub title: &'static str,
    pub count: usize,
    pub total: Money,
    pub cards: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KanbanBoard<T> {
    pub columns: Vec<KanbanColumn<T>>,
}

impl<T> KanbanBoard<T> {
    pub fn column(&self, status: &str) -> Option<&KanbanColumn<T>> {
        self.columns.iter().find(|c| c.status == status)
    }
}

/// Distribute `items` over the columns of `S`. Empty columns are kept.
pub fn board<T, S, F, A>(items: Vec<T>, status_fn: F, amount_fn: A) -> KanbanBoard<T>
where
    S: BoardStatus,
    F: Fn(&T) -> S,
    A: Fn(&T) -> Money,
{
    let mut columns: Vec<KanbanColumn<T>> = S::columns()
        .iter()
        .map(|status| KanbanColumn {
            status: status.key(),
            title: status.title(),
            count: 0,
            total: Money::ZERO,
            cards: Vec::new(),
        })
        .collect();

    for item in items {
        let status = status_fn(&item);
        if let Some(idx) = S::columns().iter().position(|s| *s == status) {
            let column = &mut columns[idx];
            column.count += 1;
            column.total += amount_fn(&item);
            column.cards.push(item);
        }
    }

    KanbanBoard { columns }
}
