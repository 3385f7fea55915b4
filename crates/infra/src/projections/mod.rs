//! View projections (display read models).
//!
//! Projections turn stored records into the shapes screens render:
//! - **Tables**: filtered, searched and sorted rows
//! - **Trees**: records grouped under derived keys
//! - **Kanban boards**: fixed, status-named columns
//!
//! All projections are pure and stable: records that compare equal keep their
//! input order.

use thiserror::Error;

pub mod kanban;
pub mod table;
pub mod tree;

pub use kanban::{board, BoardStatus, KanbanBoard, KanbanColumn};
pub use table::{
    AccountRow, ExpenseRow, InvoiceRow, JournalRow, SortOrder, SortValue, TableQuery, TableRecord,
};
pub use tree::{account_tree, expense_tree, group_by, TreeNode};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("unknown sort column {column:?} (expected one of: {expected})")]
    UnknownColumn { column: String, expected: String },
}
