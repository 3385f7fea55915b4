//! Bank/book reconciliation.
//!
//! Matching is manual: a reviewer ticks items off one at a time. This crate
//! holds the pure matcher functions and the reconciliation session record.

pub mod matcher;
pub mod session;

pub use matcher::{
    difference, match_percentage, toggle_match, BalanceStatus, ReconciliationItem,
    ReconciliationItemId,
};
pub use session::{
    NewReconciliation, NewReconciliationItem, Reconciliation, ReconciliationId,
    ReconciliationStatus, ReconciliationSummary,
};
