//! Accounting module: chart of accounts, double-entry journal, reports.
//!
//! Pure domain logic only: no IO, no HTTP, no storage concerns.

pub mod account;
pub mod journal;
pub mod report;

pub use account::{Account, AccountId, AccountKind, AccountPatch, NewAccount, NormalSide};
pub use journal::{
    is_balanced, totals, validate_lines, JournalEntry, JournalEntryId, JournalLine, JournalPatch,
    JournalStatus, NewJournalEntry,
};
pub use report::{summarize_by_kind, trial_balance, KindSummary, TrialBalance, TrialBalanceRow};
