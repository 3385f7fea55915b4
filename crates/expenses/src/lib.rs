//! Expense claims: employee-submitted costs awaiting review.

pub mod claim;

pub use claim::{
    ClaimStatus, ExpenseClaim, ExpenseClaimId, ExpenseItem, ExpensePatch, NewExpenseClaim,
};
