//! Grouped (tree) views.

use serde::Serialize;

use ledgerdesk_accounting::{Account, AccountKind};
use ledgerdesk_core::Money;
use ledgerdesk_expenses::ExpenseClaim;

use super::table::{AccountRow, ExpenseRow};

/// A group of records sharing a derived key.
///
/// Leaf nodes carry `items`; inner nodes carry `children`. `count` and `total`
/// always cover everything beneath the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode<T> {
    pub key: String,
    pub label: String,
    pub count: usize,
    pub total: Money,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode<T>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<T>,
}

impl<T> TreeNode<T> {
    fn branch(key: String, label: String, children: Vec<TreeNode<T>>) -> Self {
        Self {
            key,
            label,
            count: children.iter().map(|c| c.count).sum(),
            total: children.iter().map(|c| c.total).sum(),
            children,
            items: Vec::new(),
        }
    }
}

/// Group `items` into leaf nodes keyed by `key_fn`, in order of first appearance.
///
/// `key_fn` returns `(key, label)`; items keep their input order inside a node.
pub fn group_by<T, K, A>(items: Vec<T>, key_fn: K, amount_fn: A) -> Vec<TreeNode<T>>
where
    K: Fn(&T) -> (String, String),
    A: Fn(&T) -> Money,
{
    let mut nodes: Vec<TreeNode<T>> = Vec::new();
    for item in items {
        let (key, label) = key_fn(&item);
        let amount = amount_fn(&item);
        let idx = match nodes.iter().position(|n| n.key == key) {
            Some(idx) => idx,
            None => {
                nodes.push(TreeNode {
                    key,
                    label,
                    count: 0,
                    total: Money::ZERO,
                    children: Vec::new(),
                    items: Vec::new(),
                });
                nodes.len() - 1
            }
        };
        let node = &mut nodes[idx];
        node.count += 1;
        node.total += amount;
        node.items.push(item);
    }
    nodes
}

fn label_or(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() { fallback.to_string() } else { value.to_string() }
}

/// Chart of accounts: kind (chart order, empty kinds omitted) → subtype.
pub fn account_tree(accounts: &[Account]) -> Vec<TreeNode<AccountRow>> {
    AccountKind::ALL
        .iter()
        .filter_map(|kind| {
            let rows: Vec<AccountRow> = accounts
                .iter()
                .filter(|a| a.kind == *kind)
                .map(AccountRow::from)
                .collect();
            if rows.is_empty() {
                return None;
            }
            let subtypes = group_by(
                rows,
                |row| {
                    let label = label_or(&row.subtype, "General");
                    (label.to_lowercase(), label)
                },
                |row| row.balance,
            );
            Some(TreeNode::branch(
                kind.as_str().to_string(),
                kind.label().to_string(),
                subtypes,
            ))
        })
        .collect()
}

/// Expense claims: department → employee. Blank departments go under "Unassigned".
pub fn expense_tree(claims: &[ExpenseClaim]) -> Vec<TreeNode<ExpenseRow>> {
    let rows: Vec<ExpenseRow> = claims.iter().map(ExpenseRow::from).collect();
    group_by(
        rows,
        |row| {
            let label = label_or(&row.department, "Unassigned");
            (label.to_lowercase(), label)
        },
        |row| row.total,
    )
    .into_iter()
    .map(|dept| {
        let employees = group_by(
            dept.items,
            |row| (row.employee.to_lowercase(), row.employee.clone()),
            |row| row.total,
        );
        TreeNode::branch(dept.key, dept.label, employees)
    })
    .collect()
}
