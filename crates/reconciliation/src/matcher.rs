use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use ledgerdesk_core::{entity_id, Entity, Money};

entity_id!(
    /// Identifier of a single bank or book line within a reconciliation.
    ReconciliationItemId
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationItem {
    pub id: ReconciliationItemId,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub matched: bool,
}

impl Entity for ReconciliationItem {
    type Id = ReconciliationItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Sign of `bank - book`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    /// Bank holds less than the books say.
    Short,
    Balanced,
    /// Bank holds more than the books say.
    Over,
}

impl BalanceStatus {
    pub fn of(difference: Money) -> Self {
        match difference.minor_units() {
            d if d < 0 => BalanceStatus::Short,
            0 => BalanceStatus::Balanced,
            _ => BalanceStatus::Over,
        }
    }
}

/// Copy of `items` with the `matched` flag of `id` flipped.
///
/// An unknown id yields an unchanged copy.
pub fn toggle_match(items: &[ReconciliationItem], id: ReconciliationItemId) -> Vec<ReconciliationItem> {
    items
        .iter()
        .map(|item| {
            let mut item = item.clone();
            if item.id == id {
                item.matched = !item.matched;
            }
            item
        })
        .collect()
}

/// Percentage of matched items, rounded half up. `0` for an empty list.
pub fn match_percentage(items: &[ReconciliationItem]) -> u32 {
    let total = items.len() as u64;
    if total == 0 {
        return 0;
    }
    let matched = items.iter().filter(|i| i.matched).count() as u64;
    ((matched * 200 + total) / (2 * total)) as u32
}

/// `bank - book`: negative means short, positive means over. Saturates at
/// the `i64` bounds, so the sign is always correct.
pub fn difference(bank_balance: Money, book_balance: Money) -> Money {
    bank_balance - book_balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(amount: i64, matched: bool) -> ReconciliationItem {
        ReconciliationItem {
            id: ReconciliationItemId::generate(),
            date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
            description: "Deposit".to_string(),
            amount: Money::from_minor(amount),
            matched,
        }
    }

    #[test]
    fn toggle_flips_only_the_target() {
        let items = vec![item(100, false), item(200, false)];
        let toggled = toggle_match(&items, items[1].id);
        assert!(!toggled[0].matched);
        assert!(toggled[1].matched);

        let back = toggle_match(&toggled, items[1].id);
        assert_eq!(back, items);
    }

    #[test]
    fn toggle_with_unknown_id_changes_nothing() {
        let items = vec![item(100, true)];
        assert_eq!(toggle_match(&items, ReconciliationItemId::generate()), items);
    }

    #[test]
    fn percentage_edges() {
        assert_eq!(match_percentage(&[]), 0);
        assert_eq!(match_percentage(&[item(1, true), item(2, true)]), 100);
        assert_eq!(match_percentage(&[item(1, false), item(2, false)]), 0);
    }

    #[test]
    fn percentage_rounds_half_up() {
        // 1/3 = 33.3 -> 33, 2/3 = 66.7 -> 67, 1/8 = 12.5 -> 13
        let three = [item(1, true), item(2, false), item(3, false)];
        assert_eq!(match_percentage(&three), 33);
        let three = [item(1, true), item(2, true), item(3, false)];
        assert_eq!(match_percentage(&three), 67);
        let mut eight = vec![item(1, true)];
        eight.extend((0..7).map(|_| item(1, false)));
        assert_eq!(match_percentage(&eight), 13);
    }

    #[test]
    fn difference_is_bank_minus_book() {
        let bank: Money = "15420.75".parse().unwrap();
        let book: Money = "15320.75".parse().unwrap();
        let diff = difference(bank, book);
        assert_eq!(diff, "100.00".parse().unwrap());
        assert_eq!(BalanceStatus::of(diff), BalanceStatus::Over);
        assert_eq!(BalanceStatus::of(difference(book, bank)), BalanceStatus::Short);
        assert_eq!(BalanceStatus::of(difference(bank, bank)), BalanceStatus::Balanced);
    }

    #[test]
    fn difference_at_the_extremes_keeps_its_sign() {
        let min = Money::from_minor(i64::MIN);
        let max = Money::from_minor(i64::MAX);
        assert_eq!(difference(min, Money::from_minor(1)), min);
        assert_eq!(BalanceStatus::of(difference(min, Money::from_minor(1))), BalanceStatus::Short);
        assert_eq!(BalanceStatus::of(difference(max, min)), BalanceStatus::Over);
    }

    proptest! {
        #[test]
        fn percentage_is_within_bounds(flags in prop::collection::vec(any::<bool>(), 0..50)) {
            let items: Vec<_> = flags.iter().map(|m| item(1, *m)).collect();
            let pct = match_percentage(&items);
            prop_assert!(pct <= 100);
            if flags.iter().all(|m| *m) && !flags.is_empty() {
                prop_assert_eq!(pct, 100);
            }
        }

        #[test]
        fn toggling_twice_is_identity(
            flags in prop::collection::vec(any::<bool>(), 1..20),
            pick in any::<prop::sample::Index>(),
        ) {
            let items: Vec<_> = flags.iter().map(|m| item(1, *m)).collect();
            let id = items[pick.index(items.len())].id;
            prop_assert_eq!(toggle_match(&toggle_match(&items, id), id), items);
        }
    }
}
