use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ledgerdesk_core::{entity_id, DomainError, DomainResult, Entity, Money, Timestamps};

entity_id!(
    /// Account identifier.
    AccountId
);

/// High-level account kind (determines normal balance side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

/// Side on which an account's balance normally grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalSide {
    Debit,
    Credit,
}

impl AccountKind {
    /// Chart-of-accounts order.
    pub const ALL: [AccountKind; 5] = [
        AccountKind::Asset,
        AccountKind::Liability,
        AccountKind::Equity,
        AccountKind::Revenue,
        AccountKind::Expense,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Asset => "asset",
            AccountKind::Liability => "liability",
            AccountKind::Equity => "equity",
            AccountKind::Revenue => "revenue",
            AccountKind::Expense => "expense",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Asset => "Asset",
            AccountKind::Liability => "Liability",
            AccountKind::Equity => "Equity",
            AccountKind::Revenue => "Revenue",
            AccountKind::Expense => "Expense",
        }
    }

    pub fn normal_side(&self) -> NormalSide {
        match self {
            AccountKind::Asset | AccountKind::Expense => NormalSide::Debit,
            AccountKind::Liability | AccountKind::Equity | AccountKind::Revenue => {
                NormalSide::Credit
            }
        }
    }
}

impl core::str::FromStr for AccountKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Ok(AccountKind::Asset),
            "liability" => Ok(AccountKind::Liability),
            "equity" => Ok(AccountKind::Equity),
            "revenue" => Ok(AccountKind::Revenue),
            "expense" => Ok(AccountKind::Expense),
            _ => Err(DomainError::validation(
                "kind must be one of: asset, liability, equity, revenue, expense",
            )),
        }
    }
}

/// Chart-of-accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Unique across the chart, e.g. `"1000"`.
    pub code: String,
    pub name: String,
    pub kind: AccountKind,
    /// Free-form grouping below `kind`, e.g. `"Current Assets"`.
    pub subtype: String,
    pub description: Option<String>,
    pub balance: Money,
    pub is_active: bool,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Input for account creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub code: String,
    pub name: String,
    pub kind: AccountKind,
    pub subtype: String,
    pub description: Option<String>,
    pub opening_balance: Money,
    pub is_active: bool,
}

impl NewAccount {
    pub fn new(code: impl Into<String>, name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            kind,
            subtype: String::new(),
            description: None,
            opening_balance: Money::ZERO,
            is_active: true,
        }
    }

    pub fn subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = subtype.into();
        self
    }

    pub fn opening_balance(mut self, balance: Money) -> Self {
        self.opening_balance = balance;
        self
    }
}

/// Partial update. `None` leaves the field untouched; balances are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub kind: Option<AccountKind>,
    pub subtype: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Account {
    pub fn create(new: NewAccount, now: DateTime<Utc>) -> DomainResult<Self> {
        let code = normalize_code(&new.code)?;
        let name = required("account name", &new.name)?;
        let balance = new.opening_balance.ensure_within_limit("opening balance")?;
        if !new.is_active && !balance.is_zero() {
            return Err(DomainError::validation(
                "an inactive account cannot carry an opening balance",
            ));
        }

        Ok(Self {
            id: AccountId::generate(),
            code,
            name,
            kind: new.kind,
            subtype: new.subtype.trim().to_string(),
            description: new.description,
            balance,
            is_active: new.is_active,
            timestamps: Timestamps::new(now),
        })
    }

    /// Merge `patch` into this account. On error `self` is left as it was.
    ///
    /// While the balance is non-zero the kind is fixed and the account cannot
    /// be deactivated: either change would move the balance out of the trial
    /// balance columns it was posted to.
    pub fn apply_patch(&mut self, patch: AccountPatch, now: DateTime<Utc>) -> DomainResult<()> {
        let code = patch.code.as_deref().map(normalize_code).transpose()?;
        let name = patch
            .name
            .as_deref()
            .map(|n| required("account name", n))
            .transpose()?;
        if !self.balance.is_zero() {
            if patch.kind.is_some_and(|kind| kind != self.kind) {
                return Err(DomainError::conflict(format!(
                    "account {} has a balance of {} and its kind cannot change",
                    self.code, self.balance
                )));
            }
            if patch.is_active == Some(false) && self.is_active {
                return Err(DomainError::conflict(format!(
                    "account {} has a balance of {} and cannot be deactivated",
                    self.code, self.balance
                )));
            }
        }

        if let Some(code) = code {
            self.code = code;
        }
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(subtype) = patch.subtype {
            self.subtype = subtype.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        self.timestamps.touch(now);
        Ok(())
    }

    /// Apply one posted journal line to the balance, honoring the normal side.
    ///
    /// Fails, leaving the balance as it was, when the result would exceed
    /// [`Money::MAX_AMOUNT`].
    pub fn apply_posting(
        &mut self,
        debit: Money,
        credit: Money,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let (increase, decrease) = match self.kind.normal_side() {
            NormalSide::Debit => (debit, credit),
            NormalSide::Credit => (credit, debit),
        };
        let balance = self
            .balance
            .checked_add(increase)
            .and_then(|b| b.checked_sub(decrease))
            .filter(|b| b.is_within_limit())
            .ok_or_else(|| {
                DomainError::invariant(format!("balance of account {} is out of range", self.code))
            })?;
        self.balance = balance;
        self.timestamps.touch(now);
        Ok(())
    }
}

/// Account codes are trimmed and must be short, non-empty and free of whitespace.
pub fn normalize_code(code: &str) -> DomainResult<String> {
    let code = code.trim();
    if code.is_empty() {
        return Err(DomainError::validation("account code is required"));
    }
    if code.len() > 20 {
        return Err(DomainError::validation(
            "account code must be at most 20 characters",
        ));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    {
        return Err(DomainError::validation(format!(
            "account code {code:?} may only contain letters, digits, '-' and '.'"
        )));
    }
    Ok(code.to_string())
}

fn required(field: &str, value: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cash() -> Account {
        Account::create(
            NewAccount::new(" 1000 ", "Cash", AccountKind::Asset).subtype("Current Assets"),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn create_trims_code_and_starts_active() {
        let account = cash();
        assert_eq!(account.code, "1000");
        assert!(account.is_active);
        assert_eq!(account.balance, Money::ZERO);
        assert_eq!(account.timestamps.created_at, account.timestamps.updated_at);
    }

    #[test]
    fn create_rejects_blank_code_and_name() {
        let err = Account::create(NewAccount::new("  ", "Cash", AccountKind::Asset), Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = Account::create(NewAccount::new("1000", "", AccountKind::Asset), Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn invalid_patch_leaves_account_untouched() {
        let mut account = cash();
        let before = account.clone();
        let patch = AccountPatch {
            name: Some("Petty Cash".to_string()),
            code: Some("10 00".to_string()),
            ..AccountPatch::default()
        };
        assert!(account.apply_patch(patch, Utc::now()).is_err());
        assert_eq!(account, before);
    }

    #[test]
    fn posting_follows_normal_side() {
        let mut asset = cash();
        asset.apply_posting(Money::from_minor(500), Money::ZERO, Utc::now()).unwrap();
        assert_eq!(asset.balance, Money::from_minor(500));

        let mut revenue = Account::create(
            NewAccount::new("4000", "Sales", AccountKind::Revenue),
            Utc::now(),
        )
        .unwrap();
        revenue.apply_posting(Money::ZERO, Money::from_minor(500), Utc::now()).unwrap();
        assert_eq!(revenue.balance, Money::from_minor(500));
        revenue.apply_posting(Money::from_minor(200), Money::ZERO, Utc::now()).unwrap();
        assert_eq!(revenue.balance, Money::from_minor(300));
    }

    #[test]
    fn posting_past_the_limit_leaves_balance_unchanged() {
        let mut asset = Account::create(
            NewAccount::new("1000", "Cash", AccountKind::Asset).opening_balance(Money::MAX_AMOUNT),
            Utc::now(),
        )
        .unwrap();
        let err = asset
            .apply_posting(Money::from_minor(1), Money::ZERO, Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(asset.balance, Money::MAX_AMOUNT);

        assert!(asset
            .apply_posting(Money::ZERO, Money::from_minor(i64::MAX), Utc::now())
            .is_err());
    }

    #[test]
    fn opening_balance_must_be_within_limit() {
        let err = Account::create(
            NewAccount::new("1000", "Cash", AccountKind::Asset)
                .opening_balance(Money::from_minor(i64::MIN)),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mut dormant = NewAccount::new("1900", "Dormant", AccountKind::Asset)
            .opening_balance(Money::from_minor(100));
        dormant.is_active = false;
        assert!(Account::create(dormant, Utc::now()).is_err());
    }

    #[test]
    fn kind_is_fixed_while_balance_is_non_zero() {
        let mut account = cash();
        account
            .apply_posting(Money::from_minor(2_500), Money::ZERO, Utc::now())
            .unwrap();
        let before = account.clone();

        let patch = AccountPatch {
            kind: Some(AccountKind::Liability),
            ..AccountPatch::default()
        };
        let err = account.apply_patch(patch, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(account, before);

        // Restating the current kind is not a change.
        let patch = AccountPatch {
            kind: Some(AccountKind::Asset),
            name: Some("Cash on Hand".to_string()),
            ..AccountPatch::default()
        };
        account.apply_patch(patch, Utc::now()).unwrap();
        assert_eq!(account.name, "Cash on Hand");
    }

    #[test]
    fn accounts_with_a_balance_cannot_be_deactivated() {
        let mut account = cash();
        account
            .apply_posting(Money::from_minor(2_500), Money::ZERO, Utc::now())
            .unwrap();
        let deactivate = AccountPatch {
            is_active: Some(false),
            ..AccountPatch::default()
        };
        let err = account.apply_patch(deactivate.clone(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(account.is_active);

        let mut empty = cash();
        empty.apply_patch(deactivate, Utc::now()).unwrap();
        assert!(!empty.is_active);
        let reclassify = AccountPatch {
            kind: Some(AccountKind::Expense),
            ..AccountPatch::default()
        };
        empty.apply_patch(reclassify, Utc::now()).unwrap();
        assert_eq!(empty.kind, AccountKind::Expense);
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Asset".parse::<AccountKind>().unwrap(), AccountKind::Asset);
        assert_eq!("EXPENSE".parse::<AccountKind>().unwrap(), AccountKind::Expense);
        assert!("income".parse::<AccountKind>().is_err());
    }
}
