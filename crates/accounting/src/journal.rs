use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use ledgerdesk_core::{entity_id, DomainError, DomainResult, Entity, Money, Timestamps};

entity_id!(
    /// Journal entry identifier.
    JournalEntryId
);

/// Journal entry lifecycle. `Posted` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    Draft,
    Posted,
    Rejected,
}

impl JournalStatus {
    pub const ALL: [JournalStatus; 3] = [
        JournalStatus::Draft,
        JournalStatus::Posted,
        JournalStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JournalStatus::Draft => "draft",
            JournalStatus::Posted => "posted",
            JournalStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JournalStatus::Draft => "Draft",
            JournalStatus::Posted => "Posted",
            JournalStatus::Rejected => "Rejected",
        }
    }
}

impl core::str::FromStr for JournalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(JournalStatus::Draft),
            "posted" => Ok(JournalStatus::Posted),
            "rejected" => Ok(JournalStatus::Rejected),
            _ => Err(DomainError::validation(
                "status must be one of: draft, posted, rejected",
            )),
        }
    }
}

/// One debit/credit line. Amounts are non-negative minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    pub account_code: String,
    pub description: Option<String>,
    pub debit: Money,
    pub credit: Money,
}

impl JournalLine {
    pub fn debit(account_code: impl Into<String>, amount: Money) -> Self {
        Self {
            account_code: account_code.into(),
            description: None,
            debit: amount,
            credit: Money::ZERO,
        }
    }

    pub fn credit(account_code: impl Into<String>, amount: Money) -> Self {
        Self {
            account_code: account_code.into(),
            description: None,
            debit: Money::ZERO,
            credit: amount,
        }
    }
}

/// Sum of debits and sum of credits, in that order.
///
/// Fails with a validation error when either sum leaves the `i64` range.
pub fn totals(lines: &[JournalLine]) -> DomainResult<(Money, Money)> {
    let overflow = || DomainError::validation("journal line totals are out of range");
    let debit = Money::checked_sum(lines.iter().map(|l| l.debit)).ok_or_else(overflow)?;
    let credit = Money::checked_sum(lines.iter().map(|l| l.credit)).ok_or_else(overflow)?;
    Ok((debit, credit))
}

/// `true` iff total debits equal total credits and the total is non-zero.
/// Lines whose totals overflow are never balanced.
pub fn is_balanced(lines: &[JournalLine]) -> bool {
    match totals(lines) {
        Ok((debit, credit)) => debit == credit && debit.is_positive(),
        Err(_) => false,
    }
}

/// Structural checks on lines (balance is checked separately on posting).
pub fn validate_lines(lines: &[JournalLine]) -> DomainResult<()> {
    if lines.is_empty() {
        return Err(DomainError::validation("journal entry must have lines"));
    }

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        if line.account_code.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "line {line_no}: account code is required"
            )));
        }
        if line.debit.is_negative() || line.credit.is_negative() {
            return Err(DomainError::validation(format!(
                "line {line_no}: amounts must not be negative"
            )));
        }
        if line.debit.is_zero() && line.credit.is_zero() {
            return Err(DomainError::validation(format!(
                "line {line_no}: either debit or credit must be set"
            )));
        }
        line.debit.ensure_within_limit(&format!("line {line_no}: debit"))?;
        line.credit.ensure_within_limit(&format!("line {line_no}: credit"))?;
    }

    totals(lines).map(|_| ())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: JournalEntryId,
    pub date: NaiveDate,
    pub reference: String,
    pub description: String,
    pub status: JournalStatus,
    pub lines: Vec<JournalLine>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Input for journal entry creation.
///
/// `status` may be `Draft` or `Posted`; posting is performed by the store
/// because it touches account balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJournalEntry {
    pub date: NaiveDate,
    pub reference: Option<String>,
    pub description: String,
    pub lines: Vec<JournalLine>,
    pub status: JournalStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalPatch {
    pub date: Option<NaiveDate>,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub lines: Option<Vec<JournalLine>>,
}

impl Entity for JournalEntry {
    type Id = JournalEntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl JournalEntry {
    /// Build a draft entry. `reference` is resolved by the caller (the store
    /// numbers entries that arrive without one).
    pub fn draft(new: NewJournalEntry, reference: String, now: DateTime<Utc>) -> DomainResult<Self> {
        if new.status == JournalStatus::Rejected {
            return Err(DomainError::validation(
                "journal entry cannot be created as rejected",
            ));
        }
        validate_lines(&new.lines)?;

        Ok(Self {
            id: JournalEntryId::generate(),
            date: new.date,
            reference,
            description: new.description.trim().to_string(),
            status: JournalStatus::Draft,
            lines: new.lines,
            timestamps: Timestamps::new(now),
        })
    }

    /// Debit and credit totals for display. Saturates instead of failing;
    /// [`totals`] gives the checked figures.
    pub fn totals(&self) -> (Money, Money) {
        let debit = self.lines.iter().map(|l| l.debit).sum();
        let credit = self.lines.iter().map(|l| l.credit).sum();
        (debit, credit)
    }

    pub fn is_balanced(&self) -> bool {
        is_balanced(&self.lines)
    }

    fn ensure_draft(&self) -> DomainResult<()> {
        if self.status != JournalStatus::Draft {
            return Err(DomainError::conflict(format!(
                "journal entry {} is {} and can no longer change",
                self.reference,
                self.status.as_str()
            )));
        }
        Ok(())
    }

    pub fn apply_patch(&mut self, patch: JournalPatch, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_draft()?;
        if let Some(lines) = &patch.lines {
            validate_lines(lines)?;
        }
        if let Some(reference) = &patch.reference {
            if reference.trim().is_empty() {
                return Err(DomainError::validation("reference must not be blank"));
            }
        }

        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(reference) = patch.reference {
            self.reference = reference.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(lines) = patch.lines {
            self.lines = lines;
        }
        self.timestamps.touch(now);
        Ok(())
    }

    /// Checks that do not depend on the chart of accounts.
    pub fn ensure_postable(&self) -> DomainResult<()> {
        self.ensure_draft()?;
        validate_lines(&self.lines)?;
        if !self.is_balanced() {
            return Err(DomainError::invariant("debits must equal credits"));
        }
        Ok(())
    }

    pub fn mark_posted(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_postable()?;
        self.status = JournalStatus::Posted;
        self.timestamps.touch(now);
        Ok(())
    }

    pub fn reject(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_draft()?;
        self.status = JournalStatus::Rejected;
        self.timestamps.touch(now);
        Ok(())
    }
}
