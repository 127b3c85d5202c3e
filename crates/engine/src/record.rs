//! The module contains the `ExpenseRecord` type, one paid transaction in the
//! shared ledger, plus its input shape `ExpenseDraft`.
use core::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    LedgerError, LedgerResult,
    category::{Category, PayMethod},
    money::MoneyWon,
    roster::{MemberId, Roster},
};

/// Unique record identifier, strictly increasing within one ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Date scope for the visible ledger view.
///
/// Filtering applies to the ledger listing, totals and category stats only;
/// member balances are always trip-wide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    All,
    On(NaiveDate),
}

impl DateFilter {
    #[must_use]
    pub fn matches(self, date: NaiveDate) -> bool {
        match self {
            DateFilter::All => true,
            DateFilter::On(day) => day == date,
        }
    }
}

/// Opaque receipt attachment: a base64 payload with a label.
///
/// The payload must decode as base64 on input; beyond that the engine never
/// looks at it and no computation depends on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub label: String,
    pub data: String,
}

impl Receipt {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> LedgerResult<Self> {
        let data = data.into();
        STANDARD
            .decode(&data)
            .map_err(|_| LedgerError::Validation("receipt is not valid base64".to_string()))?;
        Ok(Self {
            label: label.into(),
            data,
        })
    }
}

/// Input shape for add/edit: an `ExpenseRecord` without an id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub date: NaiveDate,
    pub title: String,
    pub cost: MoneyWon,
    pub category: Category,
    pub payer: MemberId,
    pub method: PayMethod,
    pub involved: Vec<MemberId>,
    pub receipt: Option<Receipt>,
}

impl ExpenseDraft {
    /// Validates the draft and normalizes `involved` (sorted to roster
    /// order, deduplicated). Called by the ledger before any mutation.
    pub(crate) fn validated(mut self) -> LedgerResult<Self> {
        if self.title.trim().is_empty() {
            return Err(LedgerError::Validation("title is required".to_string()));
        }
        if self.cost.is_negative() {
            return Err(LedgerError::Validation(format!(
                "cost must be non-negative, got {}",
                self.cost
            )));
        }
        if self.involved.is_empty() {
            return Err(LedgerError::Validation(
                "at least one involved member is required".to_string(),
            ));
        }
        self.involved.sort();
        self.involved.dedup();
        Ok(self)
    }
}

/// One paid transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseRecord {
    pub id: RecordId,
    pub date: NaiveDate,
    pub title: String,
    pub cost: MoneyWon,
    pub category: Category,
    pub payer: MemberId,
    pub method: PayMethod,
    pub involved: Vec<MemberId>,
    pub receipt: Option<Receipt>,
}

impl ExpenseRecord {
    pub(crate) fn from_draft(id: RecordId, draft: ExpenseDraft) -> Self {
        Self {
            id,
            date: draft.date,
            title: draft.title,
            cost: draft.cost,
            category: draft.category,
            payer: draft.payer,
            method: draft.method,
            involved: draft.involved,
            receipt: draft.receipt,
        }
    }

    /// `true` when every roster member shares this cost; displayed as `ALL`
    /// but computed identically to any other involved set.
    #[must_use]
    pub fn involves_all(&self, roster: &Roster) -> bool {
        self.involved.len() == roster.len()
    }

    /// Each involved member's fair portion: floor division of the cost.
    #[must_use]
    pub fn share(&self) -> MoneyWon {
        MoneyWon::new(self.cost.won() / self.involved.len() as i64)
    }
}
