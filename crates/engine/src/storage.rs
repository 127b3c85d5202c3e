//! The persistence port and its implementations.
//!
//! The ledger persists the **whole** record collection on every mutation
//! (full overwrite, never append). The wire shape is [`RecordModel`]: member
//! references are stored as roster codes so the file stays readable and the
//! closed-set check runs again on load.
use std::{cell::RefCell, fs, path::PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    LedgerError, LedgerResult,
    category::{Category, PayMethod},
    error::StorageError,
    record::{ExpenseRecord, Receipt, RecordId},
    roster::Roster,
};

/// Persistence port for the ledger. Injected so the engine can be exercised
/// entirely in memory.
pub trait Storage {
    fn load(&self) -> Result<Vec<RecordModel>, StorageError>;
    fn save(&self, records: &[RecordModel]) -> Result<(), StorageError>;
}

/// Serialized form of one expense record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordModel {
    pub id: u64,
    pub date: NaiveDate,
    pub title: String,
    pub cost: i64,
    pub category: Category,
    pub payer: String,
    pub method: PayMethod,
    pub involved: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<ReceiptModel>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptModel {
    pub label: String,
    pub data: String,
}

impl RecordModel {
    pub(crate) fn from_record(record: &ExpenseRecord, roster: &Roster) -> Self {
        Self {
            id: record.id.0,
            date: record.date,
            title: record.title.clone(),
            cost: record.cost.won(),
            category: record.category,
            payer: roster.code(record.payer).to_string(),
            method: record.method,
            involved: record
                .involved
                .iter()
                .map(|m| roster.code(*m).to_string())
                .collect(),
            receipt: record.receipt.as_ref().map(|r| ReceiptModel {
                label: r.label.clone(),
                data: r.data.clone(),
            }),
        }
    }

    /// Resolves member codes against the roster. An unknown code means the
    /// file does not belong to this trip and is rejected up front.
    pub(crate) fn into_record(self, roster: &Roster) -> LedgerResult<ExpenseRecord> {
        let payer = roster.member(&self.payer)?;
        let mut involved = Vec::with_capacity(self.involved.len());
        for code in &self.involved {
            involved.push(roster.member(code)?);
        }
        involved.sort();
        involved.dedup();
        if involved.is_empty() {
            return Err(LedgerError::Storage(StorageError::Corrupt(format!(
                "record {} has no involved members",
                self.id
            ))));
        }
        if self.cost < 0 {
            return Err(LedgerError::Storage(StorageError::Corrupt(format!(
                "record {} has negative cost",
                self.id
            ))));
        }

        let receipt = match self.receipt {
            Some(model) => Some(Receipt::new(model.label, model.data)?),
            None => None,
        };

        Ok(ExpenseRecord {
            id: RecordId(self.id),
            date: self.date,
            title: self.title,
            cost: self.cost.into(),
            category: self.category,
            payer,
            method: self.method,
            involved,
            receipt,
        })
    }
}

/// Single-document JSON file storage.
///
/// The whole collection lives in one JSON array at a fixed path, the Rust
/// rendition of the original single local-storage key. Writes go through a
/// sibling temp file and a rename so a crash mid-write never truncates the
/// ledger.
#[derive(Debug)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Storage for JsonFile {
    fn load(&self) -> Result<Vec<RecordModel>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, records: &[RecordModel]) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(records)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-process storage for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct Memory {
    records: RefCell<Vec<RecordModel>>,
}

impl Memory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded with existing models, as if a file had been loaded.
    #[must_use]
    pub fn with_records(records: Vec<RecordModel>) -> Self {
        Self {
            records: RefCell::new(records),
        }
    }
}

impl Storage for Memory {
    fn load(&self) -> Result<Vec<RecordModel>, StorageError> {
        Ok(self.records.borrow().clone())
    }

    fn save(&self, records: &[RecordModel]) -> Result<(), StorageError> {
        *self.records.borrow_mut() = records.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::new(["ME", "A"]).unwrap()
    }

    fn model() -> RecordModel {
        RecordModel {
            id: 3,
            date: NaiveDate::from_ymd_opt(2025, 12, 24).unwrap(),
            title: "tickets".to_string(),
            cost: 44000,
            category: Category::Ticket,
            payer: "A".to_string(),
            method: PayMethod::Qr,
            involved: vec!["ME".to_string(), "A".to_string()],
            receipt: None,
        }
    }

    #[test]
    fn model_round_trips_through_record() {
        let roster = roster();
        let record = model().into_record(&roster).unwrap();
        assert_eq!(record.id, RecordId(3));
        assert_eq!(roster.code(record.payer), "A");
        assert_eq!(RecordModel::from_record(&record, &roster), model());
    }

    #[test]
    fn unknown_member_code_is_rejected_on_load() {
        let mut bad = model();
        bad.payer = "Z".to_string();
        assert_eq!(
            bad.into_record(&roster()),
            Err(LedgerError::UnknownMember("Z".to_string()))
        );
    }

    #[test]
    fn json_file_round_trips_and_survives_missing_file() {
        let dir = std::env::temp_dir().join(format!("moim_storage_{}", std::process::id()));
        let storage = JsonFile::new(dir.join("ledger.json"));

        assert_eq!(storage.load().unwrap(), Vec::new());
        storage.save(&[model()]).unwrap();
        assert_eq!(storage.load().unwrap(), vec![model()]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
