//! The authoritative expense collection for one trip.
use chrono::NaiveDate;

use crate::{
    LedgerError, LedgerResult,
    error::StorageError,
    record::{DateFilter, ExpenseDraft, ExpenseRecord, RecordId},
    roster::Roster,
    storage::{RecordModel, Storage},
};

/// Result of the persistence side effect of a mutation.
///
/// A failed persist never rolls back the in-memory mutation: the in-memory
/// collection stays the source of truth for the session and the caller
/// decides how loudly to surface the warning.
#[derive(Debug)]
pub enum PersistOutcome {
    Saved,
    Warned(StorageError),
}

impl PersistOutcome {
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, PersistOutcome::Saved)
    }
}

/// Ordered collection of [`ExpenseRecord`]s plus the roster and the storage
/// port. All derived views (summary, balances, settlement) are recomputed
/// from scratch on demand; nothing is cached.
pub struct Ledger {
    roster: Roster,
    records: Vec<ExpenseRecord>,
    next_id: u64,
    storage: Box<dyn Storage>,
}

impl Ledger {
    /// Opens a ledger: loads the stored collection through the port and
    /// resolves every record against the roster. A file that references
    /// unknown members or is otherwise malformed is rejected here, before
    /// any operation can run on it.
    pub fn open(roster: Roster, storage: Box<dyn Storage>) -> LedgerResult<Self> {
        let models = storage.load()?;
        let mut records = Vec::with_capacity(models.len());
        let mut max_id = 0;
        for model in models {
            let record = model.into_record(&roster)?;
            max_id = max_id.max(record.id.0);
            records.push(record);
        }
        tracing::debug!(records = records.len(), "ledger loaded");

        Ok(Self {
            roster,
            records,
            next_id: max_id + 1,
            storage,
        })
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The full collection in insertion order.
    #[must_use]
    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    /// Records matching the date filter, insertion order preserved.
    pub fn filtered(&self, filter: DateFilter) -> impl Iterator<Item = &ExpenseRecord> {
        self.records
            .iter()
            .filter(move |record| filter.matches(record.date))
    }

    /// Distinct dates appearing in the collection, ascending.
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.records.iter().map(|record| record.date).collect();
        dates.sort();
        dates.dedup();
        dates
    }

    pub fn record(&self, id: RecordId) -> LedgerResult<&ExpenseRecord> {
        self.records
            .iter()
            .find(|record| record.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    /// Validates the draft, assigns a fresh id strictly greater than any
    /// previously issued, appends the record and persists.
    pub fn add(&mut self, draft: ExpenseDraft) -> LedgerResult<(RecordId, PersistOutcome)> {
        let draft = draft.validated()?;
        let id = RecordId(self.next_id);
        self.next_id += 1;
        self.records.push(ExpenseRecord::from_draft(id, draft));
        tracing::debug!(%id, "expense added");
        Ok((id, self.persist()))
    }

    /// Replaces every field of the record matching `id`, preserving the id.
    pub fn edit(&mut self, id: RecordId, draft: ExpenseDraft) -> LedgerResult<PersistOutcome> {
        let draft = draft.validated()?;
        match self.records.iter().position(|record| record.id == id) {
            Some(index) => {
                self.records[index] = ExpenseRecord::from_draft(id, draft);
                tracing::debug!(%id, "expense edited");
                Ok(self.persist())
            }
            None => Err(LedgerError::NotFound(id.to_string())),
        }
    }

    /// Removes the record matching `id`; the collection shrinks by exactly
    /// one.
    pub fn delete(&mut self, id: RecordId) -> LedgerResult<PersistOutcome> {
        match self.records.iter().position(|record| record.id == id) {
            Some(index) => {
                self.records.remove(index);
                tracing::debug!(%id, "expense deleted");
                Ok(self.persist())
            }
            None => Err(LedgerError::NotFound(id.to_string())),
        }
    }

    /// Full overwrite of the stored collection.
    fn persist(&self) -> PersistOutcome {
        let models: Vec<RecordModel> = self
            .records
            .iter()
            .map(|record| RecordModel::from_record(record, &self.roster))
            .collect();
        match self.storage.save(&models) {
            Ok(()) => PersistOutcome::Saved,
            Err(err) => {
                tracing::warn!(error = %err, "ledger not persisted; in-memory state kept");
                PersistOutcome::Warned(err)
            }
        }
    }
}
