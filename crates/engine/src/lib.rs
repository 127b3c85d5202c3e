//! Shared trip-expense engine.
//!
//! One trip has a fixed [`Roster`] of members and a [`Ledger`] of
//! [`ExpenseRecord`]s. The ledger owns the authoritative collection and a
//! pluggable [`Storage`] port; every derived view — [`Summary`],
//! [`MemberBalance`]s, [`CategoryBreakdown`]s and the settlement
//! [`Transfer`] list — is recomputed in full from the current collection, so
//! reads stay consistent at the cost of O(n) per mutation.
pub use category::{Category, PayMethod};
pub use error::{LedgerError, StorageError};
pub use export::export_csv;
pub use ledger::{Ledger, PersistOutcome};
pub use money::MoneyWon;
pub use record::{DateFilter, ExpenseDraft, ExpenseRecord, Receipt, RecordId};
pub use roster::{MAX_MEMBERS, MemberId, Roster};
pub use settlement::{Direction, SettlementLine, Transfer, settle, settlement_for};
pub use stats::{CategoryBreakdown, MemberBalance, Summary};
pub use storage::{JsonFile, Memory, RecordModel, ReceiptModel, Storage};

mod category;
mod error;
mod export;
mod ledger;
mod money;
mod record;
mod roster;
mod settlement;
mod stats;
mod storage;

pub type LedgerResult<T> = Result<T, LedgerError>;
