//! CSV export of the visible ledger.
use std::io::Write;

use chrono::NaiveDate;
use csv::Writer;
use serde::Serialize;

use crate::{LedgerResult, error::StorageError, ledger::Ledger, record::DateFilter};

#[derive(Serialize)]
struct CsvRow<'a> {
    id: u64,
    date: NaiveDate,
    title: &'a str,
    cost: i64,
    category: &'a str,
    payer: &'a str,
    method: &'a str,
    involved: String,
}

/// Writes the filtered ledger as CSV, one row per record in insertion order.
///
/// Involved members are joined with `+` (`ME+A+B`); receipts are not
/// exported.
pub fn export_csv<W: Write>(ledger: &Ledger, filter: DateFilter, writer: W) -> LedgerResult<()> {
    let roster = ledger.roster();
    let mut out = Writer::from_writer(writer);

    for record in ledger.filtered(filter) {
        let involved: Vec<&str> = record
            .involved
            .iter()
            .map(|member| roster.code(*member))
            .collect();
        out.serialize(CsvRow {
            id: record.id.0,
            date: record.date,
            title: &record.title,
            cost: record.cost.won(),
            category: record.category.code(),
            payer: roster.code(record.payer),
            method: record.method.code(),
            involved: involved.join("+"),
        })
        .map_err(StorageError::from)?;
    }

    out.flush().map_err(StorageError::from)?;
    Ok(())
}
