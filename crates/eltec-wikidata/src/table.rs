//! TSV metadata table I/O

use std::path::Path;

use anyhow::{Context, Result};
use csv::StringRecord;

use crate::config::Columns;

/// Header appended for the resolved author QID.
pub const AUTHOR_QID_COLUMN: &str = "author_wikidata_id";
/// Header appended for the resolved work QID.
pub const WORK_QID_COLUMN: &str = "work_wikidata_id";

/// Whole input table, all cells as text.
#[derive(Debug)]
pub struct Table {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
}

/// Borrowed view of the four cells the pipeline reads from a row.
///
/// A column missing from the header reads as `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Record<'a> {
    pub author_name: Option<&'a str>,
    pub author_ids: Option<&'a str>,
    pub title: Option<&'a str>,
    pub title_ids: Option<&'a str>,
}

/// QIDs resolved for one row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedIds {
    pub author: Option<String>,
    pub work: Option<String>,
}

/// Header positions of the configured columns.
#[derive(Debug, Clone, Copy)]
pub struct ColumnIndex {
    author_name: Option<usize>,
    author_ids: Option<usize>,
    title: Option<usize>,
    title_ids: Option<usize>,
}

impl ColumnIndex {
    pub fn new(headers: &StringRecord, columns: &Columns) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let index = Self {
            author_name: find(&columns.author_name),
            author_ids: find(&columns.author_ids),
            title: find(&columns.title),
            title_ids: find(&columns.title_ids),
        };
        for (name, pos) in [
            (&columns.author_ids, index.author_ids),
            (&columns.title, index.title),
            (&columns.title_ids, index.title_ids),
        ] {
            if pos.is_none() {
                log::warn!("Column {name:?} not found in input; treating as empty");
            }
        }
        index
    }

    pub fn record<'a>(&self, row: &'a StringRecord) -> Record<'a> {
        let cell = |pos: Option<usize>| pos.and_then(|i| row.get(i));
        Record {
            author_name: cell(self.author_name),
            author_ids: cell(self.author_ids),
            title: cell(self.title),
            title_ids: cell(self.title_ids),
        }
    }
}

/// Read a tab-separated file with a header row.
pub fn read_tsv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("Cannot open {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Cannot read header of {}", path.display()))?
        .clone();
    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Malformed TSV in {}", path.display()))?;
    Ok(Table { headers, rows })
}

/// Write `table` with the two QID columns appended, one entry of `ids` per row.
pub fn write_tsv(path: &Path, table: &Table, ids: &[ResolvedIds]) -> Result<()> {
    anyhow::ensure!(
        table.rows.len() == ids.len(),
        "Row count mismatch: {} rows, {} results",
        table.rows.len(),
        ids.len()
    );
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;

    let mut header = table.headers.clone();
    header.push_field(AUTHOR_QID_COLUMN);
    header.push_field(WORK_QID_COLUMN);
    writer.write_record(&header)?;

    for (row, resolved) in table.rows.iter().zip(ids) {
        let mut out = row.clone();
        out.push_field(resolved.author.as_deref().unwrap_or(""));
        out.push_field(resolved.work.as_deref().unwrap_or(""));
        writer.write_record(&out)?;
    }
    writer
        .flush()
        .with_context(|| format!("Cannot write {}", path.display()))?;
    Ok(())
}
