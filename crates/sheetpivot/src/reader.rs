//! Tabular Reader: input workbook -> ordered records.

use crate::config::PivotFields;
use crate::error::ReportError;
use sheetpivot_common::LiteralValue;
use sheetpivot_io::{CalamineAdapter, IoError, LoadedTable, SpreadsheetReader, TableLoader};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// One input row, keyed by header name. Blank cells are absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 1-based worksheet row the record was read from.
    pub row: u32,
    fields: BTreeMap<String, LiteralValue>,
}

impl Record {
    pub fn new(row: u32) -> Self {
        Self {
            row,
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<LiteralValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&LiteralValue> {
        self.fields.get(field)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub sheet: String,
    pub records: Vec<Record>,
}

/// Read every data row of the input workbook. The three pivot fields must
/// appear in the header row.
pub fn read_records(
    path: &Path,
    sheet: Option<&str>,
    fields: PivotFields<'_>,
) -> Result<RecordSet, ReportError> {
    // Unreadable paths surface before calamine gets a chance to guess.
    std::fs::metadata(path).map_err(|e| ReportError::InputNotFound {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let backend = CalamineAdapter::open_path(path).map_err(|e| ReportError::InputNotFound {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut loader = TableLoader::new(backend);
    let table = loader.load_table(sheet).map_err(|e| match e {
        IoError::SheetNotFound(_) | IoError::NoSheets | IoError::MissingHeader(_) => {
            ReportError::Schema(e.to_string())
        }
        other => ReportError::InputNotFound {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    })?;
    let set = records_from_table(&table, fields)?;

    let stats = loader.stats();
    info!(
        sheet = %set.sheet,
        records = set.records.len(),
        rows = stats.rows_loaded,
        cells = stats.cells_loaded,
        backend_read_ms = stats.backend_read_time_ms,
        elapsed_ms = stats.load_time_ms,
        "read input"
    );
    for record in set.records.iter().take(5) {
        debug!(row = record.row, fields = ?record.fields, "record");
    }
    Ok(set)
}

/// Convert a loaded table into records after checking the required headers.
pub fn records_from_table(
    table: &LoadedTable,
    fields: PivotFields<'_>,
) -> Result<RecordSet, ReportError> {
    let missing: Vec<&str> = [fields.group, fields.category, fields.value]
        .into_iter()
        .filter(|f| table.column(f).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(ReportError::Schema(format!(
            "sheet `{}` is missing required column(s) {}; found {}",
            table.sheet,
            quoted(&missing),
            quoted(&table.header_names())
        )));
    }

    let records = table
        .rows
        .iter()
        .map(|(row, cells)| {
            let mut record = Record::new(*row);
            for (name, col) in &table.columns {
                if let Some(value) = cells.get(col) {
                    record.fields.insert(name.clone(), value.clone());
                }
            }
            record
        })
        .collect();

    Ok(RecordSet {
        sheet: table.sheet.clone(),
        records,
    })
}

fn quoted(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!("`{n}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
