#![cfg(feature = "calamine")]

use crate::traits::{CellData, SheetData, SpreadsheetReader};
use parking_lot::RwLock;
use sheetpivot_common::{CellErrorKind, LiteralValue};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx, open_workbook};

/// Read-only xlsx backend. The file handle lives inside the adapter and is
/// released when the adapter is dropped.
pub struct CalamineAdapter {
    workbook: RwLock<Xlsx<BufReader<File>>>,
}

impl CalamineAdapter {
    fn convert_value(data: &Data) -> LiteralValue {
        match data {
            Data::Empty => LiteralValue::Empty,
            Data::String(s) => LiteralValue::Text(s.clone()),
            Data::Float(f) => LiteralValue::Number(*f),
            Data::Int(i) => LiteralValue::Int(*i),
            Data::Bool(b) => LiteralValue::Boolean(*b),
            Data::Error(e) => {
                let kind = match e {
                    calamine::CellErrorType::Div0 => CellErrorKind::Div,
                    calamine::CellErrorType::NA => CellErrorKind::Na,
                    calamine::CellErrorType::Name => CellErrorKind::Name,
                    calamine::CellErrorType::Null => CellErrorKind::Null,
                    calamine::CellErrorType::Num => CellErrorKind::Num,
                    calamine::CellErrorType::Ref => CellErrorKind::Ref,
                    _ => CellErrorKind::Value,
                };
                LiteralValue::Error(kind)
            }
            // Excel serial number; grouping keys render it like any number.
            Data::DateTime(dt) => LiteralValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) => LiteralValue::Text(s.clone()),
            Data::DurationIso(s) => LiteralValue::Text(s.clone()),
        }
    }

    fn range_to_cells(range: &Range<Data>) -> BTreeMap<(u32, u32), CellData> {
        let mut cells = BTreeMap::new();
        let (start_row, start_col) = range.start().unwrap_or_default();

        for (row, col, val) in range.used_cells() {
            // calamine is 0-based and relative to the range start
            let excel_row = row as u32 + start_row + 1;
            let excel_col = col as u32 + start_col + 1;

            let value = match val {
                Data::Empty => None,
                Data::String(s) if s.is_empty() => None,
                _ => Some(Self::convert_value(val)),
            };

            if let Some(value) = value {
                cells.insert(
                    (excel_row, excel_col),
                    CellData {
                        value: Some(value),
                        formula: None,
                    },
                );
            }
        }
        cells
    }
}

impl SpreadsheetReader for CalamineAdapter {
    type Error = calamine::Error;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.workbook.read().sheet_names().to_vec())
    }

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let workbook: Xlsx<BufReader<File>> = open_workbook(path)?;
        Ok(Self {
            workbook: RwLock::new(workbook),
        })
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetData, Self::Error> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("io_read_sheet", backend = "calamine", sheet).entered();

        let range = self.workbook.write().worksheet_range(sheet)?;
        Ok(SheetData {
            cells: Self::range_to_cells(&range),
        })
    }
}
