use crate::error::IoError;
use crate::traits::{SheetData, SpreadsheetReader};
use sheetpivot_common::LiteralValue;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone)]
pub struct LoaderStats {
    pub cells_loaded: usize,
    pub rows_loaded: usize,
    pub load_time_ms: u64,
    pub backend_read_time_ms: u64,
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// One header row plus the data rows beneath it.
#[derive(Debug, Clone, Default)]
pub struct LoadedTable {
    pub sheet: String,
    pub header_row: u32,
    /// Header name -> 1-based column. The first occurrence of a name wins.
    pub columns: BTreeMap<String, u32>,
    /// `(row number, cells by column)` for every row below the header.
    pub rows: Vec<(u32, BTreeMap<u32, LiteralValue>)>,
}

impl LoadedTable {
    pub fn column(&self, name: &str) -> Option<u32> {
        self.columns.get(name.trim()).copied()
    }

    pub fn header_names(&self) -> Vec<&str> {
        let mut by_col: Vec<(&u32, &String)> = self.columns.iter().map(|(k, v)| (v, k)).collect();
        by_col.sort();
        by_col.into_iter().map(|(_, name)| name.as_str()).collect()
    }
}

/// Pulls a header-and-rows table out of one sheet of any reader backend.
pub struct TableLoader<B: SpreadsheetReader> {
    backend: B,
    stats: LoaderStats,
}

impl<B: SpreadsheetReader> TableLoader<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            stats: LoaderStats::default(),
        }
    }

    pub fn stats(&self) -> &LoaderStats {
        &self.stats
    }

    /// Resolve the requested sheet, or the first sheet when `None`.
    pub fn resolve_sheet(&self, sheet: Option<&str>) -> Result<String, IoError> {
        let names = self
            .backend
            .sheet_names()
            .map_err(|e| IoError::from_backend("backend", e))?;
        match sheet {
            Some(name) => names
                .into_iter()
                .find(|n| n == name)
                .ok_or_else(|| IoError::SheetNotFound(name.to_string())),
            None => names.into_iter().next().ok_or(IoError::NoSheets),
        }
    }

    /// Load `sheet` (or the first sheet). The first non-empty row is the
    /// header; every later row that has at least one non-blank cell is data.
    pub fn load_table(&mut self, sheet: Option<&str>) -> Result<LoadedTable, IoError> {
        let start = Instant::now();
        let name = self.resolve_sheet(sheet)?;

        let t_read = Instant::now();
        let data = self
            .backend
            .read_sheet(&name)
            .map_err(|e| IoError::from_backend("backend", e))?;
        self.stats.backend_read_time_ms += millis(t_read.elapsed());
        self.stats.cells_loaded += data.cells.len();

        let table = Self::split_header(&name, data)?;
        self.stats.rows_loaded += table.rows.len();
        self.stats.load_time_ms = millis(start.elapsed());
        Ok(table)
    }

    fn split_header(sheet: &str, data: SheetData) -> Result<LoadedTable, IoError> {
        let mut by_row: BTreeMap<u32, BTreeMap<u32, LiteralValue>> = BTreeMap::new();
        for ((row, col), cell) in data.cells {
            if let Some(value) = cell.value {
                if !value.is_blank() {
                    by_row.entry(row).or_default().insert(col, value);
                }
            }
        }

        let mut rows = by_row.into_iter();
        let (header_row, header_cells) = rows
            .next()
            .ok_or_else(|| IoError::MissingHeader(sheet.to_string()))?;

        let mut columns = BTreeMap::new();
        for (col, value) in header_cells {
            columns.entry(value.to_key()).or_insert(col);
        }

        Ok(LoadedTable {
            sheet: sheet.to_string(),
            header_row,
            columns,
            rows: rows.collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::CellData;
    use std::path::Path;
    use std::time::Duration;

    #[derive(Debug, thiserror::Error)]
    #[error("in-memory backend")]
    struct NoError;

    struct MemoryBackend {
        sheets: Vec<(String, SheetData)>,
        read_delay: Option<Duration>,
    }

    impl MemoryBackend {
        fn new(sheets: Vec<(String, SheetData)>) -> Self {
            Self {
                sheets,
                read_delay: None,
            }
        }
    }

    impl SpreadsheetReader for MemoryBackend {
        type Error = NoError;

        fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
            Ok(self.sheets.iter().map(|(n, _)| n.clone()).collect())
        }

        fn open_path<P: AsRef<Path>>(_path: P) -> Result<Self, Self::Error> {
            Err(NoError)
        }

        fn read_sheet(&mut self, sheet: &str) -> Result<SheetData, Self::Error> {
            if let Some(delay) = self.read_delay {
                std::thread::sleep(delay);
            }
            self.sheets
                .iter()
                .find(|(n, _)| n == sheet)
                .map(|(_, d)| d.clone())
                .ok_or(NoError)
        }
    }

    fn sheet(cells: &[((u32, u32), LiteralValue)]) -> SheetData {
        let mut data = SheetData::default();
        for (pos, v) in cells {
            data.cells.insert(
                *pos,
                CellData {
                    value: Some(v.clone()),
                    formula: None,
                },
            );
        }
        data
    }

    #[test]
    fn first_non_empty_row_is_the_header() {
        let data = sheet(&[
            ((2, 1), "Gender".into()),
            ((2, 2), "Total".into()),
            ((2, 3), "Total".into()),
            ((3, 1), "Female".into()),
            ((3, 2), 10.5.into()),
            ((5, 2), 4.0.into()),
        ]);
        let mut loader = TableLoader::new(MemoryBackend::new(vec![("Sheet1".into(), data)]));
        let table = loader.load_table(None).unwrap();
        assert_eq!(table.header_row, 2);
        assert_eq!(table.column("Gender"), Some(1));
        assert_eq!(table.column("Total"), Some(2), "first duplicate wins");
        assert_eq!(table.header_names(), vec!["Gender", "Total"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].0, 5);
        assert_eq!(loader.stats().rows_loaded, 2);
    }

    #[test]
    fn named_sheet_must_exist() {
        let data = sheet(&[((1, 1), "A".into())]);
        let mut loader = TableLoader::new(MemoryBackend::new(vec![("Data".into(), data)]));
        let err = loader.load_table(Some("Missing")).unwrap_err();
        assert!(matches!(err, IoError::SheetNotFound(ref s) if s == "Missing"));
    }

    #[test]
    fn empty_sheet_has_no_header() {
        let empty = vec![("Data".into(), SheetData::default())];
        let mut loader = TableLoader::new(MemoryBackend::new(empty));
        assert!(matches!(
            loader.load_table(None),
            Err(IoError::MissingHeader(_))
        ));
        let mut none = TableLoader::new(MemoryBackend::new(vec![]));
        assert!(matches!(none.load_table(None), Err(IoError::NoSheets)));
    }

    #[test]
    fn load_time_is_the_measured_duration() {
        assert_eq!(millis(Duration::ZERO), 0);
        assert_eq!(millis(Duration::from_micros(900)), 0);
        assert_eq!(millis(Duration::from_millis(42)), 42);

        let data = sheet(&[((1, 1), "A".into())]);
        let mut backend = MemoryBackend::new(vec![("Data".into(), data)]);
        backend.read_delay = Some(Duration::from_millis(25));
        let mut loader = TableLoader::new(backend);
        loader.load_table(None).unwrap();
        let stats = loader.stats();
        assert!(stats.backend_read_time_ms >= 25);
        assert!(stats.load_time_ms >= stats.backend_read_time_ms);
    }
}
