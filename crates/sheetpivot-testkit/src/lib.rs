//! Fixture workbooks for tests. Every fixture lives in its own temporary
//! directory that is removed when the [`Fixture`] is dropped.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use umya_spreadsheet::Spreadsheet;

/// Column headers of the stock sales export.
pub const SALES_HEADERS: [&str; 3] = ["Gender", "Product line", "Total"];

pub struct Fixture {
    dir: TempDir,
    path: PathBuf,
}

impl Fixture {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A path next to the fixture that does not exist yet.
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Build `input.xlsx` from a fresh umya workbook (which starts with `Sheet1`).
pub fn build_workbook<F: FnOnce(&mut Spreadsheet)>(f: F) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("input.xlsx");
    let mut book = umya_spreadsheet::new_file();
    f(&mut book);
    umya_spreadsheet::writer::xlsx::write(&book, &path).expect("write fixture workbook");
    Fixture { dir, path }
}

/// A cell of a fixture row.
#[derive(Clone, Debug)]
pub enum Cell {
    Text(&'static str),
    Number(f64),
    Blank,
}

/// Write `headers` into row 1 and `rows` below it on `Sheet1`.
pub fn table_workbook(headers: &[&str], rows: &[Vec<Cell>]) -> Fixture {
    let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let rows = rows.to_vec();
    build_workbook(move |book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").expect("default sheet");
        for (i, h) in headers.iter().enumerate() {
            sh.get_cell_mut((i as u32 + 1, 1)).set_value(h.clone());
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let pos = (c as u32 + 1, r as u32 + 2);
                match cell {
                    Cell::Text(s) => {
                        sh.get_cell_mut(pos).set_value(*s);
                    }
                    Cell::Number(n) => {
                        sh.get_cell_mut(pos).set_value_number(*n);
                    }
                    Cell::Blank => {}
                }
            }
        }
    })
}

/// Sales export with the stock headers `Gender`, `Product line`, `Total`.
pub fn sales_workbook(rows: &[(&'static str, &'static str, f64)]) -> Fixture {
    let rows: Vec<Vec<Cell>> = rows
        .iter()
        .map(|(g, p, t)| vec![Cell::Text(g), Cell::Text(p), Cell::Number(*t)])
        .collect();
    table_workbook(&SALES_HEADERS, &rows)
}
