use sheetpivot_common::{CellRef, LiteralValue, RangeAddress};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellData {
    pub value: Option<LiteralValue>,
    pub formula: Option<String>,
}

impl CellData {
    pub fn from_value<V: Into<LiteralValue>>(value: V) -> Self {
        Self {
            value: Some(value.into()),
            formula: None,
        }
    }

    /// Formula text, with or without the leading `=`.
    pub fn from_formula(formula: impl Into<String>) -> Self {
        Self {
            value: None,
            formula: Some(formula.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        let no_value = self.value.as_ref().map(|v| v.is_blank()).unwrap_or(true);
        let no_formula = self.formula.as_deref().map(str::is_empty).unwrap_or(true);
        no_value && no_formula
    }
}

/// All non-empty cells of one sheet, keyed by 1-based `(row, col)`.
#[derive(Clone, Debug, Default)]
pub struct SheetData {
    pub cells: BTreeMap<(u32, u32), CellData>,
}

impl SheetData {
    pub fn value(&self, row: u32, col: u32) -> Option<&LiteralValue> {
        self.cells.get(&(row, col)).and_then(|c| c.value.as_ref())
    }

    pub fn formula(&self, row: u32, col: u32) -> Option<&str> {
        self.cells
            .get(&(row, col))
            .and_then(|c| c.formula.as_deref())
    }

    /// Bounding box `(min_row, min_col, max_row, max_col)` of non-empty
    /// cells whose row is at least `from_row`.
    pub fn bounds_from_row(&self, from_row: u32) -> Option<(u32, u32, u32, u32)> {
        self.cells
            .iter()
            .filter(|((r, _), cell)| *r >= from_row && !cell.is_empty())
            .fold(None, |acc, ((r, c), _)| match acc {
                None => Some((*r, *c, *r, *c)),
                Some((min_r, min_c, max_r, max_c)) => Some((
                    min_r.min(*r),
                    min_c.min(*c),
                    max_r.max(*r),
                    max_c.max(*c),
                )),
            })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub name: String,
    pub size: f64,
    pub bold: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
}

/// One plotted series: its legend title and the cells holding its values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartSeries {
    pub title: String,
    pub values: RangeAddress,
}

/// Backend-neutral description of an embedded chart.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub style: u8,
    /// Top-left cell of the chart frame.
    pub anchor: CellRef,
    /// Bottom-right cell of the chart frame.
    pub extent_to: CellRef,
    pub series: Vec<ChartSeries>,
    /// Cells holding the category (x-axis) labels, bound by reference.
    pub categories: RangeAddress,
}

pub trait SpreadsheetReader {
    type Error: std::error::Error + Send + Sync + 'static;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error>;

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized;

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetData, Self::Error>;
}

pub trait SpreadsheetWriter {
    type Error: std::error::Error + Send + Sync + 'static;

    fn write_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        data: CellData,
    ) -> Result<(), Self::Error>;

    fn write_range(
        &mut self,
        sheet: &str,
        cells: BTreeMap<(u32, u32), CellData>,
    ) -> Result<(), Self::Error> {
        for ((r, c), cd) in cells {
            self.write_cell(sheet, r, c, cd)?;
        }
        Ok(())
    }

    fn create_sheet(&mut self, name: &str) -> Result<(), Self::Error>;
    fn set_active_sheet(&mut self, name: &str) -> Result<(), Self::Error>;

    /// Save back to the path the workbook was opened from.
    fn save(&mut self) -> Result<(), Self::Error>;
}

/// Presentation-only operations: widths, fonts, number formats, charts.
pub trait SpreadsheetStyler {
    type Error: std::error::Error + Send + Sync + 'static;

    fn set_column_width(&mut self, sheet: &str, col: u32, width: f64) -> Result<(), Self::Error>;

    fn set_font(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        font: &FontSpec,
    ) -> Result<(), Self::Error>;

    fn set_number_format(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        format_code: &str,
    ) -> Result<(), Self::Error>;

    fn add_chart(&mut self, sheet: &str, chart: &ChartSpec) -> Result<(), Self::Error>;
}
