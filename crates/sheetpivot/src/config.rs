//! Report configuration.
//!
//! Every fixed position, label and style of the report layout is a named
//! field here. [`ReportConfig::default`] is the stock sales report
//! (Gender by Product line); YAML files override individual fields.

use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use sheetpivot_common::CellRef;
use sheetpivot_io::FontSpec;
use std::path::Path;

/// Largest font size Excel accepts.
const MAX_FONT_SIZE: f64 = 409.0;
/// Built-in chart styles are numbered 1..=48.
const MAX_CHART_STYLE: u8 = 48;

/// What the Report Writer puts in a (group, category) cell that had no input rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingCells {
    #[default]
    ZeroFill,
    Blank,
}

/// Reaction to a summary range that is too small to chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChartPolicy {
    /// Log a warning and finish the report without a chart.
    #[default]
    Skip,
    /// Fail the run with a chart layout error.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontConfig {
    pub name: String,
    pub size: f64,
    #[serde(default)]
    pub bold: bool,
}

impl FontConfig {
    fn arial(size: f64) -> Self {
        Self {
            name: "Arial".to_string(),
            size,
            bold: true,
        }
    }

    pub fn to_spec(&self) -> FontSpec {
        FontSpec {
            name: self.name.clone(),
            size: self.size,
            bold: self.bold,
        }
    }
}

/// Chart frame size, counted in cells from the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartExtent {
    pub columns: u32,
    pub rows: u32,
}

impl Default for ChartExtent {
    fn default() -> Self {
        Self {
            columns: 8,
            rows: 15,
        }
    }
}

/// The three input columns the pivot is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PivotFields<'a> {
    pub group: &'a str,
    pub category: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Input worksheet; `None` reads the first sheet.
    pub input_sheet: Option<String>,
    /// Column whose values become the report rows.
    pub group_field: String,
    /// Column whose values become the report columns.
    pub category_field: String,
    /// Numeric column summed into each cell.
    pub value_field: String,
    pub missing_cells: MissingCells,

    /// Name of the single output worksheet.
    pub sheet_name: String,
    /// 1-based row of the summary header; rows above hold the title block.
    pub table_start_row: u32,
    /// Display width applied to every column of the summary range.
    pub column_width: f64,
    pub totals_label: String,
    /// Number format of the totals cells.
    pub currency_format: String,

    /// Top-left cell of the chart, A1 notation.
    pub chart_anchor: String,
    pub chart_extent: ChartExtent,
    pub chart_title: String,
    pub chart_style: u8,
    pub chart_policy: ChartPolicy,

    pub title: String,
    pub subtitle: String,
    pub title_font: FontConfig,
    pub subtitle_font: FontConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_sheet: None,
            group_field: "Gender".to_string(),
            category_field: "Product line".to_string(),
            value_field: "Total".to_string(),
            missing_cells: MissingCells::ZeroFill,
            sheet_name: "Report".to_string(),
            table_start_row: 5,
            column_width: 20.0,
            totals_label: "Total".to_string(),
            currency_format: "\"$\"#,##0.00".to_string(),
            chart_anchor: "B12".to_string(),
            chart_extent: ChartExtent::default(),
            chart_title: "Sales berdasarkan Produk".to_string(),
            chart_style: 2,
            chart_policy: ChartPolicy::Skip,
            title: "Sales Report".to_string(),
            subtitle: "2019".to_string(),
            title_font: FontConfig::arial(20.0),
            subtitle_font: FontConfig::arial(10.0),
        }
    }
}

impl ReportConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ReportError> {
        serde_yaml::from_str(yaml).map_err(|e| ReportError::Config(e.to_string()))
    }

    pub fn from_yaml_reader<R: std::io::Read>(reader: R) -> Result<Self, ReportError> {
        serde_yaml::from_reader(reader).map_err(|e| ReportError::Config(e.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self, ReportError> {
        let file = std::fs::File::open(path)
            .map_err(|e| ReportError::Config(format!("{}: {e}", path.display())))?;
        Self::from_yaml_reader(std::io::BufReader::new(file))
    }

    pub fn to_yaml(&self) -> Result<String, ReportError> {
        serde_yaml::to_string(self).map_err(|e| ReportError::Config(e.to_string()))
    }

    pub fn fields(&self) -> PivotFields<'_> {
        PivotFields {
            group: &self.group_field,
            category: &self.category_field,
            value: &self.value_field,
        }
    }

    pub fn chart_anchor_cell(&self) -> Result<CellRef, ReportError> {
        CellRef::parse_a1(&self.chart_anchor)
            .map_err(|e| ReportError::Config(format!("chart_anchor: {e}")))
    }

    /// Bottom-right cell of the chart frame.
    pub fn chart_extent_cell(&self) -> Result<CellRef, ReportError> {
        let extent = self.chart_extent;
        self.chart_anchor_cell()?
            .checked_offset(extent.rows, extent.columns)
            .ok_or_else(|| {
                ReportError::Config(format!(
                    "chart_extent {} rows x {} columns from {} runs past the worksheet grid",
                    extent.rows, extent.columns, self.chart_anchor
                ))
            })
    }

    /// Check every field before any file is touched.
    pub fn validate(&self) -> Result<(), ReportError> {
        let fields = [
            ("group_field", self.group_field.trim()),
            ("category_field", self.category_field.trim()),
            ("value_field", self.value_field.trim()),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                return Err(ReportError::Config(format!("{name} must not be empty")));
            }
        }
        if fields[0].1 == fields[1].1 || fields[0].1 == fields[2].1 || fields[1].1 == fields[2].1
        {
            return Err(ReportError::Config(
                "group_field, category_field and value_field must be distinct".to_string(),
            ));
        }
        if self.sheet_name.trim().is_empty() {
            return Err(ReportError::Config("sheet_name must not be empty".into()));
        }
        if self.table_start_row < 3 {
            return Err(ReportError::Config(format!(
                "table_start_row must leave room for the title block (>= 3), got {}",
                self.table_start_row
            )));
        }
        if !(self.column_width > 0.0) {
            return Err(ReportError::Config(format!(
                "column_width must be positive, got {}",
                self.column_width
            )));
        }
        self.chart_anchor_cell()?;
        if self.chart_extent.columns == 0 || self.chart_extent.rows == 0 {
            return Err(ReportError::Config("chart_extent must be non-zero".into()));
        }
        self.chart_extent_cell()?;
        if self.chart_style == 0 || self.chart_style > MAX_CHART_STYLE {
            return Err(ReportError::Style(format!(
                "chart_style must be in 1..={MAX_CHART_STYLE}, got {}",
                self.chart_style
            )));
        }
        if self.currency_format.trim().is_empty() {
            return Err(ReportError::Style("currency_format must not be empty".into()));
        }
        for (name, font) in [("title_font", &self.title_font), ("subtitle_font", &self.subtitle_font)] {
            if font.name.trim().is_empty() {
                return Err(ReportError::Style(format!("{name}.name must not be empty")));
            }
            if !(font.size >= 1.0 && font.size <= MAX_FONT_SIZE) {
                return Err(ReportError::Style(format!(
                    "{name}.size must be in 1..={MAX_FONT_SIZE}, got {}",
                    font.size
                )));
            }
        }
        Ok(())
    }
}
