#![cfg(feature = "umya")]

use crate::traits::{
    CellData, ChartKind, ChartSpec, FontSpec, SheetData, SpreadsheetReader,
    SpreadsheetStyler, SpreadsheetWriter,
};
use parking_lot::RwLock;
use sheetpivot_common::{CellErrorKind, LiteralValue, col_to_letters};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use umya_spreadsheet::structs::drawing::charts::{CategoryAxisData, StringReference};
use umya_spreadsheet::structs::drawing::spreadsheet::MarkerType;
use umya_spreadsheet::structs::office2010::drawing::charts::Style;
use umya_spreadsheet::structs::{Chart, ChartType};
use umya_spreadsheet::{CellRawValue, CellValue, Spreadsheet, Worksheet, XlsxError, reader::xlsx};

/// Read/write xlsx backend. The whole workbook is held in memory; the file
/// is only touched by `open_path` and `save`.
pub struct UmyaAdapter {
    workbook: RwLock<Spreadsheet>,
    original_path: Option<PathBuf>,
}

fn sheet_missing(sheet: &str) -> XlsxError {
    XlsxError::CellError(format!("sheet `{sheet}` not found"))
}

impl UmyaAdapter {
    /// Start a workbook with no worksheets that `save` will write to `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Self {
        Self {
            workbook: RwLock::new(umya_spreadsheet::new_file_empty_worksheet()),
            original_path: Some(path.as_ref().to_path_buf()),
        }
    }

    fn convert_cell_value(cv: &CellValue) -> Option<LiteralValue> {
        let raw = cv.get_raw_value();
        if raw.is_empty() {
            return None;
        }
        if raw.is_error() {
            let txt = cv.get_value();
            let kind = CellErrorKind::parse(txt.as_ref()).unwrap_or(CellErrorKind::Value);
            return Some(LiteralValue::Error(kind));
        }
        match raw {
            CellRawValue::Numeric(n) => Some(LiteralValue::Number(*n)),
            CellRawValue::Bool(b) => Some(LiteralValue::Boolean(*b)),
            CellRawValue::String(s) => Some(LiteralValue::Text(s.to_string())),
            CellRawValue::RichText(rt) => Some(LiteralValue::Text(rt.get_text().to_string())),
            CellRawValue::Lazy(s) => {
                let txt = s.as_ref();
                if let Ok(n) = txt.parse::<f64>() {
                    Some(LiteralValue::Number(n))
                } else if txt.eq_ignore_ascii_case("TRUE") {
                    Some(LiteralValue::Boolean(true))
                } else if txt.eq_ignore_ascii_case("FALSE") {
                    Some(LiteralValue::Boolean(false))
                } else {
                    Some(LiteralValue::Text(txt.to_string()))
                }
            }
            CellRawValue::Error(_) => Some(LiteralValue::Error(CellErrorKind::Value)),
            CellRawValue::Empty => None,
        }
    }

    fn sheet_mut<'a>(wb: &'a mut Spreadsheet, sheet: &str) -> Result<&'a mut Worksheet, XlsxError> {
        wb.read_sheet_by_name(sheet);
        wb.get_sheet_by_name_mut(sheet)
            .ok_or_else(|| sheet_missing(sheet))
    }

    fn write_book(&self, path: &Path) -> Result<(), XlsxError> {
        let mut wb = self.workbook.write();
        // Every sheet must be deserialized before the writer walks them.
        let count = wb.get_sheet_count();
        for i in 0..count {
            wb.read_sheet(i);
        }
        umya_spreadsheet::writer::xlsx::write(&*wb, path)
    }
}

impl SpreadsheetReader for UmyaAdapter {
    type Error = XlsxError;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        let mut wb = self.workbook.write();
        let count = wb.get_sheet_count();
        let mut names = Vec::with_capacity(count);
        for i in 0..count {
            wb.read_sheet(i);
            if let Some(s) = wb.get_sheet(&i) {
                names.push(s.get_name().to_string());
            }
        }
        Ok(names)
    }

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        // Full (non-lazy) read so later saves never hit undeserialized sheets.
        let book = xlsx::read(path.as_ref())?;
        Ok(Self {
            workbook: RwLock::new(book),
            original_path: Some(path.as_ref().to_path_buf()),
        })
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetData, Self::Error> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("io_read_sheet", backend = "umya", sheet).entered();

        let mut wb = self.workbook.write();
        wb.read_sheet_by_name(sheet);
        let ws = wb.get_sheet_by_name(sheet).ok_or_else(|| sheet_missing(sheet))?;
        let mut cells: BTreeMap<(u32, u32), CellData> = BTreeMap::new();
        for cell in ws.get_cell_collection() {
            let coord = cell.get_coordinate();
            let col = *coord.get_col_num();
            let row = *coord.get_row_num();
            let cv = cell.get_cell_value();
            let formula = if cv.is_formula() {
                let f = cv.get_formula();
                if f.is_empty() {
                    None
                } else if f.starts_with('=') {
                    Some(f.to_string())
                } else {
                    Some(format!("={f}"))
                }
            } else {
                None
            };
            let value = Self::convert_cell_value(cv);
            if value.is_none() && formula.is_none() {
                continue;
            }
            cells.insert((row, col), CellData { value, formula });
        }
        Ok(SheetData { cells })
    }
}

impl SpreadsheetWriter for UmyaAdapter {
    type Error = XlsxError;

    fn write_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        data: CellData,
    ) -> Result<(), Self::Error> {
        let mut wb = self.workbook.write();
        let ws = Self::sheet_mut(&mut wb, sheet)?;
        // umya addresses cells as (col, row)
        let cell = ws.get_cell_mut((col, row));
        match data.value {
            Some(LiteralValue::Number(n)) => {
                cell.set_value_number(n);
            }
            Some(LiteralValue::Int(i)) => {
                cell.set_value_number(i as f64);
            }
            Some(LiteralValue::Boolean(b)) => {
                cell.set_value_bool(b);
            }
            Some(LiteralValue::Text(s)) => {
                // set_value would guess a type and turn "2019" into a number
                cell.set_value_string(s);
            }
            Some(LiteralValue::Error(e)) => {
                cell.set_value(e.to_string());
            }
            Some(LiteralValue::Empty) | None => {
                cell.set_blank();
            }
        }
        if let Some(f) = data.formula {
            // umya stores formulas without the leading '='
            let body = f.strip_prefix('=').unwrap_or(&f).to_string();
            cell.set_formula(body);
        }
        Ok(())
    }

    fn create_sheet(&mut self, name: &str) -> Result<(), Self::Error> {
        let mut wb = self.workbook.write();
        if wb.get_sheet_by_name(name).is_none() {
            wb.new_sheet(name)
                .map_err(|e| XlsxError::CellError(format!("cannot create sheet `{name}`: {e}")))?;
        }
        Ok(())
    }

    fn set_active_sheet(&mut self, name: &str) -> Result<(), Self::Error> {
        let mut wb = self.workbook.write();
        let count = wb.get_sheet_count();
        let index = (0..count)
            .find(|i| wb.get_sheet(i).map(|s| s.get_name() == name).unwrap_or(false))
            .ok_or_else(|| sheet_missing(name))?;
        wb.set_active_sheet(index as u32);
        Ok(())
    }

    fn save(&mut self) -> Result<(), Self::Error> {
        let path = self.original_path.clone().ok_or_else(|| {
            XlsxError::Io(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "in-place save unavailable: no original path",
            ))
        })?;
        self.write_book(&path)
    }
}

impl SpreadsheetStyler for UmyaAdapter {
    type Error = XlsxError;

    fn set_column_width(&mut self, sheet: &str, col: u32, width: f64) -> Result<(), Self::Error> {
        let mut wb = self.workbook.write();
        let ws = Self::sheet_mut(&mut wb, sheet)?;
        ws.get_column_dimension_mut(&col_to_letters(col))
            .set_width(width);
        Ok(())
    }

    fn set_font(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        font: &FontSpec,
    ) -> Result<(), Self::Error> {
        let mut wb = self.workbook.write();
        let ws = Self::sheet_mut(&mut wb, sheet)?;
        let target = ws.get_cell_mut((col, row)).get_style_mut().get_font_mut();
        target.set_name(font.name.clone());
        target.set_size(font.size);
        target.set_bold(font.bold);
        Ok(())
    }

    fn set_number_format(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        format_code: &str,
    ) -> Result<(), Self::Error> {
        let mut wb = self.workbook.write();
        let ws = Self::sheet_mut(&mut wb, sheet)?;
        ws.get_cell_mut((col, row))
            .get_style_mut()
            .get_number_format_mut()
            .set_format_code(format_code);
        Ok(())
    }

    fn add_chart(&mut self, sheet: &str, spec: &ChartSpec) -> Result<(), Self::Error> {
        let chart_type = match spec.kind {
            ChartKind::Bar => ChartType::BarChart,
        };
        let mut from_marker = MarkerType::default();
        from_marker.set_coordinate(spec.anchor.to_string());
        let mut to_marker = MarkerType::default();
        to_marker.set_coordinate(spec.extent_to.to_string());

        let series_refs: Vec<String> = spec
            .series
            .iter()
            .map(|s| s.values.to_absolute_ref())
            .collect();

        let mut chart = Chart::default();
        chart.new_chart(
            chart_type,
            from_marker,
            to_marker,
            series_refs.iter().map(String::as_str).collect(),
        );
        chart.set_series_title(spec.series.iter().map(|s| s.title.as_str()).collect());

        // Every series shares the label column; the cache is filled from the
        // sheet at write time.
        let category_ref = spec.categories.to_absolute_ref();
        for series in chart
            .get_area_chart_series_list_mut()
            .get_area_chart_series_mut()
        {
            let mut string_ref = StringReference::default();
            string_ref.get_formula_mut().set_address_str(category_ref.as_str());
            let mut axis_data = CategoryAxisData::default();
            axis_data.set_string_reference(string_ref);
            series.set_category_axis_data(axis_data);
        }

        let mut style = Style::default();
        style.set_val(spec.style.to_string());
        chart.get_chart_space_mut().set_style(style);
        chart.set_title(spec.title.as_str());

        let mut wb = self.workbook.write();
        let ws = Self::sheet_mut(&mut wb, sheet)?;
        ws.add_chart(chart);
        Ok(())
    }
}
