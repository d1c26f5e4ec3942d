//! Report Writer: summary table -> `Report` sheet of a new xlsx file.

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::pivot::SummaryTable;
use sheetpivot_io::{CellData, LiteralValue, SpreadsheetWriter, UmyaAdapter};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Lay the table out as a grid whose header row is `table_start_row`.
///
/// The corner cell holds the group field name, the rest of the header row
/// the categories, and column A the groups.
pub fn grid_cells(table: &SummaryTable, config: &ReportConfig) -> BTreeMap<(u32, u32), CellData> {
    let top = config.table_start_row;
    let mut cells = BTreeMap::new();
    cells.insert((top, 1), CellData::from_value(config.group_field.as_str()));
    for (j, category) in table.categories().iter().enumerate() {
        cells.insert((top, j as u32 + 2), CellData::from_value(category.as_str()));
    }
    for (i, (group, values)) in table.rows().enumerate() {
        let row = top + 1 + i as u32;
        cells.insert((row, 1), CellData::from_value(group));
        for (j, value) in values.iter().enumerate() {
            if let Some(v) = value {
                cells.insert((row, j as u32 + 2), CellData::from_value(LiteralValue::Number(*v)));
            }
        }
    }
    cells
}

/// Create (or overwrite) `output` with a single sheet holding the grid.
pub fn write_report(
    table: &SummaryTable,
    output: &Path,
    config: &ReportConfig,
) -> Result<(), ReportError> {
    let sheet = config.sheet_name.as_str();
    let cells = grid_cells(table, config);
    let cell_count = cells.len();

    let mut adapter = UmyaAdapter::create(output);
    adapter
        .create_sheet(sheet)
        .and_then(|_| adapter.write_range(sheet, cells))
        .and_then(|_| adapter.set_active_sheet(sheet))
        .and_then(|_| adapter.save())
        .map_err(|e| ReportError::write(output, e))?;

    info!(
        output = %output.display(),
        sheet,
        cells = cell_count,
        "wrote summary grid"
    );
    Ok(())
}
