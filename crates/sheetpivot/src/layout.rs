//! Layout Post-Processor.
//!
//! Reopens the written report, discovers the summary range and turns it into
//! the final presentation: column widths, a totals row, a bar chart and the
//! title block. Planning ([`plan_layout`]) is a pure function of the sheet
//! contents and the config; [`apply_layout`] pushes a plan through any
//! backend that can write and style cells.

use crate::config::{ChartPolicy, ReportConfig};
use crate::error::ReportError;
use sheetpivot_common::{CellRef, RangeAddress, col_to_letters};
use sheetpivot_io::{
    CellData, ChartKind, ChartSeries, ChartSpec, FontSpec, SheetData, SpreadsheetReader,
    SpreadsheetStyler, SpreadsheetWriter, UmyaAdapter,
};
use std::path::Path;
use tracing::{debug, info, warn};

/// Sum formulas written directly below the summary range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsRow {
    pub row: u32,
    pub label_col: u32,
    pub label: String,
    /// `(column, formula)` for every value column.
    pub formulas: Vec<(u32, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleCell {
    pub cell: CellRef,
    pub text: String,
    pub font: FontSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartPlan {
    Placed(ChartSpec),
    /// Range too small to chart; the reason is kept for the run summary.
    Skipped(String),
}

impl ChartPlan {
    pub fn spec(&self) -> Option<&ChartSpec> {
        match self {
            ChartPlan::Placed(spec) => Some(spec),
            ChartPlan::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    /// Summary grid including its header row and header column.
    pub range: RangeAddress,
    pub column_widths: Vec<(u32, f64)>,
    pub totals: TotalsRow,
    pub currency_format: String,
    pub chart: ChartPlan,
    pub title: TitleCell,
    pub subtitle: TitleCell,
    /// The sheet already carried a totals row from an earlier pass.
    pub already_finalized: bool,
}

/// Bounding box of the summary grid on `sheet`.
///
/// Only rows at or below `table_start_row` count, and a trailing row of sum
/// formulas labelled with the totals label is excluded, so the result is the same
/// before and after a previous post-processing pass. The returned flag is
/// true when such a totals row was found.
pub fn discover_range(
    sheet: &SheetData,
    config: &ReportConfig,
) -> Result<(RangeAddress, bool), ReportError> {
    let (min_row, min_col, mut max_row, max_col) = sheet
        .bounds_from_row(config.table_start_row)
        .ok_or_else(|| {
            ReportError::Range(format!(
                "sheet `{}` has no cells at or below row {}",
                config.sheet_name, config.table_start_row
            ))
        })?;

    // A group that happens to be named like the totals label holds values,
    // an injected totals row holds SUM formulas.
    let is_totals_row = sheet
        .value(max_row, min_col)
        .is_some_and(|v| v.to_key() == config.totals_label)
        && ((min_col + 1)..=max_col).all(|col| {
            sheet
                .formula(max_row, col)
                .is_some_and(|f| f.starts_with("=SUM("))
        });
    if is_totals_row && max_row > min_row {
        max_row -= 1;
    }

    let range = RangeAddress::new(&config.sheet_name, min_row, min_col, max_row, max_col)
        .map_err(|e| ReportError::Range(e.to_string()))?;
    if range.height() < 2 || range.width() < 2 {
        return Err(ReportError::Range(format!(
            "summary range {} needs a header plus at least one data row and column",
            range.to_a1()
        )));
    }
    Ok((range, is_totals_row))
}

pub fn totals_row(range: &RangeAddress, config: &ReportConfig) -> TotalsRow {
    let first_data_row = range.start_row + 1;
    let formulas = ((range.start_col + 1)..=range.end_col)
        .map(|col| {
            let letters = col_to_letters(col);
            (
                col,
                format!("=SUM({letters}{first_data_row}:{letters}{})", range.end_row),
            )
        })
        .collect();
    TotalsRow {
        row: range.end_row + 1,
        label_col: range.start_col,
        label: config.totals_label.clone(),
        formulas,
    }
}

/// Bar chart over the numeric body: one series per value column, titled by
/// the header row, with the group labels as categories.
pub fn chart_plan(
    sheet: &SheetData,
    range: &RangeAddress,
    config: &ReportConfig,
) -> Result<ChartPlan, ReportError> {
    let data_rows = range.height() - 1;
    let data_cols = range.width() - 1;
    if data_rows < 2 || data_cols < 2 {
        let reason = format!(
            "summary range {} has {data_rows} data row(s) and {data_cols} data column(s); a chart needs at least 2 of each",
            range.to_a1()
        );
        return match config.chart_policy {
            ChartPolicy::Abort => Err(ReportError::ChartLayout(reason)),
            ChartPolicy::Skip => {
                warn!(%reason, "skipping chart");
                Ok(ChartPlan::Skipped(reason))
            }
        };
    }

    // Group labels plus values, without the header row.
    let body = RangeAddress::new(
        &range.sheet,
        range.start_row + 1,
        range.start_col,
        range.end_row,
        range.end_col,
    )
    .map_err(|e| ReportError::ChartLayout(e.to_string()))?;
    let column = |col: u32| {
        body.column(col).ok_or_else(|| {
            ReportError::ChartLayout(format!("column {col} is outside {}", body.to_a1()))
        })
    };

    let mut series = Vec::with_capacity(data_cols as usize);
    for col in (range.start_col + 1)..=range.end_col {
        let title = sheet
            .value(range.start_row, col)
            .map(|v| v.to_key())
            .unwrap_or_else(|| col_to_letters(col));
        series.push(ChartSeries {
            title,
            values: column(col)?,
        });
    }

    let categories = column(range.start_col)?;
    let anchor = config.chart_anchor_cell()?;
    let extent_to = config.chart_extent_cell()?;
    Ok(ChartPlan::Placed(ChartSpec {
        kind: ChartKind::Bar,
        title: config.chart_title.clone(),
        style: config.chart_style,
        anchor,
        extent_to,
        series,
        categories,
    }))
}

pub fn plan_layout(sheet: &SheetData, config: &ReportConfig) -> Result<LayoutPlan, ReportError> {
    let (range, already_finalized) = discover_range(sheet, config)?;
    let column_widths = (range.start_col..=range.end_col)
        .map(|col| (col, config.column_width))
        .collect();
    let totals = totals_row(&range, config);
    let chart = chart_plan(sheet, &range, config)?;

    Ok(LayoutPlan {
        column_widths,
        totals,
        currency_format: config.currency_format.clone(),
        chart,
        title: TitleCell {
            cell: CellRef::new(1, 1),
            text: config.title.clone(),
            font: config.title_font.to_spec(),
        },
        subtitle: TitleCell {
            cell: CellRef::new(2, 1),
            text: config.subtitle.clone(),
            font: config.subtitle_font.to_spec(),
        },
        range,
        already_finalized,
    })
}

/// Write a plan into `sheet` of the workbook at `path` in step order:
/// widths, totals, chart, titles.
///
/// A chart is not embedded a second time when the plan found an earlier
/// totals row.
pub fn apply_layout<B>(
    backend: &mut B,
    path: &Path,
    sheet: &str,
    plan: &LayoutPlan,
) -> Result<(), ReportError>
where
    B: SpreadsheetWriter + SpreadsheetStyler,
{
    let style_err = |e: <B as SpreadsheetStyler>::Error| ReportError::Style(e.to_string());
    let write_err = |e: <B as SpreadsheetWriter>::Error| {
        ReportError::write(path, format!("sheet `{sheet}`: {e}"))
    };

    for (col, width) in &plan.column_widths {
        backend
            .set_column_width(sheet, *col, *width)
            .map_err(style_err)?;
    }

    let totals = &plan.totals;
    backend
        .write_cell(
            sheet,
            totals.row,
            totals.label_col,
            CellData::from_value(totals.label.as_str()),
        )
        .map_err(write_err)?;
    for (col, formula) in &totals.formulas {
        backend
            .write_cell(sheet, totals.row, *col, CellData::from_formula(formula.as_str()))
            .map_err(write_err)?;
        backend
            .set_number_format(sheet, totals.row, *col, &plan.currency_format)
            .map_err(style_err)?;
    }

    match &plan.chart {
        ChartPlan::Placed(_) if plan.already_finalized => {
            debug!("chart already embedded by an earlier pass");
        }
        ChartPlan::Placed(spec) => {
            backend
                .add_chart(sheet, spec)
                .map_err(|e| ReportError::ChartLayout(e.to_string()))?;
        }
        ChartPlan::Skipped(_) => {}
    }

    for title in [&plan.title, &plan.subtitle] {
        backend
            .write_cell(
                sheet,
                title.cell.row,
                title.cell.col,
                CellData::from_value(title.text.as_str()),
            )
            .map_err(write_err)?;
        backend
            .set_font(sheet, title.cell.row, title.cell.col, &title.font)
            .map_err(style_err)?;
    }
    Ok(())
}

/// Reopen `path`, plan and apply the layout, then save in place.
pub fn post_process(path: &Path, config: &ReportConfig) -> Result<LayoutPlan, ReportError> {
    let mut adapter = UmyaAdapter::open_path(path).map_err(|e| ReportError::write(path, e))?;
    let sheet = adapter
        .read_sheet(&config.sheet_name)
        .map_err(|e| ReportError::Range(e.to_string()))?;

    let plan = plan_layout(&sheet, config)?;
    apply_layout(&mut adapter, path, &config.sheet_name, &plan)?;
    adapter
        .set_active_sheet(&config.sheet_name)
        .and_then(|_| adapter.save())
        .map_err(|e| ReportError::write(path, e))?;

    info!(
        range = %plan.range.to_a1(),
        totals_row = plan.totals.row,
        chart = plan.chart.spec().is_some(),
        "finalized report layout"
    );
    Ok(plan)
}
