//! Orchestrator: read, aggregate, write, then finalize the layout.

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::layout::{self, ChartPlan, LayoutPlan};
use crate::pivot::{self, AggregateStats, SummaryTable};
use crate::reader::{self, Record};
use crate::writer;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, info_span};

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub records_read: usize,
    pub records_skipped: usize,
    pub groups: usize,
    pub categories: usize,
    /// Discovered summary range, e.g. `A5:C7`.
    pub range: String,
    pub totals_row: u32,
    pub chart_placed: bool,
    pub chart_skipped_reason: Option<String>,
    pub output: PathBuf,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "output:     {}", self.output.display())?;
        writeln!(
            f,
            "records:    {} read, {} skipped",
            self.records_read, self.records_skipped
        )?;
        writeln!(
            f,
            "grid:       {} group(s) x {} categor{}",
            self.groups,
            self.categories,
            if self.categories == 1 { "y" } else { "ies" }
        )?;
        writeln!(f, "range:      {}", self.range)?;
        writeln!(f, "totals row: {}", self.totals_row)?;
        match &self.chart_skipped_reason {
            Some(reason) => write!(f, "chart:      skipped ({reason})"),
            None if self.chart_placed => write!(f, "chart:      placed"),
            None => write!(f, "chart:      kept from an earlier run"),
        }
    }
}

/// One report run from `input` to `output`.
#[derive(Debug, Clone)]
pub struct ReportPipeline {
    input: PathBuf,
    output: PathBuf,
    config: ReportConfig,
}

impl ReportPipeline {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            config: ReportConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    /// Run every step in order. The first failure aborts the run; nothing is
    /// written before aggregation has produced a non-empty table.
    pub fn run(&self) -> Result<RunSummary, ReportError> {
        self.config.validate()?;

        let records = {
            let _span = info_span!("read", input = %self.input.display()).entered();
            reader::read_records(
                &self.input,
                self.config.input_sheet.as_deref(),
                self.config.fields(),
            )?
            .records
        };
        self.build_from_records(&records)
    }

    /// Run the aggregate, write and layout steps over records that are
    /// already in memory.
    pub fn build_from_records(&self, records: &[Record]) -> Result<RunSummary, ReportError> {
        self.config.validate()?;

        let (table, stats) = {
            let _span = info_span!("aggregate", records = records.len()).entered();
            self.summarize(records)?
        };

        {
            let _span = info_span!("write", output = %self.output.display()).entered();
            writer::write_report(&table, &self.output, &self.config)?;
        }

        let plan = {
            let _span = info_span!("layout", sheet = %self.config.sheet_name).entered();
            layout::post_process(&self.output, &self.config)?
        };

        let summary = self.summary(records.len(), &table, stats, &plan);
        info!(
            output = %summary.output.display(),
            range = %summary.range,
            chart = summary.chart_placed,
            "report complete"
        );
        Ok(summary)
    }

    fn summarize(
        &self,
        records: &[Record],
    ) -> Result<(SummaryTable, AggregateStats), ReportError> {
        let (table, stats) =
            pivot::aggregate(records, self.config.fields(), self.config.missing_cells)?;
        if table.is_empty() {
            return Err(ReportError::NoData(format!(
                "{} record(s) read, {} skipped; nothing to summarize",
                records.len(),
                stats.records_skipped
            )));
        }
        let (groups, categories) = table.shape();
        info!(groups, categories, skipped = stats.records_skipped, "aggregated");
        Ok((table, stats))
    }

    fn summary(
        &self,
        records_read: usize,
        table: &SummaryTable,
        stats: AggregateStats,
        plan: &LayoutPlan,
    ) -> RunSummary {
        let (groups, categories) = table.shape();
        let chart_skipped_reason = match &plan.chart {
            ChartPlan::Skipped(reason) => Some(reason.clone()),
            ChartPlan::Placed(_) => None,
        };
        RunSummary {
            records_read,
            records_skipped: stats.records_skipped,
            groups,
            categories,
            range: plan.range.to_a1(),
            totals_row: plan.totals.row,
            chart_placed: plan.chart.spec().is_some() && !plan.already_finalized,
            chart_skipped_reason,
            output: self.output.clone(),
        }
    }
}
