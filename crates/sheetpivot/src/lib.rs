//! Pivot a sales spreadsheet into a formatted xlsx report.
//!
//! The run is a fixed sequence of steps, each usable on its own:
//! [`reader::read_records`] loads the input rows, [`pivot::aggregate`] sums
//! them into a [`SummaryTable`], [`writer::write_report`] lays the grid out on
//! the report sheet and [`layout::post_process`] adds widths, totals, a bar
//! chart and the title block. [`ReportPipeline`] chains them.

pub mod config;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod pivot;
pub mod reader;
pub mod writer;

pub use config::{ChartPolicy, MissingCells, ReportConfig};
pub use error::{ReportError, Step};
pub use layout::{ChartPlan, LayoutPlan};
pub use pipeline::{ReportPipeline, RunSummary};
pub use pivot::SummaryTable;
pub use reader::{Record, RecordSet};
