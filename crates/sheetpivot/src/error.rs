use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline step a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Config,
    Read,
    Aggregate,
    Write,
    Layout,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Config => "config",
            Step::Read => "read",
            Step::Aggregate => "aggregate",
            Step::Write => "write",
            Step::Layout => "layout",
        })
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("input `{path}` cannot be read: {message}")]
    InputNotFound { path: PathBuf, message: String },

    #[error("schema error: {0}")]
    Schema(String),

    #[error("no data: {0}")]
    NoData(String),

    #[error("cannot write `{path}`: {message}")]
    Write { path: PathBuf, message: String },

    /// The summary range is too small for a meaningful chart.
    #[error("chart layout error: {0}")]
    ChartLayout(String),

    /// The written sheet has no usable summary range.
    #[error("range error: {0}")]
    Range(String),

    #[error("style error: {0}")]
    Style(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ReportError {
    pub fn step(&self) -> Step {
        match self {
            ReportError::Config(_) => Step::Config,
            ReportError::InputNotFound { .. } | ReportError::Schema(_) => Step::Read,
            ReportError::NoData(_) => Step::Aggregate,
            ReportError::Write { .. } => Step::Write,
            ReportError::ChartLayout(_) | ReportError::Range(_) | ReportError::Style(_) => {
                Step::Layout
            }
        }
    }

    pub(crate) fn write<E: fmt::Display>(path: impl Into<PathBuf>, err: E) -> Self {
        ReportError::Write {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
