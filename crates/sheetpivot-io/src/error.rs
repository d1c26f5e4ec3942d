use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("{backend} backend error: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },

    #[error("sheet `{0}` not found")]
    SheetNotFound(String),

    #[error("workbook contains no worksheets")]
    NoSheets,

    #[error("sheet `{0}` has no header row")]
    MissingHeader(String),
}

impl IoError {
    pub fn from_backend<E: fmt::Display>(backend: &'static str, err: E) -> Self {
        IoError::Backend {
            backend,
            message: err.to_string(),
        }
    }
}
