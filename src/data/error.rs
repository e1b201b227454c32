use thiserror::Error;

/// Failure to turn uploaded bytes into a [`RawTable`](super::model::RawTable).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported file extension: .{0} (expected csv, xls or xlsx)")]
    UnsupportedExtension(String),

    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("parsing workbook: {0}")]
    Workbook(String),

    #[error("workbook contains no worksheet")]
    NoWorksheet,
}

/// Failures of the header → filter → export pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("row {index} cannot be used as the header: {reason}")]
    InvalidHeader { index: i64, reason: String },

    #[error("column {0} not found in table")]
    ColumnNotFound(String),

    #[error("select at least one column to export")]
    EmptySelection,

    #[error("writing CSV: {0}")]
    Write(String),
}

impl PipelineError {
    pub(crate) fn invalid_header(index: usize, reason: impl Into<String>) -> Self {
        PipelineError::InvalidHeader {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            reason: reason.into(),
        }
    }
}
