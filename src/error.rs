use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatbenchError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("unsupported dimension {n}: recursive multiply needs a power of two")]
    UnsupportedDimension { n: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    InvalidIndex {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },
    #[error("computation failed: {failed} of {total} tasks failed ({message})")]
    ComputationFailed {
        failed: usize,
        total: usize,
        message: String,
    },
    #[error("incomplete result: {missing} of {total} blocks missing")]
    IncompleteResult { missing: usize, total: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, MatbenchError>;
