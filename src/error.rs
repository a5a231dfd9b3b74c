// Error types for tokenizing, table construction and the file driver

use std::io;
use std::path::PathBuf;

/// A line produced a different number of fields than the configured arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected} fields, found {found}")]
pub struct ArityError {
    pub expected: usize,
    pub found: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open {}", path.display())]
    StreamOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read line {line}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("input has no header line")]
    EmptyInput,

    #[error("line {line}: {source}")]
    ArityMismatch {
        line: usize,
        #[source]
        source: ArityError,
    },

    #[error("row {index}: {source}")]
    RowArity {
        index: usize,
        #[source]
        source: ArityError,
    },

    #[error("arity must be at least 1, got {0}")]
    InvalidArity(usize),

    #[error("row index {index} out of range for table with {len} rows")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("line {line}: scalar and vectorized scans disagree")]
    StrategyDivergence { line: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
