// Row scanning strategies
//
// Scalar:     byte-by-byte toggle scan (scan_scalar)
// Vectorized: 32-byte bitmask blocks + scalar tail (scan_blocks)
//
// Both fill the same RowBuffer and must agree on every input.

pub mod tokenizer;

pub use tokenizer::Tokenizer;

use std::fmt;
use std::str::FromStr;

use crate::core::{scan_blocks, scan_scalar, RowBuffer};

/// Which scan fills the row buffer. No observable difference beyond speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    Scalar,
    #[default]
    Vectorized,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Scalar, Strategy::Vectorized];

    /// Scan `line` into `fields`, replacing its previous contents.
    #[inline]
    pub fn scan(self, line: &[u8], fields: &mut RowBuffer) {
        match self {
            Strategy::Scalar => scan_scalar(line, fields),
            Strategy::Vectorized => scan_blocks(line, fields),
        }
    }

    /// The strategy used to cross-check this one.
    pub fn other(self) -> Strategy {
        match self {
            Strategy::Scalar => Strategy::Vectorized,
            Strategy::Vectorized => Strategy::Scalar,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Scalar => "scalar",
            Strategy::Vectorized => "vectorized",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scalar" => Ok(Strategy::Scalar),
            "vectorized" | "simd" => Ok(Strategy::Vectorized),
            other => Err(format!(
                "unknown strategy `{other}` (expected `scalar` or `vectorized`)"
            )),
        }
    }
}
