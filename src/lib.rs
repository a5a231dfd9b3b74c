// FixedCSV - fixed-arity CSV tokenizing into a header-keyed table
//
// Strategies (identical output, see strategy/):
// Scalar:     byte-by-byte quote toggle scan
// Vectorized: 32-byte blocks reduced to comma/quote bitmasks, merged in
//             byte order, scalar tail
//
// Quotes only protect embedded commas. They are kept in field text; no
// doubled-quote escapes, no multi-line fields, one fixed arity per file.

#![cfg_attr(feature = "portable-simd", feature(portable_simd))]

pub mod config;
pub mod core;
pub mod error;
pub mod memory;
pub mod reader;
pub mod strategy;
pub mod table;

pub use config::{MalformedPolicy, ParseConfig, DEFAULT_ARITY};
pub use crate::core::RowBuffer;
pub use error::{ArityError, Error, Result};
pub use reader::{parse_path, parse_reader, LineReader, ParseReport, SkippedLine};
pub use strategy::{Strategy, Tokenizer};
pub use table::{Row, RowMap, Table};
