// Core primitives for row scanning

pub mod block_scanner;
pub mod header;
pub mod row_buffer;
pub mod scanner;

pub use block_scanner::{scan_blocks, BLOCK};
pub use header::split_header;
pub use row_buffer::{Fields, RowBuffer};
pub use scanner::{scan_scalar, COMMA, QUOTE};
