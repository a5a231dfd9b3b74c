// Fixed-arity tokenizer: one strategy plus the arity check
//
// The tokenizer never allocates per line. Callers own a RowBuffer (from
// `Tokenizer::buffer`) and copy fields out of it before the next call.

use crate::core::{split_header, RowBuffer};
use crate::error::ArityError;

use super::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tokenizer {
    arity: usize,
    strategy: Strategy,
}

impl Tokenizer {
    pub fn new(arity: usize, strategy: Strategy) -> Self {
        Tokenizer { arity, strategy }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// An empty buffer sized for this tokenizer.
    pub fn buffer(&self) -> RowBuffer {
        RowBuffer::new(self.arity)
    }

    /// Split a header line. Quotes are ordinary bytes here.
    pub fn split_header(&self, line: &str, fields: &mut RowBuffer) -> Result<(), ArityError> {
        debug_assert_eq!(fields.arity(), self.arity);
        split_header(line.as_bytes(), fields);
        fields.check()
    }

    /// Split a data line into exactly `arity` fields.
    ///
    /// On error the buffer still holds the spans of the first `arity` fields
    /// and the true field count.
    pub fn tokenize(&self, line: &str, fields: &mut RowBuffer) -> Result<(), ArityError> {
        debug_assert_eq!(fields.arity(), self.arity);
        self.strategy.scan(line.as_bytes(), fields);
        fields.check()
    }
}
