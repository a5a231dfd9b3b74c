// Reusable per-line field buffer
//
// Filled by the scanners, drained by the driver. Holds at most `arity` spans
// but counts every field boundary the scan finds, so an overlong line can be
// reported with its true field count.

use std::ops::Range;

use crate::error::ArityError;

/// Field spans for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBuffer {
    arity: usize,
    /// Byte ranges of the first `arity` fields, in line order.
    spans: Vec<Range<usize>>,
    /// Fields found by the last scan (may exceed `arity`).
    found: usize,
}

impl RowBuffer {
    pub fn new(arity: usize) -> Self {
        RowBuffer {
            arity,
            spans: Vec::with_capacity(arity),
            found: 0,
        }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Number of fields the last scan produced.
    #[inline]
    pub fn found(&self) -> usize {
        self.found
    }

    /// Forget the previous line.
    #[inline]
    pub fn clear(&mut self) {
        self.spans.clear();
        self.found = 0;
    }

    /// Record a field ending before `end`. Fields past the arity are counted
    /// but not stored.
    #[inline]
    pub fn push(&mut self, start: usize, end: usize) {
        if self.found < self.arity {
            self.spans.push(start..end);
        }
        self.found += 1;
    }

    #[inline]
    pub fn spans(&self) -> &[Range<usize>] {
        &self.spans
    }

    /// Check that the last scan produced exactly `arity` fields.
    pub fn check(&self) -> Result<(), ArityError> {
        if self.found == self.arity {
            Ok(())
        } else {
            Err(ArityError {
                expected: self.arity,
                found: self.found,
            })
        }
    }

    /// Iterate the stored fields as slices of `line`.
    ///
    /// `line` must be the line the buffer was last filled from. Spans only
    /// ever end on an ASCII comma or the line end, so they fall on char
    /// boundaries.
    #[inline]
    pub fn fields<'a>(&'a self, line: &'a str) -> Fields<'a> {
        Fields {
            line,
            spans: self.spans.iter(),
        }
    }
}

/// Iterator over the fields of a scanned line.
pub struct Fields<'a> {
    line: &'a str,
    spans: std::slice::Iter<'a, Range<usize>>,
}

impl<'a> Iterator for Fields<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.spans.next().map(|span| &self.line[span.clone()])
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.spans.size_hint()
    }
}

impl ExactSizeIterator for Fields<'_> {}
