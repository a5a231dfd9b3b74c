// Byte-level scan state and the scalar scan.
//
// The scalar loop is both the standalone Scalar strategy and the tail handler
// for the block scanner, which hands over its carried state.

use super::row_buffer::RowBuffer;

/// Field separator.
pub const COMMA: u8 = b',';

/// Toggles comma suppression. Never stripped from field text.
pub const QUOTE: u8 = b'"';

/// State carried across bytes (and across blocks).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanState {
    /// Inside an open quote: commas are inert.
    pub in_quotes: bool,
    /// Byte offset where the current field began.
    pub field_start: usize,
}

impl ScanState {
    /// Close the current field at `comma` and open the next one after it.
    #[inline]
    pub fn split_at(&mut self, comma: usize, fields: &mut RowBuffer) {
        fields.push(self.field_start, comma);
        self.field_start = comma + 1;
    }

    /// Close the last field at the end of the line. Runs whether or not the
    /// line left a quote open.
    #[inline]
    pub fn finish(self, line_len: usize, fields: &mut RowBuffer) {
        fields.push(self.field_start, line_len);
    }
}

/// Scan `line[start..]` byte by byte, continuing from `state`.
#[inline]
pub fn scan_scalar_from(line: &[u8], start: usize, state: &mut ScanState, fields: &mut RowBuffer) {
    for (offset, &byte) in line[start..].iter().enumerate() {
        if byte == QUOTE {
            state.in_quotes = !state.in_quotes;
        } else if byte == COMMA && !state.in_quotes {
            state.split_at(start + offset, fields);
        }
    }
}

/// Scalar strategy: scan the whole line one byte at a time.
pub fn scan_scalar(line: &[u8], fields: &mut RowBuffer) {
    fields.clear();
    let mut state = ScanState::default();
    scan_scalar_from(line, 0, &mut state, fields);
    state.finish(line.len(), fields);
}
