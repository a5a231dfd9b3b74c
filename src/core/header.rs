// Header line splitting: plain comma split, no quote handling.

use memchr::memchr_iter;

use super::row_buffer::RowBuffer;
use super::scanner::COMMA;

/// Split a header line on every comma.
pub fn split_header(line: &[u8], fields: &mut RowBuffer) {
    fields.clear();
    let mut start = 0;
    for comma in memchr_iter(COMMA, line) {
        fields.push(start, comma);
        start = comma + 1;
    }
    fields.push(start, line.len());
}
