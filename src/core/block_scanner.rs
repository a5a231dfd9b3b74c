// Block-vectorized row scanner
//
// Splits the line into BLOCK-byte blocks. Each block is reduced to two u32
// bitmasks (bit i = byte i of the block is a comma / a quote), then the two
// event streams are merged lowest-bit-first so quotes and commas are resolved
// in their original byte order. Bytes past the last full block go through the
// scalar loop with the carried state.
//
// ## Mask computation
//
// Default: a fixed-length compare-and-shift loop over `chunks_exact(BLOCK)`,
// which LLVM turns into vector compares plus a movemask. With the
// `portable-simd` feature (nightly) the same masks come from
// `Simd::simd_eq(..).to_bitmask()`. No path reads past the end of the line.
//
// ## Quoted commas
//
// When the earliest unresolved event is a comma and a quote is open, that
// comma and every other comma below the next quote are inert. They are retired
// together; the next quote is then resolved normally, so a later quote in the
// same block is never lost.

#[cfg(feature = "portable-simd")]
use std::simd::prelude::*;

use super::row_buffer::RowBuffer;
use super::scanner::{scan_scalar_from, ScanState, COMMA, QUOTE};

/// Bytes per block. One bit per byte in a u32 mask.
pub const BLOCK: usize = 32;

// ---------------------------------------------------------------------------
// Bitmask helpers
// ---------------------------------------------------------------------------

/// Comma and quote masks for one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMasks {
    pub commas: u32,
    pub quotes: u32,
}

/// Compute the comma/quote masks of a `BLOCK`-byte slice.
#[cfg(not(feature = "portable-simd"))]
#[inline]
pub fn block_masks(block: &[u8]) -> BlockMasks {
    debug_assert_eq!(block.len(), BLOCK);
    let mut commas = 0u32;
    let mut quotes = 0u32;
    for (i, &byte) in block.iter().enumerate() {
        commas |= u32::from(byte == COMMA) << i;
        quotes |= u32::from(byte == QUOTE) << i;
    }
    BlockMasks { commas, quotes }
}

/// Compute the comma/quote masks of a `BLOCK`-byte slice.
#[cfg(feature = "portable-simd")]
#[inline]
pub fn block_masks(block: &[u8]) -> BlockMasks {
    const MASK_32: u64 = (1u64 << 32) - 1;

    let chunk = Simd::<u8, BLOCK>::from_slice(block);
    let commas = chunk.simd_eq(Simd::splat(COMMA)).to_bitmask() & MASK_32;
    let quotes = chunk.simd_eq(Simd::splat(QUOTE)).to_bitmask() & MASK_32;
    BlockMasks {
        commas: commas as u32,
        quotes: quotes as u32,
    }
}

/// Mask of all bits strictly below `pos` (all bits when `pos >= 32`).
#[inline]
fn bits_below(pos: u32) -> u32 {
    1u32.checked_shl(pos).map_or(u32::MAX, |bit| bit - 1)
}

// ---------------------------------------------------------------------------
// Event merge
// ---------------------------------------------------------------------------

/// Resolve one block's events in byte order. `base` is the block's offset in
/// the line.
#[inline]
fn merge_block(masks: BlockMasks, base: usize, state: &mut ScanState, fields: &mut RowBuffer) {
    let BlockMasks {
        mut commas,
        mut quotes,
    } = masks;

    while commas | quotes != 0 {
        // trailing_zeros of an empty mask is 32, past every real position.
        let quote_pos = quotes.trailing_zeros();
        let comma_pos = commas.trailing_zeros();

        if quote_pos < comma_pos {
            state.in_quotes = !state.in_quotes;
            quotes &= quotes - 1; // clear lowest set bit
        } else if !state.in_quotes {
            state.split_at(base + comma_pos as usize, fields);
            commas &= commas - 1;
        } else {
            commas &= !bits_below(quote_pos);
        }
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Vectorized strategy: scan full blocks by bitmask, then the tail byte by
/// byte.
pub fn scan_blocks(line: &[u8], fields: &mut RowBuffer) {
    fields.clear();
    let mut state = ScanState::default();

    let blocks = line.chunks_exact(BLOCK);
    let tail_start = line.len() - blocks.remainder().len();

    for (i, block) in blocks.enumerate() {
        let masks = block_masks(block);
        tracing::trace!(
            block = i,
            commas = format_args!("{:032b}", masks.commas.reverse_bits()),
            quotes = format_args!("{:032b}", masks.quotes.reverse_bits()),
            "block masks"
        );
        merge_block(masks, i * BLOCK, &mut state, fields);
    }

    scan_scalar_from(line, tail_start, &mut state, fields);
    state.finish(line.len(), fields);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scanner::scan_scalar;

    // Common scenarios live in tests/conformance.rs. Only block-specific
    // cases (mask layout, event ordering, carry across blocks) are here.

    fn spans(line: &[u8], arity: usize) -> Vec<std::ops::Range<usize>> {
        let mut buf = RowBuffer::new(arity);
        scan_blocks(line, &mut buf);
        buf.spans().to_vec()
    }

    fn scalar_spans(line: &[u8], arity: usize) -> Vec<std::ops::Range<usize>> {
        let mut buf = RowBuffer::new(arity);
        scan_scalar(line, &mut buf);
        buf.spans().to_vec()
    }

    #[test]
    fn test_block_masks_bit_order() {
        let mut block = [b'x'; BLOCK];
        block[0] = b',';
        block[3] = b'"';
        block[31] = b',';

        let masks = block_masks(&block);
        assert_eq!(masks.commas, 1 | (1 << 31));
        assert_eq!(masks.quotes, 1 << 3);
    }

    #[test]
    fn test_bits_below() {
        assert_eq!(bits_below(0), 0);
        assert_eq!(bits_below(5), 0b11111);
        assert_eq!(bits_below(31), u32::MAX >> 1);
        assert_eq!(bits_below(32), u32::MAX);
    }

    #[test]
    fn test_quote_closing_after_inner_comma_in_same_block() {
        // `"a,b",c` padded into one block: the inner comma comes before the
        // closing quote. The closing quote must still be seen, or the real
        // separator at 5 would be swallowed.
        let mut line = b"\"a,b\",c".to_vec();
        line.resize(BLOCK, b'z');

        assert_eq!(spans(&line, 2), vec![0..5, 6..BLOCK]);
        assert_eq!(spans(&line, 2), scalar_spans(&line, 2));
    }

    #[test]
    fn test_several_quoted_regions_in_one_block() {
        let mut line = b"\"a,b\",\"c,d\",e,\"f,g\"".to_vec();
        line.resize(BLOCK, b'.');

        assert_eq!(spans(&line, 4), vec![0..5, 6..11, 12..13, 14..BLOCK]);
    }

    #[test]
    fn test_open_quote_carries_into_next_block() {
        // Quote opens at byte 30 of block 0, inner commas run into block 1,
        // closes at byte 40, real separator at 41.
        let mut line = vec![b'a'; 30];
        line.push(b'"');
        line.extend_from_slice(b",,,,,,,,,");
        line.push(b'"');
        line.push(b',');
        line.extend_from_slice(&[b'b'; 30]);

        assert_eq!(line[40], b'"');
        assert_eq!(spans(&line, 2), vec![0..41, 42..line.len()]);
        assert_eq!(spans(&line, 2), scalar_spans(&line, 2));
    }

    #[test]
    fn test_quote_state_carries_into_scalar_tail() {
        // One full block ending inside a quote; the tail closes it.
        let mut line = vec![b'"'];
        line.extend_from_slice(&[b','; BLOCK - 1]);
        line.extend_from_slice(b"\",x");

        assert_eq!(spans(&line, 2), vec![0..BLOCK + 1, BLOCK + 2..BLOCK + 3]);
    }

    #[test]
    fn test_exact_block_length_has_empty_tail() {
        let mut line = vec![b'a'; BLOCK];
        line[10] = b',';

        assert_eq!(spans(&line, 2), vec![0..10, 11..BLOCK]);
    }

    #[test]
    fn test_comma_on_last_byte_of_block() {
        let mut line = vec![b'a'; BLOCK + 4];
        line[BLOCK - 1] = b',';

        assert_eq!(spans(&line, 2), vec![0..BLOCK - 1, BLOCK..BLOCK + 4]);
    }

    #[test]
    fn test_many_blocks_every_separator_found() {
        // 20 copies of a 12-byte record, separators at offsets 3, 7, 11.
        let line = b"aaa,bbb,ccc,".repeat(20);
        let mut buf = RowBuffer::new(61);
        scan_blocks(&line, &mut buf);

        assert_eq!(buf.found(), 61);
        for (i, span) in buf.spans().iter().enumerate().take(60) {
            assert_eq!(span.start, i * 4, "field {i} start");
            assert_eq!(span.end, i * 4 + 3, "field {i} end");
        }
        assert_eq!(buf.spans()[60], 240..240);
    }
}
