//! XOR transform engine
//!
//! `a ^ b ^ b == a`, so one transform serves both directions:
//! `original ^ modified` gives the patch body and `original ^ patch` gives
//! the modified file back. Streams of unequal length are zero-extended,
//! and zero is the identity for XOR, so past the end of the shorter stream
//! the output is the longer stream's bytes unchanged.

use crate::patch::checksum::buffer_len;
use crate::patch::control::ChunkContext;
use crate::patch::error::PatchResult;
use crate::patch::progress::{Progress, percent};
use crate::patch::stream::{ByteSink, ByteSource, read_zero_extended};
use tracing::debug;

/// Transform a single byte pair
#[inline]
pub const fn xor_byte(a: u8, b: u8) -> u8 {
    a ^ b
}

/// XOR `mask` into the front of `target`
///
/// Bytes of `target` beyond the end of `mask` are left unchanged, which is
/// the same as XOR with zero.
pub fn xor_in_place(target: &mut [u8], mask: &[u8]) {
    for (byte, mask_byte) in target.iter_mut().zip(mask) {
        *byte = xor_byte(*byte, *mask_byte);
    }
}

/// XOR two buffers into a new buffer of exactly `len` bytes
///
/// Either input may be shorter or longer than `len`; missing bytes count
/// as zero and excess bytes are ignored.
pub fn xor_zero_extended(a: &[u8], b: &[u8], len: usize) -> Vec<u8> {
    let mut output = vec![0u8; len];
    let a_len = a.len().min(len);
    output[..a_len].copy_from_slice(&a[..a_len]);
    xor_in_place(&mut output, b);
    output
}

/// Stream `original ^ other` into `sink` for positions `[0, target_len)`
///
/// Chunks are read at the same offsets from both sources, transformed and
/// appended in order. Either source may end before `target_len`.
/// `stage` turns a completion percentage into the progress status to report.
pub fn transform_streams<S: ByteSink>(
    original: &mut dyn ByteSource,
    other: &mut dyn ByteSource,
    target_len: u64,
    sink: &mut S,
    context: &mut ChunkContext<'_>,
    stage: fn(u8) -> Progress,
) -> PatchResult<()> {
    let chunk_size = context.chunk_size();
    let scratch_len = buffer_len(chunk_size, target_len);
    let mut output = vec![0u8; scratch_len];
    let mut mask = vec![0u8; scratch_len];
    let mut offset = 0u64;

    while offset < target_len {
        context.checkpoint()?;

        let len = (target_len - offset).min(chunk_size as u64) as usize;
        let out = &mut output[..len];
        read_zero_extended(other, offset, out)?;

        let overlap = read_zero_extended(original, offset, &mut mask[..len])?;
        xor_in_place(&mut out[..overlap], &mask[..overlap]);

        sink.append(out)?;
        offset += len as u64;

        debug!("Transformed chunk ending at {offset}/{target_len} ({overlap} bytes overlapped original)");
        context.report(stage(percent(offset, target_len)));
        context.tick();
    }

    Ok(())
}
