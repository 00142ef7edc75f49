//! Patch trailer structure and validation
//!
//! The trailer is a fixed 20-byte block at the very end of a patch:
//! - 16-byte MD5 checksum of the original file
//! - 4-byte big-endian length of the modified file

use crate::patch::error::{InputRole, PatchError, PatchResult};
use crate::patch::stream::ByteSource;
use binrw::{BinRead, BinWrite};
use std::io::Cursor;
use tracing::warn;
use xorpatch_crypto::{CHECKSUM_SIZE, Checksum};

/// Size of the patch trailer in bytes
pub const TRAILER_SIZE: usize = 20;

/// Largest modified file length the 4-byte length field can hold
pub const MAX_MODIFIED_LENGTH: u64 = u32::MAX as u64;

/// Patch trailer (20 bytes, big-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big)]
pub struct PatchTrailer {
    /// Checksum of the original file at generation time
    pub checksum: Checksum,

    /// Length of the modified file in bytes
    pub modified_length: u32,
}

impl PatchTrailer {
    /// Create a trailer from a checksum and an already range-checked length
    pub const fn new(checksum: Checksum, modified_length: u32) -> Self {
        Self {
            checksum,
            modified_length,
        }
    }

    /// Serialize the trailer into its 20-byte wire form
    pub fn encode(&self) -> [u8; TRAILER_SIZE] {
        let mut bytes = [0u8; TRAILER_SIZE];
        bytes[..CHECKSUM_SIZE].copy_from_slice(self.checksum.as_bytes());
        bytes[CHECKSUM_SIZE..].copy_from_slice(&self.modified_length.to_be_bytes());
        bytes
    }

    /// Parse a trailer from exactly 20 bytes
    pub fn decode(bytes: &[u8]) -> PatchResult<Self> {
        if bytes.len() != TRAILER_SIZE {
            return Err(PatchError::malformed_trailer(format!(
                "expected {TRAILER_SIZE} trailer bytes, got {}",
                bytes.len()
            )));
        }

        Ok(Self::read(&mut Cursor::new(bytes))?)
    }

    /// Read the trailer from the final 20 bytes of a patch stream
    pub fn read_from(patch: &mut dyn ByteSource) -> PatchResult<Self> {
        let patch_len = patch.len();
        if patch_len < TRAILER_SIZE as u64 {
            return Err(PatchError::malformed_trailer(format!(
                "patch is {patch_len} bytes, shorter than the {TRAILER_SIZE}-byte trailer"
            )));
        }

        let mut bytes = [0u8; TRAILER_SIZE];
        patch.read_exact_at(patch_len - TRAILER_SIZE as u64, &mut bytes)?;
        Self::decode(&bytes)
    }

    /// Check the declared length against the patch it was read from
    ///
    /// The length must be non-zero and no larger than the patch body.
    pub fn validate(&self, patch_len: u64) -> PatchResult<()> {
        if self.modified_length == 0 {
            return Err(PatchError::invalid_patch(
                "patched file size was zero, this usually indicates a corrupt or invalid patch file",
            ));
        }

        let body_len = patch_len.saturating_sub(TRAILER_SIZE as u64);
        let declared = u64::from(self.modified_length);
        if declared > body_len {
            return Err(PatchError::invalid_patch(format!(
                "trailer declares {declared} bytes but the patch body holds only {body_len}"
            )));
        }

        if declared < body_len {
            warn!(
                "Patch body holds {body_len} bytes but trailer declares {declared}; ignoring the excess"
            );
        }

        Ok(())
    }

    /// Length of the modified file as a u64
    pub fn output_size(&self) -> u64 {
        u64::from(self.modified_length)
    }
}

/// Convert a modified stream length into the 4-byte trailer field
pub fn length_field(length: u64) -> PatchResult<u32> {
    u32::try_from(length).map_err(|_| PatchError::SizeLimitExceeded {
        role: InputRole::Modified,
        size: length,
        limit: MAX_MODIFIED_LENGTH,
    })
}

/// Encode a checksum and modified length into trailer bytes
pub fn encode_trailer(checksum: Checksum, modified_length: u32) -> [u8; TRAILER_SIZE] {
    PatchTrailer::new(checksum, modified_length).encode()
}

/// Decode trailer bytes into the checksum and modified length
pub fn decode_trailer(bytes: &[u8]) -> PatchResult<(Checksum, u32)> {
    let trailer = PatchTrailer::decode(bytes)?;
    Ok((trailer.checksum, trailer.modified_length))
}
