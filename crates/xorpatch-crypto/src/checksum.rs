//! MD5 content checksums
//!
//! MD5 is used because existing patch files embed MD5 digests of their
//! original file; any other algorithm would break compatibility with them.

use crate::error::ChecksumError;
use binrw::{BinRead, BinWrite};
use md5::{Digest, Md5};
use std::fmt;

/// Size of a checksum in bytes
pub const CHECKSUM_SIZE: usize = 16;

/// 128-bit MD5 digest of a file's content
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Checksum([u8; CHECKSUM_SIZE]);

impl Checksum {
    /// Create a checksum from raw digest bytes
    pub const fn from_bytes(bytes: [u8; CHECKSUM_SIZE]) -> Self {
        Self(bytes)
    }

    /// Compute the checksum of a complete buffer
    pub fn from_data(data: &[u8]) -> Self {
        let mut hasher = ChecksumHasher::new();
        hasher.update(data);
        hasher.finalize()
    }

    /// Parse a checksum from a hex string (upper or lower case)
    pub fn from_hex(hex: &str) -> Result<Self, ChecksumError> {
        let mut bytes = [0u8; CHECKSUM_SIZE];
        hex::decode_to_slice(hex.trim(), &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Get raw digest bytes
    pub const fn as_bytes(&self) -> &[u8; CHECKSUM_SIZE] {
        &self.0
    }

    /// Convert to a lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; CHECKSUM_SIZE]> for Checksum {
    fn from(bytes: [u8; CHECKSUM_SIZE]) -> Self {
        Self(bytes)
    }
}

/// Incremental MD5 hasher
///
/// Chunks must be fed in stream order. The digest is identical no matter
/// where the chunk boundaries fall.
#[derive(Clone, Default)]
pub struct ChecksumHasher {
    inner: Md5,
    bytes_hashed: u64,
}

impl ChecksumHasher {
    /// Create a hasher with no data appended
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next chunk of the stream
    pub fn update(&mut self, chunk: &[u8]) {
        self.inner.update(chunk);
        self.bytes_hashed += chunk.len() as u64;
    }

    /// Total number of bytes appended so far
    pub const fn bytes_hashed(&self) -> u64 {
        self.bytes_hashed
    }

    /// Consume the hasher and produce the final digest
    pub fn finalize(self) -> Checksum {
        let result = self.inner.finalize();
        let mut bytes = [0u8; CHECKSUM_SIZE];
        bytes.copy_from_slice(&result);
        Checksum(bytes)
    }
}

impl fmt::Debug for ChecksumHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChecksumHasher")
            .field("bytes_hashed", &self.bytes_hashed)
            .finish_non_exhaustive()
    }
}
