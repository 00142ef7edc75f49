//! Error types for checksum operations

use thiserror::Error;

/// Errors that can occur while handling checksums
#[derive(Debug, Error)]
pub enum ChecksumError {
    /// Hex string could not be decoded into a 16-byte digest
    #[error("Invalid checksum hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
