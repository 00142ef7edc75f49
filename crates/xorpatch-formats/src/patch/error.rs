//! Error types for XOR patch operations
//!
//! Every failure of a generate or apply call maps to exactly one variant.
//! All of them are terminal for the operation: no partial output is
//! finalized and nothing is retried internally.

use std::fmt;
use thiserror::Error;
use xorpatch_crypto::Checksum;

/// Role of an input stream, used in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRole {
    /// The file a patch is generated against and applied to
    Original,
    /// The file a patch reproduces
    Modified,
    /// The patch file itself
    Patch,
}

impl fmt::Display for InputRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => write!(f, "original file"),
            Self::Modified => write!(f, "modified file"),
            Self::Patch => write!(f, "patch file"),
        }
    }
}

/// Kind of operation a session can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Producing a patch from an original and modified file
    Generate,
    /// Reconstructing a modified file from an original and a patch
    Apply,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generate => write!(f, "patch generation"),
            Self::Apply => write!(f, "patch application"),
        }
    }
}

/// XOR patch error types
#[derive(Error, Debug)]
pub enum PatchError {
    /// A required input stream was not supplied
    #[error("You have not supplied the {0}")]
    MissingInput(InputRole),

    /// Patch stream is too short to hold a trailer or is unreadable
    #[error("Malformed patch trailer: {reason}")]
    MalformedTrailer {
        /// Description of the problem
        reason: String,
    },

    /// Trailer decoded but describes an impossible output
    #[error("Invalid patch: {reason}")]
    InvalidPatch {
        /// Description of the problem
        reason: String,
    },

    /// Original file does not match the one the patch was generated against
    #[error(
        "File checksums do not match! Make sure you have the correct original and patch files. \
         Original checksum: {actual}, patch file expected checksum: {expected}"
    )]
    ChecksumMismatch {
        /// Checksum recorded in the patch trailer
        expected: Checksum,
        /// Checksum computed from the supplied original
        actual: Checksum,
    },

    /// Stream length exceeds the trailer field or a configured ceiling
    #[error("The {role} is too large: {size} bytes (maximum {limit} bytes)")]
    SizeLimitExceeded {
        /// Which stream was too large
        role: InputRole,
        /// Length of the stream
        size: u64,
        /// Largest permitted length
        limit: u64,
    },

    /// Another operation is already running on this session
    #[error("Processing in progress, please wait: {0} is already running")]
    OperationInProgress(OperationKind),

    /// Caller requested the operation to stop
    #[error("Operation aborted by caller")]
    Aborted,

    /// Reading an input or writing the output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for XOR patch operations
pub type PatchResult<T> = Result<T, PatchError>;

impl PatchError {
    /// Create a malformed trailer error with a reason
    pub fn malformed_trailer<S: Into<String>>(reason: S) -> Self {
        Self::MalformedTrailer {
            reason: reason.into(),
        }
    }

    /// Create an invalid patch error with a reason
    pub fn invalid_patch<S: Into<String>>(reason: S) -> Self {
        Self::InvalidPatch {
            reason: reason.into(),
        }
    }

    /// Check if this error indicates a corrupt or unusable patch
    pub fn is_corruption_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedTrailer { .. } | Self::InvalidPatch { .. }
        )
    }

    /// Check if this error is caused by the inputs the caller chose
    ///
    /// These are fixed by supplying different files, not by retrying.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingInput(_) | Self::ChecksumMismatch { .. } | Self::SizeLimitExceeded { .. }
        )
    }
}

impl From<binrw::Error> for PatchError {
    fn from(error: binrw::Error) -> Self {
        Self::malformed_trailer(error.to_string())
    }
}
