//! Content checksums for XOR patch files
//!
//! Every patch carries the MD5 digest of the original file it was generated
//! against. This crate provides the digest type stored in the patch trailer
//! and an incremental hasher that can be fed one chunk at a time, so files
//! larger than memory can be checksummed.
//!
//! # Examples
//!
//! ## One-shot checksum
//!
//! ```
//! use xorpatch_crypto::Checksum;
//!
//! let checksum = Checksum::from_data(b"Hello, World!");
//! assert_eq!(checksum.to_hex(), "65a8e27d8879283831b664bd8b7f0ad4");
//! ```
//!
//! ## Incremental checksum
//!
//! ```
//! use xorpatch_crypto::{Checksum, ChecksumHasher};
//!
//! let mut hasher = ChecksumHasher::new();
//! hasher.update(b"Hello, ");
//! hasher.update(b"World!");
//! assert_eq!(hasher.finalize(), Checksum::from_data(b"Hello, World!"));
//! ```

#![warn(missing_docs)]

pub mod checksum;
pub mod error;

pub use checksum::{CHECKSUM_SIZE, Checksum, ChecksumHasher};
pub use error::ChecksumError;
