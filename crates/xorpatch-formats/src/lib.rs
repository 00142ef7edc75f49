//! XOR binary patch format
//!
#![allow(clippy::cast_possible_truncation)] // Chunk lengths are bounded by the chunk size
#![allow(clippy::cast_precision_loss)] // Size reporting in log messages
#![allow(clippy::doc_markdown)] // Format terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::return_self_not_must_use)] // Builder patterns
//! This crate implements a fixed-cost, position-aligned binary patch: the
//! patch body is the byte-wise XOR of the original and modified files, and a
//! 20-byte trailer records the MD5 checksum of the original file and the
//! length of the modified file.
//!
//! # Format
//!
//! ```text
//! offset 0 .. N-20     modified XOR original (original zero-extended)
//! offset N-20 .. N-4   MD5 checksum of the original file
//! offset N-4 .. N      modified file length, u32 big-endian
//! ```
//!
//! # Design Principles
//!
//! - **Symmetric Operations**: generation and application are the same XOR
//!   transform fed with different streams
//! - **Chunked Streaming**: inputs are read one bounded chunk at a time
//! - **Verified Application**: the original file's checksum must match the
//!   trailer before any output is produced
//!
//! # Example
//!
//! ```rust
//! use xorpatch_formats::patch;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let original = b"Hello, World!";
//! let modified = b"Hello, Rust!";
//!
//! let patch_data = patch::generate_patch(original, modified)?;
//! assert_eq!(patch_data.len(), modified.len() + patch::TRAILER_SIZE);
//!
//! let restored = patch::apply_patch(original, &patch_data)?;
//! assert_eq!(restored, modified);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// XOR patch generation, application and the trailer codec
///
/// Key features:
/// - **Trailer Codec**: 16-byte checksum plus 4-byte big-endian length
/// - **Zero-Extension**: streams of unequal length are padded with zeros
/// - **Checksum Verification**: patches only apply to the original they were made from
/// - **Session Guard**: one operation in flight per session, abortable between chunks
///
/// See the [`patch`] module for usage examples.
pub mod patch;

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;
