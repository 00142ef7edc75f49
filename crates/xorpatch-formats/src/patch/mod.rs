//! XOR patch format implementation
//!
//! A patch is a position-aligned XOR mask between two files plus a trailer
//! identifying the original file. There is no alignment search, no
//! copy/insert encoding and no compression: the patch body is always
//! exactly as long as the modified file.
//!
//! # Format Structure
//!
//! ```text
//! Patch File (N bytes):
//! ├── Body (N - 20 bytes)
//! │   └── modified[i] ^ original[i], original zero-extended
//! └── Trailer (20 bytes)
//!     ├── Original checksum: MD5 (16 bytes)
//!     └── Modified length (4 bytes, big-endian)
//! ```
//!
//! # Key Characteristics
//!
//! - **Self-Inverse Transform**: the same XOR produces and applies patches
//! - **Zero-Extension**: files may grow, shrink or keep their length
//! - **Checksum Gate**: application refuses an original whose MD5 differs
//! - **4 GiB Ceiling**: the length field is a 32-bit unsigned integer
//! - **Chunked Streaming**: inputs are never fully resident in memory
//!
//! # Usage Examples
//!
//! ## In-memory round trip
//!
//! ```rust
//! use xorpatch_formats::patch;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let original = [0x01, 0x02, 0x03];
//! let modified = [0xFF, 0x00];
//!
//! let patch_data = patch::generate_patch(&original, &modified)?;
//! assert_eq!(&patch_data[..2], &[0xFE, 0x02]);
//!
//! let restored = patch::apply_patch(&original, &patch_data)?;
//! assert_eq!(restored, modified);
//! # Ok(())
//! # }
//! ```
//!
//! ## Streaming files through a session
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::io::BufWriter;
//! use xorpatch_formats::patch::{PatchConfig, PatchSession, ReaderSource, WriterSink};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = PatchSession::new(PatchConfig::default());
//! let mut original = ReaderSource::new(File::open("game.bin")?)?;
//! let mut modified = ReaderSource::new(File::open("game-modded.bin")?)?;
//! let sink = WriterSink::new(BufWriter::new(File::create("game-modded.bin_patch.bin")?));
//!
//! session.generate(
//!     Some(&mut original),
//!     Some(&mut modified),
//!     sink,
//!     &mut |progress: &xorpatch_formats::patch::Progress| println!("{progress}"),
//! )?;
//! # Ok(())
//! # }
//! ```

mod applier;
mod checksum;
mod config;
mod control;
mod error;
mod generator;
mod progress;
mod session;
mod stream;
mod trailer;
mod xor;

// Re-export public API
pub use applier::PatchApplier;
pub use checksum::checksum_source;
pub use config::{DEFAULT_CHUNK_SIZE, DEFAULT_LARGE_INPUT_WARNING, PatchConfig};
pub use control::{AbortHandle, ChunkContext};
pub use error::{InputRole, OperationKind, PatchError, PatchResult};
pub use generator::PatchGenerator;
pub use progress::{NoProgress, Progress, ProgressSink, percent};
pub use session::{PatchSession, SessionState, apply_patch, generate_patch};
pub use stream::{
    ByteSink, ByteSource, ReaderSource, SliceSource, VecSink, WriterSink, read_zero_extended,
};
pub use trailer::{
    MAX_MODIFIED_LENGTH, PatchTrailer, TRAILER_SIZE, decode_trailer, encode_trailer, length_field,
};
pub use xor::{transform_streams, xor_byte, xor_in_place, xor_zero_extended};
