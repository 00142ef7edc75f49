//! Patch application
//!
//! Application reads the trailer, refuses patches with an impossible
//! length, verifies the original file against the recorded checksum and
//! only then XORs the patch body back onto the original.

use crate::patch::checksum::checksum_source;
use crate::patch::config::PatchConfig;
use crate::patch::control::ChunkContext;
use crate::patch::error::{InputRole, PatchError, PatchResult};
use crate::patch::progress::Progress;
use crate::patch::stream::{ByteSink, ByteSource};
use crate::patch::trailer::PatchTrailer;
use crate::patch::xor::transform_streams;
use tracing::{info, warn};

/// Reconstructs modified streams from an original and a patch
#[derive(Debug, Clone, Copy)]
pub struct PatchApplier<'c> {
    config: &'c PatchConfig,
}

impl<'c> PatchApplier<'c> {
    /// Create an applier using the given configuration
    pub const fn new(config: &'c PatchConfig) -> Self {
        Self { config }
    }

    /// Read and validate the trailer of a patch without applying it
    pub fn inspect(&self, patch: &mut dyn ByteSource) -> PatchResult<PatchTrailer> {
        self.config.check_input_size(InputRole::Patch, patch.len())?;

        let trailer = PatchTrailer::read_from(patch)?;
        info!("Patched file size is {} bytes", trailer.modified_length);
        info!(
            "Patch file expected original file checksum to be {}",
            trailer.checksum
        );
        trailer.validate(patch.len())?;
        Ok(trailer)
    }

    /// Apply a patch, streaming the modified file into `sink`
    ///
    /// Nothing is appended to the sink until the original has been
    /// verified. On error the sink is dropped without being finalized.
    pub fn apply<S: ByteSink>(
        &self,
        original: &mut dyn ByteSource,
        patch: &mut dyn ByteSource,
        mut sink: S,
        context: &mut ChunkContext<'_>,
    ) -> PatchResult<S::Output> {
        self.config
            .check_input_size(InputRole::Original, original.len())?;

        context.report(Progress::ReadingMetadata);
        let trailer = self.inspect(patch)?;

        let actual = checksum_source(original, context)?;
        info!("Original file checksum is {actual}");

        if actual != trailer.checksum {
            warn!("Checksums do not match!");
            return Err(PatchError::ChecksumMismatch {
                expected: trailer.checksum,
                actual,
            });
        }
        info!("Checksums match!");

        transform_streams(
            original,
            patch,
            trailer.output_size(),
            &mut sink,
            context,
            |percent| Progress::Applying { percent },
        )?;

        let output = sink.finalize()?;
        context.report(Progress::ApplicationComplete);
        Ok(output)
    }
}
