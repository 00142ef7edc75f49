//! Patch generation
//!
//! A patch is the modified file XORed with the (zero-extended) original,
//! followed by the trailer. Generation never fails on content; it only
//! fails on I/O, aborts and lengths the trailer cannot represent.

use crate::patch::checksum::checksum_source;
use crate::patch::config::PatchConfig;
use crate::patch::control::ChunkContext;
use crate::patch::error::{InputRole, PatchResult};
use crate::patch::progress::Progress;
use crate::patch::stream::{ByteSink, ByteSource};
use crate::patch::trailer::{PatchTrailer, TRAILER_SIZE, length_field};
use crate::patch::xor::transform_streams;
use tracing::info;

/// Produces patches from an original and a modified stream
#[derive(Debug, Clone, Copy)]
pub struct PatchGenerator<'c> {
    config: &'c PatchConfig,
}

impl<'c> PatchGenerator<'c> {
    /// Create a generator using the given configuration
    pub const fn new(config: &'c PatchConfig) -> Self {
        Self { config }
    }

    /// Generate a patch, streaming it into `sink`
    ///
    /// The sink receives exactly `modified.len() + 20` bytes. On error the
    /// sink is dropped without being finalized.
    pub fn generate<S: ByteSink>(
        &self,
        original: &mut dyn ByteSource,
        modified: &mut dyn ByteSource,
        mut sink: S,
        context: &mut ChunkContext<'_>,
    ) -> PatchResult<S::Output> {
        let original_len = original.len();
        let modified_len = modified.len();

        self.config
            .check_input_size(InputRole::Original, original_len)?;
        self.config
            .check_input_size(InputRole::Modified, modified_len)?;
        let length = length_field(modified_len)?;

        info!("Original file size: {original_len} bytes");
        info!("Modified file size: {modified_len} bytes");
        info!(
            "Patch file size will be: {} bytes",
            modified_len + TRAILER_SIZE as u64
        );
        context.report(Progress::StartingGeneration);

        let checksum = checksum_source(original, context)?;
        info!("Original file checksum is {checksum}");

        transform_streams(
            original,
            modified,
            modified_len,
            &mut sink,
            context,
            |percent| Progress::Generating { percent },
        )?;

        let trailer = PatchTrailer::new(checksum, length);
        sink.append(&trailer.encode())?;

        let output = sink.finalize()?;
        context.report(Progress::GenerationComplete);
        Ok(output)
    }
}
