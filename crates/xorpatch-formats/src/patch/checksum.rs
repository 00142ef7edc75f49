//! Chunked checksum pipeline over a byte source

use crate::patch::control::ChunkContext;
use crate::patch::error::PatchResult;
use crate::patch::progress::{Progress, percent};
use crate::patch::stream::ByteSource;
use tracing::debug;
use xorpatch_crypto::{Checksum, ChecksumHasher};

/// Compute the checksum of a whole source, one chunk at a time
///
/// Only one chunk of the source is resident at any moment. Progress is
/// reported after every chunk; an empty source reports nothing.
pub fn checksum_source(
    source: &mut dyn ByteSource,
    context: &mut ChunkContext<'_>,
) -> PatchResult<Checksum> {
    let total = source.len();
    let chunk_size = context.chunk_size();
    let mut buffer = vec![0u8; buffer_len(chunk_size, total)];
    let mut hasher = ChecksumHasher::new();
    let mut offset = 0u64;

    while offset < total {
        context.checkpoint()?;

        let len = (total - offset).min(chunk_size as u64) as usize;
        let chunk = &mut buffer[..len];
        source.read_exact_at(offset, chunk)?;
        hasher.update(chunk);
        offset += len as u64;

        debug!("Checksummed {offset}/{total} bytes");
        context.report(Progress::Checksum {
            percent: percent(offset, total),
        });
        context.tick();
    }

    Ok(hasher.finalize())
}

/// Size of the scratch buffer for a stream of `total` bytes
pub(crate) fn buffer_len(chunk_size: usize, total: u64) -> usize {
    usize::try_from(total).map_or(chunk_size, |total| total.min(chunk_size))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::patch::control::AbortHandle;
    use crate::patch::error::PatchError;
    use crate::patch::progress::NoProgress;
    use crate::patch::stream::SliceSource;
    use crate::test_utils::{RecordingProgress, sample_data};

    #[test]
    fn test_chunked_checksum_matches_one_shot() {
        let data = sample_data(10_000, 7);
        let abort = AbortHandle::new();

        for chunk_size in [1, 3, 64, 4096, 10_000, 1 << 20] {
            let mut progress = NoProgress;
            let mut context = ChunkContext::new(chunk_size, &abort, &mut progress);
            let checksum = checksum_source(&mut SliceSource::new(&data), &mut context)
                .expect("checksum should succeed");
            assert_eq!(checksum, Checksum::from_data(&data), "chunk size {chunk_size}");
        }
    }

    #[test]
    fn test_empty_source_checksum() {
        let abort = AbortHandle::new();
        let mut progress = RecordingProgress::default();
        let mut context = ChunkContext::new(16, &abort, &mut progress);

        let checksum =
            checksum_source(&mut SliceSource::new(&[]), &mut context).expect("empty is fine");
        assert_eq!(checksum.to_hex(), "d41d8cd98f00b204e9800998ecf8427e");
        assert!(progress.messages.is_empty());
        assert_eq!(progress.ticks, 0);
    }

    #[test]
    fn test_checksum_progress_per_chunk() {
        let data = sample_data(10, 1);
        let abort = AbortHandle::new();
        let mut progress = RecordingProgress::default();
        let mut context = ChunkContext::new(4, &abort, &mut progress);

        checksum_source(&mut SliceSource::new(&data), &mut context).expect("checksum");
        assert_eq!(
            progress.messages,
            vec![
                "Calculating checksum... 40%",
                "Calculating checksum... 80%",
                "Calculating checksum... 100%",
            ]
        );
        assert_eq!(progress.ticks, 3);
    }

    #[test]
    fn test_checksum_honors_abort() {
        let data = sample_data(100, 3);
        let abort = AbortHandle::new();
        abort.abort();
        let mut progress = NoProgress;
        let mut context = ChunkContext::new(10, &abort, &mut progress);

        assert!(matches!(
            checksum_source(&mut SliceSource::new(&data), &mut context),
            Err(PatchError::Aborted)
        ));
    }

    #[test]
    fn test_buffer_len_is_bounded() {
        assert_eq!(buffer_len(64, 10), 10);
        assert_eq!(buffer_len(64, 1000), 64);
        assert_eq!(buffer_len(64, 0), 0);
    }
}
