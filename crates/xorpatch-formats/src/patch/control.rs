//! Per-operation chunk control: abort requests and progress delivery

use crate::patch::error::{PatchError, PatchResult};
use crate::patch::progress::{Progress, ProgressSink};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable handle used to request that a running operation stop
///
/// The request is honored at the next chunk boundary.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    requested: Arc<AtomicBool>,
}

impl AbortHandle {
    /// Create a handle with no abort requested
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the running operation stop
    pub fn abort(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Whether an abort has been requested
    pub fn is_aborted(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Clear a previous request
    pub(crate) fn reset(&self) {
        self.requested.store(false, Ordering::SeqCst);
    }
}

/// Everything a chunk loop needs besides its streams
pub struct ChunkContext<'a> {
    chunk_size: usize,
    abort: &'a AbortHandle,
    progress: &'a mut dyn ProgressSink,
}

impl<'a> ChunkContext<'a> {
    /// Create a context for one operation
    pub fn new(chunk_size: usize, abort: &'a AbortHandle, progress: &'a mut dyn ProgressSink) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            abort,
            progress,
        }
    }

    /// Bytes processed per iteration
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Fail with `Aborted` if the caller asked to stop
    pub fn checkpoint(&self) -> PatchResult<()> {
        if self.abort.is_aborted() {
            return Err(PatchError::Aborted);
        }
        Ok(())
    }

    /// Forward a status update
    pub fn report(&mut self, progress: Progress) {
        self.progress.report(&progress);
    }

    /// Signal that a chunk has been completed
    pub fn tick(&mut self) {
        self.progress.tick();
    }
}
