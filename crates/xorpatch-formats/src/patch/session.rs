//! Patch sessions: one operation in flight at a time
//!
//! A [`PatchSession`] owns its configuration, an abort handle and an
//! explicit state. Starting an operation moves the state from `Idle` to
//! `Running`; a second request while running is rejected rather than
//! queued. The state goes back to `Idle` however the operation ends.

use crate::patch::applier::PatchApplier;
use crate::patch::config::PatchConfig;
use crate::patch::control::{AbortHandle, ChunkContext};
use crate::patch::error::{InputRole, OperationKind, PatchError, PatchResult};
use crate::patch::generator::PatchGenerator;
use crate::patch::progress::{NoProgress, ProgressSink};
use crate::patch::stream::{ByteSink, ByteSource, SliceSource, VecSink};
use crate::patch::trailer::{PatchTrailer, TRAILER_SIZE};
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Current state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No operation running
    Idle,
    /// An operation of the given kind is running
    Running(OperationKind),
}

/// Owner of one logical patching session
#[derive(Debug)]
pub struct PatchSession {
    config: PatchConfig,
    state: Mutex<SessionState>,
    abort: AbortHandle,
}

/// Resets the session to `Idle` when dropped
struct RunningGuard<'s> {
    state: &'s Mutex<SessionState>,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock() = SessionState::Idle;
    }
}

impl Default for PatchSession {
    fn default() -> Self {
        Self::new(PatchConfig::default())
    }
}

impl PatchSession {
    /// Create an idle session
    pub fn new(config: PatchConfig) -> Self {
        Self {
            config,
            state: Mutex::new(SessionState::Idle),
            abort: AbortHandle::new(),
        }
    }

    /// Session configuration
    pub const fn config(&self) -> &PatchConfig {
        &self.config
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// Handle that aborts whatever operation is running on this session
    ///
    /// Every operation clears the handle when it starts, so an abort
    /// requested while the session is idle is discarded.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    fn begin(&self, kind: OperationKind) -> PatchResult<RunningGuard<'_>> {
        let mut state = self.state.lock();
        if let SessionState::Running(running) = *state {
            warn!("Rejected {kind} request: {running} in progress");
            return Err(PatchError::OperationInProgress(running));
        }

        *state = SessionState::Running(kind);
        self.abort.reset();
        debug!("Session started {kind}");
        Ok(RunningGuard { state: &self.state })
    }

    /// Generate a patch from `original` and `modified` into `sink`
    pub fn generate<S: ByteSink>(
        &self,
        original: Option<&mut dyn ByteSource>,
        modified: Option<&mut dyn ByteSource>,
        sink: S,
        progress: &mut dyn ProgressSink,
    ) -> PatchResult<S::Output> {
        let _guard = self.begin(OperationKind::Generate)?;
        let original = original.ok_or(PatchError::MissingInput(InputRole::Original))?;
        let modified = modified.ok_or(PatchError::MissingInput(InputRole::Modified))?;

        let mut context =
            ChunkContext::new(self.config.effective_chunk_size(), &self.abort, progress);
        PatchGenerator::new(&self.config).generate(original, modified, sink, &mut context)
    }

    /// Apply `patch` to `original`, writing the modified file into `sink`
    pub fn apply<S: ByteSink>(
        &self,
        original: Option<&mut dyn ByteSource>,
        patch: Option<&mut dyn ByteSource>,
        sink: S,
        progress: &mut dyn ProgressSink,
    ) -> PatchResult<S::Output> {
        let _guard = self.begin(OperationKind::Apply)?;
        let original = original.ok_or(PatchError::MissingInput(InputRole::Original))?;
        let patch = patch.ok_or(PatchError::MissingInput(InputRole::Patch))?;

        let mut context =
            ChunkContext::new(self.config.effective_chunk_size(), &self.abort, progress);
        PatchApplier::new(&self.config).apply(original, patch, sink, &mut context)
    }

    /// Read and validate a patch trailer without applying the patch
    pub fn inspect(&self, patch: Option<&mut dyn ByteSource>) -> PatchResult<PatchTrailer> {
        let patch = patch.ok_or(PatchError::MissingInput(InputRole::Patch))?;
        PatchApplier::new(&self.config).inspect(patch)
    }
}

/// Generate a patch for two in-memory buffers
///
/// # Examples
///
/// ```rust
/// use xorpatch_formats::patch::generate_patch;
///
/// let patch = generate_patch(&[0x01, 0x02, 0x03], &[0xFF, 0x00]).expect("valid inputs");
/// assert_eq!(&patch[..2], &[0xFE, 0x02]);
/// assert_eq!(&patch[18..], &[0x00, 0x00, 0x00, 0x02]);
/// ```
pub fn generate_patch(original: &[u8], modified: &[u8]) -> PatchResult<Vec<u8>> {
    let session = PatchSession::default();
    session.generate(
        Some(&mut SliceSource::new(original)),
        Some(&mut SliceSource::new(modified)),
        VecSink::with_capacity(modified.len() + TRAILER_SIZE),
        &mut NoProgress,
    )
}

/// Apply a patch to an in-memory original
pub fn apply_patch(original: &[u8], patch: &[u8]) -> PatchResult<Vec<u8>> {
    let session = PatchSession::default();
    session.apply(
        Some(&mut SliceSource::new(original)),
        Some(&mut SliceSource::new(patch)),
        VecSink::with_capacity(patch.len().saturating_sub(TRAILER_SIZE)),
        &mut NoProgress,
    )
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::patch::progress::Progress;
    use crate::test_utils::sample_data;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::sync::mpsc;
    use std::thread;

    #[test]
    fn test_session_starts_idle() {
        let session = PatchSession::default();
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_missing_inputs() {
        let session = PatchSession::default();
        let data = [1u8, 2, 3];

        let result = session.generate(
            None,
            Some(&mut SliceSource::new(&data)),
            VecSink::new(),
            &mut NoProgress,
        );
        assert!(matches!(
            result,
            Err(PatchError::MissingInput(InputRole::Original))
        ));

        let result = session.generate(
            Some(&mut SliceSource::new(&data)),
            None,
            VecSink::new(),
            &mut NoProgress,
        );
        assert!(matches!(
            result,
            Err(PatchError::MissingInput(InputRole::Modified))
        ));

        let result = session.apply(
            Some(&mut SliceSource::new(&data)),
            None,
            VecSink::new(),
            &mut NoProgress,
        );
        assert!(matches!(
            result,
            Err(PatchError::MissingInput(InputRole::Patch))
        ));

        assert!(matches!(
            session.inspect(None),
            Err(PatchError::MissingInput(InputRole::Patch))
        ));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_state_returns_to_idle_after_failure() {
        let session = PatchSession::default();
        let result = session.apply(
            Some(&mut SliceSource::new(&[1, 2, 3])),
            Some(&mut SliceSource::new(&[0u8; 4])),
            VecSink::new(),
            &mut NoProgress,
        );
        assert!(matches!(result, Err(PatchError::MalformedTrailer { .. })));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_state_is_running_during_operation() {
        let session = PatchSession::new(PatchConfig::default().with_chunk_size(1));
        let mut observed = Vec::new();
        {
            let mut progress = |_: &Progress| observed.push(session.state());
            session
                .generate(
                    Some(&mut SliceSource::new(&[1, 2])),
                    Some(&mut SliceSource::new(&[3, 4])),
                    VecSink::new(),
                    &mut progress,
                )
                .expect("generation");
        }

        assert!(!observed.is_empty());
        assert!(
            observed
                .iter()
                .all(|state| *state == SessionState::Running(OperationKind::Generate))
        );
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_overlapping_request_is_rejected() {
        let session = Arc::new(PatchSession::new(PatchConfig::default().with_chunk_size(1)));
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let worker = {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                let original = sample_data(8, 1);
                let modified = sample_data(8, 2);
                let mut first = true;
                let mut progress = |_: &Progress| {
                    if first {
                        first = false;
                        started_tx.send(()).expect("main thread is listening");
                        release_rx.recv().expect("main thread releases the worker");
                    }
                };
                session.generate(
                    Some(&mut SliceSource::new(&original)),
                    Some(&mut SliceSource::new(&modified)),
                    VecSink::new(),
                    &mut progress,
                )
            })
        };

        started_rx.recv().expect("worker started");
        let overlapping = session.apply(
            Some(&mut SliceSource::new(&[1])),
            Some(&mut SliceSource::new(&[0u8; 21])),
            VecSink::new(),
            &mut NoProgress,
        );
        assert!(matches!(
            overlapping,
            Err(PatchError::OperationInProgress(OperationKind::Generate))
        ));
        release_tx.send(()).expect("worker is waiting");

        let patch = worker
            .join()
            .expect("worker thread")
            .expect("first operation completes");
        assert_eq!(patch.len(), 8 + TRAILER_SIZE);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_abort_between_chunks() {
        let session = PatchSession::new(PatchConfig::default().with_chunk_size(4));
        let abort = session.abort_handle();
        let original = sample_data(64, 3);
        let modified = sample_data(64, 4);

        let mut chunks = 0;
        let mut progress = |progress: &Progress| {
            if let Progress::Generating { .. } = progress {
                chunks += 1;
                if chunks == 2 {
                    abort.abort();
                }
            }
        };
        let result = session.generate(
            Some(&mut SliceSource::new(&original)),
            Some(&mut SliceSource::new(&modified)),
            VecSink::new(),
            &mut progress,
        );

        assert!(matches!(result, Err(PatchError::Aborted)));
        assert_eq!(chunks, 2);
        assert_eq!(session.state(), SessionState::Idle);

        // A fresh operation clears the earlier request
        let patch = session
            .generate(
                Some(&mut SliceSource::new(&original)),
                Some(&mut SliceSource::new(&modified)),
                VecSink::new(),
                &mut NoProgress,
            )
            .expect("generation after abort");
        assert_eq!(apply_patch(&original, &patch).expect("apply"), modified);
    }

    #[test]
    fn test_abort_while_idle_is_discarded() {
        let session = PatchSession::default();
        session.abort_handle().abort();

        let patch = session
            .generate(
                Some(&mut SliceSource::new(&[1, 2, 3])),
                Some(&mut SliceSource::new(&[4])),
                VecSink::new(),
                &mut NoProgress,
            )
            .expect("idle abort does not carry over");
        assert_eq!(patch.len(), 1 + TRAILER_SIZE);
        assert!(!session.abort_handle().is_aborted());
    }

    #[test]
    fn test_one_shot_round_trip() {
        let original = b"The quick brown fox".to_vec();
        let modified = b"The quick brown fox jumps over the lazy dog".to_vec();

        let patch = generate_patch(&original, &modified).expect("generate");
        assert_eq!(apply_patch(&original, &patch).expect("apply"), modified);
    }
}
