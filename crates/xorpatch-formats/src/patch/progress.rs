//! Progress reporting for long-running patch operations

use std::fmt;

/// Status update emitted while a patch operation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Generation has started
    StartingGeneration,
    /// Checksumming the original file
    Checksum {
        /// Share of the original file hashed so far
        percent: u8,
    },
    /// Producing patch body chunks
    Generating {
        /// Share of the modified file processed so far
        percent: u8,
    },
    /// Reading the patch trailer
    ReadingMetadata,
    /// Producing modified file chunks
    Applying {
        /// Share of the modified file reconstructed so far
        percent: u8,
    },
    /// Generation finished successfully
    GenerationComplete,
    /// Application finished successfully
    ApplicationComplete,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartingGeneration => write!(f, "Starting patch generation..."),
            Self::Checksum { percent } => write!(f, "Calculating checksum... {percent}%"),
            Self::Generating { percent } => write!(f, "Generating patch... {percent}%"),
            Self::ReadingMetadata => write!(f, "Reading patch metadata..."),
            Self::Applying { percent } => write!(f, "Applying patch... {percent}%"),
            Self::GenerationComplete => write!(f, "Patch generation complete!"),
            Self::ApplicationComplete => write!(f, "Patch application complete!"),
        }
    }
}

/// Completed share of `total`, rounded half up to a whole percent
pub fn percent(done: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let done = u128::from(done.min(total));
    let total = u128::from(total);
    ((done * 100 + total / 2) / total) as u8
}

/// Receiver for progress updates
///
/// `tick` is called after every processed chunk and is the place for a host
/// to yield to its event loop. It has no effect on the result.
pub trait ProgressSink {
    /// Receive a status update
    fn report(&mut self, progress: &Progress);

    /// Chunk boundary reached
    fn tick(&mut self) {}
}

impl<F: FnMut(&Progress)> ProgressSink for F {
    fn report(&mut self, progress: &Progress) {
        self(progress);
    }
}

/// Progress sink that discards every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _progress: &Progress) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(0, 3), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 200), 1);
        assert_eq!(percent(3, 3), 100);
        assert_eq!(percent(0, 0), 100);
        assert_eq!(percent(u64::MAX, u64::MAX), 100);
    }

    #[test]
    fn test_progress_messages() {
        assert_eq!(
            Progress::Checksum { percent: 50 }.to_string(),
            "Calculating checksum... 50%"
        );
        assert_eq!(
            Progress::Applying { percent: 100 }.to_string(),
            "Applying patch... 100%"
        );
        assert_eq!(
            Progress::GenerationComplete.to_string(),
            "Patch generation complete!"
        );
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |progress: &Progress| seen.push(progress.to_string());
            sink.report(&Progress::ReadingMetadata);
            sink.tick();
        }
        assert_eq!(seen, vec!["Reading patch metadata...".to_string()]);
    }
}
