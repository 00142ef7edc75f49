//! Progress output for the terminal.

use tracing::info;
use xorpatch_formats::patch::{Progress, ProgressSink};

/// Logs each distinct status once
#[derive(Debug, Default)]
pub struct LogProgress {
    quiet: bool,
    last: Option<Progress>,
}

impl LogProgress {
    pub fn new(quiet: bool) -> Self {
        Self { quiet, last: None }
    }
}

impl ProgressSink for LogProgress {
    fn report(&mut self, progress: &Progress) {
        if self.quiet || self.last.as_ref() == Some(progress) {
            return;
        }
        info!("{progress}");
        self.last = Some(*progress);
    }
}
