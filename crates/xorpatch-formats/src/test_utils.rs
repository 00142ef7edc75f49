//! Test utilities shared by the patch module tests

use crate::patch::{Progress, ProgressSink};

/// Progress sink that keeps every message and counts chunk ticks
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub messages: Vec<String>,
    pub ticks: usize,
}

impl ProgressSink for RecordingProgress {
    fn report(&mut self, progress: &Progress) {
        self.messages.push(progress.to_string());
    }

    fn tick(&mut self) {
        self.ticks += 1;
    }
}

/// Deterministic pseudo-random bytes
///
/// Different seeds give different sequences, so two calls can stand in for
/// an original and a modified file.
pub fn sample_data(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.wrapping_mul(0x9E37_79B9).wrapping_add(1);
    (0..len)
        .map(|_| {
            // xorshift32
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}
