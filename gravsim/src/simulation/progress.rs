//! Progress reporting
//!
//! The driver reports through [`ProgressSink`] inline on its own thread. A
//! sink sees at most one `set_progress` and one `set_status` call per sample.

use log::{debug, info};

pub trait ProgressSink {
    /// Integer percent complete, 0..=100
    fn set_progress(&mut self, percent: u8);

    /// Human readable phase or sample description
    fn set_status(&mut self, text: &str);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn set_progress(&mut self, _percent: u8) {}

    fn set_status(&mut self, _text: &str) {}
}

/// Console sink backed by the `log` facade
///
/// Percent changes are logged at `info` every `step` percent; status lines go
/// to `debug` so per-sample chatter stays out of the default output.
#[derive(Debug, Clone)]
pub struct LogProgress {
    step: u8,
}

impl LogProgress {
    pub fn new(step: u8) -> Self {
        Self { step: step.max(1) }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ProgressSink for LogProgress {
    fn set_progress(&mut self, percent: u8) {
        if percent % self.step == 0 {
            info!("progress {percent}%");
        }
    }

    fn set_status(&mut self, text: &str) {
        debug!("{text}");
    }
}
