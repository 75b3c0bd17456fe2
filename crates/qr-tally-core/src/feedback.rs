use crate::model::{Cue, Decision, ScanEntry};

/// Trait for surfacing scan outcomes to the user.
///
/// CLI implements with colored output and a terminal bell.
/// All methods have default no-op implementations.
pub trait FeedbackReporter: Send + Sync {
    fn on_capture_started(&self) {}
    fn on_capture_stopped(&self) {}
    fn on_decision(&self, _decision: &Decision) {}
    /// Only called when beeps are enabled.
    fn on_cue(&self, _cue: Cue) {}
    fn on_undo(&self, _removed: &ScanEntry) {}
    fn on_clear(&self, _removed: usize) {}
}

/// No-op reporter for silent operation.
pub struct SilentFeedback;

impl FeedbackReporter for SilentFeedback {}
