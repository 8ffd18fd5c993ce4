//! Progress notification port
//!
//! Lets the presentation layer display batch progress without the use cases
//! knowing how it is rendered.

/// A stage of an experiment run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Dialogue simulations fanning out over the vignettes
    Simulation,
    /// Judge scoring of the collected transcripts
    Evaluation,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Simulation => "simulation",
            Phase::Evaluation => "evaluation",
        }
    }
}

/// Callback for progress updates during an experiment run
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: Phase, total_tasks: usize);

    /// Called when one unit of work completes within a phase
    fn on_task_complete(&self, phase: Phase, label: &str, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: Phase);
}

/// No-op progress notifier for quiet runs
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: Phase, _total_tasks: usize) {}
    fn on_task_complete(&self, _phase: Phase, _label: &str, _success: bool) {}
    fn on_phase_complete(&self, _phase: Phase) {}
}
