//! Application layer for clinicsim
//!
//! Use cases driving the benchmark (simulate a dialogue, score a diagnosis,
//! run a whole experiment), the ports they depend on, the retry policy for
//! rate-limited services and the bounded concurrency harness.

pub mod experiment;
pub mod harness;
pub mod ports;
pub mod retry;
pub mod use_cases;

pub use experiment::{ExperimentResult, IterationEvaluation};
pub use harness::{Harness, TaskFailure};
pub use ports::llm_client::{ClientError, LlmClient};
pub use ports::progress::{NoProgress, Phase, ProgressNotifier};
pub use ports::result_store::{ResultStore, StoreError};
pub use retry::{RetryError, RetryPolicy};
pub use use_cases::run_experiment::{RunExperimentError, RunExperimentInput, RunExperimentUseCase};
pub use use_cases::score::ScoreDiagnosisUseCase;
pub use use_cases::simulate::SimulateDialogueUseCase;
