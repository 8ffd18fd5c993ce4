//! Run Experiment use case
//!
//! Orchestrates a full benchmark run: fans dialogue simulations out over the
//! selected vignettes (bounded by the slowest backing service), checkpoints
//! the result document after every iteration, then scores the collected
//! transcripts.

use crate::experiment::{ExperimentResult, IterationEvaluation};
use crate::harness::Harness;
use crate::ports::llm_client::LlmClient;
use crate::ports::progress::{Phase, ProgressNotifier};
use crate::ports::result_store::{ResultStore, StoreError};
use crate::retry::RetryPolicy;
use crate::use_cases::score::ScoreDiagnosisUseCase;
use crate::use_cases::simulate::SimulateDialogueUseCase;
use chrono::Utc;
use clinicsim_domain::simulation::session::DEFAULT_MAX_LEN;
use clinicsim_domain::{Session, SessionOutcome, Vignette, VignetteSource};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that abort a whole experiment run
#[derive(Error, Debug)]
pub enum RunExperimentError {
    #[error("No vignettes selected")]
    NoVignettes,

    #[error("Checkpoint failed: {0}")]
    Store(#[from] StoreError),
}

/// Input for the RunExperiment use case
#[derive(Debug, Clone)]
pub struct RunExperimentInput {
    pub source: VignetteSource,
    /// Subsample drawn from the vignette file
    pub vignettes: Vec<Vignette>,
    /// Indices of the subsample within the file, for reproducibility
    pub vignette_indices: Vec<usize>,
    /// Iterations over the vignette subsample
    pub num_experiments: usize,
    pub doctor_llm: String,
    pub patient_llm: String,
    pub comment: Option<String>,
    pub result_name_suffix: String,
}

/// Use case running one experiment end to end
pub struct RunExperimentUseCase<S: ResultStore> {
    doctor_client: Arc<dyn LlmClient>,
    patient_client: Arc<dyn LlmClient>,
    judge_client: Arc<dyn LlmClient>,
    store: Arc<S>,
    retry: RetryPolicy,
    max_len: usize,
}

impl<S: ResultStore> RunExperimentUseCase<S> {
    pub fn new(
        doctor_client: Arc<dyn LlmClient>,
        patient_client: Arc<dyn LlmClient>,
        judge_client: Arc<dyn LlmClient>,
        store: Arc<S>,
    ) -> Self {
        Self {
            doctor_client,
            patient_client,
            judge_client,
            store,
            retry: RetryPolicy::default(),
            max_len: DEFAULT_MAX_LEN,
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Execute the experiment, checkpointing after every iteration.
    pub async fn execute(
        &self,
        input: RunExperimentInput,
        progress: Arc<dyn ProgressNotifier>,
    ) -> Result<ExperimentResult, RunExperimentError> {
        if input.vignettes.is_empty() {
            return Err(RunExperimentError::NoVignettes);
        }

        let mut result = ExperimentResult {
            vignette_file: input.source,
            vignettes: input.vignettes.clone(),
            vignette_indices: input.vignette_indices.clone(),
            num_experiments: input.num_experiments,
            doctor_llm: input.doctor_llm.clone(),
            patient_llm: input.patient_llm.clone(),
            chats: Vec::new(),
            started_at: Utc::now(),
            comment: input.comment.clone(),
            result_name_suffix: input.result_name_suffix.clone(),
            evaluation: BTreeMap::new(),
        };

        for iteration in 0..input.num_experiments {
            info!(iteration, "Running experiment iteration");
            let sessions = self
                .run_iteration(&input.vignettes, Arc::clone(&progress))
                .await;
            result
                .chats
                .push(sessions.into_iter().map(|s| s.into_transcripts().0).collect());

            let path = self.store.checkpoint(&result)?;
            info!("Dumped results to {}", path.display());
        }

        result.evaluation = self.evaluate(&result, progress.as_ref()).await;
        self.store.checkpoint(&result)?;

        Ok(result)
    }

    /// One pass over the vignettes, fanned out under the provider cap.
    async fn run_iteration(
        &self,
        vignettes: &[Vignette],
        progress: Arc<dyn ProgressNotifier>,
    ) -> Vec<Session> {
        // The most rate-limited client in the batch dictates the cap.
        let cap = self
            .doctor_client
            .model()
            .max_concurrency()
            .min(self.patient_client.model().max_concurrency());
        info!(
            "Simulating {} vignettes with up to {} workers",
            vignettes.len(),
            cap
        );
        progress.on_phase_start(Phase::Simulation, vignettes.len());

        let simulate = SimulateDialogueUseCase::new(
            Arc::clone(&self.doctor_client),
            Arc::clone(&self.patient_client),
        )
        .with_retry_policy(self.retry.clone())
        .with_max_len(self.max_len);

        let tasks: Vec<_> = vignettes
            .iter()
            .map(|vignette| {
                let simulate = simulate.clone();
                let vignette = vignette.clone();
                let progress = Arc::clone(&progress);
                async move {
                    let session = simulate.execute(&vignette).await;
                    progress.on_task_complete(
                        Phase::Simulation,
                        vignette.correct_diagnosis(),
                        session.outcome() == Some(SessionOutcome::Diagnosis),
                    );
                    session
                }
            })
            .collect();

        let slots = Harness::bounded(cap).run(tasks).await;
        progress.on_phase_complete(Phase::Simulation);

        slots
            .into_iter()
            .zip(vignettes)
            .map(|(slot, vignette)| {
                slot.unwrap_or_else(|failure| {
                    warn!("Simulation task failed: {failure}");
                    let mut session = Session::new(vignette).with_max_len(self.max_len);
                    session.finish(SessionOutcome::Error);
                    session
                })
            })
            .collect()
    }

    /// Judge every stored doctor transcript, per iteration.
    async fn evaluate(
        &self,
        result: &ExperimentResult,
        progress: &dyn ProgressNotifier,
    ) -> BTreeMap<usize, IterationEvaluation> {
        let scorer = ScoreDiagnosisUseCase::new(Arc::clone(&self.judge_client))
            .with_retry_policy(self.retry.clone());

        let total: usize = result.chats.iter().map(Vec::len).sum();
        progress.on_phase_start(Phase::Evaluation, total);

        let mut evaluation = BTreeMap::new();
        for (iteration, chats) in result.chats.iter().enumerate() {
            let mut positions = Vec::with_capacity(chats.len());
            for (doctor, vignette) in chats.iter().zip(&result.vignettes) {
                let position = scorer.score_transcript(doctor, vignette).await;
                progress.on_task_complete(
                    Phase::Evaluation,
                    vignette.correct_diagnosis(),
                    position >= 1.0,
                );
                positions.push(position);
            }

            let summary = IterationEvaluation::from_positions(positions);
            info!(
                iteration,
                n_correct = summary.n_correct,
                avg_position = summary.avg_position,
                "Iteration evaluated"
            );
            evaluation.insert(iteration, summary);
        }

        progress.on_phase_complete(Phase::Evaluation);
        evaluation
    }
}
