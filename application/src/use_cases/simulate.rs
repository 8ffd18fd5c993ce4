//! Simulate Dialogue use case
//!
//! Drives one consultation to termination: alternating patient and doctor
//! half-turns, role inversion between the mirrored transcripts, forced
//! termination near the length cap, and diagnosis detection.

use crate::ports::llm_client::LlmClient;
use crate::retry::{RetryError, RetryPolicy};
use clinicsim_domain::simulation::session::DEFAULT_MAX_LEN;
use clinicsim_domain::{Session, SessionOutcome, Vignette};
use std::sync::Arc;
use tracing::{debug, warn};

/// Use case running one dialogue simulation per call
///
/// Holds shared clients only; every call owns its session exclusively, so
/// any number of simulations may run concurrently from clones of this use
/// case.
#[derive(Clone)]
pub struct SimulateDialogueUseCase {
    doctor_client: Arc<dyn LlmClient>,
    patient_client: Arc<dyn LlmClient>,
    retry: RetryPolicy,
    max_len: usize,
}

impl SimulateDialogueUseCase {
    pub fn new(doctor_client: Arc<dyn LlmClient>, patient_client: Arc<dyn LlmClient>) -> Self {
        Self {
            doctor_client,
            patient_client,
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

    /// Simulate the consultation for one vignette.
    ///
    /// Always returns a session in a terminal state: faults inside the turn
    /// loop are logged and degrade to [`SessionOutcome::Error`] with the
    /// partial transcripts preserved, never propagated to the caller.
    pub async fn execute(&self, vignette: &Vignette) -> Session {
        let mut session = Session::new(vignette).with_max_len(self.max_len);

        match self.turn_loop(&mut session).await {
            Ok(outcome) => {
                debug!(
                    outcome = ?outcome,
                    turns = session.patient().len(),
                    "Simulation finished"
                );
                session.finish(outcome);
            }
            Err(error) => {
                warn!(
                    diagnosis = vignette.correct_diagnosis(),
                    "Error while simulating vignette: {error}"
                );
                session.finish(SessionOutcome::Error);
            }
        }

        session.finalize_chat_ids();
        session
    }

    async fn turn_loop(&self, session: &mut Session) -> Result<SessionOutcome, RetryError> {
        loop {
            let patient_history = session.patient().messages.clone();
            let patient_reply = self
                .retry
                .run(|| self.patient_client.converse(&patient_history))
                .await?;
            session.record_patient_reply(patient_reply);

            if session.needs_finish_hint() {
                session.inject_finish_hint();
            }
            let doctor_history = session.doctor().messages.clone();
            let doctor_reply = self
                .retry
                .run(|| self.doctor_client.converse(&doctor_history))
                .await?;
            session.record_doctor_reply(doctor_reply);

            if let Some(outcome) = session.check_termination() {
                return Ok(outcome);
            }
        }
    }
}
