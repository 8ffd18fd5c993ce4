//! Score Diagnosis use case
//!
//! Scores a completed consultation by asking a judge service several times,
//! independently, whether the proposed diagnosis list contains the gold
//! diagnosis, then aggregating the verdicts into one scalar.

use crate::harness::Harness;
use crate::ports::llm_client::LlmClient;
use crate::retry::RetryPolicy;
use clinicsim_domain::simulation::session::{diagnosis_finished, extract_diagnoses};
use clinicsim_domain::{
    JudgeVerdict, Message, PromptTemplate, SCORE_UNFINISHED, Session, SessionOutcome, Transcript,
    Vignette, aggregate_verdicts, parse_verdict,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Number of independent judge queries per diagnosis.
pub const JUDGE_SAMPLES: usize = 3;

/// Participant id stamped on one-shot judge prompts.
const JUDGE_USER_ID: u64 = 1;

/// Use case scoring one diagnosis list against the gold label
#[derive(Clone)]
pub struct ScoreDiagnosisUseCase {
    judge_client: Arc<dyn LlmClient>,
    retry: RetryPolicy,
    samples: usize,
}

impl ScoreDiagnosisUseCase {
    pub fn new(judge_client: Arc<dyn LlmClient>) -> Self {
        Self {
            judge_client,
            retry: RetryPolicy::default(),
            samples: JUDGE_SAMPLES,
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_samples(mut self, samples: usize) -> Self {
        assert!(samples > 0, "at least one judge sample is required");
        self.samples = samples;
        self
    }

    /// Score a freshly simulated session.
    pub async fn score_session(&self, session: &Session, vignette: &Vignette) -> f64 {
        if session.outcome() != Some(SessionOutcome::Diagnosis) {
            warn!("Simulation did not finish with a diagnosis.");
            return SCORE_UNFINISHED;
        }
        self.score(&session.extract_diagnoses(), vignette.correct_diagnosis())
            .await
    }

    /// Score a stored doctor transcript (offline re-evaluation path).
    pub async fn score_transcript(&self, doctor: &Transcript, vignette: &Vignette) -> f64 {
        if !diagnosis_finished(doctor) {
            warn!("Simulation did not finish with a diagnosis.");
            return SCORE_UNFINISHED;
        }
        self.score(&extract_diagnoses(doctor), vignette.correct_diagnosis())
            .await
    }

    /// K independent judge queries, aggregated.
    pub async fn score(&self, obtained_diagnoses: &str, correct_diagnosis: &str) -> f64 {
        let tasks: Vec<_> = (0..self.samples)
            .map(|_| {
                let judge = Arc::clone(&self.judge_client);
                let retry = self.retry.clone();
                let query =
                    PromptTemplate::judge_query(obtained_diagnoses, correct_diagnosis);
                async move {
                    let prompt = Message::system(JUDGE_USER_ID, query);
                    match retry.run(|| judge.inquire(&prompt)).await {
                        Ok(reply) => parse_verdict(&reply.body),
                        Err(error) => {
                            // A dead judge call is indistinguishable from an
                            // unparseable one downstream; the log keeps them
                            // apart.
                            warn!("Judge call failed: {error}");
                            JudgeVerdict::ParseFailure
                        }
                    }
                }
            })
            .collect();

        let results = Harness::bounded(self.samples).run(tasks).await;
        let verdicts: Vec<JudgeVerdict> = results
            .into_iter()
            .map(|slot| match slot {
                Ok(verdict) => verdict,
                Err(failure) => {
                    warn!("Judge task failed: {failure}");
                    JudgeVerdict::ParseFailure
                }
            })
            .collect();

        let score = aggregate_verdicts(&verdicts);
        info!(
            ?verdicts,
            score, correct_diagnosis, obtained_diagnoses, "Judged diagnosis list"
        );
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_client::ClientError;
    use async_trait::async_trait;
    use clinicsim_domain::{Model, Role, VignetteSource};
    use serde_json::json;
    use std::sync::Mutex;

    /// Hands out one scripted judge response per call, in order.
    struct ScriptedJudge {
        model: Model,
        responses: Mutex<Vec<String>>,
    }

    impl ScriptedJudge {
        fn new(responses: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                model: "gpt-4o".parse().unwrap(),
                responses: Mutex::new(responses.iter().rev().map(|s| s.to_string()).collect()),
            })
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedJudge {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn inquire(&self, prompt: &Message) -> Result<Message, ClientError> {
            let body = self
                .responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| ClientError::Provider("no more responses".to_string()))?;
            Ok(Message::derived(prompt, Role::Assistant, body))
        }

        async fn converse(&self, _history: &[Message]) -> Result<Message, ClientError> {
            Err(ClientError::Provider("judge is one-shot only".to_string()))
        }
    }

    fn vignette() -> Vignette {
        let data = json!({
            "correct_diagnosis": "Pseudogout",
            "demographics": "72-year-old man",
            "presentation": "Acute knee pain",
            "chief_complaints": "Swollen knee",
        })
        .as_object()
        .unwrap()
        .clone();
        Vignette::new(VignetteSource::Avey, data).unwrap()
    }

    #[tokio::test]
    async fn test_mean_of_positive_positions() {
        let judge = ScriptedJudge::new(&[
            "Correct diagnosis present: YES\nPosition: [2]",
            "Correct diagnosis present: NO\nPosition: [-1]",
            "Correct diagnosis present: YES\nPosition: [3]",
        ]);
        let score = ScoreDiagnosisUseCase::new(judge)
            .score("[Gout, Pseudogout, Lupus]", "Pseudogout")
            .await;
        assert_eq!(score, 2.5);
    }

    #[tokio::test]
    async fn test_unanimous_rejection_fingerprint() {
        let response = "Correct diagnosis present: NO\nPosition: [-1]";
        let judge = ScriptedJudge::new(&[response, response, response]);
        let score = ScoreDiagnosisUseCase::new(judge)
            .score("[Gout, Lupus]", "Pseudogout")
            .await;
        assert_eq!(score, -111.0);
    }

    #[tokio::test]
    async fn test_failed_judge_calls_become_parse_failures() {
        // The script is empty, so every judge call errors out.
        let judge = ScriptedJudge::new(&[]);
        let score = ScoreDiagnosisUseCase::new(judge)
            .score("[Gout]", "Pseudogout")
            .await;
        assert_eq!(score, -333.0);
    }

    #[tokio::test]
    async fn test_unfinished_session_short_circuits() {
        let judge = ScriptedJudge::new(&[]);
        let session = {
            let mut s = Session::new(&vignette());
            s.finish(SessionOutcome::MaxLen);
            s
        };
        let score = ScoreDiagnosisUseCase::new(judge)
            .score_session(&session, &vignette())
            .await;
        assert_eq!(score, SCORE_UNFINISHED);
    }

    #[tokio::test]
    async fn test_end_to_end_transcript_scoring() {
        let mut doctor = Transcript::new(5);
        doctor.push(Message::system(5, "doctor system prompt"));
        doctor.push(Message::user(5, "My knee hurts."));
        doctor.push(Message::assistant(5, "Since when?"));
        doctor.push(Message::user(5, "Two days."));
        doctor.push(Message::assistant(
            5,
            "Thanks. DIAGNOSIS READY: [Gout, Lupus, Pseudogout]",
        ));

        let judge = ScriptedJudge::new(&[
            "Correct diagnosis present: YES\nPosition: [3]",
            "Correct diagnosis present: YES\nPosition: [3]",
            "Correct diagnosis present: NO\nPosition: [-1]",
        ]);
        let score = ScoreDiagnosisUseCase::new(judge)
            .score_transcript(&doctor, &vignette())
            .await;
        assert_eq!(score, 3.0);
    }
}
