//! Experiment result checkpoint document
//!
//! One JSON document per experiment run, re-written after every completed
//! iteration. Stored doctor transcripts can be re-evaluated later without
//! re-running any simulation.

use chrono::{DateTime, SecondsFormat, Utc};
use clinicsim_domain::{Transcript, Vignette, VignetteSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Evaluation summary for one iteration over the vignettes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationEvaluation {
    /// Per-vignette scores, index-aligned to the vignette list
    pub positions: Vec<f64>,
    /// Number of vignettes whose correct diagnosis was ranked
    pub n_correct: usize,
    /// Mean rank of the correct diagnoses, `-1.0` when none were found
    pub avg_position: f64,
}

impl IterationEvaluation {
    /// Summarize the raw per-vignette scores of one iteration.
    pub fn from_positions(positions: Vec<f64>) -> Self {
        let ranked: Vec<f64> = positions.iter().copied().filter(|&p| p >= 1.0).collect();
        let n_correct = ranked.len();
        let avg_position = if ranked.is_empty() {
            -1.0
        } else {
            ranked.iter().sum::<f64>() / ranked.len() as f64
        };
        Self {
            positions,
            n_correct,
            avg_position,
        }
    }
}

/// The persisted record of one experiment run
///
/// `vignette_indices` pins the random subsample drawn from the vignette
/// file so the experiment can be reproduced. `chats` holds one doctor
/// transcript per vignette, one list per iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentResult {
    pub vignette_file: VignetteSource,
    pub vignettes: Vec<Vignette>,
    pub vignette_indices: Vec<usize>,
    pub num_experiments: usize,
    pub doctor_llm: String,
    pub patient_llm: String,
    pub chats: Vec<Vec<Transcript>>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub result_name_suffix: String,
    #[serde(default)]
    pub evaluation: BTreeMap<usize, IterationEvaluation>,
}

impl ExperimentResult {
    /// Filename the document is checkpointed under.
    ///
    /// Embeds the start timestamp, the doctor identity and the number of
    /// chats per iteration. Doctor identities that are network addresses
    /// are redacted to a placeholder.
    pub fn file_name(&self) -> String {
        let timestamp = self.started_at.to_rfc3339_opts(SecondsFormat::Secs, true);
        let doctor = if self.doctor_llm.contains("http") {
            "LOCAL_LLM"
        } else {
            &self.doctor_llm
        };
        let chats_per_iteration = self
            .chats
            .first()
            .map(Vec::len)
            .unwrap_or(self.vignettes.len());
        let suffix = if self.result_name_suffix.is_empty() {
            String::new()
        } else {
            format!("_{}", self.result_name_suffix)
        };
        format!("{timestamp}_{doctor}_{chats_per_iteration}{suffix}.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn result(doctor_llm: &str, suffix: &str) -> ExperimentResult {
        ExperimentResult {
            vignette_file: VignetteSource::Avey,
            vignettes: vec![],
            vignette_indices: vec![],
            num_experiments: 1,
            doctor_llm: doctor_llm.to_string(),
            patient_llm: "gpt-4o-mini".to_string(),
            chats: vec![],
            started_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
            comment: None,
            result_name_suffix: suffix.to_string(),
            evaluation: BTreeMap::new(),
        }
    }

    #[test]
    fn test_file_name_embeds_timestamp_model_and_count() {
        let name = result("gpt-4o-mini", "").file_name();
        assert_eq!(name, "2025-03-14T09:26:53Z_gpt-4o-mini_0.json");
    }

    #[test]
    fn test_file_name_redacts_network_addresses() {
        let name = result("http://localhost:5013", "pilot").file_name();
        assert_eq!(name, "2025-03-14T09:26:53Z_LOCAL_LLM_0_pilot.json");
    }

    #[test]
    fn test_iteration_summary() {
        let summary = IterationEvaluation::from_positions(vec![2.0, -2.0, 1.0, -111.0]);
        assert_eq!(summary.n_correct, 2);
        assert_eq!(summary.avg_position, 1.5);

        let empty = IterationEvaluation::from_positions(vec![-2.0, -111.0]);
        assert_eq!(empty.n_correct, 0);
        assert_eq!(empty.avg_position, -1.0);
    }
}
