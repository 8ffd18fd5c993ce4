//! Console formatting of experiment results

use clinicsim_application::ExperimentResult;
use colored::Colorize;
use std::fmt::Write;

/// Formats an experiment result for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Header printed before a run starts.
    pub fn format_header(result_source: &str, doctor: &str, patient: &str, judge: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", "clinicsim - Diagnostic dialogue benchmark".bold());
        let _ = writeln!(out, "Vignettes: {result_source}");
        let _ = writeln!(out, "Doctor: {doctor}  Patient: {patient}  Judge: {judge}");
        out
    }

    /// Full evaluation report, one block per iteration.
    pub fn format(result: &ExperimentResult) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Experiment over {} vignettes (indices {:?}), {} iteration(s)",
            result.vignettes.len(),
            result.vignette_indices,
            result.num_experiments,
        );

        for (iteration, summary) in &result.evaluation {
            let _ = writeln!(out, "\n{}", format!("Results of run {iteration}").bold());
            let _ = writeln!(out, "  positions: {:?}", summary.positions);
            let _ = writeln!(
                out,
                "  Number of correct diagnoses: {} / {}",
                summary.n_correct,
                summary.positions.len(),
            );
            let _ = writeln!(
                out,
                "  Average position of correct diagnosis: {}",
                summary.avg_position,
            );
        }

        out
    }

    /// JSON rendering for machine consumption.
    pub fn format_json(result: &ExperimentResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}
