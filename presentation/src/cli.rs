//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

/// Symptom assessment dialogue benchmark
#[derive(Parser, Debug)]
#[command(name = "clinicsim", version, about)]
pub struct Cli {
    /// Doctor model identity: gpt-4o, claude-3-haiku-20240307,
    /// open-mixtral-8x7b, http://host:port ...
    #[arg(long, default_value = "gpt-4o-mini")]
    pub doctor_llm: String,

    /// Patient model identity
    #[arg(long, default_value = "gpt-4o-mini")]
    pub patient_llm: String,

    /// Judge model identity used for scoring
    #[arg(long, default_value = "gpt-4o")]
    pub evaluator_llm: String,

    /// Vignette source suite: avey or agentclinic
    #[arg(long)]
    pub file: String,

    /// Number of vignettes sampled for the experiment
    #[arg(long, default_value_t = 10)]
    pub num_vignettes: usize,

    /// Number of iterations through the sampled vignettes
    #[arg(long, default_value_t = 1)]
    pub num_experiments: usize,

    /// Optional comment stored in the experiment result
    #[arg(long)]
    pub comment: Option<String>,

    /// Optional suffix added to the result filename
    #[arg(long, default_value = "")]
    pub result_name_suffix: String,

    /// Explicit config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress bars and the report header
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["clinicsim", "--file", "avey"]);
        assert_eq!(cli.doctor_llm, "gpt-4o-mini");
        assert_eq!(cli.evaluator_llm, "gpt-4o");
        assert_eq!(cli.num_vignettes, 10);
        assert_eq!(cli.num_experiments, 1);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::parse_from(["clinicsim", "--file", "avey", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }
}
