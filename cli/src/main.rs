//! CLI entrypoint for clinicsim
//!
//! Wires the layers together with dependency injection: config, provider
//! adapters, vignette loader, result store and the experiment use case.

use anyhow::{Context, Result};
use clap::Parser;
use clinicsim_application::{
    NoProgress, ProgressNotifier, RunExperimentInput, RunExperimentUseCase,
};
use clinicsim_domain::{Model, VignetteSource};
use clinicsim_infrastructure::{ConfigLoader, JsonResultStore, VignetteLoader, build_client};
use clinicsim_presentation::{Cli, ConsoleFormatter, ProgressReporter};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = ConfigLoader::load(cli.config.as_ref())
        .map_err(|e| anyhow::anyhow!("Could not load configuration: {e}"))?;

    // Validate model identities once, up front.
    let doctor_model: Model = cli
        .doctor_llm
        .parse()
        .with_context(|| format!("--doctor_llm {}", cli.doctor_llm))?;
    let patient_model: Model = cli
        .patient_llm
        .parse()
        .with_context(|| format!("--patient_llm {}", cli.patient_llm))?;
    let judge_model: Model = cli
        .evaluator_llm
        .parse()
        .with_context(|| format!("--evaluator_llm {}", cli.evaluator_llm))?;
    let source: VignetteSource = cli.file.parse().with_context(|| format!("--file {}", cli.file))?;

    // Draw the vignette subsample for this run.
    let loader = VignetteLoader::new(&config.dialogue.vignette_dir);
    let all_vignettes = loader.load(source)?;
    let indices = VignetteLoader::sample_indices(all_vignettes.len(), cli.num_vignettes);
    info!("Running experiment over vignettes {:?}", indices);
    let vignettes: Vec<_> = indices.iter().map(|&i| all_vignettes[i].clone()).collect();

    if !cli.quiet {
        print!(
            "{}",
            ConsoleFormatter::format_header(
                source.as_str(),
                doctor_model.as_str(),
                patient_model.as_str(),
                judge_model.as_str(),
            )
        );
    }

    // === Dependency injection ===
    let doctor_client = build_client(&doctor_model, &config.providers);
    let patient_client = build_client(&patient_model, &config.providers);
    let judge_client = build_client(&judge_model, &config.providers);
    let store = Arc::new(JsonResultStore::new(&config.results.directory));

    let use_case = RunExperimentUseCase::new(doctor_client, patient_client, judge_client, store)
        .with_retry_policy(config.retry.policy())
        .with_max_len(config.dialogue.max_len);

    let input = RunExperimentInput {
        source,
        vignettes,
        vignette_indices: indices,
        num_experiments: cli.num_experiments,
        doctor_llm: cli.doctor_llm.clone(),
        patient_llm: cli.patient_llm.clone(),
        comment: cli.comment.clone(),
        result_name_suffix: cli.result_name_suffix.clone(),
    };

    let progress: Arc<dyn ProgressNotifier> = if cli.quiet {
        Arc::new(NoProgress)
    } else {
        Arc::new(ProgressReporter::new())
    };

    let result = use_case.execute(input, progress).await?;

    println!("{}", ConsoleFormatter::format(&result));

    Ok(())
}
