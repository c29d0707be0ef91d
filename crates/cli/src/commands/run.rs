//! `run` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{ProcessorType, RunBlueprint};
use tracing::info;

use crate::cli::RunArgs;
use crate::error::{self, CliError};
use crate::pipeline::run_blueprint;

/// Execute the `run` command
pub fn run_pipeline(args: &RunArgs) -> Result<()> {
    let blueprint = build_blueprint(args).context("Failed to prepare run configuration")?;

    info!(
        input = %blueprint.input.path,
        processor = %blueprint.processor.name,
        processor_type = ?blueprint.processor.processor_type,
        tags = blueprint.tags.enabled,
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let max_elements = (args.max_elements != 0).then_some(args.max_elements);
    let stats = run_blueprint(&blueprint, max_elements)?;

    info!(
        elements = stats.elements_visited,
        frames = stats.frames_dispatched,
        clusters = stats.clusters_closed,
        duration_secs = stats.duration.as_secs_f64(),
        "Run completed successfully"
    );
    stats.print_summary();

    Ok(())
}

/// Load the configuration file, if any, and apply CLI overrides
fn build_blueprint(args: &RunArgs) -> error::Result<RunBlueprint> {
    let mut blueprint = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()));
            }
            info!(config = %path.display(), "Loading configuration");
            ConfigLoader::load_from_path(path)?
        }
        None => {
            let input = args.input.as_ref().ok_or(CliError::MissingInput)?;
            ConfigLoader::for_input(input)
        }
    };

    if let Some(input) = &args.input {
        blueprint.input.path = input.display().to_string();
    }
    if args.tags {
        blueprint.tags.enabled = true;
    }
    if let Some(output) = &args.output {
        info!(output = %output.display(), "Writing frames to directory from CLI");
        blueprint.processor.processor_type = ProcessorType::File;
        blueprint
            .processor
            .params
            .insert("base_path".to_string(), output.display().to_string());
    }

    ConfigLoader::validate(&blueprint)?;
    Ok(blueprint)
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &RunBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Input:");
    println!("  Path: {}", blueprint.input.path);
    println!("  Format: {:?}", blueprint.input.format);
    println!(
        "\nTags: {}",
        if blueprint.tags.enabled {
            "collected per cluster"
        } else {
            "disabled"
        }
    );
    println!(
        "\nProcessor: {} ({:?})",
        blueprint.processor.name, blueprint.processor.processor_type
    );
    for (key, value) in &blueprint.processor.params {
        println!("  {} = {}", key, value);
    }
    println!();
}
