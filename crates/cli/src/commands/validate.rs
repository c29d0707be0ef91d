//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{ProcessorType, RunBlueprint};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    input: String,
    tags_enabled: bool,
    processor: String,
    processor_type: String,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(&args.config);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(path: &Path) -> ValidationResult {
    let config_path = path.display().to_string();

    if !path.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", path.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(path) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    input: blueprint.input.path.clone(),
                    tags_enabled: blueprint.tags.enabled,
                    processor: blueprint.processor.name.clone(),
                    processor_type: format!("{:?}", blueprint.processor.processor_type),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &RunBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if !Path::new(&blueprint.input.path).exists() {
        warnings.push(format!(
            "Input stream '{}' does not exist yet",
            blueprint.input.path
        ));
    }

    let known = blueprint.processor.processor_type.required_params();
    for key in blueprint.processor.params.keys() {
        if !known.contains(&key.as_str()) {
            warnings.push(format!(
                "Parameter '{}' is ignored by {:?} processor",
                key, blueprint.processor.processor_type
            ));
        }
    }

    if blueprint.processor.processor_type == ProcessorType::Log && blueprint.tags.enabled {
        warnings.push("Log processor only reports tag counts, not tag values".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Input: {}", summary.input);
            println!("  Tags: {}", summary.tags_enabled);
            println!(
                "  Processor: {} ({})",
                summary.processor, summary.processor_type
            );
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
