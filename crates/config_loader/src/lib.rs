//! # Config Loader
//!
//! Builds the `RunBlueprint` for one element-stream run.
//!
//! - TOML / JSON run files, format chosen by extension
//! - relative `input.path` and file processor `base_path` resolved against the
//!   run file's directory
//! - flag-only runs (`ConfigLoader::for_input`) with the log processor
//! - hand-written validation, re-run after CLI overrides
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("captures/run.toml")).unwrap();
//! println!("Input: {}", blueprint.input.path);
//! ```

mod parser;
mod validator;

pub use contracts::RunBlueprint;
pub use parser::ConfigFormat;

use contracts::{
    ConfigVersion, ContractError, InputConfig, InputFormat, ProcessorConfig, ProcessorType,
    TagConfig,
};
use std::collections::HashMap;
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a run file
    ///
    /// Relative paths inside the file are taken relative to the file itself,
    /// so a run file can sit next to the dump it describes.
    pub fn load_from_path(path: &Path) -> Result<RunBlueprint, ContractError> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let mut blueprint = format.parse(&content)?;
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            resolve_relative_paths(&mut blueprint, dir);
        }

        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// Parse and validate run file content, paths left as written
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<RunBlueprint, ContractError> {
        let blueprint = format.parse(content)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// Blueprint for a run driven only by command-line flags
    ///
    /// Tags disabled, frames logged by a processor named `log`.
    pub fn for_input(input: &Path) -> RunBlueprint {
        RunBlueprint {
            version: ConfigVersion::V1,
            input: InputConfig {
                path: input.display().to_string(),
                format: InputFormat::JsonLines,
            },
            tags: TagConfig::default(),
            processor: ProcessorConfig {
                name: "log".to_string(),
                processor_type: ProcessorType::Log,
                params: HashMap::new(),
            },
        }
    }

    /// Re-check a blueprint after overrides
    pub fn validate(blueprint: &RunBlueprint) -> Result<(), ContractError> {
        validator::validate(blueprint)
    }

    pub fn to_toml(blueprint: &RunBlueprint) -> Result<String, ContractError> {
        ConfigFormat::Toml.render(blueprint)
    }

    pub fn to_json(blueprint: &RunBlueprint) -> Result<String, ContractError> {
        ConfigFormat::Json.render(blueprint)
    }
}

/// Anchor relative input / output paths at `dir`; blank values stay blank for validation
fn resolve_relative_paths(blueprint: &mut RunBlueprint, dir: &Path) {
    let anchor = |value: &mut String| {
        if !value.trim().is_empty() && Path::new(value.as_str()).is_relative() {
            *value = dir.join(value.as_str()).display().to_string();
        }
    };

    anchor(&mut blueprint.input.path);
    if blueprint.processor.processor_type == ProcessorType::File {
        if let Some(base_path) = blueprint.processor.params.get_mut("base_path") {
            anchor(base_path);
        }
    }
}
