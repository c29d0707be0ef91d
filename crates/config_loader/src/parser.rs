//! 运行配置的读写格式
//!
//! 运行配置以 TOML 为主，JSON 便于脚本生成。

use contracts::{ContractError, RunBlueprint};
use std::path::Path;

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// 从配置文件路径推断格式
    pub fn from_path(path: &Path) -> Result<Self, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse(format!(
                "cannot determine config format of '{}'",
                path.display()
            ))
        })?;

        Self::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// 解析为 `RunBlueprint` (不做校验)
    pub fn parse(self, content: &str) -> Result<RunBlueprint, ContractError> {
        let parsed: Result<RunBlueprint, BoxedError> = match self {
            Self::Toml => toml::from_str(content).map_err(Into::into),
            Self::Json => serde_json::from_str(content).map_err(Into::into),
        };

        parsed.map_err(|e| ContractError::ConfigParse {
            message: format!("{self:?} parse error: {e}"),
            source: Some(e),
        })
    }

    /// 序列化 `RunBlueprint`
    pub fn render(self, blueprint: &RunBlueprint) -> Result<String, ContractError> {
        match self {
            Self::Toml => toml::to_string_pretty(blueprint)
                .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}"))),
            Self::Json => serde_json::to_string_pretty(blueprint)
                .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}"))),
        }
    }
}

type BoxedError = Box<dyn std::error::Error + Send + Sync>;
