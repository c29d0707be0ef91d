//! RunBlueprint - Config Loader 输出
//!
//! 描述一次解析运行：输入元素流、标签处理、帧处理器。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的运行配置蓝图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 输入设置
    pub input: InputConfig,

    /// 标签处理设置
    #[serde(default)]
    pub tags: TagConfig,

    /// 帧处理器配置
    pub processor: ProcessorConfig,
}

/// 输入配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// 元素流文件路径
    pub path: String,

    /// 元素流格式
    #[serde(default)]
    pub format: InputFormat,
}

/// 元素流格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// 每行一个 JSON 编码的 `MkvElement`
    #[default]
    JsonLines,
}

impl InputFormat {
    /// 可接受的文件扩展名 (小写)
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::JsonLines => &["jsonl", "ndjson", "json"],
        }
    }

    /// 路径扩展名是否与格式一致
    pub fn accepts(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext.to_ascii_lowercase().as_str()))
    }
}

/// 标签处理配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagConfig {
    /// 是否按 cluster 收集标签并交给帧处理器
    #[serde(default)]
    pub enabled: bool,
}

/// 帧处理器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// 处理器名称
    pub name: String,

    /// 处理器类型
    pub processor_type: ProcessorType,

    /// 类型特定参数
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// 帧处理器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorType {
    /// 日志输出
    Log,
    /// 文件输出
    File,
}

impl ProcessorType {
    /// 该类型必需的参数
    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            Self::Log => &[],
            Self::File => &["base_path"],
        }
    }
}
