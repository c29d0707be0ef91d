//! 配置校验模块
//!
//! 校验规则：
//! - input.path 非空，扩展名与 input.format 一致
//! - processor.name 非空
//! - 处理器类型必需参数齐全且非空

use contracts::{ContractError, RunBlueprint};
use std::path::Path;

/// 校验 RunBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &RunBlueprint) -> Result<(), ContractError> {
    validate_input(blueprint)?;
    validate_processor(blueprint)?;
    Ok(())
}

/// 校验输入配置
fn validate_input(blueprint: &RunBlueprint) -> Result<(), ContractError> {
    if blueprint.input.path.trim().is_empty() {
        return Err(ContractError::config_validation(
            "input.path",
            "input path cannot be empty",
        ));
    }

    let input = &blueprint.input;
    if !input.format.accepts(Path::new(input.path.trim())) {
        return Err(ContractError::config_validation(
            "input.path",
            format!(
                "'{}' does not look like a {:?} element stream (expected .{})",
                input.path,
                input.format,
                input.format.extensions().join(" / .")
            ),
        ));
    }
    Ok(())
}

/// 校验帧处理器配置
fn validate_processor(blueprint: &RunBlueprint) -> Result<(), ContractError> {
    let processor = &blueprint.processor;
    if processor.name.is_empty() {
        return Err(ContractError::config_validation(
            "processor.name",
            "processor name cannot be empty",
        ));
    }

    for param in processor.processor_type.required_params() {
        match processor.params.get(*param) {
            Some(value) if !value.trim().is_empty() => {}
            Some(_) => {
                return Err(ContractError::config_validation(
                    format!("processor.params.{param}"),
                    format!("parameter '{param}' cannot be empty"),
                ));
            }
            None => {
                return Err(ContractError::config_validation(
                    format!("processor.params.{param}"),
                    format!(
                        "missing required parameter '{param}' for {:?} processor",
                        processor.processor_type
                    ),
                ));
            }
        }
    }
    Ok(())
}
