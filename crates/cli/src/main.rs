//! # MKV Frames CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - 元素流遍历与帧分发
//! - 运行统计输出

mod cli;
mod commands;
mod error;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_pipeline, run_validate};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_logging(&cli.log_config())?;

    info!(version = env!("CARGO_PKG_VERSION"), "MKV frames CLI starting");

    let result = match &cli.command {
        Commands::Run(args) => run_pipeline(args),
        Commands::Validate(args) => run_validate(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}
