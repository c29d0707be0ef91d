//! # Observability
//!
//! 帧分发可观测性：日志订阅器 + Prometheus 指标。
//!
//! 日志级别由命令行的 `-v` / `-q` 决定，`RUST_LOG` 可覆盖默认级别
//! (静默模式除外)。指标导出器只在显式指定端口时启动。
//!
//! ```ignore
//! let config = observability::LogConfig::from_verbosity(cli.verbose, cli.quiet)
//!     .with_format(observability::LogFormat::Compact);
//! observability::init_logging(&config)?;
//!
//! metrics::record_frame_dispatched(processor.name(), frame.track_number);
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use crate::metrics::{
    record_cluster_closed, record_frame_dispatched, record_frame_size, record_track_count,
    record_traversal_failed, FrameMetricsAggregator, MetricsSummary, RunningStats, StatsSummary,
};

/// 日志输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON 结构化日志
    Json,
    /// 人类可读格式
    #[default]
    Pretty,
    /// 紧凑单行格式
    Compact,
}

/// 日志订阅器配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    /// `RUST_LOG` 未设置时使用的级别
    pub level: &'static str,
    /// 为 true 时忽略 `RUST_LOG`
    pub pinned: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::from_verbosity(0, false)
    }
}

impl LogConfig {
    /// 由 `-v` 次数和 `-q` 得出级别
    ///
    /// 静默模式固定为 `warn`，不受 `RUST_LOG` 影响。
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        let level = if quiet {
            "warn"
        } else {
            match verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        };

        Self {
            format: LogFormat::default(),
            level,
            pinned: quiet,
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// 构造过滤器
    pub fn env_filter(&self) -> EnvFilter {
        if self.pinned {
            return EnvFilter::new(self.level);
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level))
    }
}

/// 安装全局日志订阅器
///
/// 同一进程内只能成功一次。
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(format = ?config.format, level = config.level, "Logging initialized");
    Ok(())
}

/// 启动 Prometheus 指标端点
///
/// 日志订阅器需已由 [`init_logging`] 安装。
pub fn init_metrics_only(port: u16) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}
