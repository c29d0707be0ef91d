//! 帧分发指标收集模块
//!
//! 记录帧分发、cluster 边界与遍历失败等运行指标。

use std::collections::BTreeMap;

use metrics::{counter, gauge, histogram};

/// 记录帧分发
///
/// 每次帧处理器成功处理一帧时调用。
pub fn record_frame_dispatched(processor: &str, track_number: u64) {
    counter!(
        "mkv_frames_dispatched_total",
        "processor" => processor.to_string(),
        "track" => track_number.to_string()
    )
    .increment(1);
}

/// 记录 cluster 结束
pub fn record_cluster_closed() {
    counter!("mkv_clusters_closed_total").increment(1);
}

/// 记录帧大小 (字节)
pub fn record_frame_size(track_number: u64, size: usize) {
    histogram!("mkv_frame_size_bytes", "track" => track_number.to_string()).record(size as f64);
}

/// 记录遍历失败
pub fn record_traversal_failed(reason: &str) {
    counter!("mkv_traversal_failures_total", "reason" => reason.to_string()).increment(1);
}

/// 记录已声明轨道数
pub fn record_track_count(count: usize) {
    gauge!("mkv_tracks_declared").set(count as f64);
}

/// 帧指标聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct FrameMetricsAggregator {
    /// 总帧数
    pub total_frames: u64,

    /// 关键帧数
    pub key_frames: u64,

    /// 带标签处理器的帧数
    pub frames_with_tags: u64,

    /// 各轨道帧数
    pub track_counts: BTreeMap<u64, u64>,

    /// 帧大小统计
    pub size_stats: RunningStats,
}

impl FrameMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, track_number: u64, size: usize, key_frame: bool, with_tags: bool) {
        self.total_frames += 1;
        if key_frame {
            self.key_frames += 1;
        }
        if with_tags {
            self.frames_with_tags += 1;
        }
        *self.track_counts.entry(track_number).or_insert(0) += 1;
        self.size_stats.push(size as f64);
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_frames: self.total_frames,
            key_frames: self.key_frames,
            key_frame_rate: if self.total_frames > 0 {
                self.key_frames as f64 / self.total_frames as f64 * 100.0
            } else {
                0.0
            },
            frames_with_tags: self.frames_with_tags,
            frame_size_bytes: StatsSummary::from(&self.size_stats),
            track_counts: self.track_counts.clone(),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_frames: u64,
    pub key_frames: u64,
    pub key_frame_rate: f64,
    pub frames_with_tags: u64,
    pub frame_size_bytes: StatsSummary,
    pub track_counts: BTreeMap<u64, u64>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Frame Metrics Summary ===")?;
        writeln!(f, "Total frames: {}", self.total_frames)?;
        writeln!(
            f,
            "Key frames: {} ({:.2}%)",
            self.key_frames, self.key_frame_rate
        )?;
        writeln!(f, "Frames with tags: {}", self.frames_with_tags)?;
        writeln!(f, "Frame size (bytes): {}", self.frame_size_bytes)?;

        if !self.track_counts.is_empty() {
            writeln!(f, "Frames per track:")?;
            for (track, count) in &self.track_counts {
                writeln!(f, "  {}: {}", track, count)?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.0}, max={:.0}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
