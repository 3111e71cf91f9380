//! 引擎指标收集器
//!
//! 收集运行期间的计数与耗时，包括访问的顶点数、边读写次数、各阶段耗时等

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::core::Phase;

/// 引擎指标快照
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineMetricsSnapshot {
    /// 执行的轮数
    pub passes: u64,
    /// 调用更新函数的顶点数（累计）
    pub vertices_visited: u64,
    /// 更新函数产生的事件数
    pub events: u64,
    /// 入边读取次数
    pub edge_reads: u64,
    /// 出边写入次数
    pub edge_writes: u64,
    /// 轮次结束时调度到下一轮的顶点数（累计）
    pub vertices_scheduled: u64,
    /// 各阶段累计耗时（微秒）
    pub phase_micros: BTreeMap<String, u64>,
}

impl EngineMetricsSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 平均每轮访问的顶点数
    pub fn mean_visited_per_pass(&self) -> f64 {
        if self.passes > 0 {
            self.vertices_visited as f64 / self.passes as f64
        } else {
            0.0
        }
    }

    /// 事件率（产生事件的更新 / 全部更新）
    pub fn event_rate(&self) -> f64 {
        if self.vertices_visited > 0 {
            self.events as f64 / self.vertices_visited as f64
        } else {
            0.0
        }
    }

    pub fn total_elapsed(&self) -> Duration {
        Duration::from_micros(self.phase_micros.values().sum())
    }
}

/// 单轮的局部计数，由工作线程折叠后一次性提交
#[derive(Debug, Clone, Copy, Default)]
pub struct PassCounters {
    pub visited: u64,
    pub events: u64,
    pub edge_reads: u64,
    pub edge_writes: u64,
}

impl PassCounters {
    pub fn merge(self, other: PassCounters) -> PassCounters {
        PassCounters {
            visited: self.visited + other.visited,
            events: self.events + other.events,
            edge_reads: self.edge_reads + other.edge_reads,
            edge_writes: self.edge_writes + other.edge_writes,
        }
    }
}

/// 引擎指标收集器
#[derive(Debug)]
pub struct EngineMetricsCollector {
    passes: AtomicU64,
    vertices_visited: AtomicU64,
    events: AtomicU64,
    edge_reads: AtomicU64,
    edge_writes: AtomicU64,
    vertices_scheduled: AtomicU64,
    phase_micros: dashmap::DashMap<Phase, AtomicU64>,
}

impl Default for EngineMetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineMetricsCollector {
    pub fn new() -> Self {
        Self {
            passes: AtomicU64::new(0),
            vertices_visited: AtomicU64::new(0),
            events: AtomicU64::new(0),
            edge_reads: AtomicU64::new(0),
            edge_writes: AtomicU64::new(0),
            vertices_scheduled: AtomicU64::new(0),
            phase_micros: dashmap::DashMap::new(),
        }
    }

    /// 记录一轮的计数与耗时
    pub fn record_pass(&self, phase: Phase, counters: PassCounters, elapsed: Duration) {
        self.passes.fetch_add(1, Ordering::Relaxed);
        self.vertices_visited
            .fetch_add(counters.visited, Ordering::Relaxed);
        self.events.fetch_add(counters.events, Ordering::Relaxed);
        self.edge_reads
            .fetch_add(counters.edge_reads, Ordering::Relaxed);
        self.edge_writes
            .fetch_add(counters.edge_writes, Ordering::Relaxed);
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.phase_micros
            .entry(phase)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(micros, Ordering::Relaxed);
    }

    /// 记录调度到下一轮的顶点数
    pub fn record_scheduled(&self, count: u64) {
        self.vertices_scheduled.fetch_add(count, Ordering::Relaxed);
    }

    /// 获取当前指标快照
    pub fn snapshot(&self) -> EngineMetricsSnapshot {
        let mut phase_micros = BTreeMap::new();
        for entry in self.phase_micros.iter() {
            phase_micros.insert(
                entry.key().to_string(),
                entry.value().load(Ordering::Relaxed),
            );
        }

        EngineMetricsSnapshot {
            passes: self.passes.load(Ordering::Relaxed),
            vertices_visited: self.vertices_visited.load(Ordering::Relaxed),
            events: self.events.load(Ordering::Relaxed),
            edge_reads: self.edge_reads.load(Ordering::Relaxed),
            edge_writes: self.edge_writes.load(Ordering::Relaxed),
            vertices_scheduled: self.vertices_scheduled.load(Ordering::Relaxed),
            phase_micros,
        }
    }

    /// 输出指标报告
    pub fn report(&self, name: &str) {
        let snapshot = self.snapshot();
        log::info!(
            "[{}] 轮数={} 访问顶点={} 事件={} 边读={} 边写={} 调度={} 耗时={:?}",
            name,
            snapshot.passes,
            snapshot.vertices_visited,
            snapshot.events,
            snapshot.edge_reads,
            snapshot.edge_writes,
            snapshot.vertices_scheduled,
            snapshot.total_elapsed()
        );
        for (phase, micros) in &snapshot.phase_micros {
            log::debug!("[{}] 阶段 {} 耗时 {}us", name, phase, micros);
        }
    }

    /// 重置所有指标
    pub fn reset(&self) {
        self.passes.store(0, Ordering::Relaxed);
        self.vertices_visited.store(0, Ordering::Relaxed);
        self.events.store(0, Ordering::Relaxed);
        self.edge_reads.store(0, Ordering::Relaxed);
        self.edge_writes.store(0, Ordering::Relaxed);
        self.vertices_scheduled.store(0, Ordering::Relaxed);
        self.phase_micros.clear();
    }
}
