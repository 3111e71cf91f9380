//! 运行结果
//!
//! 最终距离表、运行状态与统计信息，以及结果的文本/JSON输出。

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::time::Duration;

use super::program::TraceRecord;
use crate::core::{Distance, HopResult, Pass, SsspError, VertexId};
use crate::engine::EngineMetricsSnapshot;

/// 运行的最终状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    /// 在第 `pass` 轮达到不动点
    Converged { pass: Pass },
    /// 执行了 `passes` 轮仍未收敛
    NotConverged { passes: u32 },
}

impl RunStatus {
    pub fn is_converged(&self) -> bool {
        matches!(self, RunStatus::Converged { .. })
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Converged { pass } => write!(f, "converged at pass {}", pass),
            RunStatus::NotConverged { passes } => {
                write!(f, "did not converge within {} passes", passes)
            }
        }
    }
}

/// 结果输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Tsv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tsv" | "text" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("未知的输出格式: {}", other)),
        }
    }
}

/// 按顶点ID索引的最终距离
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistanceTable {
    distances: Vec<Distance>,
}

impl DistanceTable {
    pub fn new(distances: Vec<Distance>) -> Self {
        Self { distances }
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn get(&self, vertex: VertexId) -> Option<Distance> {
        self.distances.get(vertex as usize).copied()
    }

    pub fn as_slice(&self) -> &[Distance] {
        &self.distances
    }

    pub fn iter(&self) -> impl Iterator<Item = (VertexId, Distance)> + '_ {
        self.distances
            .iter()
            .enumerate()
            .map(|(id, distance)| (id as VertexId, *distance))
    }

    /// 可达顶点数
    pub fn reached(&self) -> usize {
        self.distances.iter().filter(|d| d.is_reached()).count()
    }

    /// 不可达顶点数
    pub fn unreached(&self) -> usize {
        self.len() - self.reached()
    }

    /// 最大有限距离
    pub fn eccentricity(&self) -> Option<u32> {
        self.distances.iter().filter_map(|d| d.hops()).max()
    }

    /// 距离最远的 `k` 个可达顶点，距离相同时按ID升序
    pub fn farthest(&self, k: usize) -> Vec<(VertexId, u32)> {
        let mut reached: Vec<(VertexId, u32)> = self
            .iter()
            .filter_map(|(id, d)| d.hops().map(|hops| (id, hops)))
            .collect();
        reached.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        reached.truncate(k);
        reached
    }

    /// 输出全部距离
    pub fn write_to<W: Write>(&self, writer: &mut W, format: OutputFormat) -> HopResult<()> {
        match format {
            OutputFormat::Tsv => {
                for (vertex, distance) in self.iter() {
                    writeln!(writer, "{}\t{}", vertex, distance)?;
                }
            }
            OutputFormat::Json => {
                let entries: Vec<JsonEntry> = self
                    .iter()
                    .map(|(vertex, distance)| JsonEntry {
                        vertex,
                        distance: distance.hops(),
                    })
                    .collect();
                serde_json::to_writer_pretty(&mut *writer, &entries)?;
                writeln!(writer)?;
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonEntry {
    vertex: VertexId,
    distance: Option<u32>,
}

/// 运行统计
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub started_at: DateTime<Local>,
    pub elapsed: Duration,
    /// 执行的轮数（含第0轮）
    pub passes: u32,
    /// 距离改进次数
    pub improvements: u64,
    pub engine: EngineMetricsSnapshot,
}

/// 一次运行的完整输出
#[derive(Debug, Clone)]
pub struct SsspOutcome {
    pub source: VertexId,
    pub status: RunStatus,
    pub distances: DistanceTable,
    pub stats: RunStats,
    pub trace: Option<Vec<TraceRecord>>,
}

impl SsspOutcome {
    /// 未收敛时转为错误
    pub fn into_converged(self) -> HopResult<Self> {
        match self.status {
            RunStatus::Converged { .. } => Ok(self),
            RunStatus::NotConverged { passes } => Err(SsspError::NotConverged { max_passes: passes }),
        }
    }

    pub fn distance(&self, vertex: VertexId) -> Option<Distance> {
        self.distances.get(vertex)
    }

    /// 在日志中输出最终状态
    pub fn log_final_state(&self) {
        log::info!(
            "源顶点 {}: {}, 可达 {} / {} 个顶点",
            self.source,
            self.status,
            self.distances.reached(),
            self.distances.len()
        );
        if log::log_enabled!(log::Level::Debug) {
            for (vertex, distance) in self.distances.iter() {
                log::debug!("vertex {} distance {}", vertex, distance);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DistanceTable {
        DistanceTable::new(vec![
            Distance::ZERO,
            Distance::Finite(1),
            Distance::Finite(2),
            Distance::Unreached,
            Distance::Finite(2),
        ])
    }

    #[test]
    fn test_counts() {
        let table = table();
        assert_eq!(table.len(), 5);
        assert_eq!(table.reached(), 4);
        assert_eq!(table.unreached(), 1);
        assert_eq!(table.eccentricity(), Some(2));
        assert_eq!(table.get(3), Some(Distance::Unreached));
        assert_eq!(table.get(5), None);
    }

    #[test]
    fn test_farthest() {
        assert_eq!(table().farthest(3), vec![(2, 2), (4, 2), (1, 1)]);
        assert!(table().farthest(0).is_empty());
        assert_eq!(table().farthest(10).len(), 4);
    }

    #[test]
    fn test_write_tsv() {
        let mut out = Vec::new();
        table()
            .write_to(&mut out, OutputFormat::Tsv)
            .expect("TSV output should succeed");
        let text = String::from_utf8(out).expect("output should be UTF-8");
        assert_eq!(text, "0\t0\n1\t1\n2\t2\n3\tinf\n4\t2\n");
    }

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        table()
            .write_to(&mut out, OutputFormat::Json)
            .expect("JSON output should succeed");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("output should be JSON");
        assert_eq!(value[1]["distance"], 1);
        assert!(value[3]["distance"].is_null());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(
            RunStatus::Converged { pass: 4 }.to_string(),
            "converged at pass 4"
        );
        assert!(!RunStatus::NotConverged { passes: 3 }.is_converged());
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
    }
}
