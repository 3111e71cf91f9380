//! 运行驱动
//!
//! 校验选项、构建引擎、执行顶点程序并整理结果。

use chrono::Local;
use std::time::Instant;

use super::program::{RunState, ShortestPaths};
use super::result::{DistanceTable, RunStats, RunStatus, SsspOutcome};
use crate::algorithm::bfs;
use crate::core::{ConfigError, Distance, HopResult, SsspError, VertexId};
use crate::engine::{Engine, EngineOptions, Graph, StopReason};

/// 默认轮数上限
pub const DEFAULT_MAX_PASSES: u32 = 10_000;

/// 运行选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub source: VertexId,
    /// 最多执行的轮数（含第0轮）
    pub max_passes: u32,
    pub selective_scheduling: bool,
    pub threads: usize,
    /// 是否在结果中保留全部改进记录
    pub trace: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            source: 0,
            max_passes: DEFAULT_MAX_PASSES,
            selective_scheduling: true,
            threads: num_cpus::get(),
            trace: false,
        }
    }
}

impl RunOptions {
    pub fn with_source(mut self, source: VertexId) -> Self {
        self.source = source;
        self
    }

    pub fn with_max_passes(mut self, max_passes: u32) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn with_selective_scheduling(mut self, enabled: bool) -> Self {
        self.selective_scheduling = enabled;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// 检查选项与图是否匹配
    pub fn validate(&self, graph: &Graph) -> HopResult<()> {
        if self.max_passes == 0 {
            return Err(ConfigError::invalid("run.max_passes", "必须大于0").into());
        }
        if !graph.contains(self.source) {
            return Err(SsspError::SourceNotFound {
                vertex: self.source,
                num_vertices: graph.num_vertices(),
            });
        }
        Ok(())
    }
}

/// 一次最短跳数计算
///
/// 持有引擎与运行状态，执行结束后仍可继续追加松弛轮次。
pub struct ShortestPathRun {
    engine: Engine,
    program: ShortestPaths,
    state: RunState,
    options: RunOptions,
}

impl ShortestPathRun {
    pub fn new(graph: Graph, options: RunOptions) -> HopResult<Self> {
        options.validate(&graph)?;
        let engine = Engine::new(
            graph,
            EngineOptions {
                selective_scheduling: options.selective_scheduling,
                threads: options.threads,
            },
        )?;
        let mut state = RunState::new(options.source);
        if options.trace {
            state = state.with_trace();
        }
        Ok(Self {
            engine,
            program: ShortestPaths::new(options.source),
            state,
            options,
        })
    }

    pub fn graph(&self) -> &Graph {
        self.engine.graph()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub fn distances(&self) -> DistanceTable {
        DistanceTable::new(self.engine.vertex_values::<Distance>())
    }

    /// 从第0轮开始执行直到收敛或达到轮数上限
    pub fn execute(&mut self) -> SsspOutcome {
        let started_at = Local::now();
        let started = Instant::now();
        log::info!(
            "开始计算: 源顶点 {}, 轮数上限 {}",
            self.options.source,
            self.options.max_passes
        );

        self.state = RunState::new(self.options.source);
        if self.options.trace {
            self.state = self.state.clone().with_trace();
        }
        let summary = self
            .engine
            .run(&self.program, &mut self.state, self.options.max_passes);

        let status = match summary.stop {
            StopReason::LastPass(pass) => RunStatus::Converged { pass },
            StopReason::PassLimit => {
                log::warn!("未在 {} 轮内收敛", summary.passes);
                RunStatus::NotConverged {
                    passes: summary.passes,
                }
            }
        };
        self.engine.metrics().report("sssp");

        let outcome = SsspOutcome {
            source: self.options.source,
            status,
            distances: self.distances(),
            stats: RunStats {
                started_at,
                elapsed: started.elapsed(),
                passes: summary.passes,
                improvements: self.state.improvements(),
                engine: self.engine.metrics().snapshot(),
            },
            trace: self.state.take_trace(),
        };
        outcome.log_final_state();
        outcome
    }

    /// 追加至多 `passes` 轮全量松弛，返回期间的改进次数
    ///
    /// 在已收敛的结果上调用时应当返回0。
    pub fn relax_further(&mut self, passes: u32) -> u64 {
        let before = self.state.improvements();
        self.engine.resume(&self.program, &mut self.state, passes);
        self.state.improvements() - before
    }
}

/// 执行一次完整计算
pub fn run(graph: Graph, options: RunOptions) -> HopResult<SsspOutcome> {
    let mut run = ShortestPathRun::new(graph, options)?;
    Ok(run.execute())
}

/// 与广度优先搜索的结果逐顶点比对
pub fn verify(graph: &Graph, outcome: &SsspOutcome) -> HopResult<()> {
    let expected = bfs::hop_distances(graph, outcome.source);
    for (vertex, actual) in outcome.distances.iter() {
        let wanted = expected
            .get(vertex as usize)
            .copied()
            .unwrap_or(Distance::Unreached);
        if wanted != actual {
            return Err(SsspError::Verification {
                vertex,
                expected: wanted.to_string(),
                actual: actual.to_string(),
            });
        }
    }
    log::info!("结果校验通过: {} 个顶点", outcome.distances.len());
    Ok(())
}
