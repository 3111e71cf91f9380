//! 单源最短跳数顶点程序
//!
//! 第0轮初始化：源顶点距离为0并调度其出邻居，其余顶点为 `Unreached`。
//! 之后每轮，被调度的顶点取全部入边距离的最小值加一作为候选，候选更小时
//! 提交并沿出边传播。

use serde::Serialize;

use super::convergence::{ConvergenceTracker, Verdict};
use super::scheduling::{self, Outcome};
use crate::core::{Distance, Pass, Phase, VertexId};
use crate::engine::{PassContext, PassControl, PassSummary, VertexHandle, VertexProgram};

/// 追踪日志的目标名
pub const TRACE_TARGET: &str = "hopgraph::trace";

/// 一次改进的追踪记录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceRecord {
    pub pass: Pass,
    pub vertex: VertexId,
    pub distance: Distance,
}

/// 运行状态
///
/// 在运行开始时创建，只在轮次边界上被引擎交给程序修改。
#[derive(Debug, Clone)]
pub struct RunState {
    source: VertexId,
    current_pass: Option<Pass>,
    tracker: ConvergenceTracker,
    improvements: u64,
    trace: Option<Vec<TraceRecord>>,
}

impl RunState {
    pub fn new(source: VertexId) -> Self {
        Self {
            source,
            current_pass: None,
            tracker: ConvergenceTracker::new(),
            improvements: 0,
            trace: None,
        }
    }

    /// 保留全部改进记录
    pub fn with_trace(mut self) -> Self {
        self.trace = Some(Vec::new());
        self
    }

    pub fn source(&self) -> VertexId {
        self.source
    }

    pub fn current_pass(&self) -> Option<Pass> {
        self.current_pass
    }

    pub fn tracker(&self) -> &ConvergenceTracker {
        &self.tracker
    }

    pub fn converged_at(&self) -> Option<Pass> {
        self.tracker.converged_at()
    }

    /// 累计改进次数
    pub fn improvements(&self) -> u64 {
        self.improvements
    }

    pub fn trace(&self) -> Option<&[TraceRecord]> {
        self.trace.as_deref()
    }

    pub fn take_trace(&mut self) -> Option<Vec<TraceRecord>> {
        self.trace.take()
    }
}

/// 最短跳数顶点程序
#[derive(Debug, Clone, Copy)]
pub struct ShortestPaths {
    source: VertexId,
}

impl ShortestPaths {
    pub fn new(source: VertexId) -> Self {
        Self { source }
    }

    pub fn source(&self) -> VertexId {
        self.source
    }

    /// 计算候选距离，不修改顶点
    ///
    /// 没有入边时最小值为 `Unreached`，候选同样为 `Unreached`，不会构成改进。
    pub fn relax<V>(&self, vertex: &V) -> Outcome
    where
        V: VertexHandle<Value = Distance, EdgeValue = Distance>,
    {
        let shortest = vertex
            .in_edge_values()
            .min()
            .unwrap_or(Distance::Unreached);
        let candidate = shortest.successor();
        if candidate < vertex.value() {
            Outcome::Improved(candidate)
        } else {
            Outcome::Unchanged
        }
    }
}

impl VertexProgram for ShortestPaths {
    type VertexValue = Distance;
    type EdgeValue = Distance;
    type State = RunState;
    type Event = TraceRecord;

    fn before_pass(&self, pass: Pass, state: &mut RunState) {
        state.current_pass = Some(pass);
        state.tracker.begin_pass(pass);
    }

    fn initialize<V>(&self, vertex: &mut V, ctx: &PassContext<'_>) -> Option<TraceRecord>
    where
        V: VertexHandle<Value = Distance, EdgeValue = Distance>,
    {
        if vertex.id() == self.source {
            vertex.set_value(Distance::ZERO);
            scheduling::write_out_edges(vertex, Distance::ZERO);
            scheduling::schedule_out_neighbors(vertex, ctx);
        } else {
            vertex.set_value(Distance::Unreached);
            scheduling::write_out_edges(vertex, Distance::Unreached);
        }
        None
    }

    fn update<V>(&self, vertex: &mut V, ctx: &PassContext<'_>) -> Option<TraceRecord>
    where
        V: VertexHandle<Value = Distance, EdgeValue = Distance>,
    {
        match self.relax(vertex) {
            Outcome::Improved(distance) => {
                vertex.set_value(distance);
                scheduling::apply(vertex, Outcome::Improved(distance), ctx);
                log::trace!(
                    target: TRACE_TARGET,
                    "pass: {} vid: {} value: {}",
                    ctx.pass,
                    vertex.id(),
                    distance
                );
                Some(TraceRecord {
                    pass: ctx.pass,
                    vertex: vertex.id(),
                    distance,
                })
            }
            Outcome::Unchanged => None,
        }
    }

    fn after_pass(&self, summary: PassSummary<TraceRecord>, state: &mut RunState) -> PassControl {
        if summary.phase == Phase::Initialize {
            state.tracker.note_improvement();
        }
        state.tracker.note_improvements(summary.events.len());
        state.improvements += summary.events.len() as u64;
        if let Some(trace) = state.trace.as_mut() {
            trace.extend(summary.events);
        }

        match state.tracker.end_pass() {
            Verdict::Converged => {
                log::info!("第{}轮收敛", summary.pass);
                PassControl::LastPass
            }
            Verdict::Active => PassControl::Continue,
        }
    }
}
