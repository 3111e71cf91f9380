//! 顶点中心计算引擎
//!
//! 引擎按轮次驱动顶点程序：每轮开始前调用 `before_pass`，对活跃顶点调用
//! 更新函数，结束后调用 `after_pass` 决定是否终止。顶点程序只通过
//! [`VertexHandle`] 与 [`Scheduler`] 两个能力接口访问图，与存储实现解耦。

pub mod executor;
pub mod graph;
pub mod loader;
pub mod metrics;
pub mod scheduler;
mod vertex;

pub use executor::{Engine, EngineOptions, RunSummary, StopReason};
pub use graph::{Graph, GraphBuilder};
pub use loader::{load_graph, parse_graph, GraphFormat};
pub use metrics::{EngineMetricsCollector, EngineMetricsSnapshot};
pub use scheduler::{AtomicBitset, WorkList};
pub use vertex::StoreVertex;

use crate::core::{Pass, Phase, VertexId};

/// 定长值编解码
///
/// 顶点值与边值在存储层中统一以 `u32` 保存，边值使用原子类型以便相邻
/// 顶点在并行更新时共享。
pub trait Label: Copy + Send + Sync + 'static {
    fn to_raw(self) -> u32;
    fn from_raw(raw: u32) -> Self;
}

impl Label for u32 {
    fn to_raw(self) -> u32 {
        self
    }

    fn from_raw(raw: u32) -> Self {
        raw
    }
}

/// 入边视图：来源顶点与边值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InEdge<E> {
    pub origin: VertexId,
    pub value: E,
}

/// 顶点访问能力
///
/// 更新调用期间，顶点程序独占顶点自身的值与其出边的值，对入边只读。
pub trait VertexHandle {
    type Value: Label;
    type EdgeValue: Label;

    fn id(&self) -> VertexId;
    fn value(&self) -> Self::Value;
    fn set_value(&mut self, value: Self::Value);

    fn num_in_edges(&self) -> usize;
    fn in_edge(&self, index: usize) -> InEdge<Self::EdgeValue>;

    fn num_out_edges(&self) -> usize;
    fn out_edge_target(&self, index: usize) -> VertexId;
    fn out_edge_value(&self, index: usize) -> Self::EdgeValue;
    fn set_out_edge_value(&mut self, index: usize, value: Self::EdgeValue);

    /// 依次返回全部入边的值
    fn in_edge_values(&self) -> InEdgeValues<'_, Self>
    where
        Self: Sized,
    {
        InEdgeValues {
            vertex: self,
            next: 0,
        }
    }
}

/// [`VertexHandle::in_edge_values`] 返回的迭代器
pub struct InEdgeValues<'a, V> {
    vertex: &'a V,
    next: usize,
}

impl<V: VertexHandle> Iterator for InEdgeValues<'_, V> {
    type Item = V::EdgeValue;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.vertex.num_in_edges() {
            return None;
        }
        let value = self.vertex.in_edge(self.next).value;
        self.next += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vertex.num_in_edges().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

/// 工作列表能力：将顶点加入下一轮
///
/// 重复调度同一顶点是幂等的；实现必须允许多个工作线程并发调用。
pub trait Scheduler: Sync {
    fn schedule(&self, vertex: VertexId);
}

/// 单次更新调用的上下文
pub struct PassContext<'a> {
    pub pass: Pass,
    pub phase: Phase,
    pub scheduler: &'a dyn Scheduler,
}

impl PassContext<'_> {
    pub fn schedule(&self, vertex: VertexId) {
        self.scheduler.schedule(vertex);
    }
}

/// 一轮结束后的汇总
#[derive(Debug)]
pub struct PassSummary<E> {
    pub pass: Pass,
    pub phase: Phase,
    /// 本轮实际调用更新函数的顶点数
    pub visited: usize,
    /// 本轮更新函数产生的事件
    pub events: Vec<E>,
}

/// `after_pass` 返回的控制信号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassControl {
    Continue,
    /// 当前轮即为最后一轮
    LastPass,
}

/// 顶点程序
///
/// 引擎在第0轮对每个顶点调用 `initialize`，之后每轮对活跃顶点调用
/// `update`。两者返回的事件被收集进 [`PassSummary`] 交给 `after_pass`，
/// 程序的运行状态只在轮次边界上被修改，更新调用之间无需加锁。
pub trait VertexProgram: Sync {
    type VertexValue: Label;
    type EdgeValue: Label;
    type State;
    type Event: Send;

    fn before_pass(&self, pass: Pass, state: &mut Self::State);

    fn initialize<V>(&self, vertex: &mut V, ctx: &PassContext<'_>) -> Option<Self::Event>
    where
        V: VertexHandle<Value = Self::VertexValue, EdgeValue = Self::EdgeValue>;

    fn update<V>(&self, vertex: &mut V, ctx: &PassContext<'_>) -> Option<Self::Event>
    where
        V: VertexHandle<Value = Self::VertexValue, EdgeValue = Self::EdgeValue>;

    fn after_pass(
        &self,
        summary: PassSummary<Self::Event>,
        state: &mut Self::State,
    ) -> PassControl;
}
