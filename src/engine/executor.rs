//! 轮次执行器
//!
//! 每轮的顶点更新在 rayon 线程池上并行执行。顶点值按顶点切分后独占地交给
//! 各工作线程，边值为原子量，事件与计数通过 fold/reduce 汇总，更新过程中
//! 不持有任何锁。

use rayon::prelude::*;
use std::sync::atomic::AtomicU32;
use std::time::Instant;

use super::metrics::PassCounters;
use super::{
    EngineMetricsCollector, Graph, Label, PassContext, PassControl, PassSummary, StoreVertex,
    VertexProgram, WorkList,
};
use crate::core::{EngineError, Pass, Phase, VertexId};

/// 引擎选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// 是否启用选择性调度；关闭时每轮处理全部顶点
    pub selective_scheduling: bool,
    /// 工作线程数，0 表示由 rayon 决定
    pub threads: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            selective_scheduling: true,
            threads: num_cpus::get(),
        }
    }
}

/// 运行结束的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// 程序在 `after_pass` 中标记了最后一轮
    LastPass(Pass),
    /// 达到轮数上限
    PassLimit,
}

/// 一次运行的汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// 本次调用执行的轮数
    pub passes: u32,
    pub stop: StopReason,
}

/// 内存中的顶点中心引擎
pub struct Engine {
    graph: Graph,
    vertex_values: Vec<u32>,
    edge_values: Vec<AtomicU32>,
    worklist: WorkList,
    options: EngineOptions,
    pool: rayon::ThreadPool,
    metrics: EngineMetricsCollector,
    next_pass: Pass,
}

impl Engine {
    pub fn new(graph: Graph, options: EngineOptions) -> Result<Self, EngineError> {
        if graph.is_empty() {
            return Err(EngineError::EmptyGraph);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .thread_name(|index| format!("hopgraph-worker-{}", index))
            .build()?;

        let vertex_values = vec![0u32; graph.num_vertices()];
        let edge_values = (0..graph.num_edges()).map(|_| AtomicU32::new(0)).collect();
        let worklist = WorkList::new(graph.num_vertices(), options.selective_scheduling);

        log::info!(
            "引擎初始化: {} 个顶点, {} 条边, 线程数 {}, 选择性调度 {}",
            graph.num_vertices(),
            graph.num_edges(),
            pool.current_num_threads(),
            options.selective_scheduling
        );

        Ok(Self {
            graph,
            vertex_values,
            edge_values,
            worklist,
            options,
            pool,
            metrics: EngineMetricsCollector::new(),
            next_pass: 0,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn metrics(&self) -> &EngineMetricsCollector {
        &self.metrics
    }

    /// 已执行的轮数（即下一轮的编号）
    pub fn passes_executed(&self) -> Pass {
        self.next_pass
    }

    pub fn vertex_value<V: Label>(&self, vertex: VertexId) -> Option<V> {
        self.vertex_values
            .get(vertex as usize)
            .map(|raw| V::from_raw(*raw))
    }

    pub fn vertex_values<V: Label>(&self) -> Vec<V> {
        self.vertex_values.iter().map(|raw| V::from_raw(*raw)).collect()
    }

    /// 顶点第 `index` 条出边的值
    pub fn out_edge_value<E: Label>(&self, vertex: VertexId, index: usize) -> Option<E> {
        if !self.graph.contains(vertex) {
            return None;
        }
        let slots = self.graph.out_slots(vertex);
        if index >= slots.len() {
            return None;
        }
        Some(E::from_raw(
            self.edge_values[slots.start + index].load(std::sync::atomic::Ordering::Relaxed),
        ))
    }

    /// 从第0轮开始运行，最多执行 `max_passes` 轮
    pub fn run<P: VertexProgram>(
        &mut self,
        program: &P,
        state: &mut P::State,
        max_passes: u32,
    ) -> RunSummary {
        self.next_pass = 0;
        self.worklist = WorkList::new(self.graph.num_vertices(), self.options.selective_scheduling);
        self.metrics.reset();
        self.drive(program, state, max_passes, false)
    }

    /// 在已初始化的存储上继续执行至多 `passes` 轮全量松弛
    ///
    /// 每轮都处理全部顶点，与调度模式无关。尚未初始化时退化为 [`Engine::run`]。
    pub fn resume<P: VertexProgram>(
        &mut self,
        program: &P,
        state: &mut P::State,
        passes: u32,
    ) -> RunSummary {
        if self.next_pass == 0 {
            return self.run(program, state, passes);
        }
        self.drive(program, state, passes, true)
    }

    fn drive<P: VertexProgram>(
        &mut self,
        program: &P,
        state: &mut P::State,
        passes: u32,
        full_sweep: bool,
    ) -> RunSummary {
        for executed in 1..=passes {
            if full_sweep {
                self.worklist.schedule_all();
            }
            let pass = self.next_pass;
            let control = self.execute_pass(program, state, pass);
            self.next_pass += 1;
            if control == PassControl::LastPass {
                log::debug!("第{}轮被标记为最后一轮", pass);
                return RunSummary {
                    passes: executed,
                    stop: StopReason::LastPass(pass),
                };
            }
        }
        RunSummary {
            passes,
            stop: StopReason::PassLimit,
        }
    }

    fn execute_pass<P: VertexProgram>(
        &mut self,
        program: &P,
        state: &mut P::State,
        pass: Pass,
    ) -> PassControl {
        let phase = Phase::of(pass);
        if phase == Phase::Relax {
            self.worklist.advance();
        }
        program.before_pass(pass, state);

        let active = match phase {
            Phase::Initialize => self.graph.num_vertices(),
            Phase::Relax => self.worklist.active_count(),
        };
        log::debug!("第{}轮开始 ({}): {} 个活跃顶点", pass, phase, active);

        let started = Instant::now();
        let (counters, events) = self.run_updates(program, pass, phase);
        let elapsed = started.elapsed();

        self.metrics.record_pass(phase, counters, elapsed);
        if self.worklist.is_selective() {
            self.metrics
                .record_scheduled(self.worklist.pending_count() as u64);
        }
        log::debug!(
            "第{}轮结束: 访问 {} 个顶点, {} 个事件, 耗时 {:?}",
            pass,
            counters.visited,
            counters.events,
            elapsed
        );

        program.after_pass(
            PassSummary {
                pass,
                phase,
                visited: counters.visited as usize,
                events,
            },
            state,
        )
    }

    fn run_updates<P: VertexProgram>(
        &mut self,
        program: &P,
        pass: Pass,
        phase: Phase,
    ) -> (PassCounters, Vec<P::Event>) {
        let graph = &self.graph;
        let edge_values = self.edge_values.as_slice();
        let worklist = &self.worklist;
        let vertex_values = &mut self.vertex_values;
        let ctx = PassContext {
            pass,
            phase,
            scheduler: worklist,
        };

        self.pool.install(|| {
            vertex_values
                .par_iter_mut()
                .enumerate()
                .filter(|(id, _)| phase == Phase::Initialize || worklist.is_active(*id as VertexId))
                .fold(
                    || (PassCounters::default(), Vec::new()),
                    |(mut counters, mut events), (id, value)| {
                        let mut vertex = StoreVertex::<P::VertexValue, P::EdgeValue>::new(
                            id as VertexId,
                            value,
                            graph,
                            edge_values,
                        );
                        let event = match phase {
                            Phase::Initialize => program.initialize(&mut vertex, &ctx),
                            Phase::Relax => program.update(&mut vertex, &ctx),
                        };
                        counters.visited += 1;
                        counters.edge_reads += vertex.edge_reads() as u64;
                        counters.edge_writes += vertex.edge_writes() as u64;
                        if let Some(event) = event {
                            counters.events += 1;
                            events.push(event);
                        }
                        (counters, events)
                    },
                )
                .reduce(
                    || (PassCounters::default(), Vec::new()),
                    |(left, mut left_events), (right, right_events)| {
                        left_events.extend(right_events);
                        (left.merge(right), left_events)
                    },
                )
        })
    }
}
