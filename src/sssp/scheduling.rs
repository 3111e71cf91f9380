//! 选择性调度策略
//!
//! 顶点距离改进后，新距离被写到它的全部出边上，出边终点加入下一轮的
//! 工作列表。未改进的顶点不调度任何邻居，未被调度的顶点在下一轮被跳过。

use crate::core::Distance;
use crate::engine::{PassContext, VertexHandle};

/// 一次更新的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Improved(Distance),
    Unchanged,
}

/// 把 `distance` 写到顶点全部出边
pub fn write_out_edges<V>(vertex: &mut V, distance: Distance)
where
    V: VertexHandle<EdgeValue = Distance>,
{
    for index in 0..vertex.num_out_edges() {
        vertex.set_out_edge_value(index, distance);
    }
}

/// 将全部出边终点调度到下一轮，返回调度次数（含重复）
pub fn schedule_out_neighbors<V>(vertex: &V, ctx: &PassContext<'_>) -> usize
where
    V: VertexHandle,
{
    let count = vertex.num_out_edges();
    for index in 0..count {
        ctx.schedule(vertex.out_edge_target(index));
    }
    count
}

/// 根据更新结果决定要传播与调度的内容
pub fn apply<V>(vertex: &mut V, outcome: Outcome, ctx: &PassContext<'_>) -> usize
where
    V: VertexHandle<EdgeValue = Distance>,
{
    match outcome {
        Outcome::Improved(distance) => {
            write_out_edges(vertex, distance);
            schedule_out_neighbors(vertex, ctx)
        }
        Outcome::Unchanged => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Phase;
    use crate::sssp::mock::{MockVertex, RecordingScheduler};

    #[test]
    fn test_improvement_writes_and_schedules() {
        let scheduler = RecordingScheduler::default();
        let ctx = PassContext {
            pass: 1,
            phase: Phase::Relax,
            scheduler: &scheduler,
        };
        let mut vertex = MockVertex::new(1, Distance::Unreached)
            .with_out_edges(&[2, 3, 3]);

        let scheduled = apply(&mut vertex, Outcome::Improved(Distance::Finite(4)), &ctx);

        assert_eq!(scheduled, 3);
        assert_eq!(scheduler.scheduled(), vec![2, 3, 3]);
        assert!(vertex
            .out_values()
            .iter()
            .all(|value| *value == Distance::Finite(4)));
    }

    #[test]
    fn test_unchanged_schedules_nothing() {
        let scheduler = RecordingScheduler::default();
        let ctx = PassContext {
            pass: 2,
            phase: Phase::Relax,
            scheduler: &scheduler,
        };
        let mut vertex = MockVertex::new(1, Distance::Finite(1)).with_out_edges(&[2]);

        assert_eq!(apply(&mut vertex, Outcome::Unchanged, &ctx), 0);
        assert!(scheduler.scheduled().is_empty());
        assert_eq!(vertex.out_values(), vec![Distance::Unreached]);
    }
}
