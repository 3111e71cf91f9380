//! 测试用的顶点与调度器替身

use parking_lot::Mutex;

use crate::core::{Distance, VertexId};
use crate::engine::{InEdge, Scheduler, VertexHandle};

pub(crate) struct MockVertex {
    id: VertexId,
    value: Distance,
    in_edges: Vec<InEdge<Distance>>,
    out_edges: Vec<(VertexId, Distance)>,
}

impl MockVertex {
    pub(crate) fn new(id: VertexId, value: Distance) -> Self {
        Self {
            id,
            value,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        }
    }

    pub(crate) fn with_in_edges(mut self, edges: &[(VertexId, Distance)]) -> Self {
        self.in_edges = edges
            .iter()
            .map(|&(origin, value)| InEdge { origin, value })
            .collect();
        self
    }

    pub(crate) fn with_out_edges(mut self, targets: &[VertexId]) -> Self {
        self.out_edges = targets
            .iter()
            .map(|&target| (target, Distance::Unreached))
            .collect();
        self
    }

    pub(crate) fn out_values(&self) -> Vec<Distance> {
        self.out_edges.iter().map(|&(_, value)| value).collect()
    }
}

impl VertexHandle for MockVertex {
    type Value = Distance;
    type EdgeValue = Distance;

    fn id(&self) -> VertexId {
        self.id
    }

    fn value(&self) -> Distance {
        self.value
    }

    fn set_value(&mut self, value: Distance) {
        self.value = value;
    }

    fn num_in_edges(&self) -> usize {
        self.in_edges.len()
    }

    fn in_edge(&self, index: usize) -> InEdge<Distance> {
        self.in_edges[index]
    }

    fn num_out_edges(&self) -> usize {
        self.out_edges.len()
    }

    fn out_edge_target(&self, index: usize) -> VertexId {
        self.out_edges[index].0
    }

    fn out_edge_value(&self, index: usize) -> Distance {
        self.out_edges[index].1
    }

    fn set_out_edge_value(&mut self, index: usize, value: Distance) {
        self.out_edges[index].1 = value;
    }
}

#[derive(Default)]
pub(crate) struct RecordingScheduler {
    scheduled: Mutex<Vec<VertexId>>,
}

impl RecordingScheduler {
    pub(crate) fn scheduled(&self) -> Vec<VertexId> {
        self.scheduled.lock().clone()
    }
}

impl Scheduler for RecordingScheduler {
    fn schedule(&self, vertex: VertexId) {
        self.scheduled.lock().push(vertex);
    }
}
