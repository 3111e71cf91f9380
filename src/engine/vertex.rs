use std::cell::Cell;
use std::marker::PhantomData;
use std::ops::Range;
use std::sync::atomic::{AtomicU32, Ordering};

use super::{Graph, InEdge, Label, VertexHandle};
use crate::core::VertexId;

/// 引擎存储中的顶点句柄
///
/// 持有顶点值的独占引用；出边值与入边值都位于共享的原子边值数组中。
pub struct StoreVertex<'a, V, E> {
    id: VertexId,
    value: &'a mut u32,
    graph: &'a Graph,
    edge_values: &'a [AtomicU32],
    out_slots: Range<usize>,
    edge_reads: Cell<usize>,
    edge_writes: usize,
    _labels: PhantomData<(V, E)>,
}

impl<'a, V: Label, E: Label> StoreVertex<'a, V, E> {
    pub(crate) fn new(
        id: VertexId,
        value: &'a mut u32,
        graph: &'a Graph,
        edge_values: &'a [AtomicU32],
    ) -> Self {
        Self {
            id,
            value,
            graph,
            edge_values,
            out_slots: graph.out_slots(id),
            edge_reads: Cell::new(0),
            edge_writes: 0,
            _labels: PhantomData,
        }
    }

    pub(crate) fn edge_reads(&self) -> usize {
        self.edge_reads.get()
    }

    pub(crate) fn edge_writes(&self) -> usize {
        self.edge_writes
    }
}

impl<V: Label, E: Label> VertexHandle for StoreVertex<'_, V, E> {
    type Value = V;
    type EdgeValue = E;

    fn id(&self) -> VertexId {
        self.id
    }

    fn value(&self) -> V {
        V::from_raw(*self.value)
    }

    fn set_value(&mut self, value: V) {
        *self.value = value.to_raw();
    }

    fn num_in_edges(&self) -> usize {
        self.graph.in_degree(self.id)
    }

    fn in_edge(&self, index: usize) -> InEdge<E> {
        let slot = self.graph.in_slots(self.id)[index];
        self.edge_reads.set(self.edge_reads.get() + 1);
        InEdge {
            origin: self.graph.in_neighbors(self.id)[index],
            value: E::from_raw(self.edge_values[slot].load(Ordering::Relaxed)),
        }
    }

    fn num_out_edges(&self) -> usize {
        self.out_slots.len()
    }

    fn out_edge_target(&self, index: usize) -> VertexId {
        self.graph.out_neighbors(self.id)[index]
    }

    fn out_edge_value(&self, index: usize) -> E {
        E::from_raw(self.edge_values[self.out_slots.start + index].load(Ordering::Relaxed))
    }

    fn set_out_edge_value(&mut self, index: usize, value: E) {
        debug_assert!(index < self.out_slots.len());
        self.edge_values[self.out_slots.start + index].store(value.to_raw(), Ordering::Relaxed);
        self.edge_writes += 1;
    }
}
