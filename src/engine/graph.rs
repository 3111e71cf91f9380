//! 图拓扑
//!
//! 以压缩稀疏行（CSR）格式同时保存出邻接与入邻接。每条边只有一个值槽位，
//! 位于其起点的出边区间内；入邻接记录的是该槽位的下标，因此边值是
//! 相邻两个顶点之间唯一的共享状态。

use std::ops::Range;

use crate::core::{GraphError, VertexId};

/// 不可变的有向图拓扑
#[derive(Debug, Clone, Default)]
pub struct Graph {
    num_vertices: usize,
    out_offsets: Vec<usize>,
    out_targets: Vec<VertexId>,
    in_offsets: Vec<usize>,
    in_slots: Vec<usize>,
    in_origins: Vec<VertexId>,
}

impl Graph {
    /// 由边列表直接构建，顶点数为最大ID加一
    pub fn from_edges<I>(edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        let mut builder = GraphBuilder::new();
        builder.extend(edges);
        builder.build()
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    pub fn num_edges(&self) -> usize {
        self.out_targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_vertices == 0
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        (vertex as usize) < self.num_vertices
    }

    /// 顶点出边在边值数组中的下标区间
    pub fn out_slots(&self, vertex: VertexId) -> Range<usize> {
        let v = vertex as usize;
        self.out_offsets[v]..self.out_offsets[v + 1]
    }

    pub fn out_neighbors(&self, vertex: VertexId) -> &[VertexId] {
        &self.out_targets[self.out_slots(vertex)]
    }

    fn in_range(&self, vertex: VertexId) -> Range<usize> {
        let v = vertex as usize;
        self.in_offsets[v]..self.in_offsets[v + 1]
    }

    /// 入边对应的边值槽位
    pub fn in_slots(&self, vertex: VertexId) -> &[usize] {
        &self.in_slots[self.in_range(vertex)]
    }

    pub fn in_neighbors(&self, vertex: VertexId) -> &[VertexId] {
        &self.in_origins[self.in_range(vertex)]
    }

    pub fn out_degree(&self, vertex: VertexId) -> usize {
        self.out_slots(vertex).len()
    }

    pub fn in_degree(&self, vertex: VertexId) -> usize {
        self.in_range(vertex).len()
    }

    /// 按起点顺序遍历全部边
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        (0..self.num_vertices as VertexId).flat_map(move |src| {
            self.out_neighbors(src).iter().map(move |&dst| (src, dst))
        })
    }
}

/// 图构建器
#[derive(Debug, Default)]
pub struct GraphBuilder {
    edges: Vec<(VertexId, VertexId)>,
    min_vertices: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保证顶点数至少为 `count`，用于末尾的孤立顶点
    pub fn with_vertex_count(mut self, count: usize) -> Self {
        self.min_vertices = count;
        self
    }

    pub fn add_edge(&mut self, src: VertexId, dst: VertexId) -> &mut Self {
        self.edges.push((src, dst));
        self
    }

    pub fn extend<I>(&mut self, edges: I) -> &mut Self
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        self.edges.extend(edges);
        self
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn build(self) -> Result<Graph, GraphError> {
        let max_id = self
            .edges
            .iter()
            .map(|&(src, dst)| src.max(dst) as usize + 1)
            .max()
            .unwrap_or(0);
        let num_vertices = max_id.max(self.min_vertices);
        if num_vertices > VertexId::MAX as usize {
            return Err(GraphError::TooManyVertices(num_vertices));
        }

        let mut edges = self.edges;
        edges.sort_unstable();

        let mut out_offsets = vec![0usize; num_vertices + 1];
        for &(src, _) in &edges {
            out_offsets[src as usize + 1] += 1;
        }
        for v in 0..num_vertices {
            out_offsets[v + 1] += out_offsets[v];
        }
        let out_targets: Vec<VertexId> = edges.iter().map(|&(_, dst)| dst).collect();

        let mut in_offsets = vec![0usize; num_vertices + 1];
        for &(_, dst) in &edges {
            in_offsets[dst as usize + 1] += 1;
        }
        for v in 0..num_vertices {
            in_offsets[v + 1] += in_offsets[v];
        }

        let mut cursor = in_offsets.clone();
        let mut in_slots = vec![0usize; edges.len()];
        let mut in_origins = vec![0 as VertexId; edges.len()];
        for (slot, &(src, dst)) in edges.iter().enumerate() {
            let position = cursor[dst as usize];
            in_slots[position] = slot;
            in_origins[position] = src;
            cursor[dst as usize] += 1;
        }

        log::debug!(
            "图构建完成: {} 个顶点, {} 条边",
            num_vertices,
            out_targets.len()
        );

        Ok(Graph {
            num_vertices,
            out_offsets,
            out_targets,
            in_offsets,
            in_slots,
            in_origins,
        })
    }
}
