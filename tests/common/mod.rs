//! 集成测试共享工具模块
//!
//! 提供测试用的图与运行选项构造函数

#![allow(dead_code)]

use hopgraph::core::VertexId;
use hopgraph::engine::{Graph, GraphBuilder};
use hopgraph::sssp::RunOptions;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 0 -> 1 -> 2 -> 3
pub fn path_graph() -> Graph {
    Graph::from_edges([(0, 1), (1, 2), (2, 3)]).expect("path graph should build")
}

/// 0 -> 1 -> 2 -> 0
pub fn cycle_graph() -> Graph {
    Graph::from_edges([(0, 1), (1, 2), (2, 0)]).expect("cycle graph should build")
}

/// 0 -> {1, 2} -> 3
pub fn diamond_graph() -> Graph {
    Graph::from_edges([(0, 1), (0, 2), (1, 3), (2, 3)]).expect("diamond graph should build")
}

/// 路径 0 -> 1 -> 2 加上没有任何边的顶点 3..=9
pub fn disconnected_graph() -> Graph {
    let mut builder = GraphBuilder::new().with_vertex_count(10);
    builder.add_edge(0, 1).add_edge(1, 2);
    builder.build().expect("disconnected graph should build")
}

/// 固定种子的随机有向图
pub fn random_graph(seed: u64, vertices: u32, edges: usize) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = GraphBuilder::new().with_vertex_count(vertices as usize);
    for _ in 0..edges {
        let src: VertexId = rng.gen_range(0..vertices);
        let dst: VertexId = rng.gen_range(0..vertices);
        builder.add_edge(src, dst);
    }
    builder.build().expect("random graph should build")
}

/// 测试默认选项：固定线程数，选择性调度
pub fn options(source: VertexId) -> RunOptions {
    RunOptions::default().with_source(source).with_threads(4)
}
