//! BFS算法模块
//!
//! 顺序广度优先搜索，计算从源顶点出发的跳数距离

use std::collections::VecDeque;

use crate::core::{Distance, VertexId};
use crate::engine::Graph;

/// 计算从起点到所有顶点的跳数距离，不可达顶点为 `Unreached`
///
/// 起点不在图中时返回全部为 `Unreached` 的结果。
pub fn hop_distances(graph: &Graph, start: VertexId) -> Vec<Distance> {
    let mut distances = vec![Distance::Unreached; graph.num_vertices()];
    if !graph.contains(start) {
        return distances;
    }

    let mut queue: VecDeque<(VertexId, u32)> = VecDeque::new();
    distances[start as usize] = Distance::ZERO;
    queue.push_back((start, 0));

    while let Some((current, dist)) = queue.pop_front() {
        for &neighbor in graph.out_neighbors(current) {
            if !distances[neighbor as usize].is_reached() {
                let new_dist = dist + 1;
                distances[neighbor as usize] = Distance::Finite(new_dist);
                queue.push_back((neighbor, new_dist));
            }
        }
    }

    distances
}
