//! 最短跳数集成测试
//!
//! 测试范围：
//! - 路径、环、菱形与非连通图的最终距离和收敛轮次
//! - 距离单调递减
//! - 收敛后继续松弛不再改变结果
//! - 随机图上与广度优先搜索的一致性

mod common;

use common::{cycle_graph, diamond_graph, disconnected_graph, options, path_graph, random_graph};
use hopgraph::algorithm::bfs;
use hopgraph::core::{Distance, SsspError, VertexId};
use hopgraph::sssp::{self, RunStatus, ShortestPathRun};
use std::collections::HashMap;

fn finite(values: &[u32]) -> Vec<Distance> {
    values.iter().map(|&hops| Distance::Finite(hops)).collect()
}

// ==================== 固定场景 ====================

#[test]
fn test_path_graph() {
    let outcome = sssp::run(path_graph(), options(0)).expect("run should succeed");

    assert_eq!(outcome.status, RunStatus::Converged { pass: 4 });
    assert_eq!(outcome.distances.as_slice(), finite(&[0, 1, 2, 3]).as_slice());
    assert_eq!(outcome.stats.passes, 5);
    assert_eq!(outcome.stats.improvements, 3);
}

#[test]
fn test_path_graph_from_middle() {
    let outcome = sssp::run(path_graph(), options(2)).expect("run should succeed");

    assert_eq!(outcome.status, RunStatus::Converged { pass: 2 });
    assert_eq!(
        outcome.distances.as_slice(),
        &[
            Distance::Unreached,
            Distance::Unreached,
            Distance::ZERO,
            Distance::Finite(1)
        ]
    );
}

#[test]
fn test_disconnected_vertex_stays_unreached() {
    let outcome = sssp::run(disconnected_graph(), options(0).with_trace(true))
        .expect("run should succeed");

    assert!(outcome.status.is_converged());
    assert_eq!(outcome.distance(2), Some(Distance::Finite(2)));
    assert_eq!(outcome.distance(9), Some(Distance::Unreached));
    assert_eq!(outcome.distances.reached(), 3);
    assert_eq!(outcome.distances.unreached(), 7);

    let trace = outcome.trace.expect("trace was requested");
    assert!(trace.iter().all(|record| record.vertex != 9));
}

#[test]
fn test_cycle_graph() {
    let outcome = sssp::run(cycle_graph(), options(0)).expect("run should succeed");

    assert_eq!(outcome.status, RunStatus::Converged { pass: 3 });
    assert_eq!(outcome.distances.as_slice(), finite(&[0, 1, 2]).as_slice());
}

#[test]
fn test_diamond_graph() {
    for selective in [true, false] {
        let outcome = sssp::run(
            diamond_graph(),
            options(0).with_selective_scheduling(selective),
        )
        .expect("run should succeed");

        assert!(outcome.status.is_converged());
        assert_eq!(outcome.distances.as_slice(), finite(&[0, 1, 1, 2]).as_slice());
    }
}

#[test]
fn test_single_thread_matches_parallel() {
    let graph = random_graph(7, 200, 600);
    let parallel = sssp::run(graph.clone(), options(0)).expect("run should succeed");
    let sequential = sssp::run(graph, options(0).with_threads(1)).expect("run should succeed");

    assert_eq!(parallel.distances, sequential.distances);
}

// ==================== 性质 ====================

#[test]
fn test_distances_only_decrease() {
    let graph = random_graph(11, 300, 900);
    let outcome = sssp::run(graph, options(0).with_trace(true)).expect("run should succeed");
    let trace = outcome.trace.expect("trace was requested");

    let mut last: HashMap<VertexId, Distance> = HashMap::new();
    for record in &trace {
        assert!(record.pass >= 1);
        if let Some(previous) = last.insert(record.vertex, record.distance) {
            assert!(
                record.distance < previous,
                "vertex {} went from {} to {}",
                record.vertex,
                previous,
                record.distance
            );
        }
    }
    for (vertex, distance) in last {
        assert_eq!(outcome.distances.get(vertex), Some(distance));
    }
}

#[test]
fn test_further_passes_change_nothing() {
    let mut run = ShortestPathRun::new(random_graph(3, 150, 400), options(0))
        .expect("run should start");
    let outcome = run.execute();
    assert!(outcome.status.is_converged());

    assert_eq!(run.relax_further(3), 0);
    assert_eq!(run.distances(), outcome.distances);
}

#[test]
fn test_convergence_within_eccentricity_plus_one() {
    for seed in 0..5 {
        let graph = random_graph(seed, 120, 240);
        let expected = bfs::hop_distances(&graph, 0);
        let eccentricity = expected.iter().filter_map(|d| d.hops()).max().unwrap_or(0);

        for selective in [true, false] {
            let outcome = sssp::run(
                graph.clone(),
                options(0).with_selective_scheduling(selective),
            )
            .expect("run should succeed");
            match outcome.status {
                RunStatus::Converged { pass } => assert!(
                    pass <= eccentricity + 1,
                    "seed {}: converged at {} with eccentricity {}",
                    seed,
                    pass,
                    eccentricity
                ),
                status => panic!("seed {}: {}", seed, status),
            }
        }
    }
}

#[test]
fn test_random_graphs_match_bfs() {
    for seed in 0..8 {
        let graph = random_graph(100 + seed, 250, 500 + seed as usize * 100);
        let source = (seed * 31 % 250) as VertexId;
        let expected = bfs::hop_distances(&graph, source);

        for selective in [true, false] {
            let outcome = sssp::run(
                graph.clone(),
                options(source).with_selective_scheduling(selective),
            )
            .expect("run should succeed");
            assert_eq!(outcome.distances.as_slice(), expected.as_slice());
            assert!(sssp::verify(&graph, &outcome).is_ok());
        }
    }
}

// ==================== 失败情形 ====================

#[test]
fn test_pass_bound_reported_as_failure() {
    let outcome = sssp::run(path_graph(), options(0).with_max_passes(2)).expect("run should start");

    assert_eq!(outcome.status, RunStatus::NotConverged { passes: 2 });
    assert_eq!(outcome.distance(1), Some(Distance::Finite(1)));
    assert_eq!(outcome.distance(2), Some(Distance::Unreached));
    assert!(matches!(
        outcome.into_converged(),
        Err(SsspError::NotConverged { max_passes: 2 })
    ));
}

#[test]
fn test_missing_source_is_configuration_error() {
    let err = sssp::run(disconnected_graph(), options(10))
        .err()
        .expect("vertex 10 does not exist");

    assert!(err.is_configuration());
    assert!(matches!(
        err,
        SsspError::SourceNotFound {
            vertex: 10,
            num_vertices: 10
        }
    ));
}
