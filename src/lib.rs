//! hopgraph - 顶点中心的单源最短跳数计算
//!
//! 本 crate 提供一个内存中的顶点中心计算引擎，以及在其上运行的最短跳数
//! 顶点程序。程序只依赖引擎的顶点访问与调度能力，可以脱离引擎单独测试。

pub mod algorithm;
pub mod config;
pub mod core;
pub mod engine;
pub mod sssp;
pub mod utils;
