//! 算法模块
//!
//! 顺序实现的参考算法，用于校验顶点程序的结果

pub mod bfs;

pub use bfs::hop_distances;
