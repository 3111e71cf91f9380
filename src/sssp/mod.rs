//! 单源最短跳数
//!
//! 顶点程序、收敛跟踪、选择性调度策略，以及运行驱动与结果。

pub mod convergence;
pub mod program;
pub mod result;
pub mod run;
pub mod scheduling;

#[cfg(test)]
pub(crate) mod mock;

pub use convergence::{ConvergenceTracker, Verdict};
pub use program::{RunState, ShortestPaths, TraceRecord, TRACE_TARGET};
pub use result::{DistanceTable, OutputFormat, RunStats, RunStatus, SsspOutcome};
pub use run::{run, verify, RunOptions, ShortestPathRun, DEFAULT_MAX_PASSES};
pub use scheduling::Outcome;
