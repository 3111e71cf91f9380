pub mod distance;
pub mod error;
pub mod types;

// 错误和结果类型
pub use error::{ConfigError, EngineError, GraphError, HopResult, SsspError};

// 核心数据类型
pub use distance::{Distance, RAW_UNREACHED};
pub use types::{Pass, Phase, VertexId};
