//! 统一错误处理 for hopgraph
//!
//! ## 设计理念
//!
//! 1. **按层划分**：图加载、配置、引擎、最短路径程序各自拥有错误枚举
//! 2. **向上汇聚**：`SsspError` 通过 `#[from]` 汇聚下层错误，保留完整错误链
//! 3. **统一接口**：`HopResult<T>` 提供统一的返回类型，简化错误传播
//!
//! 逐顶点更新函数没有中止整个运行的通道，因此所有调用方可见的失败
//! （源顶点不存在、未在上限内收敛）都通过运行的最终状态报告。

use std::path::PathBuf;
use thiserror::Error;

use crate::core::types::VertexId;

/// 统一的结果类型
pub type HopResult<T> = Result<T, SsspError>;

/// 图加载层错误类型
///
/// 涵盖图文件读取与解析过程中的错误
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("IO错误: {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析错误: 第{line}行: {message}")]
    Parse { line: usize, message: String },
    #[error("顶点数量超出上限: {0}")]
    TooManyVertices(usize),
}

impl GraphError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        GraphError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("配置解析错误: {0}")]
    Deserialize(#[from] toml::de::Error),
    #[error("配置序列化错误: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("无效配置项 {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("线程池构建失败: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("图为空，无法执行")]
    EmptyGraph,
}

/// 最短路径运行错误
///
/// 作为对外的统一错误类型
#[derive(Error, Debug)]
pub enum SsspError {
    #[error("图错误: {0}")]
    Graph(#[from] GraphError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("引擎错误: {0}")]
    Engine(#[from] EngineError),

    #[error("源顶点 {vertex} 不存在 (顶点数 {num_vertices})")]
    SourceNotFound { vertex: VertexId, num_vertices: usize },

    #[error("未在 {max_passes} 轮内收敛")]
    NotConverged { max_passes: u32 },

    #[error("结果校验失败: 顶点 {vertex} 期望 {expected}, 实际 {actual}")]
    Verification {
        vertex: VertexId,
        expected: String,
        actual: String,
    },

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SsspError {
    /// 是否属于配置类错误（调用方修正参数后可重试）
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SsspError::Config(_) | SsspError::SourceNotFound { .. }
        )
    }
}
