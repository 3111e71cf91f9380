//! 基础类型定义

/// 顶点ID，稠密编号，从0开始
pub type VertexId = u32;

/// 轮次编号，从0开始单调递增
pub type Pass = u32;

/// 轮次的生命周期阶段
///
/// 第0轮为初始化阶段，对全部顶点执行；之后的每一轮都是松弛阶段，
/// 只处理被调度的顶点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Initialize,
    Relax,
}

impl Phase {
    pub fn of(pass: Pass) -> Self {
        if pass == 0 {
            Phase::Initialize
        } else {
            Phase::Relax
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Initialize => write!(f, "initialize"),
            Phase::Relax => write!(f, "relax"),
        }
    }
}
