//! 收敛跟踪
//!
//! 每轮开始时假设本轮收敛，任何一次改进都会推翻这个假设；轮次结束时给出
//! 判定。第0轮只做初始化，永远不会被判定为收敛。

use crate::core::Pass;

/// 一轮结束时的判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Active,
    Converged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackerState {
    /// 不在任何轮次内
    Idle,
    /// 轮次进行中；`improved` 记录是否已出现改进
    InPass { pass: Pass, improved: bool },
}

/// 收敛跟踪器
#[derive(Debug, Clone)]
pub struct ConvergenceTracker {
    state: TrackerState,
    last_verdict: Option<(Pass, Verdict)>,
}

impl Default for ConvergenceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvergenceTracker {
    pub fn new() -> Self {
        Self {
            state: TrackerState::Idle,
            last_verdict: None,
        }
    }

    /// 进入新的一轮，重置为“待定收敛”
    pub fn begin_pass(&mut self, pass: Pass) {
        if let TrackerState::InPass { pass: open, .. } = self.state {
            log::warn!("第{}轮尚未结束就开始了第{}轮", open, pass);
        }
        self.state = TrackerState::InPass {
            pass,
            improved: false,
        };
    }

    /// 记录一次改进（幂等）
    pub fn note_improvement(&mut self) {
        if let TrackerState::InPass { improved, .. } = &mut self.state {
            *improved = true;
        }
    }

    /// 记录多次改进，`count` 为0时不改变状态
    pub fn note_improvements(&mut self, count: usize) {
        if count > 0 {
            self.note_improvement();
        }
    }

    /// 本轮是否已出现改进
    pub fn has_improved(&self) -> bool {
        matches!(self.state, TrackerState::InPass { improved: true, .. })
    }

    /// 结束当前轮并给出判定；不在轮次内时视为未收敛
    pub fn end_pass(&mut self) -> Verdict {
        let verdict = match self.state {
            TrackerState::InPass { pass: 0, .. } => Verdict::Active,
            TrackerState::InPass { improved: false, .. } => Verdict::Converged,
            TrackerState::InPass { improved: true, .. } => Verdict::Active,
            TrackerState::Idle => return Verdict::Active,
        };
        if let TrackerState::InPass { pass, .. } = self.state {
            self.last_verdict = Some((pass, verdict));
        }
        self.state = TrackerState::Idle;
        verdict
    }

    /// 最近一次判定
    pub fn last_verdict(&self) -> Option<(Pass, Verdict)> {
        self.last_verdict
    }

    /// 收敛时所在的轮次
    pub fn converged_at(&self) -> Option<Pass> {
        match self.last_verdict {
            Some((pass, Verdict::Converged)) => Some(pass),
            _ => None,
        }
    }
}
