//! 选择性调度
//!
//! 工作列表由两个位图组成：`current` 是本轮要处理的顶点，`next` 收集本轮
//! 更新过程中调度给下一轮的顶点。轮次边界上两者交换。

use std::sync::atomic::{AtomicU64, Ordering};

use super::Scheduler;
use crate::core::VertexId;

const WORD_BITS: usize = 64;

/// 可并发置位的定长位图
#[derive(Debug)]
pub struct AtomicBitset {
    words: Vec<AtomicU64>,
    len: usize,
}

impl AtomicBitset {
    pub fn new(len: usize) -> Self {
        let words = (0..len.div_ceil(WORD_BITS)).map(|_| AtomicU64::new(0)).collect();
        Self { words, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 置位，返回该位此前是否为空
    pub fn insert(&self, index: usize) -> bool {
        debug_assert!(index < self.len, "bit {} out of range {}", index, self.len);
        let mask = 1u64 << (index % WORD_BITS);
        let previous = self.words[index / WORD_BITS].fetch_or(mask, Ordering::Relaxed);
        previous & mask == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        let mask = 1u64 << (index % WORD_BITS);
        self.words[index / WORD_BITS].load(Ordering::Relaxed) & mask != 0
    }

    pub fn count(&self) -> usize {
        self.words
            .iter()
            .map(|word| word.load(Ordering::Relaxed).count_ones() as usize)
            .sum()
    }

    pub fn clear(&mut self) {
        for word in &mut self.words {
            *word.get_mut() = 0;
        }
    }

    pub fn fill(&mut self) {
        for word in &mut self.words {
            *word.get_mut() = u64::MAX;
        }
        let tail = self.len % WORD_BITS;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last.get_mut() = (1u64 << tail) - 1;
            }
        }
    }
}

/// 引擎维护的工作列表
#[derive(Debug)]
pub enum WorkList {
    /// 只处理上一轮被调度的顶点
    Selective {
        current: AtomicBitset,
        next: AtomicBitset,
    },
    /// 每轮处理全部顶点，调度请求被忽略
    FullSweep { num_vertices: usize },
}

impl WorkList {
    pub fn new(num_vertices: usize, selective: bool) -> Self {
        if selective {
            WorkList::Selective {
                current: AtomicBitset::new(num_vertices),
                next: AtomicBitset::new(num_vertices),
            }
        } else {
            WorkList::FullSweep { num_vertices }
        }
    }

    pub fn is_selective(&self) -> bool {
        matches!(self, WorkList::Selective { .. })
    }

    /// 顶点是否参与本轮
    pub fn is_active(&self, vertex: VertexId) -> bool {
        match self {
            WorkList::Selective { current, .. } => current.contains(vertex as usize),
            WorkList::FullSweep { .. } => true,
        }
    }

    /// 本轮活跃顶点数
    pub fn active_count(&self) -> usize {
        match self {
            WorkList::Selective { current, .. } => current.count(),
            WorkList::FullSweep { num_vertices } => *num_vertices,
        }
    }

    /// 已调度到下一轮的顶点数
    pub fn pending_count(&self) -> usize {
        match self {
            WorkList::Selective { next, .. } => next.count(),
            WorkList::FullSweep { num_vertices } => *num_vertices,
        }
    }

    /// 轮次边界：下一轮的调度结果成为当前轮
    pub fn advance(&mut self) {
        if let WorkList::Selective { current, next } = self {
            std::mem::swap(current, next);
            next.clear();
        }
    }

    /// 将全部顶点放入下一轮
    pub fn schedule_all(&mut self) {
        if let WorkList::Selective { next, .. } = self {
            next.fill();
        }
    }
}

impl Scheduler for WorkList {
    fn schedule(&self, vertex: VertexId) {
        if let WorkList::Selective { next, .. } = self {
            next.insert(vertex as usize);
        }
    }
}
