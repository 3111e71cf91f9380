//! 跳数距离
//!
//! 顶点与边上的距离标签。`Unreached` 表示尚未找到路径，排序时大于任何有限距离。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::Label;

/// 存储层中表示 `Unreached` 的保留值
pub const RAW_UNREACHED: u32 = u32::MAX;

/// 从源顶点出发的跳数距离
///
/// 变体顺序决定了派生的 `Ord`：任何 `Finite` 都小于 `Unreached`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distance {
    Finite(u32),
    Unreached,
}

impl Distance {
    pub const ZERO: Distance = Distance::Finite(0);

    /// 构造有限距离，保留值被视为 `Unreached`
    pub fn finite(hops: u32) -> Self {
        if hops == RAW_UNREACHED {
            Distance::Unreached
        } else {
            Distance::Finite(hops)
        }
    }

    /// 多走一跳后的距离
    ///
    /// `Unreached` 的后继仍是 `Unreached`；有限距离溢出或落到保留值时同样
    /// 饱和为 `Unreached`，不会回绕成更小的有限值。
    pub fn successor(self) -> Self {
        match self {
            Distance::Finite(hops) => hops
                .checked_add(1)
                .filter(|next| *next != RAW_UNREACHED)
                .map_or(Distance::Unreached, Distance::Finite),
            Distance::Unreached => Distance::Unreached,
        }
    }

    pub fn is_reached(self) -> bool {
        matches!(self, Distance::Finite(_))
    }

    pub fn hops(self) -> Option<u32> {
        match self {
            Distance::Finite(hops) => Some(hops),
            Distance::Unreached => None,
        }
    }
}

impl Default for Distance {
    fn default() -> Self {
        Distance::Unreached
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(hops) => write!(f, "{}", hops),
            Distance::Unreached => write!(f, "inf"),
        }
    }
}

impl Label for Distance {
    fn to_raw(self) -> u32 {
        match self {
            Distance::Finite(hops) => hops,
            Distance::Unreached => RAW_UNREACHED,
        }
    }

    fn from_raw(raw: u32) -> Self {
        Distance::finite(raw)
    }
}
