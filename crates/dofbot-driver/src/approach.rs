//! 接近棋子的姿态查找
//!
//! 抓取宏在操作夹爪之前，先询问注入的策略"棋子上方的姿态"。
//! 路径规划/逆运动学不在本 crate 范围内，因此默认策略不提供姿态，
//! 夹爪原地动作。

use dofbot_protocol::{PieceKind, SERVO_COUNT};
use std::collections::HashMap;
use tracing::debug;

/// 抓取目标
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceTarget<'a> {
    /// 原始棋子标签
    pub label: &'a str,
    /// 解析出的棋子种类（无法识别时为 `None`）
    pub kind: Option<PieceKind>,
    /// 棋子源坐标（4 个分量，编码方式由策略自行约定）
    pub coordinates: [f64; 4],
}

/// 接近姿态查找策略
pub trait ApproachStrategy: Send {
    /// 返回棋子上方的六轴姿态；`None` 表示跳过接近步骤
    fn approach_pose(&mut self, target: &PieceTarget<'_>) -> Option<[f64; SERVO_COUNT]>;
}

/// 不提供接近姿态（默认）
#[derive(Debug, Default, Clone, Copy)]
pub struct NoApproach;

impl ApproachStrategy for NoApproach {
    fn approach_pose(&mut self, target: &PieceTarget<'_>) -> Option<[f64; SERVO_COUNT]> {
        debug!(
            piece = target.label,
            "No approach strategy configured, gripping in place"
        );
        None
    }
}

/// 按棋子种类查表的接近姿态
#[derive(Debug, Default, Clone)]
pub struct PoseTableApproach {
    poses: HashMap<PieceKind, [f64; SERVO_COUNT]>,
}

impl PoseTableApproach {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pose(mut self, kind: PieceKind, pose: [f64; SERVO_COUNT]) -> Self {
        self.poses.insert(kind, pose);
        self
    }
}

impl ApproachStrategy for PoseTableApproach {
    fn approach_pose(&mut self, target: &PieceTarget<'_>) -> Option<[f64; SERVO_COUNT]> {
        target.kind.and_then(|kind| self.poses.get(&kind).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(label: &str) -> PieceTarget<'_> {
        PieceTarget {
            label,
            kind: label.parse().ok(),
            coordinates: [0.0; 4],
        }
    }

    #[test]
    fn test_no_approach() {
        assert_eq!(NoApproach.approach_pose(&target("K")), None);
    }

    #[test]
    fn test_pose_table_lookup() {
        let pose = [90.0, 60.0, 40.0, 30.0, 90.0, 90.0];
        let mut strategy = PoseTableApproach::new().with_pose(PieceKind::King, pose);

        assert_eq!(strategy.approach_pose(&target("K")), Some(pose));
        assert_eq!(strategy.approach_pose(&target("Q")), None);
        assert_eq!(strategy.approach_pose(&target("unknown")), None);
    }
}
