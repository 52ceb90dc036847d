//! 棋子架
//!
//! 机械臂按 B → KN → R → Q 的顺序取子；制胜一步总是使用王（K）。
//! 每个架位带 4 分量源坐标，交给抓取宏。

use dofbot_protocol::PieceKind;
use tracing::{debug, warn};

/// 棋子架上的一个架位
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RackSlot {
    pub kind: PieceKind,
    pub coordinates: [f64; 4],
}

/// 默认取子顺序（王保留给制胜一步）
pub const DEFAULT_ORDER: [PieceKind; 5] = [
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

/// 棋子架
#[derive(Debug, Clone)]
pub struct PieceSupply {
    slots: Vec<RackSlot>,
    used: Vec<bool>,
}

impl PieceSupply {
    /// 按给定的取子顺序构建
    pub fn new(slots: Vec<RackSlot>) -> Self {
        let used = vec![false; slots.len()];
        Self { slots, used }
    }

    /// 是否还有可用棋子
    pub fn is_empty(&self) -> bool {
        self.used.iter().all(|u| *u)
    }

    /// 已取出的棋子（按架位顺序）
    pub fn used(&self) -> Vec<PieceKind> {
        self.slots
            .iter()
            .zip(&self.used)
            .filter(|(_, used)| **used)
            .map(|(slot, _)| slot.kind)
            .collect()
    }

    /// 下一个要取的棋子，不改变架上状态
    ///
    /// `winning` 为真时优先取王；否则按顺序取第一个非王棋子，
    /// 只剩王时取王。
    pub fn peek(&self, winning: bool) -> Option<RackSlot> {
        self.select(winning).map(|index| self.slots[index])
    }

    /// 取下一个棋子（选择规则同 [`peek`](Self::peek)）
    pub fn take(&mut self, winning: bool) -> Option<RackSlot> {
        let Some(index) = self.select(winning) else {
            warn!("Piece supply exhausted");
            return None;
        };

        self.used[index] = true;
        let slot = self.slots[index];
        debug!(piece = %slot.kind, winning, "Piece taken from rack");
        Some(slot)
    }

    /// 所有棋子放回架上
    pub fn reset(&mut self) {
        self.used.fill(false);
    }

    fn select(&self, winning: bool) -> Option<usize> {
        if winning {
            self.find(|kind| kind == PieceKind::King)
                .or_else(|| self.find(|_| true))
        } else {
            self.find(|kind| kind != PieceKind::King)
                .or_else(|| self.find(|_| true))
        }
    }

    fn find(&self, accept: impl Fn(PieceKind) -> bool) -> Option<usize> {
        self.slots
            .iter()
            .zip(&self.used)
            .position(|(slot, used)| !*used && accept(slot.kind))
    }
}

/// 默认棋子架：坐标第一个分量为架位序号
impl Default for PieceSupply {
    fn default() -> Self {
        Self::new(
            DEFAULT_ORDER
                .into_iter()
                .enumerate()
                .map(|(i, kind)| RackSlot {
                    kind,
                    coordinates: [i as f64, 0.0, 0.0, 0.0],
                })
                .collect(),
        )
    }
}
