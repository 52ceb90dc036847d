//! 人类落子来源
//!
//! 感知协作方（摄像头 + 分类器、控制台输入等）只需要给出格位键，
//! 编排层不关心键是如何得到的。

use dofbot_board::{Board, BoardError};
use std::collections::VecDeque;

/// 感知协作方：提供人类的落子格位键
pub trait MoveSource {
    /// 下一个格位键；`None` 表示来源已关闭
    fn next_move(&mut self, board: &Board) -> Option<String>;

    /// 落子被棋盘拒绝时的回调（默认忽略）
    fn rejected(&mut self, _label: &str, _error: &BoardError) {}
}

/// 预先给定的落子序列
#[derive(Debug, Clone, Default)]
pub struct ScriptedMoves {
    moves: VecDeque<String>,
    rejected: Vec<String>,
}

impl ScriptedMoves {
    pub fn new<I, S>(moves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            moves: moves.into_iter().map(Into::into).collect(),
            rejected: Vec::new(),
        }
    }

    /// 被拒绝的格位键
    pub fn rejected_labels(&self) -> &[String] {
        &self.rejected
    }

    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl MoveSource for ScriptedMoves {
    fn next_move(&mut self, _board: &Board) -> Option<String> {
        self.moves.pop_front()
    }

    fn rejected(&mut self, label: &str, _error: &BoardError) {
        self.rejected.push(label.to_string());
    }
}
