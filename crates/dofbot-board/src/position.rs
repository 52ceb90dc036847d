//! 棋盘格位与连线
//!
//! 行标签 A/B/C，列标签 1/2/3，格位键为 `"A1"`..`"C3"`。

use crate::BoardError;
use std::fmt;
use std::str::FromStr;

/// 格位数量
pub const CELL_COUNT: usize = 9;

/// 棋盘格位（行优先编号）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    A1,
    A2,
    A3,
    B1,
    B2,
    B3,
    C1,
    C2,
    C3,
}

impl Position {
    pub const ALL: [Position; CELL_COUNT] = [
        Position::A1,
        Position::A2,
        Position::A3,
        Position::B1,
        Position::B2,
        Position::B3,
        Position::C1,
        Position::C2,
        Position::C3,
    ];

    /// 中心格
    pub const CENTER: Position = Position::B2;

    /// 四个角
    pub const CORNERS: [Position; 4] = [Position::A1, Position::A3, Position::C1, Position::C3];

    /// 行优先索引（0-8）
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// 行标签（'A'..'C'）
    pub fn row(self) -> char {
        char::from(b'A' + (self.index() / 3) as u8)
    }

    /// 列标签（'1'..'3'）
    pub fn column(self) -> char {
        char::from(b'1' + (self.index() % 3) as u8)
    }

    pub fn label(self) -> &'static str {
        const LABELS: [&str; CELL_COUNT] = ["A1", "A2", "A3", "B1", "B2", "B3", "C1", "C2", "C3"];
        LABELS[self.index()]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 严格解析（区分大小写，不去除空白）
impl FromStr for Position {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.label() == s)
            .ok_or_else(|| BoardError::InvalidBoardPosition(s.to_string()))
    }
}

/// 胜负判定的 8 条连线，按扫描顺序：三行、三列、两条对角线
pub const LINES: [[Position; 3]; 8] = {
    use Position::*;
    [
        [A1, A2, A3],
        [B1, B2, B3],
        [C1, C2, C3],
        [A1, B1, C1],
        [A2, B2, C2],
        [A3, B3, C3],
        [A1, B2, C3],
        [A3, B2, C1],
    ]
};
