//! 棋子种类与夹爪闭合角度
//!
//! 借用国际象棋的名称区分不同形状的棋子，每种棋子需要不同的夹爪闭合角度。

use crate::ProtocolError;
use std::fmt;
use std::str::FromStr;

/// 未知棋子使用的夹爪闭合角度（度）
pub const DEFAULT_CLOSED_ANGLE: f64 = 170.0;

/// 棋子种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PieceKind {
    /// 车 (R)
    #[cfg_attr(feature = "serde", serde(rename = "R"))]
    Rook,
    /// 象 (B)
    #[cfg_attr(feature = "serde", serde(rename = "B"))]
    Bishop,
    /// 马 (KN)
    #[cfg_attr(feature = "serde", serde(rename = "KN"))]
    Knight,
    /// 后 (Q)
    #[cfg_attr(feature = "serde", serde(rename = "Q"))]
    Queen,
    /// 王 (K)
    #[cfg_attr(feature = "serde", serde(rename = "K"))]
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 5] = [
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// 短标签（R / B / KN / Q / K）
    pub fn label(self) -> &'static str {
        match self {
            PieceKind::Rook => "R",
            PieceKind::Bishop => "B",
            PieceKind::Knight => "KN",
            PieceKind::Queen => "Q",
            PieceKind::King => "K",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PieceKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PieceKind::ALL
            .into_iter()
            .find(|kind| kind.label() == s)
            .ok_or_else(|| ProtocolError::UnknownPiece(s.to_string()))
    }
}

/// 棋子 → 夹爪闭合角度表
#[derive(Debug, Clone, PartialEq)]
pub struct PieceAngleTable {
    angles: [f64; 5],
    default_angle: f64,
}

impl PieceAngleTable {
    /// 所有棋子使用同一个角度
    pub fn uniform(angle: f64) -> Self {
        Self {
            angles: [angle; 5],
            default_angle: angle,
        }
    }

    /// 设置某种棋子的闭合角度
    pub fn with_angle(mut self, kind: PieceKind, angle: f64) -> Self {
        self.angles[kind.index()] = angle;
        self
    }

    /// 设置未知棋子的兜底角度
    pub fn with_default_angle(mut self, angle: f64) -> Self {
        self.default_angle = angle;
        self
    }

    /// 已知棋子的闭合角度
    pub fn angle(&self, kind: PieceKind) -> f64 {
        self.angles[kind.index()]
    }

    /// 未知棋子的兜底角度
    pub fn default_angle(&self) -> f64 {
        self.default_angle
    }

    /// 按标签查找闭合角度
    ///
    /// 无法识别的标签返回兜底角度而不是报错，避免机械臂因为
    /// 分类结果异常而停在半路。
    pub fn closed_angle(&self, label: &str) -> f64 {
        match label.parse::<PieceKind>() {
            Ok(kind) => self.angle(kind),
            Err(_) => self.default_angle,
        }
    }
}

impl Default for PieceAngleTable {
    fn default() -> Self {
        Self::uniform(DEFAULT_CLOSED_ANGLE).with_angle(PieceKind::Rook, 176.0)
    }
}
