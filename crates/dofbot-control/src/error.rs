//! 编排层错误类型

use dofbot_board::BoardError;
use dofbot_driver::ArmError;
use thiserror::Error;

/// 对局编排错误
#[derive(Error, Debug)]
pub enum ControlError {
    /// 机械臂运动失败（对局停在当前局面，需要人工复位）
    #[error("Arm error: {0}")]
    Arm(#[from] ArmError),

    /// 棋盘拒绝落子
    #[error("Board error: {0}")]
    Board(#[from] BoardError),

    /// 落子来源已关闭（例如输入流结束）
    #[error("Move source closed")]
    InputClosed,

    /// 人类连续给出非法落子
    #[error("Too many invalid moves ({attempts} attempts)")]
    TooManyInvalidMoves { attempts: u32 },

    /// 策略没有可走的格位
    #[error("No move available for the arm")]
    NoMoveAvailable,

    /// 棋子架上没有可用棋子
    #[error("Piece supply exhausted")]
    PieceSupplyExhausted,
}
