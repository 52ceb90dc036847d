//! # Dofbot Board
//!
//! 井字棋棋盘状态引擎：9 格棋盘、轮次标志、步数计数以及胜负/平局判定。
//! 纯状态机，没有硬件依赖。
//!
//! ```
//! use dofbot_board::{Board, GameState, Mark, Player};
//!
//! let mut board = Board::new();
//! for position in ["A1", "B1", "A2", "B2", "A3"] {
//!     board.make_move(position)?;
//!     board.switch_player();
//! }
//! assert_eq!(
//!     board.check_game_state(),
//!     GameState::Win { mark: Mark::X, player: Player::Human }
//! );
//! # Ok::<(), dofbot_board::BoardError>(())
//! ```

mod board;
pub mod position;

pub use board::{Board, GameState, Mark, Player};
pub use position::{CELL_COUNT, LINES, Position};

use thiserror::Error;

/// 棋盘错误
///
/// 由编排层决定是否要求重新落子。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// 格位键不是 A1..C3
    #[error("Invalid board position: {0:?} (expected A1..C3)")]
    InvalidBoardPosition(String),

    /// 格位已有棋子
    #[error("Position {position} is already taken by {mark}")]
    CellOccupied { position: Position, mark: Mark },
}
