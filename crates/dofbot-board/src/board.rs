//! 井字棋棋盘状态机
//!
//! # 不变量
//!
//! - 9 个格位始终存在，棋盘不会扩缩
//! - 步数计数 == 非空格位数量
//! - 每次成功落子恰好把一个空格位改为棋子标记
//!
//! 轮次标志不由 [`Board::make_move`] 翻转，编排层在每次成功落子后
//! 调用一次 [`Board::switch_player`]。

use crate::position::{CELL_COUNT, LINES, Position};
use crate::BoardError;
use std::fmt;
use tracing::{debug, trace};

/// 棋子标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn symbol(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }

    /// 使用该标记的一方
    pub fn player(self) -> Player {
        match self {
            Mark::X => Player::Human,
            Mark::O => Player::Dofbot,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// 对弈双方：人类执 X 先手，机械臂执 O
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Player {
    Human,
    Dofbot,
}

impl Player {
    pub fn mark(self) -> Mark {
        match self {
            Player::Human => Mark::X,
            Player::Dofbot => Mark::O,
        }
    }

    pub fn opponent(self) -> Player {
        match self {
            Player::Human => Player::Dofbot,
            Player::Dofbot => Player::Human,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Player::Human => "Human",
            Player::Dofbot => "Dofbot",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 对局结果（每次从棋盘推导，不单独存储）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameState {
    Ongoing,
    Win { mark: Mark, player: Player },
    Draw,
}

impl GameState {
    pub fn is_over(self) -> bool {
        !matches!(self, GameState::Ongoing)
    }
}

/// 井字棋棋盘
///
/// 反序列化时先校验，步数与棋子数不符的数据会被拒绝。
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "BoardFields"))]
pub struct Board {
    cells: [Option<Mark>; CELL_COUNT],
    /// 轮次标志：`true` 表示轮到人类
    human_turn: bool,
    move_count: u8,
}

impl Board {
    /// 空棋盘，人类先手
    pub fn new() -> Self {
        Self {
            cells: [None; CELL_COUNT],
            human_turn: true,
            move_count: 0,
        }
    }

    /// 按格位键落子（当前轮次一方的标记）
    ///
    /// # 错误
    /// - 键不是 `"A1"`..`"C3"`：`InvalidBoardPosition`
    /// - 格位非空：`CellOccupied`
    ///
    /// 失败时棋盘和步数不变。
    pub fn make_move(&mut self, position: &str) -> Result<Position, BoardError> {
        let position = position.parse::<Position>()?;
        self.make_move_at(position)?;
        Ok(position)
    }

    /// 按格位落子
    pub fn make_move_at(&mut self, position: Position) -> Result<(), BoardError> {
        if let Some(mark) = self.cells[position.index()] {
            return Err(BoardError::CellOccupied { position, mark });
        }

        let mark = self.current_player().mark();
        self.cells[position.index()] = Some(mark);
        self.move_count += 1;
        debug!(%position, %mark, move_count = self.move_count, "Move placed");
        Ok(())
    }

    /// 翻转轮次标志
    pub fn switch_player(&mut self) {
        self.human_turn = !self.human_turn;
        trace!(next = %self.current_player(), "Turn switched");
    }

    /// 当前轮次一方
    pub fn current_player(&self) -> Player {
        if self.human_turn {
            Player::Human
        } else {
            Player::Dofbot
        }
    }

    /// 按行、列、对角线顺序扫描，返回第一条三子连线的标记
    pub fn check_winner(&self) -> Option<Mark> {
        self.winning_line().map(|(mark, _)| mark)
    }

    /// 第一条三子连线及其标记
    pub fn winning_line(&self) -> Option<(Mark, [Position; 3])> {
        LINES.iter().find_map(|&line| {
            let [a, b, c] = line.map(|p| self.cells[p.index()]);
            match a {
                Some(mark) if b == a && c == a => Some((mark, line)),
                _ => None,
            }
        })
    }

    pub fn check_board_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// 胜负优先于平局：满盘且有连线时判胜
    pub fn check_game_state(&self) -> GameState {
        if let Some(mark) = self.check_winner() {
            GameState::Win {
                mark,
                player: mark.player(),
            }
        } else if self.check_board_full() {
            GameState::Draw
        } else {
            GameState::Ongoing
        }
    }

    /// 格位键合法且为空
    pub fn is_valid_move(&self, position: &str) -> bool {
        position
            .parse::<Position>()
            .is_ok_and(|p| self.cells[p.index()].is_none())
    }

    /// 空格位（行优先顺序）
    pub fn empty_positions(&self) -> Vec<Position> {
        Position::ALL
            .into_iter()
            .filter(|p| self.cells[p.index()].is_none())
            .collect()
    }

    pub fn move_count(&self) -> u8 {
        self.move_count
    }

    pub fn cell(&self, position: Position) -> Option<Mark> {
        self.cells[position.index()]
    }

    /// 清空棋盘，恢复人类先手，步数归零
    pub fn reset_board(&mut self) {
        *self = Self::new();
        debug!("Board reset");
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// 未校验的棋盘字段
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct BoardFields {
    cells: [Option<Mark>; CELL_COUNT],
    human_turn: bool,
    move_count: u8,
}

/// 校验步数计数与棋子数一致，且 X 比 O 多 0 或 1 枚
///
/// 轮次标志不参与校验：落子后、翻转轮次前的棋盘同样合法。
#[cfg(feature = "serde")]
impl TryFrom<BoardFields> for Board {
    type Error = String;

    fn try_from(fields: BoardFields) -> Result<Self, Self::Error> {
        let count = |mark: Mark| fields.cells.iter().filter(|c| **c == Some(mark)).count();
        let (x, o) = (count(Mark::X), count(Mark::O));

        if usize::from(fields.move_count) != x + o {
            return Err(format!(
                "move_count {} does not match {} occupied cells",
                fields.move_count,
                x + o
            ));
        }
        if x != o && x != o + 1 {
            return Err(format!("unreachable mark counts: {} X, {} O", x, o));
        }

        Ok(Self {
            cells: fields.cells,
            human_turn: fields.human_turn,
            move_count: fields.move_count,
        })
    }
}

/// 带行列标签的 3×3 文本棋盘
///
/// ```text
///     1   2   3
/// A   X | O |
///    ---+---+---
/// B     | X |
///    ---+---+---
/// C     |   | O
/// ```
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    1   2   3")?;
        for (row, cells) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f, "   ---+---+---")?;
            }
            let symbols: Vec<char> = cells
                .iter()
                .map(|cell| cell.map_or(' ', Mark::symbol))
                .collect();
            let line = format!(
                "{}   {} | {} | {}",
                char::from(b'A' + row as u8),
                symbols[0],
                symbols[1],
                symbols[2]
            );
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(board: &mut Board, moves: &[&str]) {
        for position in moves {
            board.make_move(position).unwrap();
            board.switch_player();
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.empty_positions().len(), 9);
        assert_eq!(board.move_count(), 0);
        assert_eq!(board.current_player(), Player::Human);
        assert_eq!(board.check_game_state(), GameState::Ongoing);
    }

    #[test]
    fn test_make_move_uses_turn_flag() {
        let mut board = Board::new();
        assert_eq!(board.make_move("B2"), Ok(Position::B2));
        assert_eq!(board.cell(Position::B2), Some(Mark::X));

        // make_move 不翻转轮次
        assert_eq!(board.current_player(), Player::Human);
        board.switch_player();
        board.make_move("A1").unwrap();
        assert_eq!(board.cell(Position::A1), Some(Mark::O));
        assert_eq!(board.move_count(), 2);
    }

    #[test]
    fn test_occupied_cell_rejected() {
        let mut board = Board::new();
        board.make_move("A1").unwrap();
        board.switch_player();

        let before = board.clone();
        assert_eq!(
            board.make_move("A1"),
            Err(BoardError::CellOccupied {
                position: Position::A1,
                mark: Mark::X
            })
        );
        assert_eq!(board, before);
        assert_eq!(board.move_count(), 1);
    }

    #[test]
    fn test_invalid_position_rejected() {
        let mut board = Board::new();
        assert_eq!(
            board.make_move("D4"),
            Err(BoardError::InvalidBoardPosition("D4".to_string()))
        );
        // 空格字符不是合法键（旧实现把它当作"空"判断）
        assert!(board.make_move(" ").is_err());
        assert_eq!(board.move_count(), 0);
    }

    #[test]
    fn test_row_win_before_full() {
        let mut board = Board::new();
        // X: A1 A2 A3, O: B1 B2
        play(&mut board, &["A1", "B1", "A2", "B2", "A3"]);

        assert_eq!(board.check_winner(), Some(Mark::X));
        assert!(!board.check_board_full());
        assert_eq!(
            board.check_game_state(),
            GameState::Win {
                mark: Mark::X,
                player: Player::Human
            }
        );
    }

    #[test]
    fn test_column_and_diagonal_wins() {
        let mut board = Board::new();
        play(&mut board, &["A1", "A2", "B1", "B2", "C3", "C2"]);
        assert_eq!(
            board.winning_line(),
            Some((Mark::O, [Position::A2, Position::B2, Position::C2]))
        );

        let mut board = Board::new();
        play(&mut board, &["A3", "A1", "B2", "A2", "C1"]);
        assert_eq!(
            board.winning_line(),
            Some((Mark::X, [Position::A3, Position::B2, Position::C1]))
        );
    }

    #[test]
    fn test_full_board_draw() {
        // A: O X O / B: X O X / C: X O X
        let mut board = Board::new();
        play(
            &mut board,
            &["A2", "A1", "B1", "A3", "B3", "B2", "C1", "C2", "C3"],
        );

        assert!(board.check_board_full());
        assert_eq!(board.check_winner(), None);
        assert_eq!(board.check_game_state(), GameState::Draw);
        assert_eq!(board.move_count(), 9);
        assert!(board.empty_positions().is_empty());
    }

    #[test]
    fn test_full_board_with_line_is_win() {
        // 最后一步同时填满棋盘并连成线
        let mut board = Board::new();
        play(
            &mut board,
            &["A1", "B1", "A2", "B2", "B3", "C2", "C1", "C3", "A3"],
        );
        assert!(board.check_board_full());
        assert!(matches!(board.check_game_state(), GameState::Win { .. }));
    }

    #[test]
    fn test_is_valid_move() {
        let mut board = Board::new();
        board.make_move("C3").unwrap();
        assert!(board.is_valid_move("A1"));
        assert!(!board.is_valid_move("C3"));
        assert!(!board.is_valid_move("Z9"));
    }

    #[test]
    fn test_reset_board_clears_counter() {
        let mut board = Board::new();
        play(&mut board, &["A1", "B2", "C3"]);
        assert_eq!(board.current_player(), Player::Dofbot);

        board.reset_board();
        assert_eq!(board.move_count(), 0);
        assert_eq!(board.current_player(), Player::Human);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_display() {
        let mut board = Board::new();
        play(&mut board, &["A1", "B2"]);
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "    1   2   3");
        assert_eq!(lines[1], "A   X |   |");
        assert_eq!(lines[3], "B     | O |");
        assert_eq!(lines.len(), 6);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_board_serde() {
        let mut board = Board::new();
        board.make_move("A1").unwrap();
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_board_serde_rejects_inconsistent_state() {
        let empty = "[null,null,null,null,null,null,null,null,null]";

        // 空棋盘却声称已走 5 步
        let json = format!(r#"{{"cells":{},"human_turn":true,"move_count":5}}"#, empty);
        let err = serde_json::from_str::<Board>(&json).unwrap_err().to_string();
        assert!(err.contains("move_count"), "{}", err);

        // 两枚 O、没有 X
        let json = r#"{"cells":["O","O",null,null,null,null,null,null,null],"human_turn":true,"move_count":2}"#;
        assert!(serde_json::from_str::<Board>(json).is_err());

        // 落子后尚未翻转轮次的棋盘可以恢复
        let json = r#"{"cells":["X",null,null,null,null,null,null,null,null],"human_turn":true,"move_count":1}"#;
        let board: Board = serde_json::from_str(json).unwrap();
        assert_eq!(board.move_count(), 1);
        assert_eq!(board.current_player(), Player::Human);
    }
}
