//! 机械臂落子策略

use dofbot_board::{Board, LINES, Mark, Position};
use tracing::debug;

/// 决策协作方：为机械臂选择落子格位
pub trait MovePolicy {
    /// `None` 表示无子可走
    fn choose(&mut self, board: &Board, mark: Mark) -> Option<Position>;
}

/// 能让 `mark` 立即连成线的格位（按连线扫描顺序取第一个）
pub fn completing_move(board: &Board, mark: Mark) -> Option<Position> {
    LINES.iter().find_map(|line| {
        let owned = line.iter().filter(|p| board.cell(**p) == Some(mark)).count();
        let empty: Vec<Position> = line
            .iter()
            .copied()
            .filter(|p| board.cell(*p).is_none())
            .collect();
        (owned == 2 && empty.len() == 1).then(|| empty[0])
    })
}

/// 在 `position` 落下 `mark` 是否恰好连成一条线
pub fn completes_line(board: &Board, position: Position, mark: Mark) -> bool {
    board.cell(position).is_none()
        && LINES.iter().any(|line| {
            line.contains(&position)
                && line
                    .iter()
                    .all(|p| *p == position || board.cell(*p) == Some(mark))
        })
}

/// 连线策略：能赢则赢，否则堵截，否则中心，否则角，否则第一个空位
#[derive(Debug, Default, Clone, Copy)]
pub struct LinePolicy;

impl MovePolicy for LinePolicy {
    fn choose(&mut self, board: &Board, mark: Mark) -> Option<Position> {
        let opponent = match mark {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        };

        if let Some(position) = completing_move(board, mark) {
            debug!(%position, "Policy: winning move");
            return Some(position);
        }
        if let Some(position) = completing_move(board, opponent) {
            debug!(%position, "Policy: blocking move");
            return Some(position);
        }

        let empty = board.empty_positions();
        if empty.contains(&Position::CENTER) {
            return Some(Position::CENTER);
        }
        Position::CORNERS
            .into_iter()
            .find(|p| empty.contains(p))
            .or_else(|| empty.first().copied())
    }
}
