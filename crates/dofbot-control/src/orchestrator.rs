//! 对局编排
//!
//! 在棋盘状态引擎和机械臂之间交替轮次：
//!
//! - 人类：来源给出格位键 → `make_move`（非法则重试）→ `switch_player`
//! - 机械臂：策略选格位 → `pick_up_piece` → `reset_position` → `make_move`
//!   → `switch_player`（运动全部成功后才记到棋盘上）
//!
//! 每步之后重新计算 `check_game_state`。

use crate::error::ControlError;
use crate::policy::{MovePolicy, completes_line};
use crate::source::MoveSource;
use crate::supply::PieceSupply;
use dofbot_board::{Board, BoardError, GameState, Player, Position};
use dofbot_driver::ArmController;
use dofbot_protocol::PieceKind;
use tracing::{info, warn};

/// 人类连续非法落子的默认上限
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// 一步落子
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnRecord {
    pub player: Player,
    pub position: Position,
    /// 机械臂落子使用的棋子（人类落子为 `None`）
    pub piece: Option<PieceKind>,
}

/// 整局记录
#[derive(Debug, Clone, PartialEq)]
pub struct MatchReport {
    pub outcome: GameState,
    pub turns: Vec<TurnRecord>,
}

/// 对局编排器
pub struct MatchOrchestrator<S, P> {
    board: Board,
    arm: ArmController,
    source: S,
    policy: P,
    supply: PieceSupply,
    max_attempts: u32,
}

impl<S: MoveSource, P: MovePolicy> MatchOrchestrator<S, P> {
    pub fn new(arm: ArmController, source: S, policy: P) -> Self {
        Self {
            board: Board::new(),
            arm,
            source,
            policy,
            supply: PieceSupply::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_supply(mut self, supply: PieceSupply) -> Self {
        self.supply = supply;
        self
    }

    /// 人类连续非法落子上限（至少 1）
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn arm(&self) -> &ArmController {
        &self.arm
    }

    pub fn arm_mut(&mut self) -> &mut ArmController {
        &mut self.arm
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn supply(&self) -> &PieceSupply {
        &self.supply
    }

    pub fn state(&self) -> GameState {
        self.board.check_game_state()
    }

    /// 新对局：清空棋盘、棋子放回架上、机械臂复位
    pub fn new_match(&mut self) -> Result<(), ControlError> {
        info!("Starting new match");
        self.board.reset_board();
        self.supply.reset();
        self.arm.reset_position()?;
        Ok(())
    }

    /// 走当前轮次一方的一步
    pub fn play_turn(&mut self) -> Result<TurnRecord, ControlError> {
        match self.board.current_player() {
            Player::Human => self.play_human_turn(),
            Player::Dofbot => self.play_arm_turn(),
        }
    }

    /// 走到对局结束
    pub fn play_match(&mut self) -> Result<MatchReport, ControlError> {
        let mut turns = Vec::new();
        let outcome = loop {
            let state = self.state();
            if state.is_over() {
                break state;
            }
            turns.push(self.play_turn()?);
        };

        match outcome {
            GameState::Win { mark, player } => info!(%mark, %player, "Match won"),
            GameState::Draw => info!("Match drawn"),
            GameState::Ongoing => {},
        }

        Ok(MatchReport { outcome, turns })
    }

    /// 人类落子，非法键或已占格位时要求重新给出
    pub fn play_human_turn(&mut self) -> Result<TurnRecord, ControlError> {
        for attempt in 1..=self.max_attempts {
            let label = self
                .source
                .next_move(&self.board)
                .ok_or(ControlError::InputClosed)?;

            match self.board.make_move(&label) {
                Ok(position) => {
                    info!(%position, "Human move");
                    self.board.switch_player();
                    return Ok(TurnRecord {
                        player: Player::Human,
                        position,
                        piece: None,
                    });
                },
                Err(e) => {
                    warn!(attempt, "Human move rejected: {}", e);
                    self.source.rejected(&label, &e);
                },
            }
        }

        Err(ControlError::TooManyInvalidMoves {
            attempts: self.max_attempts,
        })
    }

    /// 机械臂落子：选格位、取子、复位，成功后记到棋盘并翻转轮次
    ///
    /// 运动失败时棋盘、轮次和棋子架都保持不变，
    /// 再次调用 [`play_turn`](Self::play_turn) 会重走这一步。
    pub fn play_arm_turn(&mut self) -> Result<TurnRecord, ControlError> {
        let mark = Player::Dofbot.mark();
        let position = self
            .policy
            .choose(&self.board, mark)
            .ok_or(ControlError::NoMoveAvailable)?;
        if let Some(taken) = self.board.cell(position) {
            return Err(BoardError::CellOccupied {
                position,
                mark: taken,
            }
            .into());
        }

        let winning = completes_line(&self.board, position, mark);
        let slot = self
            .supply
            .peek(winning)
            .ok_or(ControlError::PieceSupplyExhausted)?;
        info!(%position, piece = %slot.kind, winning, "Dofbot move");

        self.arm
            .pick_up_piece(slot.kind.label(), Some(slot.coordinates.as_slice()))?;
        self.arm.reset_position()?;

        self.board.make_move_at(position)?;
        self.supply.take(winning);
        self.board.switch_player();

        Ok(TurnRecord {
            player: Player::Dofbot,
            position,
            piece: Some(slot.kind),
        })
    }
}
