//! 人机对局命令
//!
//! 人类在终端输入格位键（A1-C3），机械臂按连线策略落子。
//! Ctrl-C 在当前运动结束后、下一轮次开始前停止对局。

use crate::GlobalArgs;
use crate::commands::config::load_settings;
use crate::hardware;
use anyhow::{Context, Result};
use clap::Args;
use dofbot_sdk::board::{Board, BoardError, GameState, Player};
use dofbot_sdk::control::{
    ControlError, DEFAULT_MAX_ATTEMPTS, LinePolicy, MatchOrchestrator, MoveSource, ScriptedMoves,
    TurnRecord,
};
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// 对局命令参数
#[derive(Args, Debug)]
pub struct PlayCommand {
    /// 预先给定的人类落子，逗号分隔（如 B2,C3,A2）；给出时不读取终端输入
    #[arg(long)]
    pub moves: Option<String>,

    /// 连续非法落子上限
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
}

impl PlayCommand {
    pub fn execute(self, global: &GlobalArgs) -> Result<()> {
        let settings = load_settings(global)?;
        let scripted = self.moves.as_deref().map(|moves| {
            ScriptedMoves::new(moves.split(',').map(normalize).filter(|m| !m.is_empty()))
        });

        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        })
        .context("设置 Ctrl-C 处理失败")?;

        let arm = hardware::connect(global, settings)?;
        println!("✅ 机械臂就绪：你执 X 先手，机械臂执 O");

        match scripted {
            Some(source) => {
                let game = MatchOrchestrator::new(arm, source, LinePolicy)
                    .with_max_attempts(self.max_attempts);
                run(game, &stop, false)
            },
            None => {
                let game = MatchOrchestrator::new(arm, ConsoleMoves::new()?, LinePolicy)
                    .with_max_attempts(self.max_attempts);
                run(game, &stop, true)
            },
        }
    }
}

/// 连续进行对局，交互模式下每局结束后询问是否再来一局
fn run<S: MoveSource>(
    mut game: MatchOrchestrator<S, LinePolicy>,
    stop: &AtomicBool,
    interactive: bool,
) -> Result<()> {
    loop {
        let Some(outcome) = play_one(&mut game, stop)? else {
            return Ok(());
        };
        announce(outcome);

        if !interactive {
            return Ok(());
        }

        let again = inquire::Confirm::new("再来一局？")
            .with_default(true)
            .prompt()
            .unwrap_or(false);
        if !again || stop.load(Ordering::SeqCst) {
            return Ok(());
        }

        println!("⏳ 正在复位，请把棋子放回架上...");
        game.new_match().context("新对局复位失败")?;
    }
}

/// 走完一局；被中断或输入关闭时返回 `None`
fn play_one<S: MoveSource>(
    game: &mut MatchOrchestrator<S, LinePolicy>,
    stop: &AtomicBool,
) -> Result<Option<GameState>> {
    loop {
        let state = game.state();
        if state.is_over() {
            println!("{}", game.board());
            return Ok(Some(state));
        }

        if stop.load(Ordering::SeqCst) {
            println!("⚠️ 已中断，对局停止");
            return Ok(None);
        }

        if game.board().current_player() == Player::Dofbot {
            println!("⏳ 机械臂落子中...");
        }

        match game.play_turn() {
            Ok(turn) => report_turn(&turn),
            Err(ControlError::InputClosed) => {
                println!("⚠️ 输入已结束，对局停止");
                return Ok(None);
            },
            Err(e) => return Err(e).context("对局中止"),
        }
    }
}

fn report_turn(turn: &TurnRecord) {
    match (turn.player, turn.piece) {
        (Player::Dofbot, Some(piece)) => {
            println!("🤖 机械臂落子 {}（棋子 {}）", turn.position, piece)
        },
        _ => println!("你落子 {}", turn.position),
    }
}

fn announce(outcome: GameState) {
    match outcome {
        GameState::Win {
            player: Player::Human,
            ..
        } => println!("🎉 你赢了！"),
        GameState::Win {
            player: Player::Dofbot,
            ..
        } => println!("🤖 机械臂获胜"),
        GameState::Draw => println!("平局"),
        GameState::Ongoing => {},
    }
}

/// 终端输入统一为大写、去除首尾空白
fn normalize(input: &str) -> String {
    input.trim().to_uppercase()
}

/// 从终端读取人类落子
struct ConsoleMoves {
    editor: Editor<(), DefaultHistory>,
}

impl ConsoleMoves {
    fn new() -> Result<Self> {
        let editor = Editor::<(), DefaultHistory>::new()
            .map_err(|e| anyhow::anyhow!("Failed to initialize readline: {}", e))?;
        Ok(Self { editor })
    }
}

impl MoveSource for ConsoleMoves {
    fn next_move(&mut self, board: &Board) -> Option<String> {
        println!("{}", board);

        loop {
            match self.editor.readline("你的落子 (A1-C3)> ") {
                Ok(line) => {
                    let label = normalize(&line);
                    if label.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(label.as_str());
                    return Some(label);
                },
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return None,
                Err(e) => {
                    warn!("Readline error: {}", e);
                    return None;
                },
            }
        }
    }

    fn rejected(&mut self, label: &str, error: &BoardError) {
        match error {
            BoardError::InvalidBoardPosition(_) => {
                println!("⚠️ {} 不是有效格位，请输入 A1-C3", label)
            },
            BoardError::CellOccupied { position, .. } => {
                println!("⚠️ {} 已有棋子，请换一个格位", position)
            },
        }
    }
}
