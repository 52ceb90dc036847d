//! # Dofbot Control
//!
//! 对局编排层：把棋盘状态引擎、机械臂控制器和外部协作方
//! （人类落子来源、机械臂落子策略）组合成一局完整的井字棋。
//!
//! 人类执 X 先手，机械臂（"Dofbot"）执 O。
//!
//! ```no_run
//! use dofbot_control::{LinePolicy, MatchOrchestrator, ScriptedMoves};
//! use dofbot_driver::{ArmControllerBuilder, DryRunActuator};
//!
//! let arm = ArmControllerBuilder::new().build(DryRunActuator)?;
//! let source = ScriptedMoves::new(["A1", "C3", "B1"]);
//! let mut game = MatchOrchestrator::new(arm, source, LinePolicy);
//! let report = game.play_match()?;
//! println!("{:?}", report.outcome);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod orchestrator;
pub mod policy;
pub mod source;
pub mod supply;

pub use error::ControlError;
pub use orchestrator::{DEFAULT_MAX_ATTEMPTS, MatchOrchestrator, MatchReport, TurnRecord};
pub use policy::{LinePolicy, MovePolicy};
pub use source::{MoveSource, ScriptedMoves};
pub use supply::{PieceSupply, RackSlot};
