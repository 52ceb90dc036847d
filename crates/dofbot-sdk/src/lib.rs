//! Dofbot SDK - Dofbot 机械臂井字棋 Rust SDK
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **协议层** (`protocol`): 舵机通道、安全包络、棋子角度表、I2C 寄存器编码
//! - **驱动层** (`driver`): 执行器、执行器线程、运动控制器
//! - **棋盘层** (`board`): 井字棋棋盘状态引擎
//! - **编排层** (`control`): 人类与机械臂交替落子
//! - **工具层** (`tools`): TOML 配置文件
//!
//! # 快速开始
//!
//! ```no_run
//! use dofbot_sdk::prelude::*;
//!
//! dofbot_sdk::init_logging("info");
//! let arm = ArmControllerBuilder::new().build(DryRunActuator)?;
//! let mut game = MatchOrchestrator::new(arm, ScriptedMoves::new(["B2"]), LinePolicy);
//! game.play_turn()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// 内部模块结构
pub use dofbot_board as board;
pub use dofbot_control as control;
pub use dofbot_driver as driver;
pub use dofbot_protocol as protocol;
pub use dofbot_tools as tools;

mod logging;
pub mod prelude;

pub use logging::init_logging;

// --- 用户以此为界 ---
// 以下是通过 Facade Pattern 提供的公共 API

pub use board::{Board, BoardError, GameState};
pub use control::{ControlError, MatchOrchestrator};
pub use driver::{ArmController, ArmControllerBuilder, ArmError};
pub use protocol::{ArmSettings, ProtocolError};
pub use tools::ConfigError;
