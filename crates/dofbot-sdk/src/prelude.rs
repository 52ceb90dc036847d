//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use dofbot_sdk::prelude::*;
//! ```

// 驱动层
pub use crate::driver::{
    ApproachStrategy, ArmController, ArmControllerBuilder, DryRunActuator, I2cActuator,
    MotionWait, ServoActuator,
};

// 棋盘与编排
pub use crate::board::{Board, GameState, Mark, Player, Position};
pub use crate::control::{LinePolicy, MatchOrchestrator, MoveSource, MovePolicy, ScriptedMoves};

// 协议层
pub use crate::protocol::{ArmSettings, PieceKind, ServoChannel};

// 错误类型
pub use crate::board::BoardError;
pub use crate::control::ControlError;
pub use crate::driver::{ActuatorError, ArmError};
pub use crate::protocol::ProtocolError;
pub use crate::tools::ConfigError;
