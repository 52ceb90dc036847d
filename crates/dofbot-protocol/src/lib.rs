//! # Dofbot Protocol
//!
//! Dofbot 六轴舵机机械臂的静态数据定义与寄存器编码（无硬件依赖）
//!
//! ## 模块
//!
//! - `servo`: 舵机通道与安全包络（角度范围、最短运动时间）
//! - `piece`: 棋子种类与夹爪闭合角度表
//! - `pose`: 六轴姿态与舵机命令
//! - `config`: 运动时序、抓取参数与整体设置
//! - `register`: 舵机驱动板 I2C 寄存器编码
//!
//! ## 字节序
//!
//! 舵机驱动板使用高位在前（大端字节序）。

pub mod config;
pub mod piece;
pub mod pose;
pub mod register;
pub mod servo;

// 重新导出常用类型
pub use config::*;
pub use piece::{PieceAngleTable, PieceKind};
pub use pose::{ArmPose, ServoCommand};
pub use servo::{EnvelopeTable, SERVO_COUNT, ServoChannel, ServoEnvelope};

use thiserror::Error;

/// 协议层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Invalid servo channel: {id} (expected 1-6)")]
    InvalidChannel { id: u8 },

    #[error("Duplicate envelope for servo channel {id}")]
    DuplicateChannel { id: u8 },

    #[error("Missing envelope for servo channel {id}")]
    MissingChannel { id: u8 },

    #[error("Unknown piece identity: {0}")]
    UnknownPiece(String),

    #[error("Invalid setting {field}: {reason}")]
    InvalidSetting { field: String, reason: String },
}

/// u16 转大端字节序
pub fn u16_to_bytes_be(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

/// 大端字节序转 u16
pub fn bytes_to_u16_be(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}
