//! # Dofbot Tools
//!
//! 应用层共享工具：机械臂设置的 TOML 配置文件读写。
//!
//! 只依赖协议层，不引入执行器或硬件抽象。

pub mod config;

pub use config::{ArmConfigFile, from_toml_str, load_from_file, save_to_file, to_toml_string};

use dofbot_protocol::ProtocolError;
use std::path::PathBuf;
use thiserror::Error;

/// 配置文件错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML 语法错误、缺失字段、未知字段或重复键
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown servo channel key {0:?} (expected \"1\"..\"6\")")]
    UnknownChannel(String),

    #[error("Unknown piece key {0:?} (expected R, B, KN, Q, K)")]
    UnknownPiece(String),

    #[error("Missing gripper angle for piece {0}")]
    MissingPiece(&'static str),

    #[error("{field} must contain 6 angles, got {len}")]
    MalformedPose { field: &'static str, len: usize },

    /// 包络缺失/重复/范围颠倒，或设置不自洽
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ProtocolError),
}
