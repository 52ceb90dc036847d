//! # Dofbot CLI
//!
//! 井字棋机械臂命令行工具。
//!
//! ```bash
//! # 生成默认配置
//! dofbot-cli config init
//!
//! # 单舵机 / 六舵机运动（运动前先校验安全包络）
//! dofbot-cli move --channel 1 --angle 120
//! dofbot-cli move --joints 90,130,0,0,90,90 --duration 4000
//!
//! # 抓取棋子
//! dofbot-cli pick --piece K --coords 0,0,0,0
//!
//! # 人机对局（无硬件时使用 --dry-run）
//! dofbot-cli --dry-run play
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod hardware;
mod validation;

use commands::{ConfigCommand, MoveCommand, PickCommand, PlayCommand};

/// Dofbot CLI - 井字棋机械臂命令行工具
#[derive(Parser, Debug)]
#[command(name = "dofbot-cli")]
#[command(about = "Command-line interface for the Dofbot tic-tac-toe arm", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// 所有子命令共享的参数
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// 配置文件路径（默认 ~/.config/dofbot/arm.toml）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 不连接硬件，只记录运动命令
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// I2C 总线设备
    #[arg(long, global = true, default_value = hardware::DEFAULT_I2C_BUS)]
    pub i2c_bus: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 移动舵机到目标角度
    Move {
        #[command(flatten)]
        args: MoveCommand,
    },

    /// 回到中立姿态并俯视棋盘
    Reset,

    /// 抓取一枚棋子
    Pick {
        #[command(flatten)]
        args: PickCommand,
    },

    /// 人机井字棋对局
    Play {
        #[command(flatten)]
        args: PlayCommand,
    },
}

fn main() -> Result<()> {
    dofbot_sdk::init_logging("dofbot_cli=info,dofbot_control=info,warn");

    let cli = Cli::parse();

    match cli.command {
        Commands::Config(cmd) => cmd.execute(&cli.global),

        Commands::Move { args } => args.execute(&cli.global),

        Commands::Reset => commands::reset(&cli.global),

        Commands::Pick { args } => args.execute(&cli.global),

        Commands::Play { args } => args.execute(&cli.global),
    }
}
