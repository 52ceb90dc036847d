//! 命令定义和实现

pub mod config;
pub mod r#move;
pub mod pick;
pub mod play;

pub use config::ConfigCommand;
pub use r#move::MoveCommand;
pub use pick::PickCommand;
pub use play::PlayCommand;

use crate::GlobalArgs;
use crate::hardware;
use anyhow::Result;

/// 复位：连接时的初始复位即回到中立姿态并俯视棋盘
pub fn reset(global: &GlobalArgs) -> Result<()> {
    let settings = config::load_settings(global)?;

    println!("⏳ 正在复位...");
    let arm = hardware::connect(global, settings)?;

    if arm.last_commanded_pose() != arm.settings().view_pose.map(Some) {
        anyhow::bail!("复位未完成，请检查舵机板连接");
    }
    println!("✅ 已复位");
    Ok(())
}
