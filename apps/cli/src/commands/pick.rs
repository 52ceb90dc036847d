//! 抓取命令

use crate::GlobalArgs;
use crate::commands::config::load_settings;
use crate::hardware;
use crate::validation::parse_coords;
use anyhow::{Context, Result};
use clap::Args;
use dofbot_sdk::protocol::PieceKind;

/// 抓取命令参数
#[derive(Args, Debug)]
pub struct PickCommand {
    /// 棋子标签（R / B / KN / Q / K）
    #[arg(short, long)]
    pub piece: String,

    /// 棋子源坐标（4 个分量），逗号分隔
    #[arg(short, long, allow_negative_numbers = true)]
    pub coords: String,
}

impl PickCommand {
    pub fn execute(self, global: &GlobalArgs) -> Result<()> {
        let coords = parse_coords(&self.coords)?;
        let settings = load_settings(global)?;

        let label = self.piece.trim().to_uppercase();
        match label.parse::<PieceKind>() {
            Ok(kind) => println!(
                "棋子 {}：夹爪闭合 {:.1}°",
                kind,
                settings.pieces.angle(kind)
            ),
            Err(_) => println!(
                "⚠️ 未知棋子 {:?}，使用默认闭合角度 {:.1}°",
                label,
                settings.pieces.default_angle()
            ),
        }

        let mut arm = hardware::connect(global, settings)?;

        println!("⏳ 正在抓取...");
        arm.pick_up_piece(&label, Some(coords.as_slice()))
            .context("抓取失败")?;

        println!("✅ 抓取完成");
        Ok(())
    }
}
