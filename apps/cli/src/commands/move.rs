//! 移动命令
//!
//! 单舵机（`--channel` + `--angle`）或六舵机（`--joints`）运动，
//! 连接硬件前先按安全包络校验。

use crate::GlobalArgs;
use crate::commands::config::load_settings;
use crate::hardware;
use crate::validation::{EnvelopeValidator, parse_list};
use anyhow::{Context, Result};
use clap::Args;
use dofbot_sdk::protocol::{ArmSettings, ServoChannel};
use std::time::Duration;

/// 移动命令参数
#[derive(Args, Debug)]
pub struct MoveCommand {
    /// 舵机通道（1-6）
    #[arg(short, long, requires = "angle", conflicts_with = "joints")]
    pub channel: Option<u8>,

    /// 目标角度（度）
    #[arg(short, long, requires = "channel", allow_negative_numbers = true)]
    pub angle: Option<f64>,

    /// 六个舵机的目标角度（度），逗号分隔
    /// 例如：90,130,0,0,90,90
    #[arg(short, long)]
    pub joints: Option<String>,

    /// 运动时间（毫秒），默认取该命令允许的最短时间
    #[arg(short, long)]
    pub duration: Option<u64>,
}

/// 解析后的运动目标
#[derive(Debug, Clone, PartialEq)]
enum MoveTarget {
    Single {
        channel: ServoChannel,
        angle: f64,
        duration: Duration,
    },
    All {
        angles: Vec<f64>,
        duration: Duration,
    },
}

impl MoveCommand {
    /// 解析并校验参数
    fn target(&self, settings: &ArmSettings) -> Result<MoveTarget> {
        let validator = EnvelopeValidator::new(settings);

        match (self.channel, self.angle, &self.joints) {
            (Some(channel), Some(angle), None) => {
                let minimum = ServoChannel::from_id(channel)
                    .map(|c| settings.envelopes.get(c).min_move_time)
                    .unwrap_or_default();
                let duration = self.duration.map(Duration::from_millis).unwrap_or(minimum);

                let channel = validator.validate_servo(channel, angle, duration)?;
                Ok(MoveTarget::Single {
                    channel,
                    angle,
                    duration,
                })
            },

            (None, None, Some(joints)) => {
                let angles = parse_list(joints, "舵机角度")?;
                let minimum = settings
                    .timing
                    .all_servo_min
                    .max(settings.envelopes.longest_min_move_time());
                let duration = self.duration.map(Duration::from_millis).unwrap_or(minimum);

                validator.validate_joints(&angles, duration)?;
                Ok(MoveTarget::All { angles, duration })
            },

            _ => anyhow::bail!("请指定 --channel 与 --angle，或 --joints"),
        }
    }

    pub fn execute(self, global: &GlobalArgs) -> Result<()> {
        let settings = load_settings(global)?;
        let target = self.target(&settings)?;

        let mut arm = hardware::connect(global, settings)?;

        println!("⏳ 正在移动到目标位置...");
        match target {
            MoveTarget::Single {
                channel,
                angle,
                duration,
            } => arm
                .move_single_servo(channel.id(), angle, duration)
                .context("单舵机运动失败")?,
            MoveTarget::All { angles, duration } => arm
                .move_all_servos(&angles, duration)
                .context("六舵机运动失败")?,
        }

        println!("✅ 移动完成");
        Ok(())
    }
}
