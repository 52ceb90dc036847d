//! 六轴姿态与舵机命令

use crate::servo::{SERVO_COUNT, ServoChannel};
use std::time::Duration;

/// 六轴目标姿态（每个通道一个角度，单位：度）
///
/// 仅在下发命令时临时创建，不做持久化。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmPose {
    pub angles: [f64; SERVO_COUNT],
    pub duration: Duration,
}

impl ArmPose {
    pub fn new(angles: [f64; SERVO_COUNT], duration: Duration) -> Self {
        Self { angles, duration }
    }

    /// 指定通道的目标角度
    #[inline]
    pub fn angle(&self, channel: ServoChannel) -> f64 {
        self.angles[channel.index()]
    }
}

/// 下发给舵机执行器的命令
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ServoCommand {
    /// 单舵机运动
    Single {
        channel: ServoChannel,
        angle: f64,
        duration: Duration,
    },
    /// 六舵机同步运动
    All(ArmPose),
}

impl ServoCommand {
    /// 命令的运动时间
    pub fn duration(&self) -> Duration {
        match self {
            ServoCommand::Single { duration, .. } => *duration,
            ServoCommand::All(pose) => pose.duration,
        }
    }
}
