//! 机械臂运动控制器
//!
//! 所有运动命令先按安全包络校验，再下发给执行器，然后阻塞
//! `运动时间 + 稳定时间`。调用返回时即认为物理运动已经完成。
//!
//! 校验失败的命令被记录日志并丢弃，机械臂停留在上一个位置；
//! 错误以 [`ArmError`] 返回，控制器本身不会 panic。

use crate::approach::{ApproachStrategy, PieceTarget};
use crate::error::ArmError;
use crate::link::ActuatorLink;
use crate::wait::MotionWait;
use dofbot_protocol::{ArmPose, ArmSettings, PieceKind, SERVO_COUNT, ServoChannel, ServoCommand};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// 源坐标的分量数
pub const COORDINATE_COMPONENTS: usize = 4;

/// Dofbot 运动控制器
///
/// 通过 [`ArmControllerBuilder`](crate::ArmControllerBuilder) 创建，
/// 创建时会无条件执行一次 [`reset_position`](Self::reset_position)。
///
/// 控制器只记得最近一次下发的角度，不跟踪机械臂的真实位置。
pub struct ArmController {
    settings: ArmSettings,
    link: ActuatorLink,
    wait: Box<dyn MotionWait>,
    approach: Box<dyn ApproachStrategy>,
    last_commanded: [Option<f64>; SERVO_COUNT],
}

impl ArmController {
    pub(crate) fn new(
        settings: ArmSettings,
        link: ActuatorLink,
        wait: Box<dyn MotionWait>,
        approach: Box<dyn ApproachStrategy>,
    ) -> Self {
        Self {
            settings,
            link,
            wait,
            approach,
            last_commanded: [None; SERVO_COUNT],
        }
    }

    /// 当前设置
    pub fn settings(&self) -> &ArmSettings {
        &self.settings
    }

    /// 最近一次成功下发的各通道角度（未下发过为 `None`）
    pub fn last_commanded_pose(&self) -> [Option<f64>; SERVO_COUNT] {
        self.last_commanded
    }

    /// 单舵机运动
    ///
    /// # 错误
    /// - `channel` 不在 1-6：`OutOfRangeChannel`
    /// - `duration` 短于该通道最短运动时间（默认 2000 ms）：`DurationTooShort`
    /// - `angle` 超出该通道包络：`AngleOutOfEnvelope`
    ///
    /// 校验失败时不向执行器发送任何命令。
    pub fn move_single_servo(
        &mut self,
        channel: u8,
        angle: f64,
        duration: Duration,
    ) -> Result<(), ArmError> {
        let channel = self
            .check_single(channel, angle, duration)
            .inspect_err(|e| warn!("Single-servo move rejected: {}", e))?;

        self.execute(ServoCommand::Single {
            channel,
            angle,
            duration,
        })
    }

    /// 六舵机同步运动
    ///
    /// # 错误
    /// - 角度数量不是 6：`MalformedAngleSequence`
    /// - `duration` 短于同步运动最短时间（默认 4000 ms）：`DurationTooShort`
    /// - 任一角度超出对应通道包络：`AngleOutOfEnvelope`
    pub fn move_all_servos(&mut self, angles: &[f64], duration: Duration) -> Result<(), ArmError> {
        let pose = self
            .check_all(angles, duration)
            .inspect_err(|e| warn!("All-servo move rejected: {}", e))?;

        self.execute(ServoCommand::All(pose))
    }

    /// 复位：先回中立姿态，再转到俯视棋盘姿态
    ///
    /// 无论之前处于什么姿态，成功返回后都停在俯视棋盘姿态。
    pub fn reset_position(&mut self) -> Result<(), ArmError> {
        info!("Resetting arm to neutral, then board view");

        let step = self.settings.timing.pose_step;
        let neutral = self.settings.neutral_pose;
        let view = self.settings.view_pose;

        self.move_all_servos(&neutral, step)?;
        self.move_all_servos(&view, step)
    }

    /// 抓取棋子
    ///
    /// 步骤：
    /// 1. 若注入的接近策略给出姿态，先移动到棋子上方
    /// 2. 夹爪张开到 `闭合角度 + 余量`
    /// 3. 腕旋转到倒置角度（默认 270°）
    /// 4. 夹爪闭合到该棋子的闭合角度
    ///
    /// 无法识别的棋子使用兜底闭合角度（默认 170°），不会报错。
    /// 任一步骤失败则中止后续步骤。
    ///
    /// # 错误
    /// 坐标缺失或分量数不是 4 时返回 `MalformedCoordinates`，不下发任何命令。
    pub fn pick_up_piece(
        &mut self,
        piece: &str,
        coordinates: Option<&[f64]>,
    ) -> Result<(), ArmError> {
        let coordinates = coordinates
            .and_then(|c| <[f64; COORDINATE_COMPONENTS]>::try_from(c).ok())
            .ok_or(ArmError::MalformedCoordinates {
                len: coordinates.map(<[f64]>::len),
            })
            .inspect_err(|e| warn!(piece, "Pick-up rejected: {}", e))?;

        let kind = piece.parse::<PieceKind>().ok();
        let closed = self.settings.pieces.closed_angle(piece);
        if kind.is_none() {
            warn!(
                piece,
                "Unknown piece identity, using default gripper angle {}", closed
            );
        }
        let open = closed + self.settings.pickup.clearance;
        let rotation = self.settings.pickup.inverted_rotation;
        let step = self.settings.timing.macro_step;

        info!(piece, closed, "Picking up piece");

        let target = PieceTarget {
            label: piece,
            kind,
            coordinates,
        };
        if let Some(pose) = self.approach.approach_pose(&target) {
            debug!(?pose, "Approaching piece");
            let pose_step = self.settings.timing.pose_step;
            self.move_all_servos(&pose, pose_step)?;
        }

        self.move_single_servo(ServoChannel::Gripper.id(), open, step)?;
        self.move_single_servo(ServoChannel::WristRotation.id(), rotation, step)?;
        self.move_single_servo(ServoChannel::Gripper.id(), closed, step)
    }

    fn check_single(
        &self,
        channel: u8,
        angle: f64,
        duration: Duration,
    ) -> Result<ServoChannel, ArmError> {
        let channel =
            ServoChannel::from_id(channel).map_err(|_| ArmError::OutOfRangeChannel { channel })?;
        let envelope = self.settings.envelopes.get(channel);

        if duration < envelope.min_move_time {
            return Err(ArmError::DurationTooShort {
                requested: duration,
                minimum: envelope.min_move_time,
            });
        }

        if !envelope.contains(angle) {
            return Err(ArmError::AngleOutOfEnvelope {
                channel,
                angle,
                min: envelope.min_angle,
                max: envelope.max_angle,
            });
        }

        Ok(channel)
    }

    fn check_all(&self, angles: &[f64], duration: Duration) -> Result<ArmPose, ArmError> {
        let angles: [f64; SERVO_COUNT] = angles
            .try_into()
            .map_err(|_| ArmError::MalformedAngleSequence { len: angles.len() })?;

        let minimum = self
            .settings
            .timing
            .all_servo_min
            .max(self.settings.envelopes.longest_min_move_time());
        if duration < minimum {
            return Err(ArmError::DurationTooShort {
                requested: duration,
                minimum,
            });
        }

        for (envelope, angle) in self.settings.envelopes.iter().zip(angles) {
            if !envelope.contains(angle) {
                return Err(ArmError::AngleOutOfEnvelope {
                    channel: envelope.channel,
                    angle,
                    min: envelope.min_angle,
                    max: envelope.max_angle,
                });
            }
        }

        Ok(ArmPose::new(angles, duration))
    }

    /// 下发已校验的命令，并阻塞到运动完成
    fn execute(&mut self, command: ServoCommand) -> Result<(), ArmError> {
        self.link
            .dispatch(command)
            .inspect_err(|e| error!("Motion command failed: {}", e))?;

        match command {
            ServoCommand::Single { channel, angle, .. } => {
                self.last_commanded[channel.index()] = Some(angle);
            },
            ServoCommand::All(pose) => {
                for (slot, angle) in self.last_commanded.iter_mut().zip(pose.angles) {
                    *slot = Some(angle);
                }
            },
        }

        self.wait.wait(command.duration() + self.settings.timing.settle);
        Ok(())
    }
}
