//! 运动时序与机械臂整体设置
//!
//! 所有设置在启动时构建一次，之后只读。

use crate::ProtocolError;
use crate::piece::{PieceAngleTable, PieceKind};
use crate::servo::{EnvelopeTable, SERVO_COUNT, ServoChannel};
use std::time::Duration;

/// 六舵机同步运动的最短时间
pub const ALL_SERVO_MIN_MOVE_TIME: Duration = Duration::from_millis(4000);

/// 每次运动后的稳定等待
pub const SETTLE_BUFFER: Duration = Duration::from_millis(200);

/// 等待执行器确认的默认超时
pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_millis(1000);

/// 中立姿态
pub const NEUTRAL_POSE: [f64; SERVO_COUNT] = [90.0, 90.0, 90.0, 90.0, 90.0, 90.0];

/// 俯视棋盘姿态
pub const BOARD_VIEW_POSE: [f64; SERVO_COUNT] = [90.0, 130.0, 0.0, 0.0, 90.0, 90.0];

/// 运动时序
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionTiming {
    /// 六舵机同步运动的最短时间
    pub all_servo_min: Duration,
    /// 运动完成后的稳定等待
    pub settle: Duration,
    /// 等待执行器确认写入的超时
    pub ack_timeout: Duration,
    /// 宏动作中单舵机步骤的运动时间
    pub macro_step: Duration,
    /// 宏动作中六舵机步骤（复位、接近）的运动时间
    pub pose_step: Duration,
}

impl Default for MotionTiming {
    fn default() -> Self {
        Self {
            all_servo_min: ALL_SERVO_MIN_MOVE_TIME,
            settle: SETTLE_BUFFER,
            ack_timeout: DEFAULT_ACK_TIMEOUT,
            macro_step: Duration::from_millis(2000),
            pose_step: ALL_SERVO_MIN_MOVE_TIME,
        }
    }
}

/// 抓取参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickupProfile {
    /// 抓取前夹爪在闭合角度基础上多张开的角度
    pub clearance: f64,
    /// 腕旋转倒置角度（避开棋盘下方的固定架）
    pub inverted_rotation: f64,
}

impl Default for PickupProfile {
    fn default() -> Self {
        Self {
            clearance: 20.0,
            inverted_rotation: 270.0,
        }
    }
}

/// 机械臂整体设置
#[derive(Debug, Clone, PartialEq)]
pub struct ArmSettings {
    pub envelopes: EnvelopeTable,
    pub pieces: PieceAngleTable,
    pub timing: MotionTiming,
    pub pickup: PickupProfile,
    pub neutral_pose: [f64; SERVO_COUNT],
    pub view_pose: [f64; SERVO_COUNT],
}

impl Default for ArmSettings {
    fn default() -> Self {
        Self {
            envelopes: EnvelopeTable::default(),
            pieces: PieceAngleTable::default(),
            timing: MotionTiming::default(),
            pickup: PickupProfile::default(),
            neutral_pose: NEUTRAL_POSE,
            view_pose: BOARD_VIEW_POSE,
        }
    }
}

impl ArmSettings {
    /// 检查设置能否让复位宏和抓取宏通过包络校验
    ///
    /// 运行期的每条命令仍会单独校验，这里只是尽早发现配置错误。
    pub fn validate(&self) -> Result<(), ProtocolError> {
        for (name, pose) in [("neutral", &self.neutral_pose), ("board_view", &self.view_pose)] {
            for channel in ServoChannel::ALL {
                let angle = pose[channel.index()];
                if !self.envelopes.get(channel).contains(angle) {
                    return Err(invalid(
                        format!("poses.{name}"),
                        format!("{channel} angle {angle} is outside its envelope"),
                    ));
                }
            }
        }

        if self.timing.pose_step < self.timing.all_servo_min {
            return Err(invalid(
                "timing.pose_step_ms",
                format!(
                    "{} ms is shorter than the all-servo minimum {} ms",
                    self.timing.pose_step.as_millis(),
                    self.timing.all_servo_min.as_millis()
                ),
            ));
        }

        for channel in [ServoChannel::WristRotation, ServoChannel::Gripper] {
            let min = self.envelopes.get(channel).min_move_time;
            if self.timing.macro_step < min {
                return Err(invalid(
                    "timing.macro_step_ms",
                    format!(
                        "{} ms is shorter than {channel} minimum {} ms",
                        self.timing.macro_step.as_millis(),
                        min.as_millis()
                    ),
                ));
            }
        }

        if !self
            .envelopes
            .get(ServoChannel::WristRotation)
            .contains(self.pickup.inverted_rotation)
        {
            return Err(invalid(
                "pickup.inverted_rotation_deg",
                format!("{} is outside the S5 envelope", self.pickup.inverted_rotation),
            ));
        }

        if !self.pickup.clearance.is_finite() || self.pickup.clearance < 0.0 {
            return Err(invalid(
                "pickup.clearance_deg",
                format!("{} must be a non-negative angle", self.pickup.clearance),
            ));
        }

        let gripper = self.envelopes.get(ServoChannel::Gripper);
        let closed_angles = PieceKind::ALL
            .iter()
            .map(|kind| (kind.label(), self.pieces.angle(*kind)))
            .chain(std::iter::once(("default", self.pieces.default_angle())));
        for (label, closed) in closed_angles {
            let open = closed + self.pickup.clearance;
            if !gripper.contains(closed) || !gripper.contains(open) {
                return Err(invalid(
                    format!("pieces.{label}"),
                    format!(
                        "closed {closed} / open {open} do not fit the S6 envelope [{}, {}]",
                        gripper.min_angle, gripper.max_angle
                    ),
                ));
            }
        }

        Ok(())
    }
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ProtocolError {
    ProtocolError::InvalidSetting {
        field: field.into(),
        reason: reason.into(),
    }
}
