//! 驱动层错误类型定义

use dofbot_protocol::{ProtocolError, ServoChannel};
use std::time::Duration;
use thiserror::Error;

/// 机械臂运动错误
///
/// 所有运动命令的校验失败都以此类型返回，命令被丢弃，机械臂停留在原位。
#[derive(Error, Debug)]
pub enum ArmError {
    /// 通道编号不在 1-6
    #[error("Servo channel {channel} out of range (expected 1-6)")]
    OutOfRangeChannel { channel: u8 },

    /// 角度超出通道包络（包括 NaN/无穷大）
    #[error("Angle {angle} outside envelope [{min}, {max}] of servo {channel}")]
    AngleOutOfEnvelope {
        channel: ServoChannel,
        angle: f64,
        min: f64,
        max: f64,
    },

    /// 运动时间短于最短运动时间
    #[error("Move duration {requested:?} is shorter than the minimum {minimum:?}")]
    DurationTooShort {
        requested: Duration,
        minimum: Duration,
    },

    /// 六舵机命令的角度数量不是 6
    #[error("Expected 6 servo angles, got {len}")]
    MalformedAngleSequence { len: usize },

    /// 棋子源坐标缺失或分量数不是 4
    #[error("Malformed source coordinates: expected 4 components, got {}", describe_len(.len))]
    MalformedCoordinates { len: Option<usize> },

    /// 执行器写入失败
    #[error("Actuator error: {0}")]
    Actuator(#[from] ActuatorError),

    /// 执行器未在超时内确认写入
    #[error("Actuator did not acknowledge within {0:?}")]
    Timeout(Duration),

    /// 执行器线程已退出
    #[error("Actuator link closed")]
    LinkClosed,

    /// 无法启动执行器线程
    #[error("Failed to spawn actuator worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// 设置不自洽（构建控制器时检查）
    #[error("Invalid arm settings: {0}")]
    InvalidSettings(#[from] ProtocolError),
}

fn describe_len(len: &Option<usize>) -> String {
    match len {
        Some(len) => len.to_string(),
        None => "none".to_string(),
    }
}

/// 舵机执行器错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActuatorError {
    /// 总线写入失败
    #[error("Bus write failed: {0}")]
    Bus(String),

    /// 执行器已断开
    #[error("Actuator disconnected")]
    Disconnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 测试 ArmError 的 Display 实现
    #[test]
    fn test_arm_error_display() {
        let err = ArmError::OutOfRangeChannel { channel: 7 };
        assert_eq!(err.to_string(), "Servo channel 7 out of range (expected 1-6)");

        let err = ArmError::AngleOutOfEnvelope {
            channel: ServoChannel::Gripper,
            angle: 201.0,
            min: 0.0,
            max: 200.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("201") && msg.contains("S6"), "{}", msg);

        let err = ArmError::MalformedCoordinates { len: None };
        assert!(err.to_string().ends_with("got none"));

        let err = ArmError::MalformedCoordinates { len: Some(3) };
        assert!(err.to_string().ends_with("got 3"));

        let err = ArmError::MalformedAngleSequence { len: 5 };
        assert_eq!(err.to_string(), "Expected 6 servo angles, got 5");
    }

    /// 测试 From<ActuatorError> 转换
    #[test]
    fn test_from_actuator_error() {
        let err: ArmError = ActuatorError::Disconnected.into();
        match err {
            ArmError::Actuator(e) => assert_eq!(e, ActuatorError::Disconnected),
            _ => panic!("Expected Actuator variant"),
        }
    }
}
