//! 舵机驱动板 I2C 寄存器编码
//!
//! 驱动板挂在 I2C 地址 `0x15` 上，每次写入为 `[寄存器, 数据...]`：
//!
//! | 寄存器 | 含义 | 数据 |
//! |--------|------|------|
//! | `0x10 + id` | 单舵机运动 | `pulse_hi, pulse_lo, time_hi, time_lo` |
//! | `0x1D` | 六舵机同步运动 | 6 × `pulse_hi, pulse_lo`，然后 `time_hi, time_lo` |
//!
//! ## 角度 → 脉宽
//!
//! - S5：0-270° 线性映射到 380-3700
//! - 其他通道：0-180° 线性映射到 900-3100
//! - S2/S3/S4 安装方向相反，先取 `180 - angle`
//! - 超出行程的角度钳位到脉宽端点
//!
//! 时间单位为毫秒，超过 `u16::MAX` 时饱和。

use crate::pose::ArmPose;
use crate::servo::ServoChannel;
use crate::u16_to_bytes_be;
use std::time::Duration;

/// 舵机驱动板 I2C 地址
pub const DEFAULT_I2C_ADDRESS: u8 = 0x15;

/// 单舵机运动寄存器基址（加上通道编号）
pub const REG_SERVO_BASE: u8 = 0x10;

/// 六舵机同步运动寄存器
pub const REG_SERVO_ALL: u8 = 0x1D;

/// 单舵机写入帧长度
pub const SINGLE_WRITE_LEN: usize = 5;

/// 六舵机写入帧长度
pub const ALL_WRITE_LEN: usize = 15;

/// 通道行程：(角度跨度, 最小脉宽, 最大脉宽)
fn travel(channel: ServoChannel) -> (f64, u16, u16) {
    match channel {
        ServoChannel::WristRotation => (270.0, 380, 3700),
        _ => (180.0, 900, 3100),
    }
}

/// 角度是否在舵机物理行程内（行程外的角度编码时会被钳位）
///
/// S6 包络上限 200° 超出 180° 行程：夹爪张开到 180° 以上时实际停在 180°。
pub fn within_travel(channel: ServoChannel, angle: f64) -> bool {
    let (span, _, _) = travel(channel);
    (0.0..=span).contains(&angle)
}

/// 角度转换为舵机脉宽
pub fn angle_to_pulse(channel: ServoChannel, angle: f64) -> u16 {
    let (span, lo, hi) = travel(channel);
    let angle = match channel {
        ServoChannel::Shoulder | ServoChannel::Elbow | ServoChannel::Wrist => 180.0 - angle,
        _ => angle,
    };

    let pulse = f64::from(hi - lo) * angle / span + f64::from(lo);
    pulse.round().clamp(f64::from(lo), f64::from(hi)) as u16
}

/// 运动时间转换为毫秒（饱和到 u16）
pub fn duration_to_millis(duration: Duration) -> u16 {
    duration.as_millis().min(u128::from(u16::MAX)) as u16
}

/// 编码单舵机运动
pub fn encode_servo_write(
    channel: ServoChannel,
    angle: f64,
    duration: Duration,
) -> [u8; SINGLE_WRITE_LEN] {
    let [pulse_hi, pulse_lo] = u16_to_bytes_be(angle_to_pulse(channel, angle));
    let [time_hi, time_lo] = u16_to_bytes_be(duration_to_millis(duration));

    [
        REG_SERVO_BASE + channel.id(),
        pulse_hi,
        pulse_lo,
        time_hi,
        time_lo,
    ]
}

/// 编码六舵机同步运动
pub fn encode_servo_write_all(pose: &ArmPose) -> [u8; ALL_WRITE_LEN] {
    let mut frame = [0u8; ALL_WRITE_LEN];
    frame[0] = REG_SERVO_ALL;

    for channel in ServoChannel::ALL {
        let offset = 1 + channel.index() * 2;
        let pulse = u16_to_bytes_be(angle_to_pulse(channel, pose.angle(channel)));
        frame[offset..offset + 2].copy_from_slice(&pulse);
    }

    frame[13..15].copy_from_slice(&u16_to_bytes_be(duration_to_millis(pose.duration)));
    frame
}
