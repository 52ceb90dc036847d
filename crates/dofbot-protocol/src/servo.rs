//! 舵机通道与安全包络
//!
//! 每个舵机通道都有一个只读的安全包络：允许的角度范围和最短运动时间。
//! 包络表在进程启动时确定，之后不再修改。

use crate::ProtocolError;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;
use std::time::Duration;

/// 舵机数量
pub const SERVO_COUNT: usize = 6;

/// 单舵机运动的默认最短时间
pub const DEFAULT_MIN_MOVE_TIME: Duration = Duration::from_millis(2000);

/// 舵机通道（1-6）
///
/// 编号与舵机驱动板上的 ID 一致。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ServoChannel {
    /// 底座旋转
    Base = 1,
    /// 肩关节
    Shoulder = 2,
    /// 肘关节
    Elbow = 3,
    /// 腕关节俯仰
    Wrist = 4,
    /// 腕关节旋转（0-270°）
    WristRotation = 5,
    /// 夹爪
    Gripper = 6,
}

impl ServoChannel {
    /// 按编号排列的全部通道
    pub const ALL: [ServoChannel; SERVO_COUNT] = [
        ServoChannel::Base,
        ServoChannel::Shoulder,
        ServoChannel::Elbow,
        ServoChannel::Wrist,
        ServoChannel::WristRotation,
        ServoChannel::Gripper,
    ];

    /// 从整数编号解析通道
    ///
    /// # 错误
    /// 编号不在 1-6 范围内时返回 `ProtocolError::InvalidChannel`
    pub fn from_id(id: u8) -> Result<Self, ProtocolError> {
        Self::try_from(id).map_err(|_| ProtocolError::InvalidChannel { id })
    }

    /// 通道编号（1-6）
    #[inline]
    pub fn id(self) -> u8 {
        self.into()
    }

    /// 数组下标（0-5）
    #[inline]
    pub fn index(self) -> usize {
        self.id() as usize - 1
    }
}

impl fmt::Display for ServoChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.id())
    }
}

/// 单个舵机的安全包络
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServoEnvelope {
    /// 所属通道
    pub channel: ServoChannel,
    /// 最小角度（度）
    pub min_angle: f64,
    /// 最大角度（度）
    pub max_angle: f64,
    /// 最短运动时间
    pub min_move_time: Duration,
}

impl ServoEnvelope {
    pub fn new(channel: ServoChannel, min_angle: f64, max_angle: f64) -> Self {
        Self {
            channel,
            min_angle,
            max_angle,
            min_move_time: DEFAULT_MIN_MOVE_TIME,
        }
    }

    /// 设置最短运动时间
    pub fn with_min_move_time(mut self, min_move_time: Duration) -> Self {
        self.min_move_time = min_move_time;
        self
    }

    /// 角度是否落在包络内（闭区间，NaN/无穷大视为越界）
    pub fn contains(&self, angle: f64) -> bool {
        angle.is_finite() && angle >= self.min_angle && angle <= self.max_angle
    }
}

/// 六个通道的安全包络表
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvelopeTable {
    envelopes: [ServoEnvelope; SERVO_COUNT],
}

impl EnvelopeTable {
    /// 从任意顺序的包络列表构建
    ///
    /// # 错误
    /// - 同一通道出现两次：`DuplicateChannel`
    /// - 缺少某个通道：`MissingChannel`
    /// - 最小角度大于最大角度或非有限值：`InvalidSetting`
    pub fn from_envelopes(
        envelopes: impl IntoIterator<Item = ServoEnvelope>,
    ) -> Result<Self, ProtocolError> {
        let mut slots: [Option<ServoEnvelope>; SERVO_COUNT] = [None; SERVO_COUNT];

        for envelope in envelopes {
            let slot = &mut slots[envelope.channel.index()];
            if slot.is_some() {
                return Err(ProtocolError::DuplicateChannel {
                    id: envelope.channel.id(),
                });
            }
            if !envelope.min_angle.is_finite()
                || !envelope.max_angle.is_finite()
                || envelope.min_angle > envelope.max_angle
            {
                return Err(ProtocolError::InvalidSetting {
                    field: format!("envelopes.{}", envelope.channel.id()),
                    reason: format!(
                        "invalid range [{}, {}]",
                        envelope.min_angle, envelope.max_angle
                    ),
                });
            }
            *slot = Some(envelope);
        }

        let mut table = [ServoEnvelope::new(ServoChannel::Base, 0.0, 0.0); SERVO_COUNT];
        for channel in ServoChannel::ALL {
            table[channel.index()] = slots[channel.index()]
                .ok_or(ProtocolError::MissingChannel { id: channel.id() })?;
        }

        Ok(Self { envelopes: table })
    }

    /// 获取指定通道的包络
    #[inline]
    pub fn get(&self, channel: ServoChannel) -> &ServoEnvelope {
        &self.envelopes[channel.index()]
    }

    /// 按通道编号顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &ServoEnvelope> {
        self.envelopes.iter()
    }

    /// 所有通道中最长的最短运动时间
    pub fn longest_min_move_time(&self) -> Duration {
        self.envelopes
            .iter()
            .map(|e| e.min_move_time)
            .max()
            .unwrap_or(DEFAULT_MIN_MOVE_TIME)
    }
}

impl Default for EnvelopeTable {
    /// Dofbot 默认包络
    ///
    /// - S1-S4: 0-180°
    /// - S5（腕旋转）: 0-270°
    /// - S6（夹爪）: 0-200°，留出抓取前张开的余量；
    ///   舵机物理行程只有 180°，180° 以上的命令实际停在 180°
    ///   （见 [`register::within_travel`](crate::register::within_travel)）
    fn default() -> Self {
        Self {
            envelopes: [
                ServoEnvelope::new(ServoChannel::Base, 0.0, 180.0),
                ServoEnvelope::new(ServoChannel::Shoulder, 0.0, 180.0),
                ServoEnvelope::new(ServoChannel::Elbow, 0.0, 180.0),
                ServoEnvelope::new(ServoChannel::Wrist, 0.0, 180.0),
                ServoEnvelope::new(ServoChannel::WristRotation, 0.0, 270.0),
                ServoEnvelope::new(ServoChannel::Gripper, 0.0, 200.0),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_from_id() {
        for id in 1..=6u8 {
            let channel = ServoChannel::from_id(id).unwrap();
            assert_eq!(channel.id(), id);
            assert_eq!(channel.index(), id as usize - 1);
        }

        assert_eq!(
            ServoChannel::from_id(0),
            Err(ProtocolError::InvalidChannel { id: 0 })
        );
        assert_eq!(
            ServoChannel::from_id(7),
            Err(ProtocolError::InvalidChannel { id: 7 })
        );
    }

    #[test]
    fn test_channel_display() {
        assert_eq!(ServoChannel::Gripper.to_string(), "S6");
    }

    #[test]
    fn test_envelope_contains() {
        let envelope = ServoEnvelope::new(ServoChannel::Base, 0.0, 180.0);

        assert!(envelope.contains(0.0));
        assert!(envelope.contains(180.0));
        assert!(envelope.contains(90.5));

        assert!(!envelope.contains(-0.1));
        assert!(!envelope.contains(180.1));
        assert!(!envelope.contains(f64::NAN));
        assert!(!envelope.contains(f64::INFINITY));
    }

    #[test]
    fn test_default_table() {
        let table = EnvelopeTable::default();
        assert_eq!(table.get(ServoChannel::WristRotation).max_angle, 270.0);
        assert_eq!(table.get(ServoChannel::Gripper).max_angle, 200.0);
        assert_eq!(table.longest_min_move_time(), Duration::from_millis(2000));

        for (envelope, channel) in table.iter().zip(ServoChannel::ALL) {
            assert_eq!(envelope.channel, channel);
        }
    }

    #[test]
    fn test_from_envelopes_any_order() {
        let mut envelopes: Vec<_> = EnvelopeTable::default().iter().copied().collect();
        envelopes.reverse();

        let table = EnvelopeTable::from_envelopes(envelopes).unwrap();
        assert_eq!(table, EnvelopeTable::default());
    }

    #[test]
    fn test_from_envelopes_missing_channel() {
        let envelopes: Vec<_> = EnvelopeTable::default().iter().copied().take(5).collect();

        assert_eq!(
            EnvelopeTable::from_envelopes(envelopes),
            Err(ProtocolError::MissingChannel { id: 6 })
        );
    }

    #[test]
    fn test_from_envelopes_duplicate_channel() {
        let mut envelopes: Vec<_> = EnvelopeTable::default().iter().copied().collect();
        envelopes.push(ServoEnvelope::new(ServoChannel::Elbow, 0.0, 90.0));

        assert_eq!(
            EnvelopeTable::from_envelopes(envelopes),
            Err(ProtocolError::DuplicateChannel { id: 3 })
        );
    }

    #[test]
    fn test_from_envelopes_inverted_range() {
        let mut envelopes: Vec<_> = EnvelopeTable::default().iter().copied().collect();
        envelopes[0].min_angle = 100.0;
        envelopes[0].max_angle = 10.0;

        assert!(matches!(
            EnvelopeTable::from_envelopes(envelopes),
            Err(ProtocolError::InvalidSetting { .. })
        ));
    }
}
