//! 输入验证模块
//!
//! 在连接硬件之前按配置中的安全包络检查命令行参数，
//! 让明显错误的命令不必等待初始复位就能报错。

use anyhow::{Context, Result};
use dofbot_sdk::driver::COORDINATE_COMPONENTS;
use dofbot_sdk::protocol::{ArmSettings, SERVO_COUNT, ServoChannel};
use std::time::Duration;

/// 解析逗号分隔的数字列表
pub fn parse_list(text: &str, what: &str) -> Result<Vec<f64>> {
    let values = text
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("解析{}失败: {:?}", what, text))?;

    if values.iter().any(|v| !v.is_finite()) {
        anyhow::bail!("{}包含无效数值: {:?}", what, text);
    }
    Ok(values)
}

/// 解析棋子源坐标（恰好 4 个分量）
pub fn parse_coords(text: &str) -> Result<[f64; COORDINATE_COMPONENTS]> {
    let values = parse_list(text, "棋子坐标")?;
    values.as_slice().try_into().map_err(|_| {
        anyhow::anyhow!(
            "棋子坐标需要 {} 个分量，得到 {} 个",
            COORDINATE_COMPONENTS,
            values.len()
        )
    })
}

/// 安全包络验证器
pub struct EnvelopeValidator<'a> {
    settings: &'a ArmSettings,
}

impl<'a> EnvelopeValidator<'a> {
    pub fn new(settings: &'a ArmSettings) -> Self {
        Self { settings }
    }

    /// 验证单舵机命令
    ///
    /// # 错误
    /// 通道不在 1-6、运动时间过短或角度超出包络
    pub fn validate_servo(
        &self,
        channel: u8,
        angle: f64,
        duration: Duration,
    ) -> Result<ServoChannel> {
        let servo = ServoChannel::from_id(channel)
            .map_err(|_| anyhow::anyhow!("通道 {} 无效（应为 1-6）", channel))?;

        let envelope = self.settings.envelopes.get(servo);
        check_duration(duration, envelope.min_move_time)?;
        self.validate_angle(servo, angle)?;
        Ok(servo)
    }

    /// 验证六舵机命令
    pub fn validate_joints(&self, angles: &[f64], duration: Duration) -> Result<()> {
        if angles.len() != SERVO_COUNT {
            anyhow::bail!("需要 {} 个舵机角度，得到 {} 个", SERVO_COUNT, angles.len());
        }

        let minimum = self
            .settings
            .timing
            .all_servo_min
            .max(self.settings.envelopes.longest_min_move_time());
        check_duration(duration, minimum)?;

        for (servo, &angle) in ServoChannel::ALL.iter().zip(angles) {
            self.validate_angle(*servo, angle)?;
        }
        Ok(())
    }

    fn validate_angle(&self, servo: ServoChannel, angle: f64) -> Result<()> {
        let envelope = self.settings.envelopes.get(servo);
        if !envelope.contains(angle) {
            anyhow::bail!(
                "舵机 {} 角度 {:.1}° 超出范围 [{:.1}, {:.1}]",
                servo,
                angle,
                envelope.min_angle,
                envelope.max_angle
            );
        }
        Ok(())
    }
}

fn check_duration(duration: Duration, minimum: Duration) -> Result<()> {
    if duration < minimum {
        anyhow::bail!(
            "运动时间 {} ms 短于最短时间 {} ms",
            duration.as_millis(),
            minimum.as_millis()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("90, 130,0", "角度").unwrap(), vec![90.0, 130.0, 0.0]);
        assert!(parse_list("90,abc", "角度").is_err());
        assert!(parse_list("90,NaN", "角度").is_err());
        assert!(parse_list("", "角度").is_err());
    }

    #[test]
    fn test_parse_coords() {
        assert_eq!(parse_coords("1,2,3,4").unwrap(), [1.0, 2.0, 3.0, 4.0]);

        let err = parse_coords("1,2,3").unwrap_err().to_string();
        assert!(err.contains("4"), "{}", err);
        assert!(parse_coords("1,2,3,4,5").is_err());
    }

    #[test]
    fn test_validate_servo() {
        let settings = ArmSettings::default();
        let validator = EnvelopeValidator::new(&settings);
        let two_seconds = Duration::from_millis(2000);

        assert_eq!(
            validator.validate_servo(5, 270.0, two_seconds).unwrap(),
            ServoChannel::WristRotation
        );
        assert!(validator.validate_servo(0, 90.0, two_seconds).is_err());
        assert!(validator.validate_servo(7, 90.0, two_seconds).is_err());
        assert!(validator.validate_servo(1, 181.0, two_seconds).is_err());
        assert!(validator.validate_servo(1, -0.5, two_seconds).is_err());
        assert!(
            validator
                .validate_servo(1, 90.0, Duration::from_millis(1999))
                .is_err()
        );
    }

    #[test]
    fn test_validate_joints() {
        let settings = ArmSettings::default();
        let validator = EnvelopeValidator::new(&settings);
        let four_seconds = Duration::from_millis(4000);

        assert!(validator.validate_joints(&[90.0; 6], four_seconds).is_ok());
        assert!(validator.validate_joints(&[90.0; 5], four_seconds).is_err());
        assert!(
            validator
                .validate_joints(&[90.0; 6], Duration::from_millis(3999))
                .is_err()
        );

        let err = validator
            .validate_joints(&[90.0, 90.0, 90.0, 90.0, 90.0, 201.0], four_seconds)
            .unwrap_err()
            .to_string();
        assert!(err.contains("S6"), "{}", err);
    }
}
