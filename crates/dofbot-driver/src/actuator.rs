//! 舵机执行器抽象
//!
//! 执行器只负责把命令写出去（fire-and-forget），不等待运动完成；
//! 运动完成的等待由 [`ArmController`](crate::ArmController) 负责。

use crate::error::ActuatorError;
use dofbot_protocol::{ArmPose, ServoChannel, ServoCommand};
use std::time::Duration;
use tracing::info;

/// 舵机执行器
///
/// 实现必须是 `Send`：写入在独立的执行器线程中进行。
pub trait ServoActuator: Send {
    /// 单舵机运动
    fn write_servo(
        &mut self,
        channel: ServoChannel,
        angle: f64,
        duration: Duration,
    ) -> Result<(), ActuatorError>;

    /// 六舵机同步运动
    fn write_all(&mut self, pose: &ArmPose) -> Result<(), ActuatorError>;

    /// 执行一条命令
    fn execute(&mut self, command: &ServoCommand) -> Result<(), ActuatorError> {
        match command {
            ServoCommand::Single {
                channel,
                angle,
                duration,
            } => self.write_servo(*channel, *angle, *duration),
            ServoCommand::All(pose) => self.write_all(pose),
        }
    }
}

impl<A: ServoActuator + ?Sized> ServoActuator for Box<A> {
    fn write_servo(
        &mut self,
        channel: ServoChannel,
        angle: f64,
        duration: Duration,
    ) -> Result<(), ActuatorError> {
        (**self).write_servo(channel, angle, duration)
    }

    fn write_all(&mut self, pose: &ArmPose) -> Result<(), ActuatorError> {
        (**self).write_all(pose)
    }
}

/// 只记录日志、不驱动硬件的执行器
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunActuator;

impl ServoActuator for DryRunActuator {
    fn write_servo(
        &mut self,
        channel: ServoChannel,
        angle: f64,
        duration: Duration,
    ) -> Result<(), ActuatorError> {
        info!(
            "[dry-run] {} -> {:.1}° over {} ms",
            channel,
            angle,
            duration.as_millis()
        );
        Ok(())
    }

    fn write_all(&mut self, pose: &ArmPose) -> Result<(), ActuatorError> {
        info!(
            "[dry-run] all servos -> {:?} over {} ms",
            pose.angles,
            pose.duration.as_millis()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_accepts_everything() {
        let mut actuator = DryRunActuator;
        assert!(
            actuator
                .write_servo(ServoChannel::Base, 90.0, Duration::from_millis(2000))
                .is_ok()
        );
        assert!(
            actuator
                .execute(&ServoCommand::All(ArmPose::new(
                    [90.0; 6],
                    Duration::from_millis(4000)
                )))
                .is_ok()
        );
    }

    #[test]
    fn test_boxed_actuator_delegates() {
        let mut actuator: Box<dyn ServoActuator> = Box::new(DryRunActuator);
        assert!(
            actuator
                .write_servo(ServoChannel::Gripper, 170.0, Duration::from_millis(2000))
                .is_ok()
        );
    }
}
