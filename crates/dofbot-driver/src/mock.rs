//! Mock 执行器与运动等待
//!
//! 用于在没有硬件的情况下测试控制器：记录所有下发的命令和等待时间，
//! 并可以模拟写入失败或执行器卡住。

use crate::actuator::ServoActuator;
use crate::error::ActuatorError;
use crate::wait::MotionWait;
use dofbot_protocol::{ArmPose, ServoChannel, ServoCommand};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct MockState {
    commands: Vec<ServoCommand>,
    failure: Option<ActuatorError>,
    latency: Duration,
}

/// 记录命令的 Mock 执行器
///
/// 克隆体共享同一份记录，测试可以把一个克隆交给控制器，另一个留作断言。
#[derive(Debug, Clone, Default)]
pub struct MockActuator {
    state: Arc<Mutex<MockState>>,
}

impl MockActuator {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 已接收的命令（按顺序）
    pub fn commands(&self) -> Vec<ServoCommand> {
        self.state().commands.clone()
    }

    /// 已接收的命令数量
    pub fn command_count(&self) -> usize {
        self.state().commands.len()
    }

    /// 清空命令记录
    pub fn clear(&self) {
        self.state().commands.clear();
    }

    /// 之后的所有写入都返回指定错误（`None` 恢复正常）
    pub fn set_failure(&self, failure: Option<ActuatorError>) {
        self.state().failure = failure;
    }

    /// 模拟写入延迟（用于测试确认超时）
    pub fn set_latency(&self, latency: Duration) {
        self.state().latency = latency;
    }

    /// 最近一条命令后各通道的角度
    pub fn last_angles(&self) -> [Option<f64>; 6] {
        let mut angles = [None; 6];
        for command in &self.state().commands {
            match command {
                ServoCommand::Single { channel, angle, .. } => {
                    angles[channel.index()] = Some(*angle);
                },
                ServoCommand::All(pose) => {
                    for (slot, angle) in angles.iter_mut().zip(pose.angles) {
                        *slot = Some(angle);
                    }
                },
            }
        }
        angles
    }

    fn record(&mut self, command: ServoCommand) -> Result<(), ActuatorError> {
        let latency = self.state().latency;
        if !latency.is_zero() {
            std::thread::sleep(latency);
        }

        let mut state = self.state();
        if let Some(failure) = state.failure.clone() {
            return Err(failure);
        }
        state.commands.push(command);
        Ok(())
    }
}

impl ServoActuator for MockActuator {
    fn write_servo(
        &mut self,
        channel: ServoChannel,
        angle: f64,
        duration: Duration,
    ) -> Result<(), ActuatorError> {
        self.record(ServoCommand::Single {
            channel,
            angle,
            duration,
        })
    }

    fn write_all(&mut self, pose: &ArmPose) -> Result<(), ActuatorError> {
        self.record(ServoCommand::All(*pose))
    }
}

/// 只记录、不真正等待的运动等待
#[derive(Debug, Clone, Default)]
pub struct RecordedWait {
    waits: Arc<Mutex<Vec<Duration>>>,
}

impl RecordedWait {
    pub fn new() -> Self {
        Self::default()
    }

    /// 每次等待的时长
    pub fn waits(&self) -> Vec<Duration> {
        self.waits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 等待总时长
    pub fn total(&self) -> Duration {
        self.waits().iter().sum()
    }

    pub fn clear(&self) {
        self.waits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl MotionWait for RecordedWait {
    fn wait(&mut self, duration: Duration) {
        self.waits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_commands() {
        let mock = MockActuator::new();
        let mut handle = mock.clone();

        handle
            .write_servo(ServoChannel::Gripper, 170.0, Duration::from_millis(2000))
            .unwrap();
        handle
            .write_all(&ArmPose::new([90.0; 6], Duration::from_millis(4000)))
            .unwrap();

        assert_eq!(mock.command_count(), 2);
        assert_eq!(mock.last_angles(), [Some(90.0); 6]);

        mock.clear();
        assert_eq!(mock.command_count(), 0);
    }

    #[test]
    fn test_mock_failure() {
        let mock = MockActuator::new();
        mock.set_failure(Some(ActuatorError::Disconnected));

        let mut handle = mock.clone();
        let result = handle.write_servo(ServoChannel::Base, 90.0, Duration::from_millis(2000));
        assert_eq!(result, Err(ActuatorError::Disconnected));
        assert_eq!(mock.command_count(), 0);
    }

    #[test]
    fn test_recorded_wait() {
        let wait = RecordedWait::new();
        let mut handle = wait.clone();
        handle.wait(Duration::from_millis(100));
        handle.wait(Duration::from_millis(200));

        assert_eq!(wait.waits().len(), 2);
        assert_eq!(wait.total(), Duration::from_millis(300));
    }
}
