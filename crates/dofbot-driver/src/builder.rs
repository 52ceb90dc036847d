//! Builder 模式实现
//!
//! 提供链式构造 `ArmController` 实例的便捷方式。

use crate::actuator::ServoActuator;
use crate::approach::{ApproachStrategy, NoApproach};
use crate::controller::ArmController;
use crate::error::ArmError;
use crate::link::ActuatorLink;
use crate::wait::{MotionWait, SpinWait};
use dofbot_protocol::ArmSettings;
use tracing::{info, warn};

/// ArmController Builder（链式构造）
///
/// # Example
///
/// ```no_run
/// use dofbot_driver::{ArmControllerBuilder, DryRunActuator};
/// use dofbot_protocol::ArmSettings;
///
/// let arm = ArmControllerBuilder::new()
///     .settings(ArmSettings::default())
///     .build(DryRunActuator)
///     .unwrap();
/// ```
pub struct ArmControllerBuilder {
    settings: ArmSettings,
    /// 运动完成等待（默认 `SpinWait`）
    wait: Option<Box<dyn MotionWait>>,
    /// 接近姿态策略（默认 `NoApproach`）
    approach: Option<Box<dyn ApproachStrategy>>,
}

impl ArmControllerBuilder {
    /// 创建新的 Builder（默认设置）
    pub fn new() -> Self {
        Self {
            settings: ArmSettings::default(),
            wait: None,
            approach: None,
        }
    }

    /// 设置包络、棋子角度和时序
    pub fn settings(mut self, settings: ArmSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 替换运动完成等待策略（测试中用 `RecordedWait` 跳过真实等待）
    pub fn motion_wait(mut self, wait: impl MotionWait + 'static) -> Self {
        self.wait = Some(Box::new(wait));
        self
    }

    /// 设置抓取前的接近姿态策略
    pub fn approach(mut self, approach: impl ApproachStrategy + 'static) -> Self {
        self.approach = Some(Box::new(approach));
        self
    }

    /// 构建控制器
    ///
    /// 校验设置，启动执行器线程，然后执行一次复位。
    /// 复位失败只记录警告，控制器仍然返回（机械臂位置未知）。
    ///
    /// # Errors
    /// - `ArmError::InvalidSettings`: 设置不自洽
    /// - `ArmError::WorkerSpawn`: 执行器线程启动失败
    pub fn build<A>(self, actuator: A) -> Result<ArmController, ArmError>
    where
        A: ServoActuator + 'static,
    {
        self.settings.validate()?;

        let link = ActuatorLink::spawn(actuator, self.settings.timing.ack_timeout)?;
        let wait = self.wait.unwrap_or_else(|| Box::new(SpinWait));
        let approach = self.approach.unwrap_or_else(|| Box::new(NoApproach));

        let mut controller = ArmController::new(self.settings, link, wait, approach);

        info!("Arm controller started, resetting to board view");
        if let Err(e) = controller.reset_position() {
            warn!("Initial reset failed, arm position unknown: {}", e);
        }

        Ok(controller)
    }
}

impl Default for ArmControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
