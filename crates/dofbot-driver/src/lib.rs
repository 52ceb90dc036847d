//! 驱动层模块
//!
//! 本模块提供 Dofbot 机械臂的运动控制功能，包括：
//! - 安全包络校验（通道、角度、最短运动时间）
//! - 执行器线程与有界确认等待
//! - 复位与抓取棋子等运动宏
//! - I2C / 空跑 / Mock 执行器
//!
//! # Example
//!
//! ```no_run
//! use dofbot_driver::{ArmControllerBuilder, DryRunActuator};
//! use std::time::Duration;
//!
//! let mut arm = ArmControllerBuilder::new().build(DryRunActuator)?;
//! arm.move_single_servo(6, 170.0, Duration::from_millis(2000))?;
//! arm.pick_up_piece("K", Some(&[0.0, 1.0, 0.0, 0.0]))?;
//! # Ok::<(), dofbot_driver::ArmError>(())
//! ```

mod actuator;
pub mod approach;
mod builder;
mod controller;
mod error;
pub mod i2c;
mod link;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod wait;

pub use actuator::{DryRunActuator, ServoActuator};
pub use approach::{ApproachStrategy, NoApproach, PieceTarget, PoseTableApproach};
pub use builder::ArmControllerBuilder;
pub use controller::{ArmController, COORDINATE_COMPONENTS};
pub use error::{ActuatorError, ArmError};
pub use i2c::I2cActuator;
pub use wait::{MotionWait, SpinWait};
