//! I2C 舵机驱动板执行器
//!
//! 通过任意实现了 `embedded_hal::i2c::I2c` 的总线写入寄存器帧，
//! 在 Linux 上通常是 `linux_embedded_hal::I2cdev`（`/dev/i2c-1`）。

use crate::actuator::ServoActuator;
use crate::error::ActuatorError;
use dofbot_protocol::register::{
    DEFAULT_I2C_ADDRESS, encode_servo_write, encode_servo_write_all, within_travel,
};
use dofbot_protocol::{ArmPose, ServoChannel};
use embedded_hal::i2c::I2c;
use std::time::Duration;
use tracing::{trace, warn};

/// I2C 执行器
pub struct I2cActuator<B> {
    bus: B,
    address: u8,
}

impl<B: I2c> I2cActuator<B> {
    /// 使用默认地址 `0x15`
    pub fn new(bus: B) -> Self {
        Self::with_address(bus, DEFAULT_I2C_ADDRESS)
    }

    pub fn with_address(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    /// 取回底层总线
    pub fn into_inner(self) -> B {
        self.bus
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<(), ActuatorError> {
        trace!(address = self.address, ?frame, "I2C write");
        self.bus
            .write(self.address, frame)
            .map_err(|e| ActuatorError::Bus(format!("{:?}", e)))
    }
}

impl<B: I2c + Send> ServoActuator for I2cActuator<B> {
    fn write_servo(
        &mut self,
        channel: ServoChannel,
        angle: f64,
        duration: Duration,
    ) -> Result<(), ActuatorError> {
        warn_if_clamped(channel, angle);
        let frame = encode_servo_write(channel, angle, duration);
        self.write_frame(&frame)
    }

    fn write_all(&mut self, pose: &ArmPose) -> Result<(), ActuatorError> {
        for channel in ServoChannel::ALL {
            warn_if_clamped(channel, pose.angle(channel));
        }
        let frame = encode_servo_write_all(pose);
        self.write_frame(&frame)
    }
}

fn warn_if_clamped(channel: ServoChannel, angle: f64) {
    if !within_travel(channel, angle) {
        warn!(%channel, angle, "Angle beyond servo travel, clamped to the pulse limit");
    }
}
