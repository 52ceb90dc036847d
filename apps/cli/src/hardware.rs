//! 机械臂连接
//!
//! `--dry-run` 使用只记录日志的执行器；否则打开 I2C 总线驱动舵机板。

use crate::GlobalArgs;
use anyhow::{Context, Result};
use dofbot_sdk::driver::{ArmController, ArmControllerBuilder, DryRunActuator};
use dofbot_sdk::protocol::ArmSettings;

/// 默认 I2C 总线设备（树莓派 / Jetson Nano 的 40 针排座）
pub const DEFAULT_I2C_BUS: &str = "/dev/i2c-1";

/// 连接机械臂并完成初始复位
pub fn connect(global: &GlobalArgs, settings: ArmSettings) -> Result<ArmController> {
    let builder = ArmControllerBuilder::new().settings(settings);

    if global.dry_run {
        println!("🔌 演练模式（不连接硬件）");
        return builder.build(DryRunActuator).context("初始化机械臂失败");
    }

    println!("🔌 连接到舵机板 {} ...", global.i2c_bus);
    open_bus(builder, &global.i2c_bus)
}

#[cfg(target_os = "linux")]
fn open_bus(builder: ArmControllerBuilder, path: &str) -> Result<ArmController> {
    use dofbot_sdk::driver::I2cActuator;

    let bus = linux_embedded_hal::I2cdev::new(path)
        .with_context(|| format!("打开 I2C 总线 {} 失败", path))?;
    builder
        .build(I2cActuator::new(bus))
        .context("初始化机械臂失败")
}

#[cfg(not(target_os = "linux"))]
fn open_bus(_builder: ArmControllerBuilder, path: &str) -> Result<ArmController> {
    anyhow::bail!("当前平台不支持 I2C 总线 {}，请使用 --dry-run", path)
}
