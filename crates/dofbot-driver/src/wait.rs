//! 运动完成等待
//!
//! 执行器没有"运动完成"的反馈，控制器在命令下发后阻塞
//! `运动时间 + 稳定时间`，调用返回时即可认为物理运动已结束。

use std::time::Duration;

/// 运动完成等待策略
pub trait MotionWait: Send {
    /// 阻塞当前线程指定时长
    fn wait(&mut self, duration: Duration);
}

/// 使用 `spin_sleep` 的高精度等待（默认）
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinWait;

impl MotionWait for SpinWait {
    fn wait(&mut self, duration: Duration) {
        spin_sleep::sleep(duration);
    }
}
