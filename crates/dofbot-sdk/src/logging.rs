//! 日志初始化

use tracing_subscriber::EnvFilter;

/// 安装全局 `tracing` 订阅者
///
/// `RUST_LOG` 优先于 `default_directive`（如 `"info"`、`"dofbot_cli=info"`）。
/// `log` crate 的记录通过 `LogTracer` 转发到 `tracing`。
///
/// 重复调用无副作用；返回本次是否完成安装。
pub fn init_logging(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return false;
    }

    // 订阅者已安装后再桥接 log 记录
    let _ = tracing_log::LogTracer::init();
    true
}
