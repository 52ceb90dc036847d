//! 配置管理命令
//!
//! 配置文件查找顺序：`--config` 指定的路径，其次是
//! `<配置目录>/dofbot/arm.toml`，都不存在时使用内置默认值。

use crate::GlobalArgs;
use anyhow::{Context, Result};
use clap::Subcommand;
use dofbot_sdk::protocol::ArmSettings;
use dofbot_sdk::tools::{load_from_file, save_to_file, to_toml_string};
use std::path::PathBuf;
use tracing::debug;

/// 配置目录
fn config_dir() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;

    path.push("dofbot");
    Ok(path)
}

/// 配置文件路径
pub fn config_file(global: &GlobalArgs) -> Result<PathBuf> {
    if let Some(path) = &global.config {
        return Ok(path.clone());
    }

    let mut path = config_dir()?;
    path.push("arm.toml");
    Ok(path)
}

/// 加载机械臂设置
///
/// 显式给出 `--config` 时文件必须存在；默认路径不存在则使用内置默认值。
pub fn load_settings(global: &GlobalArgs) -> Result<ArmSettings> {
    let path = config_file(global)?;

    if global.config.is_none() && !path.exists() {
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(ArmSettings::default());
    }

    load_from_file(&path).with_context(|| format!("加载配置文件 {} 失败", path.display()))
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 写入默认配置文件
    Init {
        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },

    /// 显示当前生效的配置
    Show,

    /// 检查配置文件
    Check,
}

impl ConfigCommand {
    pub fn execute(self, global: &GlobalArgs) -> Result<()> {
        match self {
            ConfigCommand::Init { force } => Self::init_(global, force),

            ConfigCommand::Show => Self::show_(global),

            ConfigCommand::Check => Self::check_(global),
        }
    }

    fn init_(global: &GlobalArgs, force: bool) -> Result<()> {
        let path = config_file(global)?;

        if path.exists() && !force {
            anyhow::bail!("配置文件已存在: {}（使用 --force 覆盖）", path.display());
        }

        save_to_file(&ArmSettings::default(), &path).context("写入配置文件失败")?;
        println!("✅ 已写入默认配置: {}", path.display());
        Ok(())
    }

    fn show_(global: &GlobalArgs) -> Result<()> {
        let path = config_file(global)?;
        let settings = load_settings(global)?;

        if path.exists() {
            println!("# {}", path.display());
        } else {
            println!("# 内置默认值（{} 不存在）", path.display());
        }
        print!("{}", to_toml_string(&settings)?);
        Ok(())
    }

    fn check_(global: &GlobalArgs) -> Result<()> {
        let path = config_file(global)?;

        println!("检查配置: {}", path.display());
        if !path.exists() {
            anyhow::bail!("配置文件不存在: {}", path.display());
        }

        let settings = load_from_file(&path).context("配置无效")?;
        for envelope in settings.envelopes.iter() {
            println!(
                "  {}: [{:.1}°, {:.1}°] ≥ {} ms",
                envelope.channel,
                envelope.min_angle,
                envelope.max_angle,
                envelope.min_move_time.as_millis()
            );
        }
        println!("✅ 配置有效");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn global(config: Option<PathBuf>) -> GlobalArgs {
        GlobalArgs {
            config,
            dry_run: true,
            i2c_bus: crate::hardware::DEFAULT_I2C_BUS.to_string(),
        }
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = PathBuf::from("/tmp/custom-arm.toml");
        assert_eq!(config_file(&global(Some(path.clone()))).unwrap(), path);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let args = global(Some(dir.path().join("absent.toml")));
        assert!(load_settings(&args).is_err());
    }

    #[test]
    fn test_init_then_load() {
        let dir = TempDir::new().unwrap();
        let args = global(Some(dir.path().join("arm.toml")));

        ConfigCommand::Init { force: false }.execute(&args).unwrap();
        assert_eq!(load_settings(&args).unwrap(), ArmSettings::default());

        assert!(ConfigCommand::Init { force: false }.execute(&args).is_err());
        ConfigCommand::Init { force: true }.execute(&args).unwrap();
        ConfigCommand::Check.execute(&args).unwrap();
    }
}
