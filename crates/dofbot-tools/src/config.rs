//! # 机械臂配置文件
//!
//! TOML 格式，键名与 6 个舵机通道编号、5 种棋子标签一一对应：
//!
//! ```toml
//! [timing]
//! all_servo_min_ms = 4000
//! settle_ms = 200
//! ack_timeout_ms = 1000
//! macro_step_ms = 2000
//! pose_step_ms = 4000
//!
//! [pickup]
//! clearance_deg = 20.0
//! inverted_rotation_deg = 270.0
//! default_closed_deg = 170.0
//!
//! [poses]
//! neutral = [90.0, 90.0, 90.0, 90.0, 90.0, 90.0]
//! board_view = [90.0, 130.0, 0.0, 0.0, 90.0, 90.0]
//!
//! [envelopes.1]
//! min_deg = 0.0
//! max_deg = 180.0
//! min_move_time_ms = 2000
//! # ... 2 到 6
//!
//! [pieces]
//! R = 176.0
//! B = 170.0
//! KN = 170.0
//! Q = 170.0
//! K = 170.0
//! ```
//!
//! `timing`、`pickup`、`poses` 可以省略（使用内置默认值）；
//! `envelopes` 与 `pieces` 必须完整给出。

use crate::ConfigError;
use dofbot_protocol::{
    ArmSettings, EnvelopeTable, MotionTiming, PieceAngleTable, PieceKind, PickupProfile,
    SERVO_COUNT, ServoChannel, ServoEnvelope,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// 配置文件结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArmConfigFile {
    #[serde(default)]
    pub timing: TimingSection,

    #[serde(default)]
    pub pickup: PickupSection,

    #[serde(default)]
    pub poses: PosesSection,

    /// 键为通道编号 "1".."6"
    pub envelopes: BTreeMap<String, EnvelopeSection>,

    /// 键为棋子标签 R / B / KN / Q / K
    pub pieces: BTreeMap<String, f64>,
}

/// `[timing]`（毫秒）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimingSection {
    pub all_servo_min_ms: u64,
    pub settle_ms: u64,
    pub ack_timeout_ms: u64,
    pub macro_step_ms: u64,
    pub pose_step_ms: u64,
}

impl Default for TimingSection {
    fn default() -> Self {
        Self::from(&MotionTiming::default())
    }
}

impl From<&MotionTiming> for TimingSection {
    fn from(timing: &MotionTiming) -> Self {
        Self {
            all_servo_min_ms: millis(timing.all_servo_min),
            settle_ms: millis(timing.settle),
            ack_timeout_ms: millis(timing.ack_timeout),
            macro_step_ms: millis(timing.macro_step),
            pose_step_ms: millis(timing.pose_step),
        }
    }
}

impl From<&TimingSection> for MotionTiming {
    fn from(section: &TimingSection) -> Self {
        Self {
            all_servo_min: Duration::from_millis(section.all_servo_min_ms),
            settle: Duration::from_millis(section.settle_ms),
            ack_timeout: Duration::from_millis(section.ack_timeout_ms),
            macro_step: Duration::from_millis(section.macro_step_ms),
            pose_step: Duration::from_millis(section.pose_step_ms),
        }
    }
}

/// `[pickup]`（度）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PickupSection {
    pub clearance_deg: f64,
    pub inverted_rotation_deg: f64,
    /// 无法识别的棋子使用的闭合角度
    pub default_closed_deg: f64,
}

impl Default for PickupSection {
    fn default() -> Self {
        let settings = ArmSettings::default();
        Self {
            clearance_deg: settings.pickup.clearance,
            inverted_rotation_deg: settings.pickup.inverted_rotation,
            default_closed_deg: settings.pieces.default_angle(),
        }
    }
}

/// `[poses]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PosesSection {
    pub neutral: Vec<f64>,
    pub board_view: Vec<f64>,
}

impl Default for PosesSection {
    fn default() -> Self {
        let settings = ArmSettings::default();
        Self {
            neutral: settings.neutral_pose.to_vec(),
            board_view: settings.view_pose.to_vec(),
        }
    }
}

/// `[envelopes.N]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvelopeSection {
    pub min_deg: f64,
    pub max_deg: f64,
    pub min_move_time_ms: u64,
}

impl ArmConfigFile {
    /// 从运行期设置生成配置文件结构
    pub fn from_settings(settings: &ArmSettings) -> Self {
        let envelopes = settings
            .envelopes
            .iter()
            .map(|e| {
                (
                    e.channel.id().to_string(),
                    EnvelopeSection {
                        min_deg: e.min_angle,
                        max_deg: e.max_angle,
                        min_move_time_ms: millis(e.min_move_time),
                    },
                )
            })
            .collect();

        let pieces = PieceKind::ALL
            .iter()
            .map(|kind| (kind.label().to_string(), settings.pieces.angle(*kind)))
            .collect();

        Self {
            timing: TimingSection::from(&settings.timing),
            pickup: PickupSection {
                clearance_deg: settings.pickup.clearance,
                inverted_rotation_deg: settings.pickup.inverted_rotation,
                default_closed_deg: settings.pieces.default_angle(),
            },
            poses: PosesSection {
                neutral: settings.neutral_pose.to_vec(),
                board_view: settings.view_pose.to_vec(),
            },
            envelopes,
            pieces,
        }
    }

    /// 转换为运行期设置并检查一致性
    pub fn into_settings(self) -> Result<ArmSettings, ConfigError> {
        let mut envelopes = Vec::with_capacity(SERVO_COUNT);
        for (key, section) in &self.envelopes {
            let channel = key
                .parse::<u8>()
                .ok()
                .and_then(|id| ServoChannel::from_id(id).ok())
                .ok_or_else(|| ConfigError::UnknownChannel(key.clone()))?;
            envelopes.push(
                ServoEnvelope::new(channel, section.min_deg, section.max_deg)
                    .with_min_move_time(Duration::from_millis(section.min_move_time_ms)),
            );
        }
        let envelopes = EnvelopeTable::from_envelopes(envelopes)?;

        for key in self.pieces.keys() {
            key.parse::<PieceKind>()
                .map_err(|_| ConfigError::UnknownPiece(key.clone()))?;
        }
        let mut pieces = PieceAngleTable::uniform(self.pickup.default_closed_deg);
        for kind in PieceKind::ALL {
            let angle = self
                .pieces
                .get(kind.label())
                .ok_or(ConfigError::MissingPiece(kind.label()))?;
            pieces = pieces.with_angle(kind, *angle);
        }

        let settings = ArmSettings {
            envelopes,
            pieces,
            timing: MotionTiming::from(&self.timing),
            pickup: PickupProfile {
                clearance: self.pickup.clearance_deg,
                inverted_rotation: self.pickup.inverted_rotation_deg,
            },
            neutral_pose: pose("poses.neutral", &self.poses.neutral)?,
            view_pose: pose("poses.board_view", &self.poses.board_view)?,
        };

        settings.validate()?;
        Ok(settings)
    }
}

/// 解析 TOML 文本
pub fn from_toml_str(content: &str) -> Result<ArmSettings, ConfigError> {
    let file: ArmConfigFile = toml::from_str(content)?;
    file.into_settings()
}

/// 序列化为 TOML 文本
pub fn to_toml_string(settings: &ArmSettings) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(&ArmConfigFile::from_settings(
        settings,
    ))?)
}

/// 从文件加载配置
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<ArmSettings, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let settings = from_toml_str(&content)?;
    info!(path = %path.display(), "Loaded arm configuration");
    Ok(settings)
}

/// 保存配置到文件（自动创建父目录）
pub fn save_to_file<P: AsRef<Path>>(settings: &ArmSettings, path: P) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let content = to_toml_string(settings)?;

    let io_error = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, content).map_err(io_error)?;

    debug!(path = %path.display(), "Saved arm configuration");
    Ok(())
}

fn pose(field: &'static str, angles: &[f64]) -> Result<[f64; SERVO_COUNT], ConfigError> {
    angles.try_into().map_err(|_| ConfigError::MalformedPose {
        field,
        len: angles.len(),
    })
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
