//! 配置文件读写测试

use dofbot_protocol::{ArmSettings, PieceKind, ProtocolError, ServoChannel};
use dofbot_tools::{ConfigError, from_toml_str, load_from_file, save_to_file, to_toml_string};
use std::time::Duration;
use tempfile::TempDir;

/// 完整配置（除 timing 外）
fn config_text(envelopes: &str, pieces: &str) -> String {
    format!(
        r#"
[pickup]
clearance_deg = 20.0
inverted_rotation_deg = 270.0
default_closed_deg = 170.0

[poses]
neutral = [90.0, 90.0, 90.0, 90.0, 90.0, 90.0]
board_view = [90.0, 130.0, 0.0, 0.0, 90.0, 90.0]

{envelopes}

{pieces}
"#
    )
}

const ENVELOPES: &str = r#"
[envelopes."1"]
min_deg = 0.0
max_deg = 180.0
min_move_time_ms = 2000

[envelopes."2"]
min_deg = 0.0
max_deg = 180.0
min_move_time_ms = 2000

[envelopes."3"]
min_deg = 0.0
max_deg = 180.0
min_move_time_ms = 2000

[envelopes."4"]
min_deg = 0.0
max_deg = 180.0
min_move_time_ms = 2000

[envelopes."5"]
min_deg = 0.0
max_deg = 270.0
min_move_time_ms = 2000

[envelopes."6"]
min_deg = 0.0
max_deg = 200.0
min_move_time_ms = 2000
"#;

const PIECES: &str = r#"
[pieces]
R = 176.0
B = 170.0
KN = 170.0
Q = 170.0
K = 170.0
"#;

#[test]
fn test_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("arm.toml");

    let settings = ArmSettings {
        pieces: ArmSettings::default().pieces.with_angle(PieceKind::Queen, 165.0),
        ..ArmSettings::default()
    };
    save_to_file(&settings, &path).unwrap();
    assert!(path.exists());

    let loaded = load_from_file(&path).unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.pieces.angle(PieceKind::Queen), 165.0);
}

#[test]
fn test_handwritten_file_matches_defaults() {
    let settings = from_toml_str(&config_text(ENVELOPES, PIECES)).unwrap();
    assert_eq!(settings, ArmSettings::default());
}

#[test]
fn test_missing_timing_uses_defaults() {
    let settings = from_toml_str(&config_text(ENVELOPES, PIECES)).unwrap();
    assert_eq!(settings.timing.all_servo_min, Duration::from_millis(4000));
    assert_eq!(settings.timing.settle, Duration::from_millis(200));
}

#[test]
fn test_custom_envelope() {
    let envelopes = ENVELOPES.replacen(
        "[envelopes.\"1\"]\nmin_deg = 0.0\nmax_deg = 180.0",
        "[envelopes.\"1\"]\nmin_deg = 30.0\nmax_deg = 150.0",
        1,
    );
    let settings = from_toml_str(&config_text(&envelopes, PIECES)).unwrap();

    let base = settings.envelopes.get(ServoChannel::Base);
    assert_eq!((base.min_angle, base.max_angle), (30.0, 150.0));
    // 中立与俯视姿态的 S1 都是 90°，仍在新包络内
    assert!(settings.validate().is_ok());
}

#[test]
fn test_missing_channel_rejected() {
    let envelopes = ENVELOPES
        .split("\n\n")
        .filter(|section| !section.contains("\"6\""))
        .collect::<Vec<_>>()
        .join("\n\n");

    let result = from_toml_str(&config_text(&envelopes, PIECES));
    assert!(matches!(
        result,
        Err(ConfigError::Invalid(ProtocolError::MissingChannel { id: 6 }))
    ));
}

#[test]
fn test_unknown_channel_rejected() {
    let envelopes = ENVELOPES.replace("\"6\"", "\"7\"");
    let result = from_toml_str(&config_text(&envelopes, PIECES));
    assert!(matches!(result, Err(ConfigError::UnknownChannel(key)) if key == "7"));
}

#[test]
fn test_inverted_range_rejected() {
    let envelopes = ENVELOPES.replacen("max_deg = 180.0", "max_deg = -10.0", 1);
    let result = from_toml_str(&config_text(&envelopes, PIECES));
    assert!(matches!(
        result,
        Err(ConfigError::Invalid(ProtocolError::InvalidSetting { .. }))
    ));
}

#[test]
fn test_piece_keys_checked() {
    let unknown = PIECES.replace("KN = 170.0", "KN = 170.0\nP = 170.0");
    let result = from_toml_str(&config_text(ENVELOPES, &unknown));
    assert!(matches!(result, Err(ConfigError::UnknownPiece(key)) if key == "P"));

    let missing = PIECES.replace("Q = 170.0\n", "");
    let result = from_toml_str(&config_text(ENVELOPES, &missing));
    assert!(matches!(result, Err(ConfigError::MissingPiece("Q"))));
}

#[test]
fn test_duplicate_key_rejected() {
    let duplicated = PIECES.replace("K = 170.0", "K = 170.0\nK = 171.0");
    let result = from_toml_str(&config_text(ENVELOPES, &duplicated));
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_unknown_field_rejected() {
    let text = config_text(ENVELOPES, PIECES).replace(
        "clearance_deg = 20.0",
        "clearance_deg = 20.0\nspeed = 3.0",
    );
    assert!(matches!(from_toml_str(&text), Err(ConfigError::Parse(_))));
}

#[test]
fn test_malformed_pose_rejected() {
    let text = config_text(ENVELOPES, PIECES).replace(
        "neutral = [90.0, 90.0, 90.0, 90.0, 90.0, 90.0]",
        "neutral = [90.0, 90.0, 90.0]",
    );
    assert!(matches!(
        from_toml_str(&text),
        Err(ConfigError::MalformedPose {
            field: "poses.neutral",
            len: 3
        })
    ));
}

#[test]
fn test_gripper_clearance_must_fit() {
    // R 闭合 176 + 余量 30 = 206 超出 S6 包络
    let text = config_text(ENVELOPES, PIECES).replace("clearance_deg = 20.0", "clearance_deg = 30.0");
    assert!(matches!(
        from_toml_str(&text),
        Err(ConfigError::Invalid(ProtocolError::InvalidSetting { .. }))
    ));
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = load_from_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_serialized_text_is_readable() {
    let text = to_toml_string(&ArmSettings::default()).unwrap();
    for needle in ["[timing]", "pose_step_ms = 4000", "[pickup]", "[poses]", "[pieces]"] {
        assert!(text.contains(needle), "missing {:?} in\n{}", needle, text);
    }
}
