use super::{apply_env_overrides, load_settings, parse_settings, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

#[test]
fn partial_file_keeps_defaults_for_missing_keys() {
    let settings = parse_settings("server_url = \"http://assess.internal:8080\"\n").expect("parse");

    assert_eq!(settings.server_url, "http://assess.internal:8080");
    assert_eq!(settings.request_timeout_secs, 30);
    assert_eq!(settings.notification_ttl(), Duration::from_millis(3000));
}

#[test]
fn rejects_wrongly_typed_values() {
    assert!(parse_settings("quota_interval_secs = \"often\"\n").is_err());
}

#[test]
fn env_overrides_win_and_bad_numbers_are_ignored() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("ASSESSOR_SERVER_URL", "http://first:1"),
        ("APP__SERVER_URL", "http://second:2"),
        ("ASSESSOR_TIMEOUT_SECS", "5"),
        ("ASSESSOR_QUOTA_INTERVAL_SECS", "soon"),
    ]);

    let settings = apply_env_overrides(Settings::default(), |key| {
        env.get(key).map(|v| v.to_string())
    });

    assert_eq!(settings.server_url, "http://second:2");
    assert_eq!(settings.request_timeout(), Duration::from_secs(5));
    assert_eq!(settings.quota_interval_secs, 60);
}

#[test]
fn zero_intervals_are_clamped() {
    let settings = Settings {
        request_timeout_secs: 0,
        quota_interval_secs: 0,
        ..Settings::default()
    };
    assert_eq!(settings.request_timeout(), Duration::from_secs(1));
    assert_eq!(settings.quota_interval(), Duration::from_secs(1));
}

#[test]
fn explicit_config_file_is_loaded() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("assessor_config_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("custom.toml");
    fs::write(&path, "notification_ttl_ms = 1500\n").expect("write config");

    let settings = load_settings(Some(&path)).expect("load");
    assert_eq!(settings.notification_ttl(), Duration::from_millis(1500));

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn missing_explicit_config_file_is_an_error() {
    let err = load_settings(Some(std::path::Path::new("/nonexistent/assessor.toml")))
        .expect_err("must fail");
    assert!(err.to_string().contains("failed to read config file"));
}
