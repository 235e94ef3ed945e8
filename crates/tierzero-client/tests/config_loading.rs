use std::collections::HashMap;
use std::fs;

use tierzero_client::config::DEFAULT_BASE_URL;
use tierzero_client::{ConfigError, load_config_with_env};

fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
    Some(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

#[test]
fn config_file_env_overrides_and_validation() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("tierzero.toml");

    fs::write(
        &path,
        r#"
api_key = "file-key"
base_url = "https://staging.tierzero.com"
timeout_secs = 15
"#,
    )
    .expect("write toml");

    // 1) File values are used when the environment is silent
    let cfg = load_config_with_env(Some(&path), env(&[])).expect("should parse config");
    assert_eq!(cfg.api_key, "file-key");
    assert_eq!(cfg.base_url, "https://staging.tierzero.com");
    assert_eq!(cfg.timeout_secs, Some(15));

    // 2) Environment wins over the file
    let cfg = load_config_with_env(
        Some(&path),
        env(&[
            ("TIERZERO_API_KEY", "env-key"),
            ("TIERZERO_TIMEOUT_SECS", "45"),
        ]),
    )
    .expect("should parse config with env overrides");
    assert_eq!(cfg.api_key, "env-key");
    assert_eq!(cfg.base_url, "https://staging.tierzero.com");
    assert_eq!(cfg.timeout_secs, Some(45));

    // 3) Invalid base URL fails validation
    let err = load_config_with_env(Some(&path), env(&[("TIERZERO_BASE_URL", "nope")]))
        .expect_err("expected validation error");
    assert!(matches!(err, ConfigError::Validation(_)), "{err}");
}

#[test]
fn missing_file_falls_back_to_env_and_defaults() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("absent.toml");

    let cfg = load_config_with_env(Some(&path), env(&[("TIERZERO_API_KEY", "env-key")]))
        .expect("env-only config");
    assert_eq!(cfg.api_key, "env-key");
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.timeout_secs, None);
}

#[test]
fn missing_api_key_is_rejected() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("absent.toml");

    let err = load_config_with_env(Some(&path), env(&[])).expect_err("api key required");
    assert!(err.to_string().contains("api_key is required"), "{err}");
}
