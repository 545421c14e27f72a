// tests/config_tests.rs

use std::collections::HashMap;

use cerebro::{
    config::{Config, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL},
    error::ConfigError,
};

fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_apply_when_only_key_is_set() {
    let config = load(&[("GEMINI_API_KEY", "secret")]).unwrap();

    assert_eq!(config.gemini_api_key, "secret");
    assert_eq!(config.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
    assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
    assert_eq!(config.generation_timeout_secs, 60);
    assert_eq!(config.session_ttl_minutes, 120);
    assert_eq!(config.port, 3000);
    assert_eq!(config.rust_log, "info");
}

#[test]
fn missing_api_key_is_fatal() {
    let err = load(&[]).unwrap_err();
    assert!(matches!(err, ConfigError::Missing("GEMINI_API_KEY")));

    let err = load(&[("GEMINI_API_KEY", "   ")]).unwrap_err();
    assert!(matches!(err, ConfigError::Missing("GEMINI_API_KEY")));
    assert_eq!(err.to_string(), "GEMINI_API_KEY must be set");
}

#[test]
fn overrides_are_read() {
    let config = load(&[
        ("GEMINI_API_KEY", "secret"),
        ("GEMINI_BASE_URL", "http://localhost:8080/v1"),
        ("GEMINI_MODEL", "gemini-2.0-flash"),
        ("GENERATION_TIMEOUT_SECS", "15"),
        ("SESSION_TTL_MINUTES", "5"),
        ("PORT", "8081"),
        ("RUST_LOG", "debug"),
    ])
    .unwrap();

    assert_eq!(config.gemini_base_url, "http://localhost:8080/v1");
    assert_eq!(config.gemini_model, "gemini-2.0-flash");
    assert_eq!(config.generation_timeout_secs, 15);
    assert_eq!(config.session_ttl_minutes, 5);
    assert_eq!(config.port, 8081);
    assert_eq!(config.rust_log, "debug");
}

#[test]
fn invalid_values_are_rejected() {
    let cases = [
        ("GEMINI_BASE_URL", "not a url"),
        ("GENERATION_TIMEOUT_SECS", "0"),
        ("GENERATION_TIMEOUT_SECS", "soon"),
        ("SESSION_TTL_MINUTES", "-1"),
        ("PORT", "70000"),
    ];

    for (key, value) in cases {
        let err = load(&[("GEMINI_API_KEY", "secret"), (key, value)]).unwrap_err();
        match err {
            ConfigError::Invalid { key: k, .. } => assert_eq!(k, key),
            other => panic!("expected Invalid for {}={}, got {:?}", key, value, other),
        }
    }
}
