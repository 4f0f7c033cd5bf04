use super::*;

#[test]
fn defaults_are_sensible() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
    assert_eq!(settings.store.base_url, DEFAULT_STORE_URL);
    assert_eq!(
        settings.store.request_timeout,
        Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
    );
    assert_eq!(
        settings.draft.debounce,
        Duration::from_millis(DEFAULT_DRAFT_DEBOUNCE_MS)
    );
    assert!(settings.admin.removal_secret_hash.is_empty());
}

#[test]
fn unknown_log_level_is_rejected() {
    let raw = RawSettings {
        logging: RawLogging {
            level: Some("chatty".to_string()),
            format: None,
        },
        ..RawSettings::default()
    };
    assert!(matches!(
        Settings::from_raw(raw),
        Err(ConfigError::Invalid { .. })
    ));
}

#[test]
fn store_url_must_parse() {
    let raw = RawSettings {
        store: RawStore {
            base_url: Some("not a url".to_string()),
            ..RawStore::default()
        },
        ..RawSettings::default()
    };
    assert!(matches!(
        Settings::from_raw(raw),
        Err(ConfigError::Invalid { .. })
    ));
}

#[test]
fn zero_debounce_is_rejected() {
    let raw = RawSettings {
        draft: RawDraft {
            debounce_ms: Some(0),
            ..RawDraft::default()
        },
        ..RawSettings::default()
    };
    assert!(matches!(
        Settings::from_raw(raw),
        Err(ConfigError::Invalid { .. })
    ));
}

#[test]
fn removal_secret_hash_decodes_from_hex() {
    let raw = RawSettings {
        admin: RawAdmin {
            removal_secret_hash: Some("deadbeef".to_string()),
        },
        ..RawSettings::default()
    };
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.admin.removal_secret_hash, vec![0xde, 0xad, 0xbe, 0xef]);
}

#[test]
fn malformed_removal_secret_hash_is_rejected() {
    let raw = RawSettings {
        admin: RawAdmin {
            removal_secret_hash: Some("not-hex".to_string()),
        },
    ..RawSettings::default()
    };
    assert!(matches!(
        Settings::from_raw(raw),
        Err(ConfigError::Invalid { .. })
    ));
}

#[test]
fn explicit_config_file_is_honored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("engine.toml");
    std::fs::write(
        &path,
        r#"
[store]
base_url = "https://store.example.com/rest/v1/"
api_key = "service-key"

[draft]
debounce_ms = 250

[logging]
level = "debug"
format = "json"
"#,
    )
    .expect("write config");

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.store.base_url, "https://store.example.com/rest/v1/");
    assert_eq!(settings.store.api_key, "service-key");
    assert_eq!(settings.draft.debounce, Duration::from_millis(250));
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert!(matches!(settings.logging.format, LogFormat::Json));
}
