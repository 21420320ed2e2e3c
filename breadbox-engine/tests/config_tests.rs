use std::io::Write;

use breadbox_crypto::KdfParams;
use breadbox_engine::{EngineConfig, EngineError, PasswordConfig};
use pretty_assertions::assert_eq;

#[test]
fn defaults() {
    let config = EngineConfig::default();
    assert_eq!(config.default_disk, "public");
    assert_eq!(config.default_locale, "en");
    assert_eq!(config.max_menu_depth, 16);
    assert_eq!(config.timestamp_format, "%Y-%m-%d %H:%M:%S");
    assert_eq!(KdfParams::from(&config.password), KdfParams::default());
}

#[test]
fn empty_toml_is_the_default() {
    assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
}

#[test]
fn partial_toml_overrides_only_named_keys() {
    let config = EngineConfig::from_toml_str(
        r#"
        default_locale = "de"

        [password]
        time_cost = 3
        "#,
    )
    .unwrap();
    assert_eq!(config.default_locale, "de");
    assert_eq!(config.default_disk, "public");
    assert_eq!(
        config.password,
        PasswordConfig {
            time_cost: 3,
            ..PasswordConfig::default()
        }
    );
    assert_eq!(config.hasher().params().time_cost, 3);
}

#[test]
fn load_reads_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_menu_depth = 4").unwrap();
    let config = EngineConfig::load(file.path()).unwrap();
    assert_eq!(config.max_menu_depth, 4);
}

#[test]
fn invalid_toml_is_a_config_error() {
    let err = EngineConfig::from_toml_str("max_menu_depth = \"deep\"").unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));
}

#[test]
fn unrenderable_timestamp_format_is_rejected() {
    let err = EngineConfig::from_toml_str("timestamp_format = \"%Y-%Q\"").unwrap_err();
    assert!(matches!(err, EngineError::Configuration(ref msg) if msg.contains("timestamp_format")));

    let config = EngineConfig::from_toml_str("timestamp_format = \"%d.%m.%Y\"").unwrap();
    assert_eq!(config.timestamp_format, "%d.%m.%Y");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, EngineError::Io(_)));
}
