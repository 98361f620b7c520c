//! Damaged, partial and legacy config files

use lexiread_config::{Config, ConfigError, ConfigManager, CONFIG_VERSION};
use std::fs;
use std::error::Error;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

fn temp_manager() -> Result<(TempDir, ConfigManager), Box<dyn Error>> {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(dir.path().to_path_buf())?;
    Ok((dir, manager))
}

#[test]
fn test_unparseable_file_falls_back() -> TestResult {
    let (_dir, manager) = temp_manager()?;
    fs::write(manager.config_path(), "font = {{ broken")?;

    assert!(matches!(manager.load(), Err(ConfigError::ParseError { .. })));
    assert_eq!(manager.load_or_default(), Config::default());
    Ok(())
}

#[test]
fn test_nested_config_dir_is_created() -> TestResult {
    let dir = TempDir::new()?;
    let nested = dir.path().join("a").join("b").join("c");
    let manager = ConfigManager::with_directory(nested.clone())?;

    manager.save(&Config::default())?;
    assert!(nested.join("config.toml").exists());
    Ok(())
}

#[test]
fn test_wrong_type_is_parse_error() -> TestResult {
    let (_dir, manager) = temp_manager()?;
    fs::write(
        manager.config_path(),
        "[reader]\ndefault_font_size = \"large\"\n",
    )?;

    assert!(matches!(manager.load(), Err(ConfigError::ParseError { .. })));
    Ok(())
}

#[test]
fn test_out_of_range_values_load_with_warning() -> TestResult {
    let (_dir, manager) = temp_manager()?;
    fs::write(
        manager.config_path(),
        format!("version = {}\n\n[narration]\ndefault_rate = 5.0\n", CONFIG_VERSION),
    )?;

    let config = manager.load()?;
    assert_eq!(config.narration.default_rate, 5.0);
    assert_eq!(manager.validate()?.len(), 1);
    Ok(())
}

#[test]
fn test_nan_rate_is_invalid() {
    let mut config = Config::default();
    config.narration.default_rate = f32::NAN;
    assert!(config.validate().is_err());
}

#[test]
fn test_unknown_keys_are_ignored() -> TestResult {
    let (_dir, manager) = temp_manager()?;
    fs::write(
        manager.config_path(),
        format!(
            "version = {}\nsomething_new = true\n\n[reader]\nshiny = 1\n",
            CONFIG_VERSION
        ),
    )?;

    assert_eq!(manager.load()?, Config::default());
    Ok(())
}

#[test]
fn test_legacy_file_is_migrated_with_backup() -> TestResult {
    let (_dir, manager) = temp_manager()?;
    fs::write(
        manager.config_path(),
        "[reader]\nfont_size = 45\n\n[narration]\nspeech_rate = 1.2\n",
    )?;

    let config = manager.load()?;
    assert_eq!(config.reader.default_font_size, 45);
    assert_eq!(config.narration.default_rate, 1.2);

    let backup = manager.config_path().with_extension("toml.backup");
    assert!(backup.exists());
    assert!(fs::read_to_string(backup)?.contains("speech_rate"));
    Ok(())
}

#[test]
fn test_update_refuses_blank_file() -> TestResult {
    let (_dir, manager) = temp_manager()?;
    fs::write(manager.config_path(), "")?;

    let result = manager.update(|config| config.app.subscriber = true);
    assert!(result.is_err());
    Ok(())
}
