//! Entry point for loading and changing the user's settings

use crate::persistence::ConfigFile;
use crate::{Config, ConfigError, ConfigResult, LogLevel};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Prefix of the `LEXIREAD_SECTION_FIELD` environment overrides
pub const ENV_PREFIX: &str = "LEXIREAD";

const FILE_NAME: &str = "config.toml";

/// Owns the config directory and the file inside it
pub struct ConfigManager {
    dir: PathBuf,
    file: ConfigFile,
}

impl ConfigManager {
    /// Uses the platform config directory, e.g. `~/.config/lexiread` on Linux
    pub fn new() -> ConfigResult<Self> {
        let dirs = ProjectDirs::from("", "", "lexiread").ok_or_else(|| {
            ConfigError::PathResolutionError {
                reason: "no home directory".to_string(),
            }
        })?;
        Self::with_directory(dirs.config_dir().to_path_buf())
    }

    pub fn with_directory(dir: PathBuf) -> ConfigResult<Self> {
        let file = ConfigFile::new(dir.join(FILE_NAME));
        Ok(Self { dir, file })
    }

    pub fn config_dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    /// Where reading progress lives; a relative `app.data_dir` is taken
    /// from the config directory
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        self.dir.join(&config.app.data_dir)
    }

    pub fn load(&self) -> ConfigResult<Config> {
        self.file.read()
    }

    /// Like `load`, but an unreadable file gives the defaults
    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_else(|e| {
            log::warn!("Using default config: {}", e);
            Config::default()
        })
    }

    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.file.write(config)
    }

    /// Loads, applies `change`, then saves
    ///
    /// ```rust,no_run
    /// # use lexiread_config::ConfigManager;
    /// # fn main() -> Result<(), lexiread_config::ConfigError> {
    /// let manager = ConfigManager::new()?;
    /// manager.update(|config| config.reader.default_font_size = 40)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn update(&self, change: impl FnOnce(&mut Config)) -> ConfigResult<()> {
        let mut config = self.load()?;
        change(&mut config);
        self.save(&config)
    }

    /// Writes the defaults unless a file is already there; true when written
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.file.path().exists() {
            return Ok(false);
        }
        self.save(&Config::default())?;
        Ok(true)
    }

    pub fn reset(&self) -> ConfigResult<()> {
        self.save(&Config::default())
    }

    /// Problems in the file on disk, one line each
    pub fn validate(&self) -> ConfigResult<Vec<String>> {
        let problems = match self.load()?.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => errors.iter().map(ToString::to_string).collect(),
        };
        Ok(problems)
    }

    /// Loads the file, then lets the environment override single fields
    ///
    /// `LEXIREAD_READER_DEFAULT_FONT_SIZE=40` sets `reader.default_font_size`.
    /// A value that does not parse is skipped with a warning.
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }
}

fn env_key(section: &str, field: &str) -> String {
    format!("{ENV_PREFIX}_{section}_{field}").to_uppercase()
}

pub(crate) fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    let parsed = |section: &str, field: &str| -> Option<String> {
        let key = env_key(section, field);
        let raw = lookup(&key)?;
        log::debug!("Override {}={}", key, raw);
        Some(raw)
    };

    fn set<T: FromStr>(slot: &mut T, raw: Option<String>, field: &str) {
        let Some(raw) = raw else { return };
        match raw.trim().parse() {
            Ok(value) => *slot = value,
            Err(_) => log::warn!("Skipping override for {}: {:?} does not parse", field, raw),
        }
    }

    set::<LogLevel>(&mut config.app.log_level, parsed("app", "log_level"), "app.log_level");
    set(&mut config.app.subscriber, parsed("app", "subscriber"), "app.subscriber");
    set(
        &mut config.reader.default_font_size,
        parsed("reader", "default_font_size"),
        "reader.default_font_size",
    );
    set(
        &mut config.narration.default_rate,
        parsed("narration", "default_rate"),
        "narration.default_rate",
    );

    if let Some(prefix) = parsed("narration", "language_prefix") {
        config.narration.language_prefix = prefix;
    }
    if let Some(dir) = parsed("app", "data_dir") {
        config.app.data_dir = PathBuf::from(dir);
    }
    if let Some(user) = parsed("app", "user_id") {
        config.app.user_id = Some(user);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn manager() -> (TempDir, ConfigManager) {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_directory(dir.path().to_path_buf()).unwrap();
        (dir, manager)
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let (_dir, manager) = manager();
        std::fs::write(manager.config_path(), "[[[").unwrap();

        assert!(manager.load().is_err());
        assert_eq!(manager.load_or_default(), Config::default());
    }

    #[test]
    fn test_update_persists_change() {
        let (_dir, manager) = manager();

        manager.update(|config| config.app.subscriber = true).unwrap();
        assert!(manager.load().unwrap().app.subscriber);
    }

    #[test]
    fn test_initialize_only_once() {
        let (_dir, manager) = manager();

        assert!(manager.initialize().unwrap());
        assert!(manager.config_path().ends_with(FILE_NAME));
        assert!(!manager.initialize().unwrap());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let (_dir, manager) = manager();
        manager.update(|config| config.narration.default_rate = 1.9).unwrap();

        manager.reset().unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn test_validate_lists_problems_in_file() {
        let (_dir, manager) = manager();
        std::fs::write(
            manager.config_path(),
            format!(
                "version = {}\n[reader]\ndefault_font_size = 0\n[narration]\ndefault_rate = 9.0\n",
                crate::CONFIG_VERSION
            ),
        )
        .unwrap();

        let problems = manager.validate().unwrap();
        assert_eq!(problems.len(), 2);
        assert!(problems[0].starts_with("reader.default_font_size"));
    }

    #[test]
    fn test_data_dir() {
        let (dir, manager) = manager();
        let mut config = Config::default();
        assert_eq!(manager.data_dir(&config), dir.path().join("progress"));

        let absolute = dir.path().join("elsewhere");
        config.app.data_dir = absolute.clone();
        assert_eq!(manager.data_dir(&config), absolute);
    }

    #[test]
    fn test_env_key_is_upper_case() {
        assert_eq!(env_key("reader", "default_font_size"), "LEXIREAD_READER_DEFAULT_FONT_SIZE");
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("LEXIREAD_READER_DEFAULT_FONT_SIZE", "55"),
                ("LEXIREAD_NARRATION_DEFAULT_RATE", " 1.5 "),
                ("LEXIREAD_NARRATION_LANGUAGE_PREFIX", "fr-"),
                ("LEXIREAD_APP_LOG_LEVEL", "debug"),
                ("LEXIREAD_APP_SUBSCRIBER", "true"),
                ("LEXIREAD_APP_USER_ID", "reader-1"),
            ]),
        );

        assert_eq!(config.reader.default_font_size, 55);
        assert_eq!(config.narration.default_rate, 1.5);
        assert_eq!(config.narration.language_prefix, "fr-");
        assert_eq!(config.app.log_level, LogLevel::Debug);
        assert!(config.app.subscriber);
        assert_eq!(config.app.user_id.as_deref(), Some("reader-1"));
    }

    #[test]
    fn test_unparseable_override_is_skipped() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, env(&[("LEXIREAD_READER_DEFAULT_FONT_SIZE", "huge")]));
        assert_eq!(config.reader.default_font_size, 20);
    }
}
