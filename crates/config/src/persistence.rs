//! Reading and writing `config.toml`
//!
//! A write never leaves a half-written file behind: the new contents go to a
//! temporary file in the same directory, which is then renamed over the old
//! one. The previous file is copied to `config.toml.backup` first.

use crate::migration::migrate_to_latest;
use crate::{Config, ConfigError, ConfigResult};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The config file on disk
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("toml.backup")
    }

    /// Reads the file, upgrading older layouts in place
    ///
    /// A missing file reads as the defaults. A blank file is an error, since
    /// it usually means an earlier write was cut short.
    pub fn read(&self) -> ConfigResult<Config> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", self.path.display());
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::ReadError {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if text.trim().is_empty() {
            return Err(ConfigError::ReadError {
                path: self.path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidData, "file is blank"),
            });
        }

        let mut tree: toml::Value =
            toml::from_str(&text).map_err(|source| self.parse_error(source))?;
        let upgraded = migrate_to_latest(&mut tree)?;
        let config: Config = tree.try_into().map_err(|source| self.parse_error(source))?;

        if upgraded {
            if let Err(e) = self.write(&config) {
                log::warn!("Kept the upgraded config in memory only: {}", e);
            }
        }

        // Out-of-range values still load so the rest of the file is kept
        if let Err(problems) = config.validate() {
            log::warn!("Config has problems: {}", join_problems(&problems));
        }

        Ok(config)
    }

    /// Validates `config` and replaces the file with it
    pub fn write(&self, config: &Config) -> ConfigResult<()> {
        config
            .validate()
            .map_err(|problems| ConfigError::ValidationError(join_problems(&problems)))?;

        let dir = self
            .path
            .parent()
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: format!("{} has no parent directory", self.path.display()),
            })?;
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::DirectoryCreationError {
                path: dir.to_path_buf(),
                source,
            })?;
            log::info!("Created {}", dir.display());
        }

        if self.path.exists() {
            fs::copy(&self.path, self.backup_path())
                .map_err(|source| ConfigError::BackupError { source })?;
        }

        let text = toml::to_string_pretty(config)?;
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(text.as_bytes())?;
        staged.flush()?;
        staged
            .persist(&self.path)
            .map_err(|e| ConfigError::WriteError {
                path: self.path.clone(),
                source: e.error,
            })?;

        log::info!("Wrote {}", self.path.display());
        Ok(())
    }

    fn parse_error(&self, source: toml::de::Error) -> ConfigError {
        ConfigError::ParseError {
            path: self.path.clone(),
            source,
        }
    }
}

fn join_problems<E: ToString>(problems: &[E]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CONFIG_VERSION;
    use tempfile::TempDir;

    fn config_file(dir: &TempDir) -> ConfigFile {
        ConfigFile::new(dir.path().join("config.toml"))
    }

    #[test]
    fn test_missing_file_reads_as_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(config_file(&dir).read().unwrap(), Config::default());
    }

    #[test]
    fn test_written_values_read_back() {
        let dir = TempDir::new().unwrap();
        let file = config_file(&dir);

        let mut config = Config::default();
        config.narration.default_rate = 1.25;
        file.write(&config).unwrap();

        assert_eq!(file.read().unwrap().narration.default_rate, 1.25);
    }

    #[test]
    fn test_write_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let file = ConfigFile::new(dir.path().join("nested").join("config.toml"));

        file.write(&Config::default()).unwrap();
        assert!(file.path().exists());
    }

    #[test]
    fn test_second_write_leaves_backup() {
        let dir = TempDir::new().unwrap();
        let file = config_file(&dir);

        file.write(&Config::default()).unwrap();
        assert!(!file.backup_path().exists());
        file.write(&Config::default()).unwrap();
        assert!(file.backup_path().exists());
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let file = config_file(&dir);
        fs::write(file.path(), "not = [toml").unwrap();

        assert!(matches!(file.read(), Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_blank_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let file = config_file(&dir);
        fs::write(file.path(), "  \n").unwrap();

        assert!(matches!(file.read(), Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_out_of_range_value_is_not_written() {
        let dir = TempDir::new().unwrap();
        let file = config_file(&dir);

        let mut config = Config::default();
        config.reader.default_font_size = 150;

        assert!(matches!(file.write(&config), Err(ConfigError::ValidationError(_))));
        assert!(!file.path().exists());
    }

    #[test]
    fn test_version_one_file_is_upgraded_on_read() {
        let dir = TempDir::new().unwrap();
        let file = config_file(&dir);
        fs::write(file.path(), "[narration]\nspeech_rate = 0.75\n").unwrap();

        let config = file.read().unwrap();
        assert_eq!(config.narration.default_rate, 0.75);
        assert_eq!(config.version, CONFIG_VERSION);

        let rewritten = fs::read_to_string(file.path()).unwrap();
        assert!(rewritten.contains("default_rate"));
        assert!(!rewritten.contains("speech_rate"));
    }
}
