//! Load — config loading from file and environment variables.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::format::DataFormat;

use super::model::{CheckConfig, ValidatorConfig};
use super::ConfigError;

pub const CONFIG_FILE_ENV: &str = "FORMATCHECK_CONFIG_FILE";
pub const RESOURCES_DIR_ENV: &str = "FORMATCHECK_RESOURCES_DIR";
pub const OVERRUN_LIMIT_ENV: &str = "FORMATCHECK_OVERRUN_LIMIT";
pub const STAGE_GROUP_ENV: &str = "FORMATCHECK_STAGE_GROUP";

const DEFAULT_CONFIG_FILE: &str = "formatcheck.toml";

impl CheckConfig {
    /// Load configuration from `path`, `FORMATCHECK_CONFIG_FILE`, or
    /// `./formatcheck.toml`, in that order.
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                Self::from_file(path)?
            }
            None => {
                let config_path = std::env::var(CONFIG_FILE_ENV)
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
                if config_path.exists() {
                    tracing::info!("Loading configuration from: {}", config_path.display());
                    Self::from_file(&config_path)?
                } else {
                    tracing::info!(
                        "Config file not found at {}, using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            }
        };

        config
            .validator
            .apply_overrides(|key| std::env::var(key).ok())?;
        config.validator.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse a TOML document. An unknown `format.data_format` is reported
    /// as `FormatError::UnsupportedFormat` rather than a decode error.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(contents)?;
        let data_format = table
            .get("format")
            .and_then(|f| f.get("data_format"))
            .and_then(|v| v.as_str());
        if let Some(name) = data_format {
            DataFormat::from_str(name)?;
        }
        Ok(toml::from_str(contents)?)
    }
}

impl ValidatorConfig {
    /// Apply environment overrides; `lookup` maps a variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(RESOURCES_DIR_ENV) {
            self.resources_dir = PathBuf::from(dir);
        }
        if let Some(limit) = lookup(OVERRUN_LIMIT_ENV) {
            self.overrun_limit = limit.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{} must be an integer, got '{}'", OVERRUN_LIMIT_ENV, limit))
            })?;
        }
        if let Some(group) = lookup(STAGE_GROUP_ENV) {
            self.stage_group = group;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    use crate::format::{DataFormat, FormatError};

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    // ── File loading ─────────────────────────────────────────────

    #[test]
    fn test_from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[format]\ndata_format = \"XML\"\nrecord_element = \"row\"").unwrap();
        let cfg = CheckConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.format.data_format(), DataFormat::Xml);
    }

    #[test]
    fn test_load_explicit_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CheckConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_unknown_data_format_is_format_error() {
        let err = CheckConfig::from_toml("[format]\ndata_format = \"YAML\"").unwrap_err();
        match err {
            ConfigError::Format(FormatError::UnsupportedFormat(name)) => assert_eq!(name, "YAML"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_toml_is_decode_error() {
        let err = CheckConfig::from_toml("[format\n").unwrap_err();
        assert!(matches!(err, ConfigError::Decode(_)));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let cfg = CheckConfig::from_toml("").unwrap();
        assert_eq!(cfg, CheckConfig::default());
    }

    // ── Environment overrides ────────────────────────────────────

    #[test]
    fn test_overrides_beat_file_values() {
        let mut cfg = CheckConfig::from_toml("[validator]\noverrun_limit = 10\nstage_group = \"FILE\"")
            .unwrap()
            .validator;
        cfg.apply_overrides(env(&[
            (OVERRUN_LIMIT_ENV, "20"),
            (RESOURCES_DIR_ENV, "/opt/res"),
        ]))
        .unwrap();
        assert_eq!(cfg.overrun_limit, 20);
        assert_eq!(cfg.resources_dir, PathBuf::from("/opt/res"));
        assert_eq!(cfg.stage_group, "FILE");
    }

    #[test]
    fn test_override_rejects_non_numeric_limit() {
        let mut cfg = ValidatorConfig::default();
        let err = cfg.apply_overrides(env(&[(OVERRUN_LIMIT_ENV, "lots")])).unwrap_err();
        assert!(err.to_string().contains(OVERRUN_LIMIT_ENV));
    }
}
