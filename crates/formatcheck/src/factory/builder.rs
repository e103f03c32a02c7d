//! Builder — staged accumulation of parser-factory settings.
//!
//! Universal setters first, format-specific modes and settings second,
//! `build` last. `build` consumes the builder, so a builder is built at
//! most once.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::debug;

use crate::charset::{Charset, DEFAULT_CHARSET};
use crate::format::{Compression, CsvMode, LogMode, ParserFormat};
use crate::format::settings::DEFAULT_FILE_PATTERN_IN_ARCHIVE;
use crate::log::{pattern, LogLinePattern};

use super::config::{keys, ControlCharPolicy, Mode, ModeKind, ParserFactoryConfig, SettingValue, UNBOUNDED};
use super::{BuildError, MAX_OVERRUN_LIMIT};

#[derive(Debug, Clone)]
pub struct ParserFactoryBuilder {
    parser_format: ParserFormat,
    resources_dir: PathBuf,
    charset: Charset,
    overrun_limit: i32,
    control_chars: ControlCharPolicy,
    compression: Compression,
    file_pattern_in_archive: String,
    max_data_len: Option<i32>,
    modes: BTreeMap<ModeKind, Mode>,
    settings: BTreeMap<String, SettingValue>,
}

impl ParserFactoryBuilder {
    /// `resources_dir` anchors relative resource paths such as protobuf descriptors.
    pub fn new(parser_format: ParserFormat, resources_dir: impl Into<PathBuf>) -> Self {
        Self {
            parser_format,
            resources_dir: resources_dir.into(),
            charset: DEFAULT_CHARSET,
            overrun_limit: MAX_OVERRUN_LIMIT,
            control_chars: ControlCharPolicy::Keep,
            compression: Compression::None,
            file_pattern_in_archive: DEFAULT_FILE_PATTERN_IN_ARCHIVE.to_string(),
            max_data_len: None,
            modes: BTreeMap::new(),
            settings: BTreeMap::new(),
        }
    }

    pub fn parser_format(&self) -> ParserFormat {
        self.parser_format
    }

    // ── Universal settings ───────────────────────────────────────

    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    pub fn with_overrun_limit(mut self, limit: i32) -> Self {
        self.overrun_limit = limit;
        self
    }

    pub fn with_control_char_policy(mut self, policy: ControlCharPolicy) -> Self {
        self.control_chars = policy;
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_archive_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern_in_archive = pattern.into();
        self
    }

    // ── Format-specific settings ─────────────────────────────────

    /// Use `UNBOUNDED` for formats without a length limit.
    pub fn with_max_data_len(mut self, len: i32) -> Self {
        self.max_data_len = Some(len);
        self
    }

    /// Replaces any earlier mode of the same kind.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.modes.insert(mode.kind(), mode);
        self
    }

    pub fn with_setting(mut self, key: &str, value: SettingValue) -> Self {
        self.settings.insert(key.to_string(), value);
        self
    }

    // ── Build ────────────────────────────────────────────────────

    pub fn build(self) -> Result<ParserFactoryConfig, BuildError> {
        if self.overrun_limit < 1 {
            return Err(BuildError::InvalidOverrunLimit(self.overrun_limit));
        }
        let max_data_len = self.max_data_len.ok_or(BuildError::MaxDataLenNotSet)?;
        if max_data_len != UNBOUNDED && max_data_len < 1 {
            return Err(BuildError::InvalidMaxDataLen(max_data_len));
        }

        let mut log_pattern = None;
        let mut descriptor_path = None;
        match self.parser_format {
            ParserFormat::Text | ParserFormat::SdcRecord => {}
            ParserFormat::Json => {
                self.require_mode(ModeKind::Json)?;
            }
            ParserFormat::Delimited => {
                let dialect = self.require_mode(ModeKind::CsvFormat)?;
                self.require_mode(ModeKind::CsvHeader)?;
                self.require_mode(ModeKind::CsvRecordType)?;
                if dialect == Mode::CsvFormat(CsvMode::Custom) {
                    self.check_custom_delimiters()?;
                }
            }
            ParserFormat::Xml => {
                self.text(keys::RECORD_ELEMENT)?;
            }
            ParserFormat::Log => {
                log_pattern = Some(self.compile_log_pattern()?);
            }
            ParserFormat::Avro => self.check_avro_schema()?,
            ParserFormat::Protobuf => {
                descriptor_path = Some(self.resolve_descriptor()?);
                self.non_empty_text(keys::MESSAGE_TYPE)?;
            }
        }

        debug!(
            parser_format = %self.parser_format,
            charset = self.charset.name(),
            max_data_len,
            settings = self.settings.len(),
            "parser factory configuration built"
        );

        Ok(ParserFactoryConfig {
            parser_format: self.parser_format,
            charset: self.charset,
            overrun_limit: self.overrun_limit,
            control_chars: self.control_chars,
            compression: self.compression,
            file_pattern_in_archive: self.file_pattern_in_archive,
            max_data_len,
            modes: self.modes,
            settings: self.settings,
            log_pattern,
            descriptor_path,
        })
    }

    fn require_mode(&self, kind: ModeKind) -> Result<Mode, BuildError> {
        self.modes
            .get(&kind)
            .copied()
            .ok_or(BuildError::MissingMode(kind.as_str()))
    }

    fn setting(&self, key: &'static str) -> Result<&SettingValue, BuildError> {
        self.settings.get(key).ok_or(BuildError::MissingSetting(key))
    }

    fn text(&self, key: &'static str) -> Result<&str, BuildError> {
        match self.setting(key)? {
            SettingValue::Text(s) => Ok(s),
            _ => Err(BuildError::WrongSettingType { key, expected: "string" }),
        }
    }

    fn non_empty_text(&self, key: &'static str) -> Result<&str, BuildError> {
        let text = self.text(key)?;
        if text.trim().is_empty() {
            return Err(BuildError::EmptySetting(key));
        }
        Ok(text)
    }

    fn character(&self, key: &'static str) -> Result<char, BuildError> {
        match self.setting(key)? {
            SettingValue::Char(c) => Ok(*c),
            _ => Err(BuildError::WrongSettingType { key, expected: "character" }),
        }
    }

    fn check_custom_delimiters(&self) -> Result<(), BuildError> {
        let delimiter = self.character(keys::DELIMITER_CHAR)?;
        let escape = self.character(keys::ESCAPE_CHAR)?;
        let quote = self.character(keys::QUOTE_CHAR)?;

        if delimiter == '\n' || delimiter == '\r' {
            return Err(BuildError::InvalidDelimiters("the delimiter cannot be a line break".into()));
        }
        if delimiter == quote {
            return Err(BuildError::InvalidDelimiters(format!(
                "the quote character and the delimiter cannot be the same ({:?})",
                quote
            )));
        }
        if delimiter == escape {
            return Err(BuildError::InvalidDelimiters(format!(
                "the escape character and the delimiter cannot be the same ({:?})",
                escape
            )));
        }
        if quote == escape {
            return Err(BuildError::InvalidDelimiters(format!(
                "the quote character and the escape character cannot be the same ({:?})",
                quote
            )));
        }
        Ok(())
    }

    fn compile_log_pattern(&self) -> Result<LogLinePattern, BuildError> {
        let mode = match self.require_mode(ModeKind::Log)? {
            Mode::Log(mode) => mode,
            _ => return Err(BuildError::MissingMode(ModeKind::Log.as_str())),
        };
        let compiled = match mode {
            LogMode::CommonLogFormat => pattern::from_grok("%{COMMONAPACHELOG}", "")?,
            LogMode::CombinedLogFormat => pattern::from_grok("%{COMBINEDAPACHELOG}", "")?,
            LogMode::ApacheErrorLogFormat => pattern::from_grok("%{APACHEERRORLOG}", "")?,
            LogMode::ApacheCustomLogFormat => {
                pattern::from_apache_layout(self.non_empty_text(keys::APACHE_CUSTOM_LOG_FORMAT)?)?
            }
            LogMode::Regex => {
                let regex = self.non_empty_text(keys::REGEX)?;
                let empty = BTreeMap::new();
                let groups = match self.settings.get(keys::REGEX_FIELD_PATH_TO_GROUP) {
                    Some(SettingValue::GroupMap(m)) => m,
                    Some(_) => {
                        return Err(BuildError::WrongSettingType {
                            key: keys::REGEX_FIELD_PATH_TO_GROUP,
                            expected: "group map",
                        })
                    }
                    None => &empty,
                };
                pattern::from_regex(regex, groups)?
            }
            LogMode::Grok => {
                let definitions = match self.settings.get(keys::GROK_PATTERN_DEFINITION) {
                    Some(SettingValue::Text(s)) => s.as_str(),
                    _ => "",
                };
                pattern::from_grok(self.non_empty_text(keys::GROK_PATTERN)?, definitions)?
            }
            LogMode::Log4j => pattern::from_log4j_layout(self.non_empty_text(keys::LOG4J_FORMAT)?)?,
        };
        Ok(compiled)
    }

    fn check_avro_schema(&self) -> Result<(), BuildError> {
        let schema = match self.settings.get(keys::AVRO_SCHEMA) {
            Some(SettingValue::Text(s)) if !s.trim().is_empty() => s,
            _ => return Ok(()),
        };
        let value: serde_json::Value =
            serde_json::from_str(schema).map_err(|e| BuildError::InvalidAvroSchema(e.to_string()))?;
        match value {
            serde_json::Value::Object(_) | serde_json::Value::Array(_) | serde_json::Value::String(_) => Ok(()),
            _ => Err(BuildError::InvalidAvroSchema(
                "a schema must be a JSON object, array or type name".into(),
            )),
        }
    }

    fn resolve_descriptor(&self) -> Result<PathBuf, BuildError> {
        let file = self.non_empty_text(keys::PROTO_DESCRIPTOR_FILE)?;
        let path = self.resources_dir.join(file);
        if !path.is_file() {
            return Err(BuildError::DescriptorUnreadable(path.display().to_string()));
        }
        Ok(path)
    }
}
