//! Validate module — one validation pass over a data-format configuration.
//!
//! - `fields.rs`: per-format field checks
//! - `xml_name.rs`: the XML element-name grammar
//!
//! A pass runs four stages in order: charset resolution, field checks
//! (plus the log sub-validator for LOG), builder population, build.
//! Every stage runs even when an earlier one produced diagnostics.

pub mod fields;
pub mod xml_name;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::charset;
use crate::diagnostic::{Diagnostic, ErrorKind};
use crate::factory::{keys, ControlCharPolicy, Mode, ParserFactoryBuilder, ParserFactoryConfig, SettingValue, UNBOUNDED};
use crate::factory::MAX_OVERRUN_LIMIT;
use crate::format::{DataFormatConfig, FormatSettings};
use crate::log::LogFormatValidator;

/// Default grouping label for diagnostics that belong to the stage as a whole.
pub const DEFAULT_STAGE_GROUP: &str = "DATA_FORMAT";

/// Host-supplied inputs that are not part of the data-format settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    pub resources_dir: PathBuf,
    /// Group used for charset and construction diagnostics.
    pub stage_group: String,
    pub overrun_limit: i32,
}

impl ValidationContext {
    pub fn new(resources_dir: impl Into<PathBuf>) -> Self {
        Self {
            resources_dir: resources_dir.into(),
            stage_group: DEFAULT_STAGE_GROUP.to_string(),
            overrun_limit: MAX_OVERRUN_LIMIT,
        }
    }

    pub fn with_stage_group(mut self, group: impl Into<String>) -> Self {
        self.stage_group = group.into();
        self
    }

    pub fn with_overrun_limit(mut self, limit: i32) -> Self {
        self.overrun_limit = limit;
        self
    }

    pub fn resources_dir(&self) -> &Path {
        &self.resources_dir
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Outcome of one pass: every diagnostic in discovery order, plus the
/// built configuration when construction succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    diagnostics: Vec<Diagnostic>,
    factory: Option<ParserFactoryConfig>,
}

impl ValidationReport {
    /// True only when no diagnostic was raised and the build succeeded.
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty() && self.factory.is_some()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The built configuration, only for a valid pass.
    pub fn factory_config(&self) -> Option<&ParserFactoryConfig> {
        if self.is_valid() {
            self.factory.as_ref()
        } else {
            None
        }
    }

    /// Whatever the builder produced, even when field checks failed.
    /// Not for handing to parsers.
    pub fn debug_factory_config(&self) -> Option<&ParserFactoryConfig> {
        self.factory.as_ref()
    }

    pub fn into_factory_config(self) -> Option<ParserFactoryConfig> {
        if self.is_valid() {
            self.factory
        } else {
            None
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return write!(f, "configuration is valid");
        }
        write!(f, "configuration is invalid ({} issue(s))", self.diagnostics.len())?;
        for d in &self.diagnostics {
            write!(f, "\n  {}", d)?;
        }
        Ok(())
    }
}

/// Run one validation pass.
pub fn validate(config: &DataFormatConfig, ctx: &ValidationContext) -> ValidationReport {
    let data_format = config.data_format();
    let mut diagnostics = Vec::new();

    // 1. charset
    debug!(%data_format, charset = %config.charset, "resolving charset");
    let (charset, charset_diagnostic) = charset::resolve(&config.charset, &ctx.stage_group);
    diagnostics.extend(charset_diagnostic);

    // 2. field checks
    debug!(%data_format, "checking format fields");
    let log_validator = match &config.format {
        FormatSettings::Text(s) => {
            fields::validate_text(s, &mut diagnostics);
            None
        }
        FormatSettings::Json(s) => {
            fields::validate_json(s, &mut diagnostics);
            None
        }
        FormatSettings::Delimited(s) => {
            fields::validate_delimited(s, &mut diagnostics);
            None
        }
        FormatSettings::Xml(s) => {
            fields::validate_xml(s, &mut diagnostics);
            None
        }
        FormatSettings::Log(s) => {
            let validator = LogFormatValidator::new(s);
            validator.validate(&mut diagnostics);
            Some(validator)
        }
        FormatSettings::Avro(_) | FormatSettings::SdcJson => None,
        FormatSettings::Protobuf(s) => {
            fields::validate_protobuf(s, ctx.resources_dir(), &mut diagnostics);
            None
        }
    };

    // 3. builder population
    debug!(%data_format, "populating parser factory builder");
    let builder = ParserFactoryBuilder::new(data_format.parser_format(), ctx.resources_dir.clone())
        .with_charset(charset)
        .with_overrun_limit(ctx.overrun_limit)
        .with_control_char_policy(ControlCharPolicy::from_remove_flag(config.remove_ctrl_chars))
        .with_compression(config.compression)
        .with_archive_pattern(config.file_pattern_in_archive.clone());

    let builder = match &config.format {
        FormatSettings::Log(s) => log_validator
            .unwrap_or_else(|| LogFormatValidator::new(s))
            .populate(builder),
        FormatSettings::Text(s) => builder.with_max_data_len(s.max_line_len),
        FormatSettings::Json(s) => builder
            .with_max_data_len(s.max_object_len)
            .with_mode(Mode::Json(s.content)),
        FormatSettings::Delimited(s) => builder
            .with_max_data_len(s.max_record_len)
            .with_mode(Mode::CsvFormat(s.file_format))
            .with_mode(Mode::CsvHeader(s.header))
            .with_mode(Mode::CsvRecordType(s.record_type))
            .with_setting(keys::SKIP_START_LINES, SettingValue::Int(i64::from(s.skip_start_lines)))
            .with_setting(keys::DELIMITER_CHAR, SettingValue::Char(s.custom_delimiter))
            .with_setting(keys::ESCAPE_CHAR, SettingValue::Char(s.custom_escape))
            .with_setting(keys::QUOTE_CHAR, SettingValue::Char(s.custom_quote)),
        FormatSettings::Xml(s) => builder
            .with_max_data_len(s.max_record_len)
            .with_setting(keys::RECORD_ELEMENT, SettingValue::Text(s.record_element.clone())),
        FormatSettings::Avro(s) => builder
            .with_max_data_len(UNBOUNDED)
            .with_setting(keys::AVRO_SCHEMA, SettingValue::Text(s.schema.clone()))
            .with_setting(keys::SCHEMA_IN_MESSAGE, SettingValue::Bool(s.schema_in_message)),
        FormatSettings::Protobuf(s) => builder
            .with_max_data_len(UNBOUNDED)
            .with_setting(keys::PROTO_DESCRIPTOR_FILE, SettingValue::Text(s.descriptor_file.clone()))
            .with_setting(keys::MESSAGE_TYPE, SettingValue::Text(s.message_type.clone()))
            .with_setting(keys::DELIMITED, SettingValue::Bool(s.delimited)),
        FormatSettings::SdcJson => builder.with_max_data_len(UNBOUNDED),
    };

    // 4. build
    debug!(%data_format, "building parser factory");
    let factory = match builder.build() {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(%data_format, error = %e, "could not build parser factory");
            diagnostics.push(Diagnostic::general(&ctx.stage_group, ErrorKind::ParserFactoryBuild).with_detail(e));
            None
        }
    };

    debug!(%data_format, diagnostics = diagnostics.len(), "validation pass finished");
    ValidationReport { diagnostics, factory }
}
