//! Config — the immutable parser-factory configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::charset::Charset;
use crate::format::{Compression, CsvHeader, CsvMode, CsvRecordType, JsonMode, LogMode, ParserFormat};
use crate::log::LogLinePattern;

/// `max_data_len` sentinel for "no limit".
pub const UNBOUNDED: i32 = -1;

/// Setting keys understood by the downstream parsers.
pub mod keys {
    // DELIMITED
    pub const SKIP_START_LINES: &str = "skip_start_lines";
    pub const DELIMITER_CHAR: &str = "delimiter_char";
    pub const ESCAPE_CHAR: &str = "escape_char";
    pub const QUOTE_CHAR: &str = "quote_char";

    // XML
    pub const RECORD_ELEMENT: &str = "record_element";

    // AVRO
    pub const AVRO_SCHEMA: &str = "avro_schema";
    pub const SCHEMA_IN_MESSAGE: &str = "schema_in_message";

    // PROTOBUF
    pub const PROTO_DESCRIPTOR_FILE: &str = "proto_descriptor_file";
    pub const MESSAGE_TYPE: &str = "message_type";
    pub const DELIMITED: &str = "delimited";

    // LOG
    pub const RETAIN_ORIGINAL_LINE: &str = "retain_original_line";
    pub const APACHE_CUSTOM_LOG_FORMAT: &str = "apache_custom_log_format";
    pub const REGEX: &str = "regex";
    pub const REGEX_FIELD_PATH_TO_GROUP: &str = "regex_field_path_to_group";
    pub const GROK_PATTERN_DEFINITION: &str = "grok_pattern_definition";
    pub const GROK_PATTERN: &str = "grok_pattern";
    pub const LOG4J_FORMAT: &str = "log4j_format";
    pub const ON_PARSE_ERROR: &str = "on_parse_error";
    pub const LOG4J_TRIM_STACK_TRACES_TO_LENGTH: &str = "log4j_trim_stack_traces_to_length";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModeKind {
    Json,
    CsvFormat,
    CsvHeader,
    CsvRecordType,
    Log,
}

impl ModeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeKind::Json => "json content",
            ModeKind::CsvFormat => "delimiter format",
            ModeKind::CsvHeader => "header line",
            ModeKind::CsvRecordType => "root field type",
            ModeKind::Log => "log format",
        }
    }
}

/// A format-specific mode; at most one per `ModeKind` is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Json(JsonMode),
    CsvFormat(CsvMode),
    CsvHeader(CsvHeader),
    CsvRecordType(CsvRecordType),
    Log(LogMode),
}

impl Mode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Json(_) => ModeKind::Json,
            Mode::CsvFormat(_) => ModeKind::CsvFormat,
            Mode::CsvHeader(_) => ModeKind::CsvHeader,
            Mode::CsvRecordType(_) => ModeKind::CsvRecordType,
            Mode::Log(_) => ModeKind::Log,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Char(char),
    Text(String),
    GroupMap(BTreeMap<String, usize>),
}

impl SettingValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Bool(_) => "boolean",
            SettingValue::Int(_) => "integer",
            SettingValue::Char(_) => "character",
            SettingValue::Text(_) => "string",
            SettingValue::GroupMap(_) => "group map",
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::Int(i) => write!(f, "{}", i),
            SettingValue::Char(c) => write!(f, "{:?}", c),
            SettingValue::Text(s) => write!(f, "{:?}", s),
            SettingValue::GroupMap(m) => {
                let entries: Vec<String> = m.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                write!(f, "{{{}}}", entries.join(", "))
            }
        }
    }
}

/// Whether parsers strip control characters from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlCharPolicy {
    #[default]
    Keep,
    Remove,
}

impl ControlCharPolicy {
    pub fn from_remove_flag(remove: bool) -> Self {
        if remove {
            ControlCharPolicy::Remove
        } else {
            ControlCharPolicy::Keep
        }
    }
}

/// Everything a downstream parser component needs to instantiate parsers.
///
/// Only `ParserFactoryBuilder::build` creates one.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserFactoryConfig {
    pub(super) parser_format: ParserFormat,
    pub(super) charset: Charset,
    pub(super) overrun_limit: i32,
    pub(super) control_chars: ControlCharPolicy,
    pub(super) compression: Compression,
    pub(super) file_pattern_in_archive: String,
    pub(super) max_data_len: i32,
    pub(super) modes: BTreeMap<ModeKind, Mode>,
    pub(super) settings: BTreeMap<String, SettingValue>,
    pub(super) log_pattern: Option<LogLinePattern>,
    pub(super) descriptor_path: Option<PathBuf>,
}

impl ParserFactoryConfig {
    pub fn parser_format(&self) -> ParserFormat {
        self.parser_format
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn overrun_limit(&self) -> i32 {
        self.overrun_limit
    }

    pub fn control_char_policy(&self) -> ControlCharPolicy {
        self.control_chars
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn file_pattern_in_archive(&self) -> &str {
        &self.file_pattern_in_archive
    }

    /// File-name pattern inside archives, only when the compression is an archive.
    pub fn archive_pattern(&self) -> Option<&str> {
        self.compression
            .is_archive()
            .then_some(self.file_pattern_in_archive.as_str())
    }

    /// `UNBOUNDED` (-1) means no limit.
    pub fn max_data_len(&self) -> i32 {
        self.max_data_len
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_data_len == UNBOUNDED
    }

    pub fn mode_of(&self, kind: ModeKind) -> Option<Mode> {
        self.modes.get(&kind).copied()
    }

    pub fn settings(&self) -> &BTreeMap<String, SettingValue> {
        &self.settings
    }

    pub fn setting(&self, key: &str) -> Option<&SettingValue> {
        self.settings.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.settings.get(key) {
            Some(SettingValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn group_map(&self, key: &str) -> Option<&BTreeMap<String, usize>> {
        match self.settings.get(key) {
            Some(SettingValue::GroupMap(m)) => Some(m),
            _ => None,
        }
    }

    /// Compiled line pattern, present for LOG.
    pub fn log_pattern(&self) -> Option<&LogLinePattern> {
        self.log_pattern.as_ref()
    }

    /// Resolved descriptor file, present for PROTOBUF.
    pub fn descriptor_path(&self) -> Option<&Path> {
        self.descriptor_path.as_deref()
    }
}
