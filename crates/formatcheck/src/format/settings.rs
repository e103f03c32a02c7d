//! Settings — per-format settings, tagged by `DataFormat`.
//!
//! Fields that only make sense for one format live in that format's
//! struct, so a `DataFormatConfig` never carries settings for an inactive
//! format.

use serde::{Deserialize, Serialize};

use super::model::{
    Compression, CsvHeader, CsvMode, CsvRecordType, DataFormat, JsonMode, LogMode, OnParseError,
};

pub const DEFAULT_CHARSET: &str = "UTF-8";
pub const DEFAULT_FILE_PATTERN_IN_ARCHIVE: &str = "*";
pub const DEFAULT_APACHE_CUSTOM_LOG_FORMAT: &str = "%h %l %u %t \"%r\" %>s %b";
pub const DEFAULT_REGEX: &str =
    r#"^(\S+) (\S+) (\S+) \[([\w:/]+\s[+\-]\d{4})\] "(\S+) (\S+) (\S+)" (\d{3}) (\d+)"#;
pub const DEFAULT_GROK_PATTERN: &str = "%{COMMONAPACHELOG}";
pub const DEFAULT_LOG4J_CUSTOM_FORMAT: &str = "%r [%t] %-5p %c %x - %m%n";

/// Settings shared by every format plus the active format's own block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFormatConfig {
    #[serde(default = "default_charset")]
    pub charset: String,
    #[serde(default)]
    pub remove_ctrl_chars: bool,
    #[serde(default)]
    pub compression: Compression,
    #[serde(default = "default_file_pattern")]
    pub file_pattern_in_archive: String,
    #[serde(flatten)]
    pub format: FormatSettings,
}

fn default_charset() -> String {
    DEFAULT_CHARSET.to_string()
}

fn default_file_pattern() -> String {
    DEFAULT_FILE_PATTERN_IN_ARCHIVE.to_string()
}

impl DataFormatConfig {
    pub fn new(format: FormatSettings) -> Self {
        Self {
            charset: default_charset(),
            remove_ctrl_chars: false,
            compression: Compression::None,
            file_pattern_in_archive: default_file_pattern(),
            format,
        }
    }

    /// Default configuration for `format`.
    pub fn for_format(format: DataFormat) -> Self {
        Self::new(FormatSettings::default_for(format))
    }

    pub fn data_format(&self) -> DataFormat {
        self.format.data_format()
    }
}

impl Default for DataFormatConfig {
    fn default() -> Self {
        Self::new(FormatSettings::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "data_format", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormatSettings {
    Text(TextSettings),
    Json(JsonSettings),
    Delimited(DelimitedSettings),
    Xml(XmlSettings),
    Log(LogSettings),
    Avro(AvroSettings),
    Protobuf(ProtobufSettings),
    SdcJson,
}

impl FormatSettings {
    pub fn data_format(&self) -> DataFormat {
        match self {
            FormatSettings::Text(_) => DataFormat::Text,
            FormatSettings::Json(_) => DataFormat::Json,
            FormatSettings::Delimited(_) => DataFormat::Delimited,
            FormatSettings::Xml(_) => DataFormat::Xml,
            FormatSettings::Log(_) => DataFormat::Log,
            FormatSettings::Avro(_) => DataFormat::Avro,
            FormatSettings::Protobuf(_) => DataFormat::Protobuf,
            FormatSettings::SdcJson => DataFormat::SdcJson,
        }
    }

    pub fn default_for(format: DataFormat) -> Self {
        match format {
            DataFormat::Text => FormatSettings::Text(TextSettings::default()),
            DataFormat::Json => FormatSettings::Json(JsonSettings::default()),
            DataFormat::Delimited => FormatSettings::Delimited(DelimitedSettings::default()),
            DataFormat::Xml => FormatSettings::Xml(XmlSettings::default()),
            DataFormat::Log => FormatSettings::Log(LogSettings::default()),
            DataFormat::Avro => FormatSettings::Avro(AvroSettings::default()),
            DataFormat::Protobuf => FormatSettings::Protobuf(ProtobufSettings::default()),
            DataFormat::SdcJson => FormatSettings::SdcJson,
        }
    }
}

impl Default for FormatSettings {
    fn default() -> Self {
        FormatSettings::Text(TextSettings::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    /// Longer lines are truncated.
    pub max_line_len: i32,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self { max_line_len: 1024 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonSettings {
    pub content: JsonMode,
    /// Larger objects are not processed.
    pub max_object_len: i32,
}

impl Default for JsonSettings {
    fn default() -> Self {
        Self {
            content: JsonMode::MultipleObjects,
            max_object_len: 4096,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelimitedSettings {
    pub file_format: CsvMode,
    pub header: CsvHeader,
    pub max_record_len: i32,
    /// Only read when `file_format` is `CUSTOM`.
    pub custom_delimiter: char,
    pub custom_escape: char,
    pub custom_quote: char,
    pub record_type: CsvRecordType,
    pub skip_start_lines: i32,
}

impl Default for DelimitedSettings {
    fn default() -> Self {
        Self {
            file_format: CsvMode::Csv,
            header: CsvHeader::NoHeader,
            max_record_len: 1024,
            custom_delimiter: '|',
            custom_escape: '\\',
            custom_quote: '"',
            record_type: CsvRecordType::ListMap,
            skip_start_lines: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlSettings {
    /// Element delimiting records; empty treats the whole document as one record.
    pub record_element: String,
    pub max_record_len: i32,
}

impl Default for XmlSettings {
    fn default() -> Self {
        Self {
            record_element: String::new(),
            max_record_len: 4096,
        }
    }
}

/// One entry of the REGEX mode field-path to capture-group list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexFieldMapping {
    pub field_path: String,
    pub group: usize,
}

impl RegexFieldMapping {
    pub fn new(field_path: impl Into<String>, group: usize) -> Self {
        Self { field_path: field_path.into(), group }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub mode: LogMode,
    pub max_line_len: i32,
    pub retain_original_line: bool,

    // APACHE_CUSTOM_LOG_FORMAT
    pub custom_log_format: String,

    // REGEX
    pub regex: String,
    pub field_path_to_group: Vec<RegexFieldMapping>,

    // GROK
    pub grok_pattern_definition: String,
    pub grok_pattern: String,

    // LOG4J
    pub on_parse_error: OnParseError,
    pub max_stack_trace_lines: i32,
    pub enable_log4j_custom_format: bool,
    pub log4j_custom_format: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            mode: LogMode::CommonLogFormat,
            max_line_len: 1024,
            retain_original_line: false,
            custom_log_format: DEFAULT_APACHE_CUSTOM_LOG_FORMAT.to_string(),
            regex: DEFAULT_REGEX.to_string(),
            field_path_to_group: Vec::new(),
            grok_pattern_definition: String::new(),
            grok_pattern: DEFAULT_GROK_PATTERN.to_string(),
            on_parse_error: OnParseError::Error,
            max_stack_trace_lines: 50,
            enable_log4j_custom_format: false,
            log4j_custom_format: DEFAULT_LOG4J_CUSTOM_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvroSettings {
    /// The message carries its own schema.
    pub schema_in_message: bool,
    /// Overrides the message schema when non-empty.
    pub schema: String,
}

impl Default for AvroSettings {
    fn default() -> Self {
        Self {
            schema_in_message: true,
            schema: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtobufSettings {
    /// Descriptor (.desc) path relative to the resources directory.
    pub descriptor_file: String,
    pub message_type: String,
    /// Messages are prefixed with their size.
    pub delimited: bool,
}

impl Default for ProtobufSettings {
    fn default() -> Self {
        Self {
            descriptor_file: String::new(),
            message_type: String::new(),
            delimited: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_for_matches_tag() {
        for format in DataFormat::ALL {
            assert_eq!(FormatSettings::default_for(*format).data_format(), *format);
        }
    }

    #[test]
    fn test_common_defaults() {
        let cfg = DataFormatConfig::default();
        assert_eq!(cfg.charset, "UTF-8");
        assert!(!cfg.remove_ctrl_chars);
        assert_eq!(cfg.compression, Compression::None);
        assert_eq!(cfg.file_pattern_in_archive, "*");
        assert_eq!(cfg.data_format(), DataFormat::Text);
    }

    #[test]
    fn test_delimited_defaults() {
        let d = DelimitedSettings::default();
        assert_eq!(d.custom_delimiter, '|');
        assert_eq!(d.custom_escape, '\\');
        assert_eq!(d.custom_quote, '"');
        assert_eq!(d.skip_start_lines, 0);
        assert_eq!(d.header, CsvHeader::NoHeader);
    }

    #[test]
    fn test_log_defaults() {
        let l = LogSettings::default();
        assert_eq!(l.mode, LogMode::CommonLogFormat);
        assert_eq!(l.max_stack_trace_lines, 50);
        assert_eq!(l.grok_pattern, "%{COMMONAPACHELOG}");
        assert!(l.field_path_to_group.is_empty());
    }

    // ── Tagged deserialization ───────────────────────────────────

    #[test]
    fn test_deserialize_log_settings_from_toml() {
        let src = r#"
            charset = "ISO-8859-1"
            data_format = "LOG"
            mode = "REGEX"
            regex = "(\\S+) (\\S+)"

            [[field_path_to_group]]
            field_path = "/host"
            group = 1
        "#;
        let cfg: DataFormatConfig = toml::from_str(src).unwrap();
        assert_eq!(cfg.charset, "ISO-8859-1");
        match cfg.format {
            FormatSettings::Log(log) => {
                assert_eq!(log.mode, LogMode::Regex);
                assert_eq!(log.max_line_len, 1024);
                assert_eq!(log.field_path_to_group, vec![RegexFieldMapping::new("/host", 1)]);
            }
            other => panic!("expected LOG settings, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_unit_format() {
        let cfg: DataFormatConfig = toml::from_str("data_format = \"SDC_JSON\"").unwrap();
        assert_eq!(cfg.format, FormatSettings::SdcJson);
        assert_eq!(cfg.file_pattern_in_archive, "*");
    }

    #[test]
    fn test_deserialize_unknown_format_fails() {
        let result: Result<DataFormatConfig, _> = toml::from_str("data_format = \"PARQUET\"");
        assert!(result.is_err());
    }
}
