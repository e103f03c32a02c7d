//! Format module — the closed set of data formats and their settings.
//!
//! - `model.rs`: `DataFormat` and the option enums each format chooses from
//! - `settings.rs`: per-format settings, tagged by `DataFormat`

pub mod model;
pub mod settings;

use thiserror::Error;

pub use model::{
    Compression, CsvHeader, CsvMode, CsvRecordType, DataFormat, JsonMode, LogMode, OnParseError,
    ParserFormat,
};
pub use settings::{
    AvroSettings, DataFormatConfig, DelimitedSettings, FormatSettings, JsonSettings, LogSettings,
    ProtobufSettings, RegexFieldMapping, TextSettings, XmlSettings,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Unsupported data format: {0}")]
    UnsupportedFormat(String),

    #[error("Unknown {kind} value: {value}")]
    UnknownValue { kind: &'static str, value: String },
}
