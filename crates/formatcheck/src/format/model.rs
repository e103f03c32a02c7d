//! Model — DataFormat and the option sets selected per format.
//!
//! Every enum here has a stable upper-case name (`as_str`) which is also
//! its serde representation, so TOML files and diagnostics use the same
//! spelling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::FormatError;

/// Implements `as_str`, `ALL`, `Display` and `FromStr` for a fieldless enum.
macro_rules! named_options {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = FormatError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| FormatError::UnknownValue {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

/// The data formats a parser factory can be configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataFormat {
    Text,
    Json,
    Delimited,
    Xml,
    Log,
    Avro,
    Protobuf,
    SdcJson,
}

impl DataFormat {
    pub const ALL: &'static [DataFormat] = &[
        DataFormat::Text,
        DataFormat::Json,
        DataFormat::Delimited,
        DataFormat::Xml,
        DataFormat::Log,
        DataFormat::Avro,
        DataFormat::Protobuf,
        DataFormat::SdcJson,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataFormat::Text => "TEXT",
            DataFormat::Json => "JSON",
            DataFormat::Delimited => "DELIMITED",
            DataFormat::Xml => "XML",
            DataFormat::Log => "LOG",
            DataFormat::Avro => "AVRO",
            DataFormat::Protobuf => "PROTOBUF",
            DataFormat::SdcJson => "SDC_JSON",
        }
    }

    /// Settings group label used to place diagnostics for this format.
    pub fn group(&self) -> &'static str {
        self.as_str()
    }

    /// The downstream parser family that handles this format.
    pub fn parser_format(&self) -> ParserFormat {
        match self {
            DataFormat::Text => ParserFormat::Text,
            DataFormat::Json => ParserFormat::Json,
            DataFormat::Delimited => ParserFormat::Delimited,
            DataFormat::Xml => ParserFormat::Xml,
            DataFormat::Log => ParserFormat::Log,
            DataFormat::Avro => ParserFormat::Avro,
            DataFormat::Protobuf => ParserFormat::Protobuf,
            DataFormat::SdcJson => ParserFormat::SdcRecord,
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown names are a caller contract violation, not a field problem,
/// so they get their own error instead of `UnknownValue`.
impl FromStr for DataFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FormatError::UnsupportedFormat(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParserFormat {
    Text,
    Json,
    Delimited,
    Xml,
    SdcRecord,
    Log,
    Avro,
    Protobuf,
}

named_options!(ParserFormat, "parser format", {
    Text => "TEXT",
    Json => "JSON",
    Delimited => "DELIMITED",
    Xml => "XML",
    SdcRecord => "SDC_RECORD",
    Log => "LOG",
    Avro => "AVRO",
    Protobuf => "PROTOBUF",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Compression {
    #[default]
    None,
    CompressedFile,
    Archive,
    CompressedArchive,
}

named_options!(Compression, "compression", {
    None => "NONE",
    CompressedFile => "COMPRESSED_FILE",
    Archive => "ARCHIVE",
    CompressedArchive => "COMPRESSED_ARCHIVE",
});

impl Compression {
    /// Whether the archive file-name pattern applies.
    pub fn is_archive(&self) -> bool {
        matches!(self, Compression::Archive | Compression::CompressedArchive)
    }
}

/// Layout of JSON content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JsonMode {
    ArrayObjects,
    #[default]
    MultipleObjects,
}

named_options!(JsonMode, "JSON content", {
    ArrayObjects => "ARRAY_OBJECTS",
    MultipleObjects => "MULTIPLE_OBJECTS",
});

/// Delimited dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CsvMode {
    #[default]
    Csv,
    Excel,
    Mysql,
    Rfc4180,
    Tdf,
    Custom,
}

named_options!(CsvMode, "delimiter format", {
    Csv => "CSV",
    Excel => "EXCEL",
    Mysql => "MYSQL",
    Rfc4180 => "RFC4180",
    Tdf => "TDF",
    Custom => "CUSTOM",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CsvHeader {
    WithHeader,
    IgnoreHeader,
    #[default]
    NoHeader,
}

named_options!(CsvHeader, "header line", {
    WithHeader => "WITH_HEADER",
    IgnoreHeader => "IGNORE_HEADER",
    NoHeader => "NO_HEADER",
});

/// Root field type of a delimited record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CsvRecordType {
    List,
    #[default]
    ListMap,
}

named_options!(CsvRecordType, "root field type", {
    List => "LIST",
    ListMap => "LIST_MAP",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogMode {
    #[default]
    CommonLogFormat,
    CombinedLogFormat,
    ApacheErrorLogFormat,
    ApacheCustomLogFormat,
    Regex,
    Grok,
    Log4j,
}

named_options!(LogMode, "log format", {
    CommonLogFormat => "COMMON_LOG_FORMAT",
    CombinedLogFormat => "COMBINED_LOG_FORMAT",
    ApacheErrorLogFormat => "APACHE_ERROR_LOG_FORMAT",
    ApacheCustomLogFormat => "APACHE_CUSTOM_LOG_FORMAT",
    Regex => "REGEX",
    Grok => "GROK",
    Log4j => "LOG4J",
});

/// What a log parser does with a line that does not match its pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnParseError {
    #[default]
    Error,
    Ignore,
    IncludeAsStackTrace,
}

named_options!(OnParseError, "on parse error", {
    Error => "ERROR",
    Ignore => "IGNORE",
    IncludeAsStackTrace => "INCLUDE_AS_STACK_TRACE",
});
