//! Diagnostics — the accumulated findings of a validation pass.
//!
//! A `Diagnostic` never aborts anything. Validators push them onto a
//! `Vec<Diagnostic>` in discovery order and move on to the next field.

use std::fmt;

/// Broad class of a diagnostic, independent of the individual code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// A numeric bound is below its minimum.
    FieldRange,
    /// A string fails the grammar it must follow.
    Structural,
    /// A conditionally required field is empty.
    MissingRequired,
    /// A referenced external file does not exist.
    Resource,
    /// A value is not supported by the runtime (recovered with a default).
    UnsupportedValue,
    /// The parser factory could not be assembled.
    Construction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ValueBelowMinimum,
    InvalidXmlElement,
    UnknownCharset,
    ParserFactoryBuild,
    MissingDescriptorFile,
    MissingMessageType,
    DescriptorFileNotFound,
    MissingApacheCustomFormat,
    InvalidApacheCustomFormat,
    MissingRegex,
    InvalidRegex,
    RegexGroupOutOfRange,
    MissingGrokPattern,
    InvalidGrokPattern,
    InvalidGrokDefinition,
    MissingLog4jFormat,
    InvalidLog4jFormat,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::ValueBelowMinimum => "DATA_FORMAT_01",
            ErrorKind::InvalidXmlElement => "DATA_FORMAT_03",
            ErrorKind::UnknownCharset => "DATA_FORMAT_05",
            ErrorKind::ParserFactoryBuild => "DATA_FORMAT_06",
            ErrorKind::MissingDescriptorFile => "DATA_FORMAT_07",
            ErrorKind::MissingMessageType => "DATA_FORMAT_08",
            ErrorKind::DescriptorFileNotFound => "DATA_FORMAT_09",
            ErrorKind::MissingApacheCustomFormat => "LOG_PARSER_05",
            ErrorKind::InvalidApacheCustomFormat => "LOG_PARSER_06",
            ErrorKind::MissingRegex => "LOG_PARSER_07",
            ErrorKind::InvalidRegex => "LOG_PARSER_08",
            ErrorKind::RegexGroupOutOfRange => "LOG_PARSER_09",
            ErrorKind::MissingGrokPattern => "LOG_PARSER_10",
            ErrorKind::InvalidGrokPattern => "LOG_PARSER_11",
            ErrorKind::InvalidGrokDefinition => "LOG_PARSER_12",
            ErrorKind::MissingLog4jFormat => "LOG_PARSER_13",
            ErrorKind::InvalidLog4jFormat => "LOG_PARSER_14",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            ErrorKind::ValueBelowMinimum => ErrorClass::FieldRange,
            ErrorKind::InvalidXmlElement
            | ErrorKind::InvalidApacheCustomFormat
            | ErrorKind::InvalidRegex
            | ErrorKind::RegexGroupOutOfRange
            | ErrorKind::InvalidGrokPattern
            | ErrorKind::InvalidGrokDefinition
            | ErrorKind::InvalidLog4jFormat => ErrorClass::Structural,
            ErrorKind::MissingDescriptorFile
            | ErrorKind::MissingMessageType
            | ErrorKind::MissingApacheCustomFormat
            | ErrorKind::MissingRegex
            | ErrorKind::MissingGrokPattern
            | ErrorKind::MissingLog4jFormat => ErrorClass::MissingRequired,
            ErrorKind::DescriptorFileNotFound => ErrorClass::Resource,
            ErrorKind::UnknownCharset => ErrorClass::UnsupportedValue,
            ErrorKind::ParserFactoryBuild => ErrorClass::Construction,
        }
    }

    /// Message template; each `{}` is filled from the diagnostic details in order.
    pub fn template(&self) -> &'static str {
        match self {
            ErrorKind::ValueBelowMinimum => "Value {} is less than the minimum of {}",
            ErrorKind::InvalidXmlElement => "Invalid XML element name '{}'",
            ErrorKind::UnknownCharset => "Unsupported charset '{}'",
            ErrorKind::ParserFactoryBuild => "Could not create the parser factory: {}",
            ErrorKind::MissingDescriptorFile => "Protobuf descriptor file must be specified",
            ErrorKind::MissingMessageType => "Protobuf message type must be specified",
            ErrorKind::DescriptorFileNotFound => "Protobuf descriptor file '{}' does not exist",
            ErrorKind::MissingApacheCustomFormat => "Custom log format must be specified",
            ErrorKind::InvalidApacheCustomFormat => "Invalid custom log format '{}': {}",
            ErrorKind::MissingRegex => "Regular expression must be specified",
            ErrorKind::InvalidRegex => "Invalid regular expression '{}': {}",
            ErrorKind::RegexGroupOutOfRange => {
                "Field '{}' maps to group {} but the expression has {} groups"
            }
            ErrorKind::MissingGrokPattern => "Grok pattern must be specified",
            ErrorKind::InvalidGrokPattern => "Invalid grok pattern '{}': {}",
            ErrorKind::InvalidGrokDefinition => "Invalid grok pattern definition: {}",
            ErrorKind::MissingLog4jFormat => "Custom log4j format must be specified",
            ErrorKind::InvalidLog4jFormat => "Invalid log4j format '{}': {}",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One finding: where it belongs, what went wrong, and the values involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Settings group the field belongs to (used for UI placement).
    pub group: String,
    /// `None` for findings about the configuration as a whole.
    pub field: Option<String>,
    pub kind: ErrorKind,
    pub details: Vec<String>,
}

impl Diagnostic {
    pub fn new(group: impl Into<String>, field: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            group: group.into(),
            field: Some(field.into()),
            kind,
            details: Vec::new(),
        }
    }

    /// Diagnostic not tied to a single field.
    pub fn general(group: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            group: group.into(),
            field: None,
            kind,
            details: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.details.push(detail.to_string());
        self
    }

    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }

    pub fn is_for(&self, field: &str) -> bool {
        self.field.as_deref() == Some(field)
    }

    /// Template of the kind with the details substituted.
    pub fn message(&self) -> String {
        let template = self.kind.template();
        let mut out = String::with_capacity(template.len() + 16);
        let mut details = self.details.iter();
        let mut rest = template;
        while let Some(pos) = rest.find("{}") {
            out.push_str(&rest[..pos]);
            match details.next() {
                Some(d) => out.push_str(d),
                None => out.push_str("{}"),
            }
            rest = &rest[pos + 2..];
        }
        out.push_str(rest);
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "[{}.{}] ", self.group, field)?,
            None => write!(f, "[{}] ", self.group)?,
        }
        write!(f, "{} - {}", self.kind.code(), self.message())
    }
}
