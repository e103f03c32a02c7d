//! Factory module — assembling a parser-factory configuration.
//!
//! - `builder.rs`: `ParserFactoryBuilder`, the staged accumulator
//! - `config.rs`: `ParserFactoryConfig`, the immutable result, plus modes,
//!   setting values and setting keys

pub mod builder;
pub mod config;

use thiserror::Error;

use crate::log::LogFormatError;

pub use builder::ParserFactoryBuilder;
pub use config::{keys, ControlCharPolicy, Mode, ModeKind, ParserFactoryConfig, SettingValue, UNBOUNDED};

/// Maximum number of characters a reader may buffer past a record boundary.
pub const MAX_OVERRUN_LIMIT: i32 = 1_048_576;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Overrun limit must be positive, got {0}")]
    InvalidOverrunLimit(i32),

    #[error("Maximum data length has not been set")]
    MaxDataLenNotSet,

    #[error("Invalid maximum data length {0}, expected -1 or a positive value")]
    InvalidMaxDataLen(i32),

    #[error("Mode {0} has not been set")]
    MissingMode(&'static str),

    #[error("Setting '{0}' has not been set")]
    MissingSetting(&'static str),

    #[error("Setting '{0}' must not be empty")]
    EmptySetting(&'static str),

    #[error("Setting '{key}' must be a {expected}")]
    WrongSettingType { key: &'static str, expected: &'static str },

    #[error("Invalid delimited format: {0}")]
    InvalidDelimiters(String),

    #[error("Invalid Avro schema: {0}")]
    InvalidAvroSchema(String),

    #[error("Cannot read protobuf descriptor file '{0}'")]
    DescriptorUnreadable(String),

    #[error("Cannot compile log line pattern: {0}")]
    LogPattern(#[from] LogFormatError),
}
