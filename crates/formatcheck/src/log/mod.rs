//! Log module — validation and compilation of LOG format settings.
//!
//! # Architecture
//!
//! - `grok.rs`: grok dictionary, definition blocks, and expansion to regex
//! - `apache.rs`: Apache `LogFormat` layouts translated to grok
//! - `log4j.rs`: log4j `PatternLayout` conversion patterns translated to grok
//! - `pattern.rs`: compiled line patterns per log mode
//! - `validator.rs`: the LOG sub-validator and its builder population
//!
//! Every log mode ends up as one regular expression plus an ordered list
//! of (field path, capture group) pairs.

pub mod apache;
pub mod grok;
pub mod log4j;
pub mod pattern;
pub mod validator;

use thiserror::Error;

pub use grok::GrokDictionary;
pub use pattern::{LogField, LogLinePattern};
pub use validator::LogFormatValidator;

/// Maximum nesting of `%{NAME}` references before expansion gives up.
pub const MAX_GROK_DEPTH: usize = 32;

/// Maximum length in bytes of an expanded grok expression.
pub const MAX_GROK_EXPANSION: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogFormatError {
    #[error("Invalid regular expression: {0}")]
    InvalidRegex(String),

    #[error("Unknown grok pattern: {0}")]
    UnknownGrokPattern(String),

    #[error("Malformed grok reference: %{{{0}}}")]
    MalformedGrokReference(String),

    #[error("Grok pattern nesting exceeds {max} levels at %{{{name}}}")]
    GrokTooDeep { name: String, max: usize },

    #[error("Grok expansion exceeds {max} bytes at %{{{name}}}")]
    GrokTooLarge { name: String, max: usize },

    #[error("Line {line} of the pattern definition is not 'NAME regex': {text}")]
    InvalidGrokDefinition { line: usize, text: String },

    #[error("Unsupported {layout} directive: {directive}")]
    UnsupportedDirective { layout: &'static str, directive: String },

    #[error("Unterminated {layout} directive at offset {offset}")]
    UnterminatedDirective { layout: &'static str, offset: usize },

    #[error("Group {group} for field '{field}' exceeds the {available} groups of the expression")]
    GroupOutOfRange { field: String, group: usize, available: usize },
}

/// Escape regex metacharacters so `text` matches literally.
pub(crate) fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
                | '#' | '&' | '-' | '~'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
