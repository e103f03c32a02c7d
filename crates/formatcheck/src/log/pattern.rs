//! Pattern — one compiled line pattern per log mode.

use std::collections::BTreeMap;

use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};

use super::{apache, log4j, GrokDictionary, LogFormatError};

/// A field extracted from a log line, bound to a capture group index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogField {
    pub path: String,
    pub group: usize,
}

/// A regex that matches a whole log line plus the fields it yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLinePattern {
    expression: String,
    fields: Vec<LogField>,
}

impl LogLinePattern {
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn fields(&self) -> &[LogField] {
        &self.fields
    }

    pub fn field_paths(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.path.as_str())
    }
}

fn compile(expression: &str) -> Result<RegexMatcher, LogFormatError> {
    RegexMatcherBuilder::new()
        .multi_line(false)
        .build(expression)
        .map_err(|e| LogFormatError::InvalidRegex(e.to_string()))
}

/// Number of explicit capture groups in `expression`.
pub fn capture_group_count(expression: &str) -> Result<usize, LogFormatError> {
    // capture_count includes the implicit group for the whole match.
    Ok(compile(expression)?.capture_count().saturating_sub(1))
}

/// Compile a user regex whose groups are mapped to field paths.
pub fn from_regex(
    expression: &str,
    field_path_to_group: &BTreeMap<String, usize>,
) -> Result<LogLinePattern, LogFormatError> {
    let available = capture_group_count(expression)?;
    let mut fields = Vec::with_capacity(field_path_to_group.len());
    for (path, &group) in field_path_to_group {
        if group == 0 || group > available {
            return Err(LogFormatError::GroupOutOfRange {
                field: path.clone(),
                group,
                available,
            });
        }
        fields.push(LogField { path: path.clone(), group });
    }
    Ok(LogLinePattern {
        expression: expression.to_string(),
        fields,
    })
}

/// Expand and compile a grok expression, with optional extra definitions.
pub fn from_grok(pattern: &str, definitions: &str) -> Result<LogLinePattern, LogFormatError> {
    let mut dictionary = GrokDictionary::with_base_patterns();
    dictionary.add_definitions(definitions)?;
    let expanded = dictionary.expand(pattern)?;
    let matcher = compile(&expanded.regex)?;

    let mut fields = Vec::with_capacity(expanded.captures.len());
    for (name, path) in expanded.captures {
        if let Some(group) = matcher.capture_index(&name) {
            fields.push(LogField { path, group });
        }
    }
    Ok(LogLinePattern {
        expression: expanded.regex,
        fields,
    })
}

pub fn from_apache_layout(layout: &str) -> Result<LogLinePattern, LogFormatError> {
    from_grok(&apache::to_grok(layout)?, "")
}

pub fn from_log4j_layout(layout: &str) -> Result<LogLinePattern, LogFormatError> {
    from_grok(&log4j::to_grok(layout)?, "")
}
