//! Grok — named pattern dictionary and expansion to a plain regex.
//!
//! `%{NAME}` inlines the pattern as a non-capturing group and
//! `%{NAME:field}` inlines it as a capture group bound to `field`
//! (a third `:type` part is accepted and ignored). Capture groups are
//! named `g0`, `g1`, ... in order of appearance so repeated field names
//! never clash inside the regex.

use std::collections::HashMap;

use super::{LogFormatError, MAX_GROK_DEPTH, MAX_GROK_EXPANSION};

/// Built-in patterns, written for the Rust regex dialect (no lookaround).
const BASE_PATTERNS: &[(&str, &str)] = &[
    ("USERNAME", r"[a-zA-Z0-9._-]+"),
    ("USER", r"%{USERNAME}"),
    ("INT", r"(?:[+-]?(?:[0-9]+))"),
    ("BASE10NUM", r"(?:[+-]?(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+))"),
    ("NUMBER", r"(?:%{BASE10NUM})"),
    ("POSINT", r"\b(?:[1-9][0-9]*)\b"),
    ("NONNEGINT", r"\b(?:[0-9]+)\b"),
    ("WORD", r"\b\w+\b"),
    ("NOTSPACE", r"\S+"),
    ("SPACE", r"\s*"),
    ("DATA", r".*?"),
    ("GREEDYDATA", r".*"),
    ("QUOTEDSTRING", r#""(?:[^"\\]|\\.)*""#),
    ("QS", r"%{QUOTEDSTRING}"),
    ("UUID", r"[A-Fa-f0-9]{8}-(?:[A-Fa-f0-9]{4}-){3}[A-Fa-f0-9]{12}"),
    (
        "IPV4",
        r"(?:(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])",
    ),
    ("IPV6", r"(?:[0-9A-Fa-f]{0,4}:){2,7}[0-9A-Fa-f]{0,4}"),
    ("IP", r"(?:%{IPV6}|%{IPV4})"),
    (
        "HOSTNAME",
        r"\b(?:[0-9A-Za-z][0-9A-Za-z-]{0,62})(?:\.(?:[0-9A-Za-z][0-9A-Za-z-]{0,62}))*\.?",
    ),
    ("HOST", r"%{HOSTNAME}"),
    ("IPORHOST", r"(?:%{IP}|%{HOSTNAME})"),
    ("HOSTPORT", r"%{IPORHOST}:%{POSINT}"),
    ("PATH", r"(?:/[^\s?#]*)+"),
    ("URIPATH", r"(?:/[A-Za-z0-9$.+!*'(){},~:;=@#%&_\-]*)+"),
    ("URIPARAM", r"\?[A-Za-z0-9$.+!*'|(){},~@#%&/=:;_?\-\[\]<>]*"),
    ("MONTH", r"\b(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:tember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\b"),
    ("MONTHNUM", r"(?:0?[1-9]|1[0-2])"),
    ("MONTHDAY", r"(?:(?:0[1-9])|(?:[12][0-9])|(?:3[01])|[1-9])"),
    ("DAY", r"(?:Mon(?:day)?|Tue(?:sday)?|Wed(?:nesday)?|Thu(?:rsday)?|Fri(?:day)?|Sat(?:urday)?|Sun(?:day)?)"),
    ("YEAR", r"(?:\d\d){1,2}"),
    ("HOUR", r"(?:2[0123]|[01]?[0-9])"),
    ("MINUTE", r"(?:[0-5][0-9])"),
    ("SECOND", r"(?:(?:[0-5]?[0-9]|60)(?:[:.,][0-9]+)?)"),
    ("TIME", r"%{HOUR}:%{MINUTE}(?::%{SECOND})?"),
    ("ISO8601_TIMEZONE", r"(?:Z|[+-]%{HOUR}(?::?%{MINUTE}))"),
    (
        "TIMESTAMP_ISO8601",
        r"%{YEAR}-%{MONTHNUM}-%{MONTHDAY}[T ]%{HOUR}:?%{MINUTE}(?::?%{SECOND})?%{ISO8601_TIMEZONE}?",
    ),
    ("HTTPDATE", r"%{MONTHDAY}/%{MONTH}/%{YEAR}:%{TIME} %{INT}"),
    ("DATESTAMP_EVENTLOG", r"%{DAY} %{MONTH} %{MONTHDAY} %{TIME} %{YEAR}"),
    (
        "LOGLEVEL",
        r"(?:[Aa]lert|ALERT|[Tt]race|TRACE|[Dd]ebug|DEBUG|[Nn]otice|NOTICE|[Ii]nfo|INFO|[Ww]arn?(?:ing)?|WARN?(?:ING)?|[Ee]rr?(?:or)?|ERR?(?:OR)?|[Cc]rit?(?:ical)?|CRIT?(?:ICAL)?|[Ff]atal|FATAL|[Ss]evere|SEVERE|EMERG(?:ENCY)?|[Ee]merg(?:ency)?)",
    ),
    ("JAVACLASS", r"(?:[a-zA-Z$_][a-zA-Z$_0-9]*\.)*[a-zA-Z$_][a-zA-Z$_0-9]*"),
    ("JAVAFILE", r"(?:[A-Za-z0-9_. -]+)"),
    (
        "COMMONAPACHELOG",
        r#"%{IPORHOST:clientip} %{USER:ident} %{USER:auth} \[%{HTTPDATE:timestamp}\] "(?:%{WORD:verb} %{NOTSPACE:request}(?: HTTP/%{NUMBER:httpversion})?|%{DATA:rawrequest})" %{NUMBER:response} (?:%{NUMBER:bytes}|-)"#,
    ),
    ("COMBINEDAPACHELOG", r"%{COMMONAPACHELOG} %{QS:referrer} %{QS:agent}"),
    (
        "APACHEERRORLOG",
        r"\[%{DATESTAMP_EVENTLOG:timestamp}\] \[%{LOGLEVEL:loglevel}\] (?:\[client %{IPORHOST:clientip}\] )?%{GREEDYDATA:message}",
    ),
];

/// Result of expanding a grok expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedPattern {
    pub regex: String,
    /// `(capture group name, field)` in order of appearance.
    pub captures: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct GrokDictionary {
    patterns: HashMap<String, String>,
}

impl GrokDictionary {
    /// Dictionary preloaded with the built-in patterns.
    pub fn with_base_patterns() -> Self {
        let patterns = BASE_PATTERNS
            .iter()
            .map(|(name, regex)| (name.to_string(), regex.to_string()))
            .collect();
        Self { patterns }
    }

    pub fn insert(&mut self, name: impl Into<String>, regex: impl Into<String>) {
        self.patterns.insert(name.into(), regex.into());
    }

    /// Add `NAME regex` definitions, one per line. Blank lines and lines
    /// starting with `#` are skipped; later definitions replace earlier ones.
    pub fn add_definitions(&mut self, block: &str) -> Result<(), LogFormatError> {
        for (idx, raw) in block.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let invalid = || LogFormatError::InvalidGrokDefinition {
                line: idx + 1,
                text: line.to_string(),
            };
            let (name, regex) = line.split_once(char::is_whitespace).ok_or_else(invalid)?;
            let regex = regex.trim();
            if !is_pattern_name(name) || regex.is_empty() {
                return Err(invalid());
            }
            self.insert(name, regex);
        }
        Ok(())
    }

    /// Expand every `%{...}` reference in `pattern`.
    pub fn expand(&self, pattern: &str) -> Result<ExpandedPattern, LogFormatError> {
        let mut captures = Vec::new();
        let regex = self.expand_inner(pattern, 0, &mut captures)?;
        Ok(ExpandedPattern { regex, captures })
    }

    fn expand_inner(
        &self,
        pattern: &str,
        depth: usize,
        captures: &mut Vec<(String, String)>,
    ) -> Result<String, LogFormatError> {
        let mut out = String::with_capacity(pattern.len());
        let mut rest = pattern;

        while let Some(start) = rest.find("%{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find('}')
                .ok_or_else(|| LogFormatError::MalformedGrokReference(after.to_string()))?;
            let reference = &after[..end];

            let mut parts = reference.splitn(3, ':');
            let name = parts.next().unwrap_or_default();
            let field = parts.next().filter(|f| !f.is_empty());
            if !is_pattern_name(name) {
                return Err(LogFormatError::MalformedGrokReference(reference.to_string()));
            }
            if depth >= MAX_GROK_DEPTH {
                return Err(LogFormatError::GrokTooDeep {
                    name: name.to_string(),
                    max: MAX_GROK_DEPTH,
                });
            }
            let body = self
                .patterns
                .get(name)
                .ok_or_else(|| LogFormatError::UnknownGrokPattern(name.to_string()))?;

            match field {
                Some(field) => {
                    let group = format!("g{}", captures.len());
                    captures.push((group.clone(), field.to_string()));
                    let inner = self.expand_inner(body, depth + 1, captures)?;
                    out.push_str(&format!("(?P<{}>{})", group, inner));
                }
                None => {
                    let inner = self.expand_inner(body, depth + 1, captures)?;
                    out.push_str(&format!("(?:{})", inner));
                }
            }
            if out.len() > MAX_GROK_EXPANSION {
                return Err(LogFormatError::GrokTooLarge {
                    name: name.to_string(),
                    max: MAX_GROK_EXPANSION,
                });
            }
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

impl Default for GrokDictionary {
    fn default() -> Self {
        Self::with_base_patterns()
    }
}

fn is_pattern_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_plain_reference() {
        let dict = GrokDictionary::with_base_patterns();
        let expanded = dict.expand("%{INT}").unwrap();
        assert_eq!(expanded.regex, "(?:(?:[+-]?(?:[0-9]+)))");
        assert!(expanded.captures.is_empty());
    }

    #[test]
    fn test_expand_named_reference() {
        let dict = GrokDictionary::with_base_patterns();
        let expanded = dict.expand("id=%{INT:id} %{WORD:name:string}").unwrap();
        assert!(expanded.regex.starts_with("id=(?P<g0>"));
        assert_eq!(
            expanded.captures,
            vec![("g0".to_string(), "id".to_string()), ("g1".to_string(), "name".to_string())]
        );
    }

    #[test]
    fn test_expand_nested_fields_are_collected() {
        let dict = GrokDictionary::with_base_patterns();
        let expanded = dict.expand("%{COMBINEDAPACHELOG}").unwrap();
        let fields: Vec<&str> = expanded.captures.iter().map(|(_, f)| f.as_str()).collect();
        assert_eq!(fields.first(), Some(&"clientip"));
        assert!(fields.contains(&"referrer"));
        assert!(fields.contains(&"agent"));
    }

    #[test]
    fn test_unknown_pattern() {
        let dict = GrokDictionary::with_base_patterns();
        assert_eq!(
            dict.expand("%{NOPE:x}"),
            Err(LogFormatError::UnknownGrokPattern("NOPE".to_string()))
        );
    }

    #[test]
    fn test_unterminated_reference() {
        let dict = GrokDictionary::with_base_patterns();
        assert!(matches!(
            dict.expand("%{INT"),
            Err(LogFormatError::MalformedGrokReference(_))
        ));
    }

    #[test]
    fn test_self_reference_is_bounded() {
        let mut dict = GrokDictionary::with_base_patterns();
        dict.insert("LOOP", "a%{LOOP}");
        assert!(matches!(dict.expand("%{LOOP}"), Err(LogFormatError::GrokTooDeep { .. })));
    }

    #[test]
    fn test_doubling_definitions_are_capped() {
        let mut block = String::from("A0 x\n");
        for i in 1..=30 {
            block.push_str(&format!("A{} %{{A{}}}%{{A{}}}\n", i, i - 1, i - 1));
        }
        let mut dict = GrokDictionary::with_base_patterns();
        dict.add_definitions(&block).unwrap();

        assert!(dict.expand("%{A10}").is_ok());
        let err = dict.expand("%{A30:field}").unwrap_err();
        assert!(matches!(err, LogFormatError::GrokTooLarge { max: MAX_GROK_EXPANSION, .. }));
    }

    // ── Definitions ──────────────────────────────────────────────

    #[test]
    fn test_add_definitions() {
        let mut dict = GrokDictionary::with_base_patterns();
        dict.add_definitions("# custom\n\nMYID [A-Z]{3}-%{INT}\n").unwrap();
        let expanded = dict.expand("%{MYID:id}").unwrap();
        assert_eq!(expanded.captures.len(), 1);
    }

    #[test]
    fn test_add_definitions_rejects_malformed_line() {
        let mut dict = GrokDictionary::with_base_patterns();
        let err = dict.add_definitions("GOOD \\d+\nBAD-NAME x").unwrap_err();
        assert_eq!(
            err,
            LogFormatError::InvalidGrokDefinition { line: 2, text: "BAD-NAME x".to_string() }
        );
        let err = dict.add_definitions("LONELY").unwrap_err();
        assert!(matches!(err, LogFormatError::InvalidGrokDefinition { line: 1, .. }));
    }
}
