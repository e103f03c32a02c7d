//! Validator — field checks for LOG settings and builder population.
//!
//! The orchestrator creates one `LogFormatValidator` per pass, runs
//! `validate`, then hands the same value to `populate` so the builder
//! sees exactly the settings that were checked.

use std::collections::BTreeMap;

use tracing::debug;

use crate::diagnostic::{Diagnostic, ErrorKind};
use crate::factory::{keys, Mode, ParserFactoryBuilder, SettingValue};
use crate::format::{DataFormat, LogMode, LogSettings, OnParseError, RegexFieldMapping};
use crate::validate::fields::check_min;

use super::{apache, log4j, pattern, GrokDictionary};

pub struct LogFormatValidator<'a> {
    settings: &'a LogSettings,
    group: &'static str,
    field_path_to_group: BTreeMap<String, usize>,
}

impl<'a> LogFormatValidator<'a> {
    pub fn new(settings: &'a LogSettings) -> Self {
        Self {
            settings,
            group: DataFormat::Log.group(),
            field_path_to_group: field_path_to_group_map(&settings.field_path_to_group),
        }
    }

    pub fn settings(&self) -> &LogSettings {
        self.settings
    }

    /// REGEX field mapping keyed by field path.
    pub fn field_path_to_group(&self) -> &BTreeMap<String, usize> {
        &self.field_path_to_group
    }

    /// Push one diagnostic per missing or invalid field.
    pub fn validate(&self, diagnostics: &mut Vec<Diagnostic>) {
        let s = self.settings;
        debug!(mode = %s.mode, "validating log format settings");

        check_min(diagnostics, self.group, "max_line_len", s.max_line_len, 1);

        match s.mode {
            LogMode::CommonLogFormat | LogMode::CombinedLogFormat | LogMode::ApacheErrorLogFormat => {}
            LogMode::ApacheCustomLogFormat => self.validate_apache_custom(diagnostics),
            LogMode::Regex => self.validate_regex(diagnostics),
            LogMode::Grok => self.validate_grok(diagnostics),
            LogMode::Log4j => self.validate_log4j(diagnostics),
        }
    }

    fn validate_apache_custom(&self, diagnostics: &mut Vec<Diagnostic>) {
        let format = &self.settings.custom_log_format;
        if format.trim().is_empty() {
            diagnostics.push(self.diagnostic("custom_log_format", ErrorKind::MissingApacheCustomFormat));
            return;
        }
        if let Err(e) = apache::to_grok(format).and_then(|grok| pattern::from_grok(&grok, "")) {
            diagnostics.push(
                self.diagnostic("custom_log_format", ErrorKind::InvalidApacheCustomFormat)
                    .with_detail(format)
                    .with_detail(e),
            );
        }
    }

    fn validate_regex(&self, diagnostics: &mut Vec<Diagnostic>) {
        let regex = &self.settings.regex;
        if regex.trim().is_empty() {
            diagnostics.push(self.diagnostic("regex", ErrorKind::MissingRegex));
            return;
        }
        let available = match pattern::capture_group_count(regex) {
            Ok(n) => n,
            Err(e) => {
                diagnostics.push(
                    self.diagnostic("regex", ErrorKind::InvalidRegex)
                        .with_detail(regex)
                        .with_detail(e),
                );
                return;
            }
        };
        for (path, &group) in &self.field_path_to_group {
            if group == 0 || group > available {
                diagnostics.push(
                    self.diagnostic("field_path_to_group", ErrorKind::RegexGroupOutOfRange)
                        .with_detail(path)
                        .with_detail(group)
                        .with_detail(available),
                );
            }
        }
    }

    fn validate_grok(&self, diagnostics: &mut Vec<Diagnostic>) {
        let s = self.settings;
        let mut dictionary = GrokDictionary::with_base_patterns();
        let definitions_ok = match dictionary.add_definitions(&s.grok_pattern_definition) {
            Ok(()) => true,
            Err(e) => {
                diagnostics.push(
                    self.diagnostic("grok_pattern_definition", ErrorKind::InvalidGrokDefinition)
                        .with_detail(e),
                );
                false
            }
        };

        if s.grok_pattern.trim().is_empty() {
            diagnostics.push(self.diagnostic("grok_pattern", ErrorKind::MissingGrokPattern));
            return;
        }
        // A broken definition block would only produce follow-up noise here.
        if !definitions_ok {
            return;
        }
        let compiled = dictionary
            .expand(&s.grok_pattern)
            .and_then(|expanded| pattern::capture_group_count(&expanded.regex));
        if let Err(e) = compiled {
            diagnostics.push(
                self.diagnostic("grok_pattern", ErrorKind::InvalidGrokPattern)
                    .with_detail(&s.grok_pattern)
                    .with_detail(e),
            );
        }
    }

    fn validate_log4j(&self, diagnostics: &mut Vec<Diagnostic>) {
        let s = self.settings;
        if s.on_parse_error == OnParseError::IncludeAsStackTrace {
            check_min(diagnostics, self.group, "max_stack_trace_lines", s.max_stack_trace_lines, 0);
        }
        if !s.enable_log4j_custom_format {
            return;
        }
        let format = &s.log4j_custom_format;
        if format.trim().is_empty() {
            diagnostics.push(self.diagnostic("log4j_custom_format", ErrorKind::MissingLog4jFormat));
            return;
        }
        if let Err(e) = log4j::to_grok(format).and_then(|grok| pattern::from_grok(&grok, "")) {
            diagnostics.push(
                self.diagnostic("log4j_custom_format", ErrorKind::InvalidLog4jFormat)
                    .with_detail(format)
                    .with_detail(e),
            );
        }
    }

    /// Effective log4j layout: the custom one when enabled, else the default.
    pub fn log4j_format(&self) -> &str {
        if self.settings.enable_log4j_custom_format {
            &self.settings.log4j_custom_format
        } else {
            crate::format::settings::DEFAULT_LOG4J_CUSTOM_FORMAT
        }
    }

    /// Feed the log settings into `builder`, best effort.
    pub fn populate(&self, builder: ParserFactoryBuilder) -> ParserFactoryBuilder {
        let s = self.settings;
        builder
            .with_max_data_len(s.max_line_len)
            .with_mode(Mode::Log(s.mode))
            .with_setting(keys::RETAIN_ORIGINAL_LINE, SettingValue::Bool(s.retain_original_line))
            .with_setting(keys::APACHE_CUSTOM_LOG_FORMAT, SettingValue::Text(s.custom_log_format.clone()))
            .with_setting(keys::REGEX, SettingValue::Text(s.regex.clone()))
            .with_setting(
                keys::REGEX_FIELD_PATH_TO_GROUP,
                SettingValue::GroupMap(self.field_path_to_group.clone()),
            )
            .with_setting(
                keys::GROK_PATTERN_DEFINITION,
                SettingValue::Text(s.grok_pattern_definition.clone()),
            )
            .with_setting(keys::GROK_PATTERN, SettingValue::Text(s.grok_pattern.clone()))
            .with_setting(keys::LOG4J_FORMAT, SettingValue::Text(self.log4j_format().to_string()))
            .with_setting(keys::ON_PARSE_ERROR, SettingValue::Text(s.on_parse_error.as_str().to_string()))
            .with_setting(
                keys::LOG4J_TRIM_STACK_TRACES_TO_LENGTH,
                SettingValue::Int(i64::from(s.max_stack_trace_lines)),
            )
    }

    fn diagnostic(&self, field: &str, kind: ErrorKind) -> Diagnostic {
        Diagnostic::new(self.group, field, kind)
    }
}

/// Later entries win when a field path appears more than once.
pub fn field_path_to_group_map(mappings: &[RegexFieldMapping]) -> BTreeMap<String, usize> {
    let mut map = BTreeMap::new();
    for m in mappings {
        map.insert(m.field_path.clone(), m.group);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::ErrorClass;

    fn validate(settings: &LogSettings) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        LogFormatValidator::new(settings).validate(&mut diagnostics);
        diagnostics
    }

    fn with_mode(mode: LogMode) -> LogSettings {
        LogSettings { mode, ..LogSettings::default() }
    }

    // ── Defaults ─────────────────────────────────────────────────

    #[test]
    fn test_every_mode_default_is_valid() {
        for mode in LogMode::ALL {
            let diagnostics = validate(&with_mode(*mode));
            assert!(diagnostics.is_empty(), "{} produced {:?}", mode, diagnostics);
        }
    }

    #[test]
    fn test_max_line_len_bounds() {
        let d = validate(&LogSettings { max_line_len: 0, ..LogSettings::default() });
        assert_eq!(d.len(), 1);
        assert!(d[0].is_for("max_line_len"));
        assert_eq!(d[0].class(), ErrorClass::FieldRange);

        assert!(validate(&LogSettings { max_line_len: 1, ..LogSettings::default() }).is_empty());
    }

    // ── APACHE_CUSTOM_LOG_FORMAT ─────────────────────────────────

    #[test]
    fn test_apache_custom_missing() {
        let s = LogSettings { custom_log_format: " ".into(), ..with_mode(LogMode::ApacheCustomLogFormat) };
        let d = validate(&s);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].kind, ErrorKind::MissingApacheCustomFormat);
    }

    #[test]
    fn test_apache_custom_invalid_directive() {
        let s = LogSettings { custom_log_format: "%h %Z".into(), ..with_mode(LogMode::ApacheCustomLogFormat) };
        let d = validate(&s);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].kind, ErrorKind::InvalidApacheCustomFormat);
        assert!(d[0].is_for("custom_log_format"));
        assert_eq!(d[0].details[0], "%h %Z");
    }

    // ── REGEX ────────────────────────────────────────────────────

    #[test]
    fn test_regex_missing() {
        let s = LogSettings { regex: String::new(), ..with_mode(LogMode::Regex) };
        let d = validate(&s);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].kind, ErrorKind::MissingRegex);
        assert_eq!(d[0].class(), ErrorClass::MissingRequired);
    }

    #[test]
    fn test_regex_blank_is_missing() {
        let s = LogSettings { regex: "  \t".into(), ..with_mode(LogMode::Regex) };
        let d = validate(&s);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].kind, ErrorKind::MissingRegex);
        assert!(d[0].is_for("regex"));
    }

    #[test]
    fn test_regex_invalid() {
        let s = LogSettings { regex: "([a-z]".into(), ..with_mode(LogMode::Regex) };
        let d = validate(&s);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].kind, ErrorKind::InvalidRegex);
    }

    #[test]
    fn test_regex_duplicate_paths_last_wins() {
        let s = LogSettings {
            regex: r"(\S+) (\S+)".into(),
            field_path_to_group: vec![RegexFieldMapping::new("/a", 1), RegexFieldMapping::new("/a", 2)],
            ..with_mode(LogMode::Regex)
        };
        let validator = LogFormatValidator::new(&s);
        assert_eq!(validator.field_path_to_group().get("/a"), Some(&2));
        assert_eq!(validator.field_path_to_group().len(), 1);

        let mut d = Vec::new();
        validator.validate(&mut d);
        assert!(d.is_empty());
    }

    #[test]
    fn test_regex_group_out_of_range() {
        let s = LogSettings {
            regex: r"(\S+)".into(),
            field_path_to_group: vec![RegexFieldMapping::new("/a", 1), RegexFieldMapping::new("/b", 3)],
            ..with_mode(LogMode::Regex)
        };
        let d = validate(&s);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].kind, ErrorKind::RegexGroupOutOfRange);
        assert_eq!(d[0].details, vec!["/b".to_string(), "3".to_string(), "1".to_string()]);
    }

    // ── GROK ─────────────────────────────────────────────────────

    #[test]
    fn test_grok_missing_pattern() {
        let s = LogSettings { grok_pattern: String::new(), ..with_mode(LogMode::Grok) };
        let d = validate(&s);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].kind, ErrorKind::MissingGrokPattern);
    }

    #[test]
    fn test_grok_unknown_reference() {
        let s = LogSettings { grok_pattern: "%{NOT_DEFINED:x}".into(), ..with_mode(LogMode::Grok) };
        let d = validate(&s);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].kind, ErrorKind::InvalidGrokPattern);
    }

    #[test]
    fn test_grok_definitions_extend_vocabulary() {
        let s = LogSettings {
            grok_pattern_definition: "ORDER ORD-%{INT}".into(),
            grok_pattern: "%{ORDER:order} %{GREEDYDATA:rest}".into(),
            ..with_mode(LogMode::Grok)
        };
        assert!(validate(&s).is_empty());
    }

    #[test]
    fn test_grok_oversized_expansion() {
        let mut definitions = String::from("A0 x");
        for i in 1..=30 {
            definitions.push_str(&format!("\nA{} %{{A{}}}%{{A{}}}", i, i - 1, i - 1));
        }
        let s = LogSettings {
            grok_pattern_definition: definitions,
            grok_pattern: "%{A30:blob}".into(),
            ..with_mode(LogMode::Grok)
        };
        let d = validate(&s);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].kind, ErrorKind::InvalidGrokPattern);
        assert!(d[0].is_for("grok_pattern"));
    }

    #[test]
    fn test_grok_bad_definition() {
        let s = LogSettings {
            grok_pattern_definition: "JUSTANAME".into(),
            ..with_mode(LogMode::Grok)
        };
        let d = validate(&s);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].kind, ErrorKind::InvalidGrokDefinition);
        assert!(d[0].is_for("grok_pattern_definition"));
    }

    // ── LOG4J ────────────────────────────────────────────────────

    #[test]
    fn test_log4j_custom_format_required_when_enabled() {
        let s = LogSettings {
            enable_log4j_custom_format: true,
            log4j_custom_format: String::new(),
            ..with_mode(LogMode::Log4j)
        };
        let d = validate(&s);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].kind, ErrorKind::MissingLog4jFormat);
    }

    #[test]
    fn test_log4j_custom_format_ignored_when_disabled() {
        let s = LogSettings { log4j_custom_format: "%q".into(), ..with_mode(LogMode::Log4j) };
        assert!(validate(&s).is_empty());
        assert_eq!(LogFormatValidator::new(&s).log4j_format(), "%r [%t] %-5p %c %x - %m%n");
    }

    #[test]
    fn test_log4j_invalid_custom_format() {
        let s = LogSettings {
            enable_log4j_custom_format: true,
            log4j_custom_format: "%d %q".into(),
            ..with_mode(LogMode::Log4j)
        };
        let d = validate(&s);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].kind, ErrorKind::InvalidLog4jFormat);
    }

    #[test]
    fn test_stack_trace_lines_bounds() {
        let base = LogSettings { on_parse_error: OnParseError::IncludeAsStackTrace, ..with_mode(LogMode::Log4j) };

        let d = validate(&LogSettings { max_stack_trace_lines: -1, ..base.clone() });
        assert_eq!(d.len(), 1);
        assert!(d[0].is_for("max_stack_trace_lines"));

        assert!(validate(&LogSettings { max_stack_trace_lines: 0, ..base.clone() }).is_empty());

        let ignored = LogSettings { max_stack_trace_lines: -1, on_parse_error: OnParseError::Error, ..base };
        assert!(validate(&ignored).is_empty());
    }

    // ── Builder population ───────────────────────────────────────

    #[test]
    fn test_populate_sets_mode_and_group_map() {
        let s = LogSettings {
            regex: r"(\S+) (\S+)".into(),
            field_path_to_group: vec![RegexFieldMapping::new("/a", 1), RegexFieldMapping::new("/a", 2)],
            ..with_mode(LogMode::Regex)
        };
        let builder = LogFormatValidator::new(&s)
            .populate(ParserFactoryBuilder::new(DataFormat::Log.parser_format(), "."));
        let config = builder.build().unwrap();
        assert_eq!(config.max_data_len(), 1024);
        assert_eq!(config.mode_of(crate::factory::ModeKind::Log), Some(Mode::Log(LogMode::Regex)));
        let map = config.group_map(keys::REGEX_FIELD_PATH_TO_GROUP).unwrap();
        assert_eq!(map.get("/a"), Some(&2));
    }
}
