//! Log4j — translate a `PatternLayout` conversion pattern into grok.
//!
//! Format modifiers (`%-5p`, `%20.30c`) are accepted; a minimum width
//! adds optional padding on the justified side.

use super::{escape_literal, LogFormatError};

const LAYOUT: &str = "log4j";

pub fn to_grok(layout: &str) -> Result<String, LogFormatError> {
    let chars: Vec<char> = layout.chars().collect();
    let mut out = String::with_capacity(layout.len() * 4);
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '%' {
            literal.push(chars[i]);
            i += 1;
            continue;
        }

        let start = i;
        i += 1;
        if chars.get(i) == Some(&'%') {
            literal.push('%');
            i += 1;
            continue;
        }

        let left_justify = chars.get(i) == Some(&'-');
        if left_justify {
            i += 1;
        }
        let mut min_width = false;
        while i < chars.len() && chars[i].is_ascii_digit() {
            min_width = true;
            i += 1;
        }
        if chars.get(i) == Some(&'.') {
            i += 1;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
        }

        let conversion = *chars
            .get(i)
            .ok_or(LogFormatError::UnterminatedDirective { layout: LAYOUT, offset: start })?;
        i += 1;

        let mut option = None;
        if chars.get(i) == Some(&'{') {
            let close = chars[i..]
                .iter()
                .position(|&c| c == '}')
                .ok_or(LogFormatError::UnterminatedDirective { layout: LAYOUT, offset: start })?;
            option = Some(chars[i + 1..i + close].iter().collect::<String>());
            i += close + 1;
        }

        let grok = conversion_to_grok(conversion, option.as_deref()).ok_or_else(|| {
            LogFormatError::UnsupportedDirective {
                layout: LAYOUT,
                directive: chars[start..i].iter().collect(),
            }
        })?;

        out.push_str(&escape_literal(&literal));
        literal.clear();
        if min_width && !left_justify {
            out.push_str(r"\s*");
        }
        out.push_str(&grok);
        if min_width && left_justify {
            out.push_str(r"\s*");
        }
    }

    out.push_str(&escape_literal(&literal));
    Ok(out)
}

fn conversion_to_grok(conversion: char, option: Option<&str>) -> Option<String> {
    let grok = match conversion {
        'c' => "%{JAVACLASS:category}",
        'C' => "%{JAVACLASS:class}",
        'd' => return Some(date_to_grok(option)),
        'F' => "%{JAVAFILE:filename}",
        'l' => "%{NOTSPACE:location}",
        'L' => "%{INT:line}",
        'm' => "%{GREEDYDATA:message}",
        'M' => "%{NOTSPACE:method}",
        'n' => "",
        'p' => "%{LOGLEVEL:severity}",
        'r' => "%{INT:relativetime}",
        't' => "%{DATA:thread}",
        'x' => "%{DATA:ndc}",
        'X' => "%{DATA:mdc}",
        _ => return None,
    };
    Some(grok.to_string())
}

fn date_to_grok(option: Option<&str>) -> String {
    match option.map(str::trim) {
        None | Some("ISO8601") => "%{TIMESTAMP_ISO8601:timestamp}".to_string(),
        Some("ABSOLUTE") => "%{TIME:timestamp}".to_string(),
        Some("DATE") => "%{MONTHDAY} %{MONTH} %{YEAR} %{TIME}".to_string(),
        Some(_) => "%{DATA:timestamp}".to_string(),
    }
}
