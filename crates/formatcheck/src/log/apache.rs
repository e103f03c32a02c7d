//! Apache — translate an Apache `LogFormat` layout into a grok expression.
//!
//! Supports the mod_log_config directives (`%h`, `%>s`, `%{Referer}i`,
//! ...) including the `<`/`>` request selectors and status-code
//! conditions such as `%400,501{User-agent}i`. Literal text is escaped.

use super::{escape_literal, LogFormatError};

const LAYOUT: &str = "Apache";

/// Translate `layout` into a grok expression.
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

        // Status-code condition and request selector, both irrelevant for matching.
        while i < chars.len() && (chars[i] == '!' || chars[i] == ',' || chars[i].is_ascii_digit()) {
            i += 1;
        }
        while i < chars.len() && (chars[i] == '<' || chars[i] == '>') {
            i += 1;
        }

        let mut argument = None;
        if chars.get(i) == Some(&'{') {
            let close = chars[i..]
                .iter()
                .position(|&c| c == '}')
                .ok_or(LogFormatError::UnterminatedDirective { layout: LAYOUT, offset: start })?;
            argument = Some(chars[i + 1..i + close].iter().collect::<String>());
            i += close + 1;
        }

        let directive = *chars
            .get(i)
            .ok_or(LogFormatError::UnterminatedDirective { layout: LAYOUT, offset: start })?;
        i += 1;

        out.push_str(&escape_literal(&literal));
        literal.clear();
        out.push_str(&directive_to_grok(directive, argument.as_deref()).ok_or_else(|| {
            LogFormatError::UnsupportedDirective {
                layout: LAYOUT,
                directive: chars[start..i].iter().collect(),
            }
        })?);
    }

    out.push_str(&escape_literal(&literal));
    Ok(out)
}

fn directive_to_grok(directive: char, argument: Option<&str>) -> Option<String> {
    let grok = match (directive, argument) {
        ('a', _) => "%{IPORHOST:remoteIpAddress}".to_string(),
        ('A', _) => "%{IPORHOST:localIpAddress}".to_string(),
        ('b', _) => "(?:%{NUMBER:bytesSent}|-)".to_string(),
        ('B', _) => "%{NUMBER:bytesSent}".to_string(),
        ('C', Some(name)) => format!("%{{DATA:cookie.{}}}", field_suffix(name)),
        ('D', _) => "%{NUMBER:timeToServeMicroSeconds}".to_string(),
        ('e', Some(name)) => format!("%{{DATA:env.{}}}", field_suffix(name)),
        ('f', _) => "%{NOTSPACE:fileName}".to_string(),
        ('h', _) => "%{IPORHOST:remoteHost}".to_string(),
        ('H', _) => "%{NOTSPACE:requestProtocol}".to_string(),
        ('i', Some(name)) => format!("%{{DATA:requestHeader.{}}}", field_suffix(name)),
        ('I', _) => "%{NUMBER:bytesReceived}".to_string(),
        ('k', _) => "%{NUMBER:keepAliveRequests}".to_string(),
        ('l', _) => "%{USER:logName}".to_string(),
        ('L', _) => "%{NOTSPACE:requestLogId}".to_string(),
        ('m', _) => "%{WORD:requestMethod}".to_string(),
        ('n', Some(name)) => format!("%{{DATA:note.{}}}", field_suffix(name)),
        ('o', Some(name)) => format!("%{{DATA:responseHeader.{}}}", field_suffix(name)),
        ('O', _) => "%{NUMBER:bytesSentWithHeaders}".to_string(),
        ('p', _) => "%{POSINT:serverPort}".to_string(),
        ('P', _) => "%{POSINT:processId}".to_string(),
        ('q', _) => "(?:%{URIPARAM:queryString})?".to_string(),
        ('r', _) => "(?:%{WORD:requestMethod} %{NOTSPACE:urlPath}(?: HTTP/%{NUMBER:httpVersion})?|%{DATA:request})".to_string(),
        ('R', _) => "%{NOTSPACE:handler}".to_string(),
        ('s', _) => "%{NUMBER:status}".to_string(),
        ('t', None) => r"\[%{HTTPDATE:timestamp}\]".to_string(),
        ('t', Some(_)) => "%{DATA:timestamp}".to_string(),
        ('T', _) => "%{NUMBER:timeToServe}".to_string(),
        ('u', _) => "%{USER:remoteUser}".to_string(),
        ('U', _) => "%{URIPATH:urlPath}".to_string(),
        ('v', _) | ('V', _) => "%{IPORHOST:serverName}".to_string(),
        ('X', _) => "%{NOTSPACE:connectionStatus}".to_string(),
        _ => return None,
    };
    Some(grok)
}

/// Header, cookie and variable names become lower-case field suffixes.
/// `:` separates the grok field from its type, so it becomes `_`.
fn field_suffix(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace(':', "_")
}
