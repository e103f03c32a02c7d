//! Charset — resolve a charset name to a decoder.
//!
//! Resolution never fails: an unknown name falls back to UTF-8 and the
//! caller gets a diagnostic, so the rest of the pass can still run.

use encoding_rs::{Encoding, UTF_8};
use tracing::warn;

use crate::diagnostic::{Diagnostic, ErrorKind};

pub type Charset = &'static Encoding;

pub const DEFAULT_CHARSET: Charset = UTF_8;

pub const CHARSET_FIELD: &str = "charset";

/// Look up `name` (WHATWG labels, case-insensitive, surrounding whitespace ignored).
pub fn lookup(name: &str) -> Option<Charset> {
    Encoding::for_label(name.trim().as_bytes())
}

/// Resolve `name`, substituting UTF-8 plus a diagnostic in `group` when unknown.
pub fn resolve(name: &str, group: &str) -> (Charset, Option<Diagnostic>) {
    match lookup(name) {
        Some(charset) => (charset, None),
        None => {
            warn!(charset = %name, "unsupported charset, falling back to UTF-8");
            let diagnostic = Diagnostic::new(group, CHARSET_FIELD, ErrorKind::UnknownCharset)
                .with_detail(name);
            (DEFAULT_CHARSET, Some(diagnostic))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_names() {
        let (cs, diag) = resolve("UTF-8", "DATA_FORMAT");
        assert_eq!(cs, UTF_8);
        assert!(diag.is_none());

        let (cs, diag) = resolve("iso-8859-1", "DATA_FORMAT");
        assert_eq!(cs.name(), "windows-1252");
        assert!(diag.is_none());
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_utf8() {
        let (cs, diag) = resolve("not-a-real-charset", "DATA_FORMAT");
        assert_eq!(cs, UTF_8);
        let diag = diag.expect("unknown charset should be reported");
        assert_eq!(diag.kind, ErrorKind::UnknownCharset);
        assert_eq!(diag.group, "DATA_FORMAT");
        assert!(diag.is_for("charset"));
        assert_eq!(diag.details, vec!["not-a-real-charset".to_string()]);
    }

    #[test]
    fn test_lookup_ignores_case_and_whitespace() {
        assert_eq!(lookup("  Shift_JIS "), Some(encoding_rs::SHIFT_JIS));
        assert!(lookup("").is_none());
    }
}
