//! Fields — per-format field checks.
//!
//! Each validator looks at every field of its format and pushes one
//! diagnostic per problem; nothing here stops at the first finding.

use std::path::Path;

use tracing::debug;

use crate::diagnostic::{Diagnostic, ErrorKind};
use crate::format::{DataFormat, DelimitedSettings, JsonSettings, ProtobufSettings, TextSettings, XmlSettings};

use super::xml_name;

/// Push a field-range diagnostic when `value < min`.
pub(crate) fn check_min(diagnostics: &mut Vec<Diagnostic>, group: &str, field: &str, value: i32, min: i32) {
    if value < min {
        debug!(group, field, value, min, "value below minimum");
        diagnostics.push(
            Diagnostic::new(group, field, ErrorKind::ValueBelowMinimum)
                .with_detail(value)
                .with_detail(min),
        );
    }
}

pub fn validate_text(settings: &TextSettings, diagnostics: &mut Vec<Diagnostic>) {
    check_min(diagnostics, DataFormat::Text.group(), "max_line_len", settings.max_line_len, 1);
}

pub fn validate_json(settings: &JsonSettings, diagnostics: &mut Vec<Diagnostic>) {
    check_min(diagnostics, DataFormat::Json.group(), "max_object_len", settings.max_object_len, 1);
}

/// Delimiter characters are `char` already, so only the numeric bounds are checked.
pub fn validate_delimited(settings: &DelimitedSettings, diagnostics: &mut Vec<Diagnostic>) {
    let group = DataFormat::Delimited.group();
    check_min(diagnostics, group, "max_record_len", settings.max_record_len, 1);
    check_min(diagnostics, group, "skip_start_lines", settings.skip_start_lines, 0);
}

pub fn validate_xml(settings: &XmlSettings, diagnostics: &mut Vec<Diagnostic>) {
    let group = DataFormat::Xml.group();
    check_min(diagnostics, group, "max_record_len", settings.max_record_len, 1);

    let element = &settings.record_element;
    if !element.is_empty() && !xml_name::is_valid_name(element) {
        diagnostics.push(
            Diagnostic::new(group, "record_element", ErrorKind::InvalidXmlElement).with_detail(element),
        );
    }
}

/// The descriptor and the message type are checked independently.
pub fn validate_protobuf(settings: &ProtobufSettings, resources_dir: &Path, diagnostics: &mut Vec<Diagnostic>) {
    let group = DataFormat::Protobuf.group();

    if settings.descriptor_file.trim().is_empty() {
        diagnostics.push(Diagnostic::new(group, "descriptor_file", ErrorKind::MissingDescriptorFile));
    } else {
        let path = resources_dir.join(&settings.descriptor_file);
        if !path.exists() {
            let shown = std::path::absolute(&path).unwrap_or(path);
            diagnostics.push(
                Diagnostic::new(group, "descriptor_file", ErrorKind::DescriptorFileNotFound)
                    .with_detail(shown.display()),
            );
        }
    }

    if settings.message_type.trim().is_empty() {
        diagnostics.push(Diagnostic::new(group, "message_type", ErrorKind::MissingMessageType));
    }
}
