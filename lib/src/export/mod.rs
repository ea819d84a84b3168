// lib/src/export/mod.rs

pub mod export_service;
pub mod json_export;
pub mod pdf_layout;
pub mod pdf_writer;
pub mod xml_export;

pub use export_service::{ExportAudience, ExportDocument, ExportFormat, ExportService};
pub use json_export::render_json;
pub use pdf_layout::{layout_history, LayoutElement, LayoutPage};
pub use pdf_writer::write_pdf;
pub use xml_export::render_xml;

use chrono::{DateTime, SecondsFormat, Utc};

/// Timestamp format of the metadata block, e.g. `2025-03-01T14:05:09.120Z`.
pub fn export_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Text used for an empty value, as displayed on the profile pages.
pub(crate) fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
