// models/src/medical/encounter.rs

use serde::{Deserialize, Serialize};

/// One clinical visit ("encuentro") in a patient's history.
///
/// Every text field is whatever the doctor typed; missing fields in stored
/// data read back as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitRecord {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "motivo")]
    pub reason: String,
    #[serde(rename = "peso")]
    pub weight: String,
    #[serde(rename = "presion")]
    pub blood_pressure: String,
    #[serde(rename = "diagnostico")]
    pub diagnosis: String,
    #[serde(rename = "tratamiento")]
    pub treatment: String,
    #[serde(rename = "observaciones")]
    pub notes: String,
    /// Attached document encoded as a data URL; `null` when absent.
    #[serde(rename = "pdfData")]
    pub attached_document: Option<String>,
}

impl VisitRecord {
    pub fn has_attachment(&self) -> bool {
        self.attached_document.as_deref().is_some_and(|doc| !doc.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_write_null_when_no_document() {
        let visit = VisitRecord { date: "2025-03-01".to_string(), ..Default::default() };
        let value = serde_json::to_value(&visit).unwrap();
        assert!(value["pdfData"].is_null());
        assert_eq!(value["fecha"], "2025-03-01");
        assert!(!visit.has_attachment());
    }

    #[test]
    fn should_tolerate_missing_fields() {
        let visit: VisitRecord = serde_json::from_str(r#"{"motivo":"Control","pdfData":"data:application/pdf;base64,AAAA"}"#).unwrap();
        assert_eq!(visit.reason, "Control");
        assert_eq!(visit.date, "");
        assert!(visit.has_attachment());
    }
}
