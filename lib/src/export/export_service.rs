// lib/src/export/export_service.rs

use core::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use log::{info, warn};
use models::Patient;
use serde::{Deserialize, Serialize};

use super::json_export::render_json;
use super::pdf_layout::layout_history;
use super::pdf_writer::write_pdf;
use super::xml_export::render_xml;
use crate::errors::{ClinicError, Result};
use crate::history::VisitHistoryRepository;
use crate::repositories::PatientRepository;

/// Who asked for the export. Staff exports come from the doctor/admin
/// screens, patient exports from the patient's own profile; they differ in
/// file names, the PDF title and the XML attachment wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportAudience {
    Staff,
    Patient,
}

impl ExportAudience {
    pub(crate) fn attachment_present_label(self) -> &'static str {
        match self {
            ExportAudience::Staff => "Si (PDF disponible en sistema)",
            ExportAudience::Patient => "Si",
        }
    }

    pub fn pdf_title(self, national_id: &str) -> String {
        match self {
            ExportAudience::Staff => format!("Historial Clínico - Paciente ID: {}", national_id),
            ExportAudience::Patient => format!("Mi Historial Clínico - Paciente ID: {}", national_id),
        }
    }

    pub fn file_name(self, format: ExportFormat, national_id: &str) -> String {
        match (self, format) {
            (ExportAudience::Staff, ExportFormat::Json) => format!("paciente-{}.json", national_id),
            (ExportAudience::Staff, ExportFormat::Xml) => format!("paciente-{}-completo.xml", national_id),
            (ExportAudience::Staff, ExportFormat::Pdf) => format!("historial-paciente-{}.pdf", national_id),
            (ExportAudience::Patient, format) => format!("mi-historial-{}.{}", national_id, format.extension()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Xml,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Xml => "xml",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Xml => "application/xml",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "xml" => Ok(ExportFormat::Xml),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(ClinicError::ConfigurationError(format!("unknown export format '{}'", other))),
        }
    }
}

/// A rendered export, ready to be written to disk or sent to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

#[derive(Clone)]
pub struct ExportService {
    patients: PatientRepository,
    history: VisitHistoryRepository,
}

impl ExportService {
    pub fn new(patients: PatientRepository, history: VisitHistoryRepository) -> Self {
        ExportService { patients, history }
    }

    fn require_patient(&self, national_id: &str) -> Result<Patient> {
        self.patients
            .find_by_national_id(national_id)?
            .ok_or_else(|| ClinicError::NotFound(format!("no patient with national id {}", national_id)))
    }

    pub fn export_patient_as_json(&self, national_id: &str) -> Result<String> {
        self.export_patient_as_json_at(national_id, &Utc::now())
    }

    pub fn export_patient_as_json_at(&self, national_id: &str, exported_at: &DateTime<Utc>) -> Result<String> {
        let patient = self.require_patient(national_id)?;
        let visits = self.history.list_for_patient(national_id)?;
        Ok(render_json(&patient, &visits, exported_at))
    }

    pub fn export_patient_as_xml(&self, national_id: &str, audience: ExportAudience) -> Result<String> {
        self.export_patient_as_xml_at(national_id, audience, &Utc::now())
    }

    pub fn export_patient_as_xml_at(
        &self,
        national_id: &str,
        audience: ExportAudience,
        exported_at: &DateTime<Utc>,
    ) -> Result<String> {
        let patient = self.require_patient(national_id)?;
        let visits = self.history.list_for_patient(national_id)?;
        Ok(render_xml(&patient, &visits, audience, exported_at))
    }

    /// Renders the visit history as a PDF. Only the history is read; an
    /// empty history is `NotFound` since there is nothing to print.
    pub fn export_patient_as_pdf(&self, national_id: &str, audience: ExportAudience) -> Result<Vec<u8>> {
        let visits = self.history.list_for_patient(national_id)?;
        if visits.is_empty() {
            warn!("PDF export requested for patient {} without visits", national_id);
            return Err(ClinicError::NotFound(format!("no visits recorded for patient {}", national_id)));
        }
        let title = audience.pdf_title(national_id);
        let pages = layout_history(&title, &visits);
        write_pdf(&title, &pages)
    }

    pub fn export(&self, national_id: &str, format: ExportFormat, audience: ExportAudience) -> Result<ExportDocument> {
        self.export_at(national_id, format, audience, &Utc::now())
    }

    pub fn export_at(
        &self,
        national_id: &str,
        format: ExportFormat,
        audience: ExportAudience,
        exported_at: &DateTime<Utc>,
    ) -> Result<ExportDocument> {
        let body = match format {
            ExportFormat::Json => self.export_patient_as_json_at(national_id, exported_at)?.into_bytes(),
            ExportFormat::Xml => self.export_patient_as_xml_at(national_id, audience, exported_at)?.into_bytes(),
            ExportFormat::Pdf => self.export_patient_as_pdf(national_id, audience)?,
        };
        info!("Exported patient {} as {} ({} bytes)", national_id, format, body.len());
        Ok(ExportDocument {
            file_name: audience.file_name(format, national_id),
            content_type: format.content_type(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage_engine::{InMemoryStorage, StorageEngine};
    use chrono::TimeZone;
    use models::{Age, VisitRecord};
    use serde_json::Value;
    use std::sync::Arc;

    const CI: &str = "1315896547";

    fn service() -> (ExportService, VisitHistoryRepository) {
        let store: Arc<dyn StorageEngine> = Arc::new(InMemoryStorage::new());
        let patients = PatientRepository::new(store.clone());
        patients
            .create(Patient {
                full_name: "Carlos Andrade Vera".to_string(),
                national_id: CI.to_string(),
                age: Age::Years(34),
                phone: "0987654321".to_string(),
                email: "candrade@email.com".to_string(),
                allergies: "Penicilina".to_string(),
                username: CI.to_string(),
                password: "123".to_string(),
            })
            .unwrap();
        let history = VisitHistoryRepository::new(store);
        (ExportService::new(patients, history.clone()), history)
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn should_count_visits_in_json_export() {
        let (service, history) = service();
        for date in ["2025-01-10", "2025-02-10"] {
            history.append(CI, VisitRecord { date: date.to_string(), ..Default::default() }).unwrap();
        }
        let doc: Value = serde_json::from_str(&service.export_patient_as_json_at(CI, &at()).unwrap()).unwrap();
        assert_eq!(doc["metadata"]["total_encuentros"], 2);
        assert_eq!(doc["historial_medico"].as_array().unwrap().len(), 2);
        assert_eq!(doc["info_paciente"]["ci"], CI);
    }

    #[test]
    fn should_report_attachment_flag_only() {
        let (service, history) = service();
        let mut visit = VisitRecord { date: "2025-01-10".to_string(), ..Default::default() };
        visit.attached_document = Some("data:application/pdf;base64,JVBERi0xLjQ=".to_string());
        history.append(CI, visit).unwrap();

        let json = service.export_patient_as_json_at(CI, &at()).unwrap();
        let doc: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(doc["historial_medico"][0]["tiene_documento_adjunto"], "Si");
        assert!(!json.contains("JVBERi0xLjQ="));

        let xml = service.export_patient_as_xml_at(CI, ExportAudience::Staff, &at()).unwrap();
        assert!(xml.contains("Si (PDF disponible en sistema)"));
    }

    #[test]
    fn should_fail_for_unknown_patient() {
        let (service, _) = service();
        assert!(matches!(service.export_patient_as_json("1300000000"), Err(ClinicError::NotFound(_))));
        assert!(matches!(
            service.export_patient_as_xml("1300000000", ExportAudience::Staff),
            Err(ClinicError::NotFound(_))
        ));
    }

    #[test]
    fn should_refuse_pdf_without_visits() {
        let (service, history) = service();
        assert!(matches!(
            service.export_patient_as_pdf(CI, ExportAudience::Staff),
            Err(ClinicError::NotFound(_))
        ));
        history.append(CI, VisitRecord { date: "2025-01-10".to_string(), ..Default::default() }).unwrap();
        let pdf = service.export_patient_as_pdf(CI, ExportAudience::Patient).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert_eq!(
            ExportAudience::Patient.pdf_title(CI),
            "Mi Historial Clínico - Paciente ID: 1315896547"
        );
    }

    #[test]
    fn should_name_files_per_audience() {
        let (service, history) = service();
        history.append(CI, VisitRecord::default()).unwrap();

        let staff = service.export_at(CI, ExportFormat::Xml, ExportAudience::Staff, &at()).unwrap();
        assert_eq!(staff.file_name, "paciente-1315896547-completo.xml");
        assert_eq!(staff.content_type, "application/xml");

        let own = service.export_at(CI, ExportFormat::Pdf, ExportAudience::Patient, &at()).unwrap();
        assert_eq!(own.file_name, "mi-historial-1315896547.pdf");

        assert_eq!(ExportAudience::Staff.file_name(ExportFormat::Json, CI), "paciente-1315896547.json");
        assert_eq!(ExportAudience::Staff.file_name(ExportFormat::Pdf, CI), "historial-paciente-1315896547.pdf");
        assert_eq!(ExportAudience::Patient.file_name(ExportFormat::Json, CI), "mi-historial-1315896547.json");
    }

    #[test]
    fn should_parse_export_format() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert!("csv".parse::<ExportFormat>().is_err());
    }
}
