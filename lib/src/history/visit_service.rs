// lib/src/history/visit_service.rs

use std::path::Path;

use log::info;
use models::VisitRecord;

use super::attachment::read_attachment;
use super::visit_history::VisitHistoryRepository;
use crate::errors::{ClinicError, Result};
use crate::repositories::PatientRepository;

/// The Add-Visit flow: decode the attached document (if any), then append.
#[derive(Clone)]
pub struct VisitService {
    patients: PatientRepository,
    history: VisitHistoryRepository,
}

impl VisitService {
    pub fn new(patients: PatientRepository, history: VisitHistoryRepository) -> Self {
        VisitService { patients, history }
    }

    /// Records a visit for an existing patient.
    ///
    /// The document is read completely before anything is written; if the
    /// read fails, the history is left as it was.
    pub async fn record_visit(
        &self,
        national_id: &str,
        mut record: VisitRecord,
        attachment: Option<&Path>,
    ) -> Result<()> {
        if self.patients.find_by_national_id(national_id)?.is_none() {
            return Err(ClinicError::NotFound(format!("no patient with national id {}", national_id)));
        }

        if let Some(path) = attachment {
            record.attached_document = Some(read_attachment(path).await?);
        }

        self.history.append(national_id, record)?;
        info!("Visit recorded for patient {}", national_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage_engine::{InMemoryStorage, StorageEngine};
    use models::{Age, Patient};
    use std::sync::Arc;

    fn service() -> (VisitService, VisitHistoryRepository) {
        let store: Arc<dyn StorageEngine> = Arc::new(InMemoryStorage::new());
        let patients = PatientRepository::new(store.clone());
        patients
            .create(Patient {
                full_name: "Luis Mendoza Cedeño".to_string(),
                national_id: "1311223344".to_string(),
                age: Age::Years(45),
                phone: "0988776655".to_string(),
                email: "lmendoza@email.com".to_string(),
                allergies: "Polvo".to_string(),
                username: "1311223344".to_string(),
                password: "123".to_string(),
            })
            .unwrap();
        let history = VisitHistoryRepository::new(store);
        (VisitService::new(patients, history.clone()), history)
    }

    #[tokio::test]
    async fn should_store_decoded_attachment() {
        let (service, history) = service();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("eco.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        service
            .record_visit("1311223344", VisitRecord { reason: "Dolor".to_string(), ..Default::default() }, Some(&path))
            .await
            .unwrap();

        let visits = history.list_for_patient("1311223344").unwrap();
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].attached_document.as_deref(), Some("data:application/pdf;base64,JVBERg=="));
    }

    #[tokio::test]
    async fn should_not_persist_when_document_unreadable() {
        let (service, history) = service();
        let err = service
            .record_visit("1311223344", VisitRecord::default(), Some(Path::new("/missing/eco.pdf")))
            .await;
        assert!(err.is_err());
        assert!(history.list_for_patient("1311223344").unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_refuse_unknown_patient() {
        let (service, history) = service();
        let err = service.record_visit("1399999999", VisitRecord::default(), None).await.unwrap_err();
        assert!(matches!(err, ClinicError::NotFound(_)));
        assert!(history.list_for_patient("1399999999").unwrap().is_empty());
    }
}
