// lib/src/repositories/patient_repository.rs

use std::sync::Arc;

use log::info;
use models::{Login, Patient};

use super::record_collection::{RecordCollection, StoredRecord};
use crate::errors::Result;
use crate::history::VisitHistoryRepository;
use crate::storage_engine::keys::PATIENTS_KEY;
use crate::storage_engine::StorageEngine;

impl StoredRecord for Patient {
    const COLLECTION_KEY: &'static str = PATIENTS_KEY;
    const KIND: &'static str = "patient";

    fn national_id(&self) -> &str {
        &self.national_id
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn password(&self) -> &str {
        &self.password
    }
}

/// Patients plus the cascade onto their visit histories.
#[derive(Clone)]
pub struct PatientRepository {
    records: RecordCollection<Patient>,
    history: VisitHistoryRepository,
}

impl PatientRepository {
    pub fn new(store: Arc<dyn StorageEngine>) -> Self {
        PatientRepository {
            records: RecordCollection::new(Arc::clone(&store)),
            history: VisitHistoryRepository::new(store),
        }
    }

    pub fn is_initialized(&self) -> Result<bool> {
        self.records.is_initialized()
    }

    pub fn list_all(&self) -> Result<Vec<Patient>> {
        self.records.list_all()
    }

    pub fn find_by_national_id(&self, national_id: &str) -> Result<Option<Patient>> {
        self.records.find_by_national_id(national_id)
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<Patient>> {
        self.records.find_by_username(username)
    }

    pub fn find_by_credentials(&self, login: &Login) -> Result<Option<Patient>> {
        self.records.find_by_credentials(login)
    }

    pub fn create(&self, patient: Patient) -> Result<()> {
        self.records.create(patient)
    }

    pub fn update(&self, national_id: &str, patient: Patient) -> Result<()> {
        self.records.update(national_id, patient)
    }

    /// Removes the patient, then the patient's whole visit history.
    pub fn delete(&self, national_id: &str) -> Result<Patient> {
        let removed = self.records.delete(national_id)?;
        self.history.delete_all_for_patient(national_id)?;
        info!("Patient {} deleted together with its history", national_id);
        Ok(removed)
    }

    pub fn save_all(&self, patients: &[Patient]) -> Result<()> {
        self.records.save_all(patients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ClinicError;
    use crate::storage_engine::InMemoryStorage;
    use models::{Age, VisitRecord};

    fn patient(ci: &str, username: &str) -> Patient {
        Patient {
            full_name: "Carlos Andrade Vera".to_string(),
            national_id: ci.to_string(),
            age: Age::Years(34),
            phone: "0987654321".to_string(),
            email: "candrade@email.com".to_string(),
            allergies: "Penicilina".to_string(),
            username: username.to_string(),
            password: "123".to_string(),
        }
    }

    fn setup() -> (Arc<InMemoryStorage>, PatientRepository, VisitHistoryRepository) {
        let store = Arc::new(InMemoryStorage::new());
        let repo = PatientRepository::new(store.clone());
        let history = VisitHistoryRepository::new(store.clone());
        (store, repo, history)
    }

    #[test]
    fn should_find_created_patient_unchanged() {
        let (_, repo, _) = setup();
        let created = patient("1315896547", "1315896547");
        repo.create(created.clone()).unwrap();
        assert_eq!(repo.find_by_national_id("1315896547").unwrap(), Some(created));
    }

    #[test]
    fn should_keep_insertion_order() {
        let (_, repo, _) = setup();
        for ci in ["1311223344", "1309874563", "1315896547"] {
            repo.create(patient(ci, ci)).unwrap();
        }
        let order: Vec<_> = repo.list_all().unwrap().into_iter().map(|p| p.national_id).collect();
        assert_eq!(order, vec!["1311223344", "1309874563", "1315896547"]);
    }

    #[test]
    fn should_reject_duplicate_national_id_and_username() {
        let (store, repo, _) = setup();
        repo.create(patient("1315896547", "carlos")).unwrap();
        let snapshot = store.get(PATIENTS_KEY).unwrap();

        assert!(matches!(
            repo.create(patient("1315896547", "otro")),
            Err(ClinicError::DuplicateNationalId(_))
        ));
        assert!(matches!(
            repo.create(patient("1309874563", "carlos")),
            Err(ClinicError::DuplicateUsername(_))
        ));
        assert_eq!(store.get(PATIENTS_KEY).unwrap(), snapshot);
    }

    #[test]
    fn should_reject_username_taken_by_another_patient() {
        let (_, repo, _) = setup();
        repo.create(patient("1315896547", "1315896547")).unwrap();
        repo.create(patient("1309874563", "1309874563")).unwrap();

        let mut edit = patient("1309874563", "1315896547");
        edit.full_name = "Ana Zambrano Ponce".to_string();
        assert!(matches!(
            repo.update("1309874563", edit),
            Err(ClinicError::DuplicateUsername(_))
        ));
        assert_eq!(repo.find_by_national_id("1309874563").unwrap(), Some(patient("1309874563", "1309874563")));
    }

    #[test]
    fn should_update_in_place_and_allow_username_change() {
        let (_, repo, _) = setup();
        repo.create(patient("1315896547", "1315896547")).unwrap();
        repo.create(patient("1309874563", "1309874563")).unwrap();

        let mut edit = patient("1315896547", "candrade");
        edit.age = Age::Text("35".to_string());
        repo.update("1315896547", edit.clone()).unwrap();

        let all = repo.list_all().unwrap();
        assert_eq!(all[0], edit);
        assert_eq!(repo.find_by_username("candrade").unwrap().unwrap().national_id, "1315896547");
        // Keeping one's own username is not a collision.
        repo.update("1315896547", edit).unwrap();
    }

    #[test]
    fn should_refuse_update_of_missing_or_rekeyed_patient() {
        let (_, repo, _) = setup();
        assert!(matches!(
            repo.update("1315896547", patient("1315896547", "x")),
            Err(ClinicError::NotFound(_))
        ));
        repo.create(patient("1315896547", "x")).unwrap();
        assert!(matches!(
            repo.update("1315896547", patient("1300000000", "x")),
            Err(ClinicError::ImmutableField(_))
        ));
    }

    #[test]
    fn should_cascade_delete_to_history() {
        let (store, repo, history) = setup();
        repo.create(patient("1315896547", "1315896547")).unwrap();
        history.append("1315896547", VisitRecord::default()).unwrap();
        history.append("1315896547", VisitRecord::default()).unwrap();

        repo.delete("1315896547").unwrap();

        assert!(repo.find_by_national_id("1315896547").unwrap().is_none());
        assert!(history.list_for_patient("1315896547").unwrap().is_empty());
        assert!(store.get("paciente_1315896547").unwrap().is_none());
    }

    #[test]
    fn should_not_touch_history_when_patient_missing() {
        let (_, repo, history) = setup();
        history.append("1315896547", VisitRecord::default()).unwrap();
        assert!(matches!(repo.delete("1315896547"), Err(ClinicError::NotFound(_))));
        assert_eq!(history.list_for_patient("1315896547").unwrap().len(), 1);
    }
}
