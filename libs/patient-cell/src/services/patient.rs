use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use shared_database::{AppState, DocumentId, DocumentStore};

use crate::models::{CreatePatientRequest, Patient, PatientError, UpdatePatientRequest, PATIENTS_COLLECTION};

pub struct PatientService {
    store: Arc<dyn DocumentStore>,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>, PatientError> {
        debug!("Listing patients");

        let documents = self.store.find_all(PATIENTS_COLLECTION).await?;
        if documents.is_empty() {
            return Err(PatientError::NoPatients);
        }

        let mut patients = Vec::with_capacity(documents.len());
        for document in documents {
            patients.push(serde_json::from_value(Value::Object(document))?);
        }
        Ok(patients)
    }

    pub async fn get_patient(&self, patient_id: &DocumentId) -> Result<Patient, PatientError> {
        debug!("Fetching patient: {}", patient_id);

        match self.store.find_by_id(PATIENTS_COLLECTION, patient_id).await? {
            Some(document) => Ok(serde_json::from_value(Value::Object(document))?),
            None => Err(PatientError::NotFound),
        }
    }

    /// Patients carry no uniqueness constraint; the same CPF may be registered twice.
    pub async fn create_patient(&self, request: CreatePatientRequest) -> Result<DocumentId, PatientError> {
        let patient = request.validate()?;
        debug!("Creating patient: {}", patient.name);

        let id = self.store.insert(PATIENTS_COLLECTION, patient.into_document()).await?;
        info!("Patient created with id {}", id);
        Ok(id)
    }

    pub async fn update_patient(&self, patient_id: &DocumentId, request: UpdatePatientRequest) -> Result<(), PatientError> {
        let fields = request.into_fields();
        if fields.is_empty() {
            return Err(PatientError::NoValidFields);
        }
        debug!("Updating patient {}: {:?}", patient_id, fields.keys().collect::<Vec<_>>());

        if !self.store.update_fields(PATIENTS_COLLECTION, patient_id, fields).await? {
            return Err(PatientError::NotFound);
        }
        Ok(())
    }

    pub async fn delete_patient(&self, patient_id: &DocumentId) -> Result<(), PatientError> {
        debug!("Deleting patient: {}", patient_id);

        if !self.store.delete(PATIENTS_COLLECTION, patient_id).await? {
            return Err(PatientError::NotFound);
        }
        info!("Patient {} deleted", patient_id);
        Ok(())
    }
}
