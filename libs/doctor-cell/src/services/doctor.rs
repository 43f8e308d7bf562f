use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info};

use shared_database::{AppState, Document, DocumentId, DocumentStore, ID_FIELD};

use crate::models::{CreateDoctorRequest, Doctor, DoctorError, UpdateDoctorRequest, DOCTORS_COLLECTION};

pub struct DoctorService {
    store: Arc<dyn DocumentStore>,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// All doctors; an empty collection is reported as not found.
    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Listing doctors");

        let documents = self.store.find_all(DOCTORS_COLLECTION).await?;
        if documents.is_empty() {
            return Err(DoctorError::NoDoctors);
        }

        documents
            .into_iter()
            .map(|document| serde_json::from_value(Value::Object(document)).map_err(DoctorError::from))
            .collect()
    }

    pub async fn get_doctor(&self, doctor_id: &DocumentId) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor: {}", doctor_id);

        let document = self.store
            .find_by_id(DOCTORS_COLLECTION, doctor_id)
            .await?
            .ok_or(DoctorError::NotFound)?;

        Ok(serde_json::from_value(Value::Object(document))?)
    }

    /// CPF and CRM must each be unique; `exclude` skips the doctor being edited.
    async fn ensure_unique(
        &self,
        national_id: Option<&str>,
        license_number: Option<&str>,
        exclude: Option<&DocumentId>,
    ) -> Result<(), DoctorError> {
        let is_other = |document: &Document| match exclude {
            Some(id) => document.get(ID_FIELD).and_then(Value::as_str) != Some(id.as_str()),
            None => true,
        };

        if let Some(cpf) = national_id {
            if let Some(existing) = self.store.find_one(DOCTORS_COLLECTION, "cpf", &json!(cpf)).await? {
                if is_other(&existing) {
                    return Err(DoctorError::DuplicateNationalId);
                }
            }
        }

        if let Some(crm) = license_number {
            if let Some(existing) = self.store.find_one(DOCTORS_COLLECTION, "crm", &json!(crm)).await? {
                if is_other(&existing) {
                    return Err(DoctorError::DuplicateLicense);
                }
            }
        }

        Ok(())
    }

    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<DocumentId, DoctorError> {
        let doctor = request.validate()?;
        debug!("Creating doctor: {}", doctor.name);

        self.ensure_unique(Some(&doctor.national_id), Some(&doctor.license_number), None)
            .await?;

        let id = self.store.insert(DOCTORS_COLLECTION, doctor.into_document()).await?;
        info!("Doctor created with id {}", id);
        Ok(id)
    }

    pub async fn update_doctor(&self, doctor_id: &DocumentId, request: UpdateDoctorRequest) -> Result<(), DoctorError> {
        debug!("Updating doctor: {}", doctor_id);

        if self.store.find_by_id(DOCTORS_COLLECTION, doctor_id).await?.is_none() {
            return Err(DoctorError::NotFound);
        }

        let fields = request.into_fields();
        if fields.is_empty() {
            return Err(DoctorError::NoValidFields);
        }

        self.ensure_unique(
            fields.get("cpf").and_then(Value::as_str),
            fields.get("crm").and_then(Value::as_str),
            Some(doctor_id),
        )
        .await?;

        if !self.store.update_fields(DOCTORS_COLLECTION, doctor_id, fields).await? {
            return Err(DoctorError::NotFound);
        }
        Ok(())
    }

    pub async fn delete_doctor(&self, doctor_id: &DocumentId) -> Result<(), DoctorError> {
        debug!("Deleting doctor: {}", doctor_id);

        if !self.store.delete(DOCTORS_COLLECTION, doctor_id).await? {
            return Err(DoctorError::NotFound);
        }
        info!("Doctor {} deleted", doctor_id);
        Ok(())
    }
}
