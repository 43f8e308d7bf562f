use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use shared_database::{Document, StoreError};
use shared_models::error::AppError;
use shared_models::schedule::{null_as_empty, Schedule, ScheduleError, Slot};

pub const DOCTORS_COLLECTION: &str = "medicos";
pub const SCHEDULE_FIELD: &str = "horarios";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cpf")]
    pub national_id: String,
    #[serde(rename = "crm")]
    pub license_number: String,
    #[serde(rename = "especialidade")]
    pub specialty: String,
    #[serde(rename = "horarios", default, deserialize_with = "null_as_empty")]
    pub schedule: Schedule<Slot>,
}

/// Body of `POST /medicos`. Fields are optional here so that a missing one
/// produces a field-specific 400 instead of a generic parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "cpf")]
    pub national_id: Option<String>,
    #[serde(rename = "crm")]
    pub license_number: Option<String>,
    #[serde(rename = "especialidade")]
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDoctor {
    pub name: String,
    pub national_id: String,
    pub license_number: String,
    pub specialty: String,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, DoctorError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DoctorError::MissingField(field)),
    }
}

impl CreateDoctorRequest {
    pub fn validate(self) -> Result<NewDoctor, DoctorError> {
        Ok(NewDoctor {
            name: required(self.name, "nome")?,
            national_id: required(self.national_id, "cpf")?,
            license_number: required(self.license_number, "crm")?,
            specialty: required(self.specialty, "especialidade")?,
        })
    }
}

impl NewDoctor {
    pub fn into_document(self) -> Document {
        let mut document = Document::new();
        document.insert("nome".to_string(), json!(self.name));
        document.insert("cpf".to_string(), json!(self.national_id));
        document.insert("crm".to_string(), json!(self.license_number));
        document.insert("especialidade".to_string(), json!(self.specialty));
        document.insert(SCHEDULE_FIELD.to_string(), json!({}));
        document
    }
}

/// Body of `PUT /medicos/{id}`. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "cpf")]
    pub national_id: Option<String>,
    #[serde(rename = "crm")]
    pub license_number: Option<String>,
    #[serde(rename = "especialidade")]
    pub specialty: Option<String>,
}

impl UpdateDoctorRequest {
    pub fn into_fields(self) -> Document {
        let mut fields = Document::new();
        let pairs = [
            ("nome", self.name),
            ("cpf", self.national_id),
            ("crm", self.license_number),
            ("especialidade", self.specialty),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                fields.insert(key.to_string(), Value::String(value));
            }
        }
        fields
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotUpdateRequest {
    pub data: Option<String>,
    pub hora: Option<String>,
    pub info: Option<Slot>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotDeleteRequest {
    pub data: Option<String>,
    pub hora: Option<String>,
}

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("A doctor with this CPF already exists")]
    DuplicateNationalId,

    #[error("A doctor with this CRM already exists")]
    DuplicateLicense,

    #[error("No valid fields to update")]
    NoValidFields,

    #[error("Schedule body must map at least one date to its slots")]
    EmptySchedule,

    #[error("Fields 'data', 'hora' and 'info' are required")]
    MissingSlotFields,

    #[error("Field 'data' is required")]
    MissingDate,

    #[error("No doctors found")]
    NoDoctors,

    #[error("Doctor not found")]
    NotFound,

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Stored doctor is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NoDoctors | DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::Schedule(_) => AppError::ValidationError(err.to_string()),
            DoctorError::Store(store) => store.into(),
            DoctorError::Malformed(_) => AppError::Internal(err.to_string()),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}
