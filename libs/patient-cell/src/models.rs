use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use shared_database::{Document, StoreError};
use shared_models::error::AppError;
use shared_models::schedule::{null_as_empty, Appointment, Schedule, ScheduleError};

pub const PATIENTS_COLLECTION: &str = "pacientes";
pub const APPOINTMENTS_FIELD: &str = "consultas";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cpf")]
    pub national_id: String,
    #[serde(rename = "celular")]
    pub phone: String,
    #[serde(rename = "idade")]
    pub age: u32,
    #[serde(rename = "consultas", default, deserialize_with = "null_as_empty")]
    pub appointments: Schedule<Appointment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "cpf")]
    pub national_id: Option<String>,
    #[serde(rename = "celular")]
    pub phone: Option<String>,
    #[serde(rename = "idade")]
    pub age: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    pub name: String,
    pub national_id: String,
    pub phone: String,
    pub age: u32,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, PatientError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PatientError::MissingField(field)),
    }
}

impl CreatePatientRequest {
    pub fn validate(self) -> Result<NewPatient, PatientError> {
        Ok(NewPatient {
            name: required(self.name, "nome")?,
            national_id: required(self.national_id, "cpf")?,
            phone: required(self.phone, "celular")?,
            age: self.age.ok_or(PatientError::MissingField("idade"))?,
        })
    }
}

impl NewPatient {
    pub fn into_document(self) -> Document {
        let mut document = Document::new();
        document.insert("nome".to_string(), json!(self.name));
        document.insert("cpf".to_string(), json!(self.national_id));
        document.insert("celular".to_string(), json!(self.phone));
        document.insert("idade".to_string(), json!(self.age));
        document.insert(APPOINTMENTS_FIELD.to_string(), json!({}));
        document
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "cpf")]
    pub national_id: Option<String>,
    #[serde(rename = "celular")]
    pub phone: Option<String>,
    #[serde(rename = "idade")]
    pub age: Option<u32>,
}

impl UpdatePatientRequest {
    pub fn into_fields(self) -> Document {
        let mut fields = Document::new();
        if let Some(name) = self.name {
            fields.insert("nome".to_string(), json!(name));
        }
        if let Some(national_id) = self.national_id {
            fields.insert("cpf".to_string(), json!(national_id));
        }
        if let Some(phone) = self.phone {
            fields.insert("celular".to_string(), json!(phone));
        }
        if let Some(age) = self.age {
            fields.insert("idade".to_string(), json!(age));
        }
        fields
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentUpdateRequest {
    pub data: Option<String>,
    pub hora: Option<String>,
    pub detalhes: Option<Appointment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentDeleteRequest {
    pub data: Option<String>,
    pub hora: Option<String>,
}

#[derive(Debug, Error)]
pub enum PatientError {
    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("No valid fields to update")]
    NoValidFields,

    #[error("Appointments body must map at least one date to its entries")]
    EmptyAppointments,

    #[error("Fields 'data', 'hora' and 'detalhes' are required")]
    MissingAppointmentFields,

    #[error("Field 'data' is required")]
    MissingDate,

    #[error("No patients found")]
    NoPatients,

    #[error("Patient not found")]
    NotFound,

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Stored patient is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NoPatients | PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::Schedule(_) => AppError::ValidationError(err.to_string()),
            PatientError::Store(store) => store.into(),
            PatientError::Malformed(_) => AppError::Internal(err.to_string()),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}
