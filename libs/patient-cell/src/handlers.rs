use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_database::{AppState, DocumentId};
use shared_models::error::AppError;
use shared_models::schedule::{Appointment, Schedule};
use shared_utils::extractor::ValidatedJson;

use crate::models::{
    AppointmentDeleteRequest, AppointmentUpdateRequest, CreatePatientRequest, UpdatePatientRequest,
};
use crate::services::{AppointmentService, PatientService};

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let patients = PatientService::new(&state).list_patients().await?;
    Ok(Json(json!({ "pacientes": patients })))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let id = PatientService::new(&state).create_patient(request).await?;

    Ok((StatusCode::CREATED, Json(json!({
        "message": "Patient created successfully",
        "id": id
    }))))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let patient_id = DocumentId::parse(&patient_id)?;
    let patient = PatientService::new(&state).get_patient(&patient_id).await?;
    Ok(Json(json!({ "paciente": patient })))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = DocumentId::parse(&patient_id)?;
    PatientService::new(&state).update_patient(&patient_id, request).await?;
    Ok(Json(json!({ "message": "Patient updated successfully" })))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let patient_id = DocumentId::parse(&patient_id)?;
    PatientService::new(&state).delete_patient(&patient_id).await?;
    Ok(Json(json!({ "message": "Patient deleted successfully" })))
}

#[axum::debug_handler]
pub async fn get_appointments(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let patient_id = DocumentId::parse(&patient_id)?;
    let appointments = AppointmentService::new(&state).get_appointments(&patient_id).await?;
    Ok(Json(json!({ "consultas": appointments })))
}

#[axum::debug_handler]
pub async fn add_appointment_days(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
    ValidatedJson(days): ValidatedJson<Schedule<Appointment>>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let patient_id = DocumentId::parse(&patient_id)?;
    AppointmentService::new(&state).add_days(&patient_id, days).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Appointments added successfully" }))))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
    ValidatedJson(request): ValidatedJson<AppointmentUpdateRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = DocumentId::parse(&patient_id)?;
    AppointmentService::new(&state).update_appointment(&patient_id, request).await?;
    Ok(Json(json!({ "message": "Appointment updated successfully" })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
    ValidatedJson(request): ValidatedJson<AppointmentDeleteRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = DocumentId::parse(&patient_id)?;
    AppointmentService::new(&state).delete_appointment(&patient_id, request).await?;
    Ok(Json(json!({ "message": "Appointment removed successfully" })))
}
