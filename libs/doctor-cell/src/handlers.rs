use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_database::{AppState, DocumentId};
use shared_models::error::AppError;
use shared_models::schedule::{Schedule, Slot};
use shared_utils::extractor::ValidatedJson;

use crate::models::{CreateDoctorRequest, SlotDeleteRequest, SlotUpdateRequest, UpdateDoctorRequest};
use crate::services::{DoctorScheduleService, DoctorService};

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let doctors = DoctorService::new(&state).list_doctors().await?;
    Ok(Json(json!({ "medicos": doctors })))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let id = DoctorService::new(&state).create_doctor(request).await?;

    Ok((StatusCode::CREATED, Json(json!({
        "message": "Doctor created successfully",
        "id": id
    }))))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = DocumentId::parse(&doctor_id)?;
    let doctor = DoctorService::new(&state).get_doctor(&doctor_id).await?;
    Ok(Json(json!({ "medico": doctor })))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = DocumentId::parse(&doctor_id)?;
    DoctorService::new(&state).update_doctor(&doctor_id, request).await?;
    Ok(Json(json!({ "message": "Doctor updated successfully" })))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = DocumentId::parse(&doctor_id)?;
    DoctorService::new(&state).delete_doctor(&doctor_id).await?;
    Ok(Json(json!({ "message": "Doctor deleted successfully" })))
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = DocumentId::parse(&doctor_id)?;
    let schedule = DoctorScheduleService::new(&state).get_schedule(&doctor_id).await?;
    Ok(Json(json!({ "horarios": schedule })))
}

#[axum::debug_handler]
pub async fn add_schedule_days(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
    ValidatedJson(days): ValidatedJson<Schedule<Slot>>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let doctor_id = DocumentId::parse(&doctor_id)?;
    DoctorScheduleService::new(&state).replace_days(&doctor_id, days).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Schedule added successfully" }))))
}

#[axum::debug_handler]
pub async fn update_slot(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
    ValidatedJson(request): ValidatedJson<SlotUpdateRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = DocumentId::parse(&doctor_id)?;
    DoctorScheduleService::new(&state).update_slot(&doctor_id, request).await?;
    Ok(Json(json!({ "message": "Slot updated successfully" })))
}

#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
    ValidatedJson(request): ValidatedJson<SlotDeleteRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = DocumentId::parse(&doctor_id)?;
    DoctorScheduleService::new(&state).delete_slot(&doctor_id, request).await?;
    Ok(Json(json!({ "message": "Slot removed successfully" })))
}
