//! Intake API handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use triage_core::{AdmitPatientRequest, CareStatusKind, Patient, PatientFilter, PatientId};

use super::ApiError;
use crate::state::AppState;

/// Maximum allowed limit for patient queries
const MAX_LIMIT: i64 = 1000;

/// Default limit for patient queries
const DEFAULT_LIMIT: i64 = 100;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for admitting a patient
#[derive(Debug, Deserialize)]
pub struct AdmitPatientBody {
    pub name: String,
    /// Higher is more urgent
    pub severity: i32,
    #[serde(default)]
    pub emergency: bool,
}

/// Query parameters for listing patients
#[derive(Debug, Deserialize)]
pub struct ListPatientsParams {
    pub status: Option<CareStatusKind>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response for listing patients
#[derive(Debug, Serialize)]
pub struct ListPatientsResponse {
    pub patients: Vec<Patient>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

// ============================================================================
// Handlers
// ============================================================================

/// Admit a patient into the queue
pub async fn admit_patient(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AdmitPatientBody>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let mut request = AdmitPatientRequest::new(body.name, body.severity);
    if body.emergency {
        request = request.emergency();
    }

    let patient = state.patient_store().admit(request)?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// Get a patient by ID
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Patient>, ApiError> {
    state
        .patient_store()
        .get(PatientId(id))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Patient not found: {}", id)))
}

/// List patients, most urgent first
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListPatientsParams>,
) -> Result<Json<ListPatientsResponse>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut filter = PatientFilter::new().with_limit(limit).with_offset(offset);
    if let Some(status) = params.status {
        filter = filter.with_status(status);
    }

    let patients = state.patient_store().list(&filter)?;
    let total = state.patient_store().count(&filter)?;

    Ok(Json(ListPatientsResponse {
        patients,
        total,
        limit,
        offset,
    }))
}
