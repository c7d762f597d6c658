//! Roster API handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use triage_core::{Availability, CreateDoctorRequest, Doctor, DoctorId};

use super::ApiError;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

/// Request body for adding a doctor
#[derive(Debug, Deserialize)]
pub struct CreateDoctorBody {
    pub name: String,
    /// Defaults to available
    #[serde(default)]
    pub on_leave: bool,
}

/// Query parameters for listing doctors
#[derive(Debug, Deserialize)]
pub struct ListDoctorsParams {
    /// Only doctors that can take patients
    #[serde(default)]
    pub available: bool,
}

/// Request body for changing availability
#[derive(Debug, Deserialize)]
pub struct AvailabilityBody {
    pub availability: Availability,
}

// ============================================================================
// Handlers
// ============================================================================

/// List the roster, id ascending
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListDoctorsParams>,
) -> Result<Json<Vec<Doctor>>, ApiError> {
    let doctors = if params.available {
        state.doctor_store().available()?
    } else {
        state.doctor_store().list()?
    };
    Ok(Json(doctors))
}

/// Add a doctor
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateDoctorBody>,
) -> Result<(StatusCode, Json<Doctor>), ApiError> {
    let mut request = CreateDoctorRequest::new(body.name);
    if body.on_leave {
        request = request.on_leave();
    }

    let doctor = state.doctor_store().create(request)?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

/// Get a doctor by ID
pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Doctor>, ApiError> {
    state
        .doctor_store()
        .get(DoctorId(id))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Doctor not found: {}", id)))
}

/// Put a doctor on leave or bring them back
pub async fn set_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<AvailabilityBody>,
) -> Result<Json<Doctor>, ApiError> {
    let doctor = state
        .doctor_store()
        .set_availability(DoctorId(id), body.availability)?;
    Ok(Json(doctor))
}
