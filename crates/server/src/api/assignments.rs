//! Matching pass API handlers.

use axum::{extract::State, Json};
use std::sync::Arc;
use triage_core::PassReport;

use super::ApiError;
use crate::state::AppState;

/// Run a matching pass and apply it
pub async fn run_pass(State(state): State<Arc<AppState>>) -> Result<Json<PassReport>, ApiError> {
    Ok(Json(state.dispatcher().run_pass()?))
}

/// Show what a matching pass would do right now
pub async fn preview_pass(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PassReport>, ApiError> {
    Ok(Json(state.dispatcher().preview()?))
}
