use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{assignments, doctors, handlers, middleware::metrics_middleware, patients};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Roster
        .route("/doctors", get(doctors::list_doctors).post(doctors::create_doctor))
        .route("/doctors/{id}", get(doctors::get_doctor))
        .route("/doctors/{id}/availability", put(doctors::set_availability))
        // Intake
        .route("/patients", get(patients::list_patients).post(patients::admit_patient))
        .route("/patients/{id}", get(patients::get_patient))
        // Matching
        .route("/assignments", post(assignments::run_pass))
        .route("/assignments/preview", get(assignments::preview_pass));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
