//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the triage server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Queue and roster gauges (collected on scrape)
//! - Core matching pass metrics, registered from `triage_core::metrics`

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};
use triage_core::{Availability, CareStatusKind, PatientFilter};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "triage_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("triage_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "triage_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Queue Metrics (collected dynamically)
// =============================================================================

/// Patients by care status.
pub static PATIENTS_BY_STATUS: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new("triage_patients_by_status", "Current patient count by status"),
        &["status"],
    )
    .unwrap()
});

/// Doctors by availability.
pub static DOCTORS_BY_AVAILABILITY: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new(
            "triage_doctors_by_availability",
            "Current doctor count by availability",
        ),
        &["availability"],
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Queue and roster
    registry
        .register(Box::new(PATIENTS_BY_STATUS.clone()))
        .unwrap();
    registry
        .register(Box::new(DOCTORS_BY_AVAILABILITY.clone()))
        .unwrap();

    // Core metrics (matching passes, admissions)
    for metric in triage_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the gauges reflect the stores at scrape time.
/// Store errors leave the previous value in place.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let patients = state.patient_store();
    for kind in CareStatusKind::ALL {
        let filter = PatientFilter::new().with_status(kind);
        if let Ok(count) = patients.count(&filter) {
            PATIENTS_BY_STATUS
                .with_label_values(&[kind.as_str()])
                .set(count);
        }
    }

    let doctors = state.doctor_store();
    for availability in [Availability::Available, Availability::OnLeave] {
        if let Ok(count) = doctors.count(Some(availability)) {
            DOCTORS_BY_AVAILABILITY
                .with_label_values(&[availability.as_str()])
                .set(count);
        }
    }
}

/// Normalize a path for metric labels (replace numeric IDs with placeholders).
pub fn normalize_path(path: &str) -> String {
    static NUMERIC: Lazy<regex_lite::Regex> = Lazy::new(|| {
        regex_lite::Regex::new(r"/\d+(/|$)").expect("numeric id pattern is valid")
    });

    // Run twice so adjacent ids (`/1/2`) both get replaced
    let once = NUMERIC.replace_all(path, "/{id}$1");
    NUMERIC.replace_all(&once, "/{id}$1").into_owned()
}
