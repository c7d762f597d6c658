//! Prometheus metrics for core components.
//!
//! Matching pass metrics plus the admission counter. Registered into the
//! server's registry via `all_metrics()`.

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts};

/// Matching passes total by outcome.
pub static MATCHING_PASSES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("triage_matching_passes_total", "Total matching passes"),
        &["outcome"], // "applied", "idle", "preview", "failed"
    )
    .unwrap()
});

/// Patients admitted into the care queue.
pub static PATIENTS_ADMITTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "triage_patients_admitted_total",
        "Total patients admitted since startup",
    )
    .unwrap()
});

/// Patients bound to a doctor.
pub static PATIENTS_ASSIGNED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "triage_patients_assigned_total",
        "Total patients assigned to a doctor",
    )
    .unwrap()
});

/// Matching pass duration in seconds.
pub static PASS_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "triage_pass_duration_seconds",
            "Duration of a matching pass including storage reads and writes",
        )
        .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
    )
    .unwrap()
});

/// Patients still waiting after a pass.
pub static PATIENTS_LEFT_PENDING: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "triage_patients_left_pending",
            "Number of patients left pending after a successful pass, idle passes included",
        )
        .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(MATCHING_PASSES.clone()),
        Box::new(PATIENTS_ADMITTED.clone()),
        Box::new(PATIENTS_ASSIGNED.clone()),
        Box::new(PASS_DURATION.clone()),
        Box::new(PATIENTS_LEFT_PENDING.clone()),
    ]
}
