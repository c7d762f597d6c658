//! HTTP API integration tests against an in-process router.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use common::{fixtures, TestFixture};
use triage_core::{
    testing::{MockDoctorStore, MockPatientStore},
    Config, DoctorStore, IntakeError, PatientStore, RosterError,
};

async fn admit(fixture: &TestFixture, name: &str, severity: i32, emergency: bool) -> i64 {
    let response = fixture
        .post(
            "/api/v1/patients",
            json!({ "name": name, "severity": severity, "emergency": emergency }),
        )
        .await;
    assert_status!(response, StatusCode::CREATED);
    response.body["id"].as_i64().unwrap()
}

// ============================================================================
// Health, config, metrics
// ============================================================================

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_config_is_sanitized() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/config").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["roster"]["seed_count"], 4);
    assert!(response.body["roster"].get("seed").is_none());
    assert_eq!(response.body["dispatch"]["validate_inputs"], true);
}

#[tokio::test]
async fn test_metrics_endpoint_reports_queue_gauges() {
    let fixture = TestFixture::new();
    admit(&fixture, "Ada", 2, false).await;

    let (status, body) = fixture.get_text("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("triage_patients_by_status"));
    assert!(body.contains("triage_doctors_by_availability"));
    assert!(body.contains("triage_http_requests_total"));
}

// ============================================================================
// Roster
// ============================================================================

#[tokio::test]
async fn test_default_roster_is_seeded() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/doctors").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 4);

    let response = fixture.get("/api/v1/doctors?available=true").await;
    let ids: Vec<i64> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3, 4]);
}

#[tokio::test]
async fn test_create_and_get_doctor() {
    let fixture = TestFixture::with_roster(&[]);

    let response = fixture
        .post("/api/v1/doctors", json!({ "name": "  Dr. House " }))
        .await;
    assert_status!(response, StatusCode::CREATED);
    assert_eq!(response.body["name"], "Dr. House");
    assert_eq!(response.body["availability"], "available");

    let id = response.body["id"].as_i64().unwrap();
    let response = fixture.get(&format!("/api/v1/doctors/{}", id)).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["name"], "Dr. House");
}

#[tokio::test]
async fn test_create_doctor_blank_name() {
    let fixture = TestFixture::with_roster(&[]);
    let response = fixture.post("/api/v1/doctors", json!({ "name": "   " })).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_get_doctor_not_found() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/doctors/999").await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_set_availability() {
    let fixture = TestFixture::new();

    let response = fixture
        .put(
            "/api/v1/doctors/2/availability",
            json!({ "availability": "available" }),
        )
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["availability"], "available");

    let response = fixture
        .put(
            "/api/v1/doctors/42/availability",
            json!({ "availability": "on_leave" }),
        )
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

// ============================================================================
// Intake
// ============================================================================

#[tokio::test]
async fn test_admit_patient() {
    let fixture = TestFixture::new();

    let response = fixture
        .post("/api/v1/patients", json!({ "name": "Ada", "severity": 4 }))
        .await;
    assert_status!(response, StatusCode::CREATED);
    assert_eq!(response.body["status"]["type"], "pending");
    assert_eq!(response.body["emergency"], false);

    let id = response.body["id"].as_i64().unwrap();
    let response = fixture.get(&format!("/api/v1/patients/{}", id)).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["severity"], 4);
}

#[tokio::test]
async fn test_admit_rejects_blank_name() {
    let fixture = TestFixture::new();
    let response = fixture
        .post("/api/v1/patients", json!({ "name": "", "severity": 1 }))
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admit_rejects_non_numeric_severity() {
    let fixture = TestFixture::new();
    let response = fixture
        .post("/api/v1/patients", json!({ "name": "Ada", "severity": "high" }))
        .await;
    assert!(response.status.is_client_error());

    let response = fixture
        .post_raw("/api/v1/patients", r#"{"name": "Ada", "severity": "#)
        .await;
    assert!(response.status.is_client_error());
}

#[tokio::test]
async fn test_get_patient_not_found() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/patients/12").await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_patients_in_priority_order() {
    let fixture = TestFixture::new();
    admit(&fixture, "low", 1, false).await;
    admit(&fixture, "high", 8, false).await;
    admit(&fixture, "emergency", 2, true).await;
    admit(&fixture, "also low", 1, false).await;

    let response = fixture.get("/api/v1/patients").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["total"], 4);

    let names: Vec<&str> = response.body["patients"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["emergency", "high", "low", "also low"]);

    let response = fixture.get("/api/v1/patients?limit=2&offset=1").await;
    assert_eq!(response.body["patients"].as_array().unwrap().len(), 2);
    assert_eq!(response.body["patients"][0]["name"], "high");
    assert_eq!(response.body["total"], 4);
}

// ============================================================================
// Matching passes
// ============================================================================

#[tokio::test]
async fn test_emergency_gets_the_only_doctor() {
    let fixture = TestFixture::with_roster(&[fixtures::available_doctor(1)]);
    let p1 = admit(&fixture, "P1", 3, false).await;
    let p2 = admit(&fixture, "P2", 5, true).await;

    let response = fixture.post_empty("/api/v1/assignments").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["applied"], true);
    assert_eq!(
        response.body["assignments"],
        json!([{ "patient_id": p2, "doctor_id": 1 }])
    );
    assert_eq!(response.body["unassigned_patients"], json!([p1]));

    let response = fixture.get(&format!("/api/v1/patients/{}", p2)).await;
    assert_eq!(response.body["status"]["type"], "assigned");
    assert_eq!(response.body["status"]["doctor_id"], 1);

    let response = fixture.get(&format!("/api/v1/patients/{}", p1)).await;
    assert_eq!(response.body["status"]["type"], "pending");
}

#[tokio::test]
async fn test_pass_skips_doctor_on_leave() {
    let fixture = TestFixture::new();
    for name in ["a", "b", "c", "d"] {
        admit(&fixture, name, 1, false).await;
    }

    let response = fixture.post_empty("/api/v1/assignments").await;
    assert_status!(response, StatusCode::OK);

    let doctors: Vec<i64> = response.body["assignments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["doctor_id"].as_i64().unwrap())
        .collect();
    assert_eq!(doctors, vec![1, 3, 4]);
    assert_eq!(response.body["unassigned_patients"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_preview_changes_nothing() {
    let fixture = TestFixture::new();
    let id = admit(&fixture, "Ada", 3, false).await;

    let response = fixture.get("/api/v1/assignments/preview").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["applied"], false);
    assert_eq!(response.body["assignments"][0]["patient_id"], id);
    assert_eq!(response.body["idle_doctors"], json!([3, 4]));

    let response = fixture.get(&format!("/api/v1/patients/{}", id)).await;
    assert_eq!(response.body["status"]["type"], "pending");
}

#[tokio::test]
async fn test_empty_pass() {
    let fixture = TestFixture::new();
    let response = fixture.post_empty("/api/v1/assignments").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["assignments"], json!([]));
    assert_eq!(response.body["idle_doctors"], json!([1, 3, 4]));
}

#[tokio::test]
async fn test_storage_failure_is_500() {
    let doctors = Arc::new(MockDoctorStore::with_doctors(vec![fixtures::available_doctor(1)]));
    let patients = Arc::new(MockPatientStore::with_patients(vec![
        fixtures::pending_patient(1, 2, false),
    ]));
    patients.fail_next_apply(IntakeError::Database("disk I/O error".to_string()));

    let fixture = TestFixture::with_stores(
        Config::default(),
        doctors as Arc<dyn DoctorStore>,
        patients.clone() as Arc<dyn PatientStore>,
    );

    let response = fixture.post_empty("/api/v1/assignments").await;
    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body["error"].as_str().unwrap().contains("disk I/O error"));
    assert!(patients.applied_maps().is_empty());
}

#[tokio::test]
async fn test_roster_failure_is_500() {
    let doctors = Arc::new(MockDoctorStore::with_doctors(vec![fixtures::available_doctor(1)]));
    let patients = Arc::new(MockPatientStore::with_patients(vec![
        fixtures::pending_patient(1, 2, false),
    ]));
    doctors.fail_next(RosterError::Database("roster table locked".to_string()));

    let fixture = TestFixture::with_stores(
        Config::default(),
        doctors as Arc<dyn DoctorStore>,
        patients.clone() as Arc<dyn PatientStore>,
    );

    let response = fixture.post_empty("/api/v1/assignments").await;
    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("roster table locked"));
    assert!(patients.applied_maps().is_empty());
}

#[tokio::test]
async fn test_bad_snapshot_is_422() {
    let doctors = Arc::new(
        MockDoctorStore::with_doctors(vec![fixtures::doctor_on_leave(5)]).leaking_unavailable(),
    );
    let patients = Arc::new(MockPatientStore::with_patients(vec![
        fixtures::pending_patient(1, 2, false),
    ]));

    let fixture = TestFixture::with_stores(
        Config::default(),
        doctors as Arc<dyn DoctorStore>,
        patients as Arc<dyn PatientStore>,
    );

    let response = fixture.post_empty("/api/v1/assignments").await;
    assert_status!(response, StatusCode::UNPROCESSABLE_ENTITY);
}
