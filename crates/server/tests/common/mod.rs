//! Common test utilities for API testing.
//!
//! This module provides a test fixture that creates an in-process router
//! backed by SQLite stores in a temp directory, or by caller-supplied stores
//! when a test needs to inject failures.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use triage_core::{
    Config, DatabaseConfig, Doctor, DoctorStore, PatientStore, SqliteDoctorStore,
    SqlitePatientStore,
};

/// Re-export fixtures for test convenience
pub use triage_core::testing::fixtures;

/// Test fixture for API testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_admission() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.post("/api/v1/patients", json!({
///         "name": "Ada",
///         "severity": 3
///     })).await;
///
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Temporary directory for the test database
    pub temp_dir: Option<TempDir>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Fixture with the default seeded roster
    /// (1 Smith, 2 Doe on leave, 3 Carter, 4 Brown).
    pub fn new() -> Self {
        let config = Config::default();
        let seed: Vec<Doctor> = config.roster.seed.iter().map(Doctor::from).collect();
        Self::with_roster(&seed)
    }

    /// Fixture whose roster holds exactly the given doctors.
    pub fn with_roster(doctors: &[Doctor]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let doctor_store =
            Arc::new(SqliteDoctorStore::new(&db_path).expect("Failed to create doctor store"));
        let patient_store =
            Arc::new(SqlitePatientStore::new(&db_path).expect("Failed to create patient store"));
        doctor_store.seed(doctors).expect("Failed to seed roster");

        let config = Config {
            database: DatabaseConfig { path: db_path },
            ..Config::default()
        };

        let mut fixture = Self::with_stores(config, doctor_store, patient_store);
        fixture.temp_dir = Some(temp_dir);
        fixture
    }

    /// Fixture over caller-supplied stores.
    pub fn with_stores(
        config: Config,
        doctor_store: Arc<dyn DoctorStore>,
        patient_store: Arc<dyn PatientStore>,
    ) -> Self {
        let state = Arc::new(triage_server::state::AppState::new(
            config,
            doctor_store,
            patient_store,
        ));

        Self {
            router: triage_server::api::create_router(state),
            temp_dir: None,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Fetch a path and return the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
