//! Patient storage trait and types.

use thiserror::Error;

use super::{CareStatusKind, Patient, PatientId};
use crate::engine::AssignmentMap;

/// Error type for intake operations.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Patient not found: {0}")]
    NotFound(PatientId),

    #[error("Invalid patient: {0}")]
    Validation(String),

    #[error("Cannot {operation} patient {patient_id}: current status is {current_status}")]
    InvalidState {
        patient_id: PatientId,
        current_status: String,
        operation: String,
    },

    #[error("Database error: {0}")]
    Database(String),
}

/// Request to admit a patient into the queue.
#[derive(Debug, Clone)]
pub struct AdmitPatientRequest {
    pub name: String,
    pub severity: i32,
    pub emergency: bool,
}

impl AdmitPatientRequest {
    pub fn new(name: impl Into<String>, severity: i32) -> Self {
        Self {
            name: name.into(),
            severity,
            emergency: false,
        }
    }

    pub fn emergency(mut self) -> Self {
        self.emergency = true;
        self
    }

    /// Trimmed name, or a validation error when blank.
    pub fn validated_name(&self) -> Result<String, IntakeError> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            return Err(IntakeError::Validation("name cannot be empty".to_string()));
        }
        Ok(trimmed.to_string())
    }
}

/// Filter for querying patients.
#[derive(Debug, Clone, Default)]
pub struct PatientFilter {
    /// Filter by status.
    pub status: Option<CareStatusKind>,
    /// Maximum number of results.
    pub limit: i64,
    /// Offset for pagination.
    pub offset: i64,
}

impl PatientFilter {
    /// Create a new filter with defaults.
    pub fn new() -> Self {
        Self {
            status: None,
            limit: 100,
            offset: 0,
        }
    }

    pub fn with_status(mut self, status: CareStatusKind) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

/// Trait for patient storage backends.
pub trait PatientStore: Send + Sync {
    /// Admit a patient. The new patient is pending.
    fn admit(&self, request: AdmitPatientRequest) -> Result<Patient, IntakeError>;

    /// Get a patient by id.
    fn get(&self, id: PatientId) -> Result<Option<Patient>, IntakeError>;

    /// List patients matching the filter, most urgent first
    /// (emergency, then severity, then arrival).
    fn list(&self, filter: &PatientFilter) -> Result<Vec<Patient>, IntakeError>;

    /// Count patients matching the filter (limit and offset ignored).
    fn count(&self, filter: &PatientFilter) -> Result<i64, IntakeError>;

    /// All pending patients in arrival order.
    fn pending(&self) -> Result<Vec<Patient>, IntakeError>;

    /// Mark every patient in the map as assigned to its doctor.
    ///
    /// All or nothing: if any patient is missing or no longer pending, no
    /// patient is changed. Returns the updated patients in map order.
    fn apply_assignments(&self, assignments: &AssignmentMap) -> Result<Vec<Patient>, IntakeError>;
}
