//! Doctor storage trait and types.

use thiserror::Error;

use super::{Availability, Doctor, DoctorId};

/// Error type for roster operations.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Doctor not found: {0}")]
    NotFound(DoctorId),

    #[error("Invalid doctor: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Request to add a doctor to the roster.
#[derive(Debug, Clone)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub availability: Availability,
}

impl CreateDoctorRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            availability: Availability::Available,
        }
    }

    pub fn on_leave(mut self) -> Self {
        self.availability = Availability::OnLeave;
        self
    }
}

/// Trait for doctor roster backends.
///
/// Listing operations return doctors in ascending id order. The matching pass
/// consumes `available()` in that order.
pub trait DoctorStore: Send + Sync {
    /// Add a doctor. The name must not be blank.
    fn create(&self, request: CreateDoctorRequest) -> Result<Doctor, RosterError>;

    /// Insert doctors with fixed ids, skipping ids that already exist.
    /// Returns how many were inserted.
    fn seed(&self, doctors: &[Doctor]) -> Result<usize, RosterError>;

    /// Get a doctor by id.
    fn get(&self, id: DoctorId) -> Result<Option<Doctor>, RosterError>;

    /// All doctors.
    fn list(&self) -> Result<Vec<Doctor>, RosterError>;

    /// Doctors that are not on leave.
    fn available(&self) -> Result<Vec<Doctor>, RosterError>;

    /// Count doctors, optionally only those with the given availability.
    fn count(&self, availability: Option<Availability>) -> Result<i64, RosterError>;

    /// Put a doctor on leave or bring them back.
    fn set_availability(
        &self,
        id: DoctorId,
        availability: Availability,
    ) -> Result<Doctor, RosterError>;
}

/// Trim and check a doctor name.
pub(crate) fn normalize_name(name: &str) -> Result<String, RosterError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RosterError::Validation(
            "name cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
