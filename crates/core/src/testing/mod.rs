//! Testing utilities and in-memory store implementations.
//!
//! The mocks implement the storage traits without SQLite so the dispatcher
//! and HTTP layer can be exercised with controllable failures.
//!
//! # Example
//!
//! ```rust,ignore
//! use triage_core::testing::{fixtures, MockDoctorStore, MockPatientStore};
//!
//! let doctors = MockDoctorStore::with_doctors(vec![fixtures::available_doctor(1)]);
//! let patients = MockPatientStore::with_patients(vec![fixtures::pending_patient(1, 5, false)]);
//!
//! // Make the next write fail
//! patients.fail_next_apply(IntakeError::Database("disk full".into()));
//! ```

mod mock_doctor_store;
mod mock_patient_store;

pub use mock_doctor_store::MockDoctorStore;
pub use mock_patient_store::MockPatientStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::Utc;

    use crate::intake::{CareStatus, Patient, PatientId};
    use crate::roster::{Availability, Doctor, DoctorId};

    /// A pending patient named after its id.
    pub fn pending_patient(id: i64, severity: i32, emergency: bool) -> Patient {
        Patient::pending(PatientId(id), format!("Patient {}", id), severity, emergency)
    }

    /// A non-emergency patient already bound to `doctor_id`.
    pub fn assigned_patient(id: i64, severity: i32, doctor_id: i64) -> Patient {
        let mut patient = pending_patient(id, severity, false);
        patient.status = CareStatus::Assigned {
            doctor_id: DoctorId(doctor_id),
            assigned_at: Utc::now(),
        };
        patient
    }

    /// An available doctor named after its id.
    pub fn available_doctor(id: i64) -> Doctor {
        Doctor::new(DoctorId(id), format!("Dr. {}", id), Availability::Available)
    }

    /// A doctor on leave.
    pub fn doctor_on_leave(id: i64) -> Doctor {
        Doctor::new(DoctorId(id), format!("Dr. {}", id), Availability::OnLeave)
    }
}
