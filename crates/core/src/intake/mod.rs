//! Patient intake: admission, the care queue and its storage.

mod sqlite_store;
mod store;
mod types;

pub use sqlite_store::SqlitePatientStore;
pub use store::{AdmitPatientRequest, IntakeError, PatientFilter, PatientStore};
pub use types::{CareStatus, CareStatusKind, Patient, PatientId};
