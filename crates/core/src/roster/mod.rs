//! Doctor roster: who is on staff and who is available.

mod sqlite_store;
mod store;
mod types;

pub use sqlite_store::SqliteDoctorStore;
pub use store::{CreateDoctorRequest, DoctorStore, RosterError};
pub use types::{Availability, Doctor, DoctorId};
