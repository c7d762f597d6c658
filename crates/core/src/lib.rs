pub mod config;
pub mod dispatch;
pub mod engine;
pub mod intake;
pub mod metrics;
pub mod roster;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    SanitizedConfig,
};
pub use dispatch::{DispatchError, Dispatcher, PassReport};
pub use engine::{assign, order, plan, Assignment, AssignmentMap, EngineError, UrgencyKey};
pub use intake::{
    AdmitPatientRequest, CareStatus, CareStatusKind, IntakeError, Patient, PatientFilter,
    PatientId, PatientStore, SqlitePatientStore,
};
pub use roster::{
    Availability, CreateDoctorRequest, Doctor, DoctorId, DoctorStore, RosterError,
    SqliteDoctorStore,
};
