use std::sync::Arc;

use triage_core::{Config, Dispatcher, DoctorStore, PatientStore, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    doctor_store: Arc<dyn DoctorStore>,
    patient_store: Arc<dyn PatientStore>,
    dispatcher: Dispatcher,
}

impl AppState {
    /// Build state around the given stores. The dispatcher shares them.
    pub fn new(
        config: Config,
        doctor_store: Arc<dyn DoctorStore>,
        patient_store: Arc<dyn PatientStore>,
    ) -> Self {
        let dispatcher = Dispatcher::new(
            Arc::clone(&doctor_store),
            Arc::clone(&patient_store),
            config.dispatch.clone(),
        );
        Self {
            config,
            doctor_store,
            patient_store,
            dispatcher,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn doctor_store(&self) -> &dyn DoctorStore {
        self.doctor_store.as_ref()
    }

    pub fn patient_store(&self) -> &dyn PatientStore {
        self.patient_store.as_ref()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
