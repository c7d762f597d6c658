//! Runs the engine against storage.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DispatchConfig;
use crate::engine::{self, AssignmentMap, EngineError};
use crate::intake::{IntakeError, Patient, PatientId, PatientStore};
use crate::metrics::{MATCHING_PASSES, PASS_DURATION, PATIENTS_ASSIGNED, PATIENTS_LEFT_PENDING};
use crate::roster::{Doctor, DoctorId, DoctorStore, RosterError};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error("Precondition violated: {0}")]
    Precondition(#[from] EngineError),

    #[error("Dispatcher lock poisoned")]
    LockPoisoned,
}

/// Outcome of one matching pass.
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    /// Bindings made, most urgent patient first.
    pub assignments: AssignmentMap,
    /// Patients still waiting, most urgent first.
    pub unassigned_patients: Vec<PatientId>,
    /// Available doctors that received nobody.
    pub idle_doctors: Vec<DoctorId>,
    /// Whether the bindings were written to storage.
    pub applied: bool,
}

impl PassReport {
    fn from_snapshot(assignments: AssignmentMap, pending: &[Patient], available: &[Doctor]) -> Self {
        let unassigned_patients = engine::order(pending.iter().collect())
            .into_iter()
            .map(|p| p.id)
            .filter(|id| !assignments.contains_patient(*id))
            .collect();

        let idle_doctors = available
            .iter()
            .map(|d| d.id)
            .filter(|id| !assignments.contains_doctor(*id))
            .collect();

        Self {
            assignments,
            unassigned_patients,
            idle_doctors,
            applied: false,
        }
    }
}

/// Coordinates matching passes.
///
/// Reads a snapshot of pending patients and available doctors, runs the
/// engine, and applies the resulting map through the patient store. Passes
/// are serialised: a second caller waits until the first pass has applied.
pub struct Dispatcher {
    doctors: Arc<dyn DoctorStore>,
    patients: Arc<dyn PatientStore>,
    config: DispatchConfig,
    pass_lock: Mutex<()>,
}

impl Dispatcher {
    pub fn new(
        doctors: Arc<dyn DoctorStore>,
        patients: Arc<dyn PatientStore>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            doctors,
            patients,
            config,
            pass_lock: Mutex::new(()),
        }
    }

    /// Run a matching pass and persist the result.
    pub fn run_pass(&self) -> Result<PassReport, DispatchError> {
        let _guard = self
            .pass_lock
            .lock()
            .map_err(|_| DispatchError::LockPoisoned)?;
        let started = Instant::now();

        let result = self.compute().and_then(|mut report| {
            if !report.assignments.is_empty() {
                self.patients.apply_assignments(&report.assignments)?;
            }
            report.applied = true;
            Ok(report)
        });

        PASS_DURATION.observe(started.elapsed().as_secs_f64());

        match &result {
            Ok(report) => {
                let outcome = if report.assignments.is_empty() {
                    "idle"
                } else {
                    "applied"
                };
                MATCHING_PASSES.with_label_values(&[outcome]).inc();
                PATIENTS_ASSIGNED.inc_by(report.assignments.len() as u64);
                PATIENTS_LEFT_PENDING.observe(report.unassigned_patients.len() as f64);

                for assignment in &report.assignments {
                    info!(
                        patient_id = %assignment.patient_id,
                        doctor_id = %assignment.doctor_id,
                        "Patient assigned"
                    );
                }
                info!(
                    assigned = report.assignments.len(),
                    still_pending = report.unassigned_patients.len(),
                    idle_doctors = report.idle_doctors.len(),
                    "Matching pass complete"
                );
            }
            Err(e) => {
                MATCHING_PASSES.with_label_values(&["failed"]).inc();
                warn!(error = %e, "Matching pass failed, nothing applied");
            }
        }

        result
    }

    /// Compute what a pass would do without writing anything.
    pub fn preview(&self) -> Result<PassReport, DispatchError> {
        let _guard = self
            .pass_lock
            .lock()
            .map_err(|_| DispatchError::LockPoisoned)?;

        let report = self.compute()?;
        MATCHING_PASSES.with_label_values(&["preview"]).inc();
        Ok(report)
    }

    fn compute(&self) -> Result<PassReport, DispatchError> {
        let pending = self.patients.pending()?;
        let available = self.doctors.available()?;
        debug!(
            pending = pending.len(),
            available = available.len(),
            "Matching pass snapshot taken"
        );

        let assignments = if self.config.validate_inputs {
            engine::plan(&pending, &available)?
        } else {
            let ordered = engine::order(pending.iter().collect());
            engine::assign(&ordered, &available)
        };

        Ok(PassReport::from_snapshot(assignments, &pending, &available))
    }
}
