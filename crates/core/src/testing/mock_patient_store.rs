//! Mock patient store for testing.

use std::cmp::Reverse;
use std::sync::Mutex;

use chrono::Utc;

use crate::engine::AssignmentMap;
use crate::intake::{
    AdmitPatientRequest, CareStatus, IntakeError, Patient, PatientFilter, PatientId, PatientStore,
};

/// In-memory implementation of the PatientStore trait.
///
/// Provides controllable behavior for testing:
/// - Records every map passed to `apply_assignments`
/// - Simulates a failed write via `fail_next_apply`
/// - Applies maps all-or-nothing like the SQLite store
#[derive(Debug, Default)]
pub struct MockPatientStore {
    /// Patients in arrival order.
    patients: Mutex<Vec<Patient>>,
    /// Maps that were applied successfully.
    applied: Mutex<Vec<AssignmentMap>>,
    /// If set, the next `apply_assignments` will fail with this error.
    next_apply_error: Mutex<Option<IntakeError>>,
}

impl MockPatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patients(mut patients: Vec<Patient>) -> Self {
        patients.sort_by_key(|p| p.id);
        Self {
            patients: Mutex::new(patients),
            ..Self::default()
        }
    }

    /// Maps applied so far, oldest first.
    pub fn applied_maps(&self) -> Vec<AssignmentMap> {
        self.applied.lock().unwrap().clone()
    }

    pub fn fail_next_apply(&self, error: IntakeError) {
        *self.next_apply_error.lock().unwrap() = Some(error);
    }

    fn matching(&self, filter: &PatientFilter) -> Vec<Patient> {
        self.patients
            .lock()
            .unwrap()
            .iter()
            .filter(|p| filter.status.map_or(true, |s| p.status.kind() == s))
            .cloned()
            .collect()
    }
}

impl PatientStore for MockPatientStore {
    fn admit(&self, request: AdmitPatientRequest) -> Result<Patient, IntakeError> {
        let name = request.validated_name()?;
        let mut patients = self.patients.lock().unwrap();
        let next_id = patients.last().map(|p| p.id.0 + 1).unwrap_or(1);
        let patient = Patient::pending(PatientId(next_id), name, request.severity, request.emergency);
        patients.push(patient.clone());
        Ok(patient)
    }

    fn get(&self, id: PatientId) -> Result<Option<Patient>, IntakeError> {
        Ok(self
            .patients
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    fn list(&self, filter: &PatientFilter) -> Result<Vec<Patient>, IntakeError> {
        let mut patients = self.matching(filter);
        patients.sort_by_key(|p| (Reverse(p.urgency()), p.id));
        Ok(patients
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect())
    }

    fn count(&self, filter: &PatientFilter) -> Result<i64, IntakeError> {
        Ok(self.matching(filter).len() as i64)
    }

    fn pending(&self) -> Result<Vec<Patient>, IntakeError> {
        Ok(self
            .patients
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.is_pending())
            .cloned()
            .collect())
    }

    fn apply_assignments(&self, assignments: &AssignmentMap) -> Result<Vec<Patient>, IntakeError> {
        if let Some(e) = self.next_apply_error.lock().unwrap().take() {
            return Err(e);
        }

        let mut patients = self.patients.lock().unwrap();

        // Check everything before touching anything
        for assignment in assignments {
            let patient = patients
                .iter()
                .find(|p| p.id == assignment.patient_id)
                .ok_or(IntakeError::NotFound(assignment.patient_id))?;
            if !patient.is_pending() {
                return Err(IntakeError::InvalidState {
                    patient_id: patient.id,
                    current_status: patient.status.status_type().to_string(),
                    operation: "assign".to_string(),
                });
            }
        }

        let assigned_at = Utc::now();
        let mut updated = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            if let Some(patient) = patients.iter_mut().find(|p| p.id == assignment.patient_id) {
                patient.status = CareStatus::Assigned {
                    doctor_id: assignment.doctor_id,
                    assigned_at,
                };
                updated.push(patient.clone());
            }
        }

        self.applied.lock().unwrap().push(assignments.clone());
        Ok(updated)
    }
}
