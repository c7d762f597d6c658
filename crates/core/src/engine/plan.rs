//! Checked planning: validate pass inputs, then order and match.

use std::collections::HashSet;

use thiserror::Error;

use super::{assign, order, AssignmentMap};
use crate::intake::{Patient, PatientId};
use crate::roster::{Doctor, DoctorId};

/// A caller handed the engine input it promised not to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Patient {patient_id} is {status}, only pending patients can be matched")]
    PatientNotPending {
        patient_id: PatientId,
        status: &'static str,
    },

    #[error("Doctor {0} is on leave and cannot be matched")]
    DoctorUnavailable(DoctorId),

    #[error("Patient {0} appears more than once in the pass input")]
    DuplicatePatient(PatientId),

    #[error("Doctor {0} appears more than once in the pass input")]
    DuplicateDoctor(DoctorId),
}

/// Fail on the first input that breaks the engine's preconditions.
pub fn check_preconditions(patients: &[Patient], doctors: &[Doctor]) -> Result<(), EngineError> {
    let mut seen_patients = HashSet::new();
    for patient in patients {
        if !patient.is_pending() {
            return Err(EngineError::PatientNotPending {
                patient_id: patient.id,
                status: patient.status.status_type(),
            });
        }
        if !seen_patients.insert(patient.id) {
            return Err(EngineError::DuplicatePatient(patient.id));
        }
    }

    let mut seen_doctors = HashSet::new();
    for doctor in doctors {
        if !doctor.is_available() {
            return Err(EngineError::DoctorUnavailable(doctor.id));
        }
        if !seen_doctors.insert(doctor.id) {
            return Err(EngineError::DuplicateDoctor(doctor.id));
        }
    }

    Ok(())
}

/// Validate, order by urgency and match in one step.
///
/// `patients` must be in arrival order; `doctors` in the order they should be
/// consumed.
pub fn plan(patients: &[Patient], doctors: &[Doctor]) -> Result<AssignmentMap, EngineError> {
    check_preconditions(patients, doctors)?;
    let ordered = order(patients.iter().collect());
    Ok(assign(&ordered, doctors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Availability;
    use crate::testing::fixtures::{assigned_patient, available_doctor, pending_patient};

    #[test]
    fn test_plan_orders_then_matches() {
        let patients = vec![
            pending_patient(1, 3, false),
            pending_patient(2, 5, true),
            pending_patient(3, 4, false),
        ];
        let doctors = vec![available_doctor(1), available_doctor(3)];

        let map = plan(&patients, &doctors).unwrap();

        assert_eq!(map.doctor_for(PatientId(2)), Some(DoctorId(1)));
        assert_eq!(map.doctor_for(PatientId(3)), Some(DoctorId(3)));
        assert_eq!(map.doctor_for(PatientId(1)), None);
    }

    #[test]
    fn test_rejects_assigned_patient() {
        let patients = vec![pending_patient(1, 1, false), assigned_patient(2, 1, 4)];
        let err = plan(&patients, &[available_doctor(1)]).unwrap_err();
        assert_eq!(
            err,
            EngineError::PatientNotPending {
                patient_id: PatientId(2),
                status: "assigned",
            }
        );
        assert!(err.to_string().contains("Patient 2 is assigned"));
    }

    #[test]
    fn test_rejects_doctor_on_leave() {
        let mut doctor = available_doctor(2);
        doctor.availability = Availability::OnLeave;

        let err = plan(&[pending_patient(1, 1, false)], &[doctor]).unwrap_err();
        assert_eq!(err, EngineError::DoctorUnavailable(DoctorId(2)));
    }

    #[test]
    fn test_rejects_duplicate_patient() {
        let patients = vec![pending_patient(1, 1, false), pending_patient(1, 2, true)];
        let err = check_preconditions(&patients, &[]).unwrap_err();
        assert_eq!(err, EngineError::DuplicatePatient(PatientId(1)));
    }

    #[test]
    fn test_rejects_duplicate_doctor() {
        let doctors = vec![available_doctor(3), available_doctor(3)];
        let err = check_preconditions(&[], &doctors).unwrap_err();
        assert_eq!(err, EngineError::DuplicateDoctor(DoctorId(3)));
    }

    #[test]
    fn test_empty_inputs_are_valid() {
        assert!(plan(&[], &[]).unwrap().is_empty());
    }
}
