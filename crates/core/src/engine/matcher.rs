//! Greedy matching of ordered patients to available doctors.

use std::borrow::Borrow;

use serde::Serialize;

use crate::intake::{Patient, PatientId};
use crate::roster::{Doctor, DoctorId};

/// One patient bound to one doctor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
}

/// Result of a matching pass: patient → doctor bindings.
///
/// Bindings are kept in the order they were made, which is urgency order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AssignmentMap {
    assignments: Vec<Assignment>,
}

impl AssignmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Assignment> {
        self.assignments.iter()
    }

    /// Doctor bound to the given patient, if any.
    pub fn doctor_for(&self, patient_id: PatientId) -> Option<DoctorId> {
        self.assignments
            .iter()
            .find(|a| a.patient_id == patient_id)
            .map(|a| a.doctor_id)
    }

    pub fn contains_patient(&self, patient_id: PatientId) -> bool {
        self.doctor_for(patient_id).is_some()
    }

    pub fn contains_doctor(&self, doctor_id: DoctorId) -> bool {
        self.assignments.iter().any(|a| a.doctor_id == doctor_id)
    }

    pub fn patient_ids(&self) -> impl Iterator<Item = PatientId> + '_ {
        self.assignments.iter().map(|a| a.patient_id)
    }

    pub fn doctor_ids(&self) -> impl Iterator<Item = DoctorId> + '_ {
        self.assignments.iter().map(|a| a.doctor_id)
    }

    fn bind(&mut self, patient_id: PatientId, doctor_id: DoctorId) {
        self.assignments.push(Assignment {
            patient_id,
            doctor_id,
        });
    }
}

impl FromIterator<Assignment> for AssignmentMap {
    fn from_iter<I: IntoIterator<Item = Assignment>>(iter: I) -> Self {
        Self {
            assignments: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AssignmentMap {
    type Item = &'a Assignment;
    type IntoIter = std::slice::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}

/// Match patients, already in urgency order, to available doctors.
///
/// Doctors are consumed in the order given, one per patient. Once the pool is
/// empty the remaining patients are left unbound. Pure: the caller applies
/// the returned map.
pub fn assign<P, D>(ordered_patients: &[P], available_doctors: &[D]) -> AssignmentMap
where
    P: Borrow<Patient>,
    D: Borrow<Doctor>,
{
    let mut pool = available_doctors.iter().map(Borrow::<Doctor>::borrow);
    let mut map = AssignmentMap::new();

    for patient in ordered_patients.iter().map(Borrow::<Patient>::borrow) {
        let Some(doctor) = pool.next() else {
            tracing::debug!(
                patient_id = %patient.id,
                "Doctor pool exhausted, remaining patients stay pending"
            );
            break;
        };
        map.bind(patient.id, doctor.id);
    }

    map
}
