//! Mock doctor store for testing.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::roster::{
    Availability, CreateDoctorRequest, Doctor, DoctorId, DoctorStore, RosterError,
};

/// In-memory implementation of the DoctorStore trait.
///
/// Provides controllable behavior for testing:
/// - Keeps doctors in id order like the SQLite store
/// - Simulates failures via `fail_next`
/// - Can leak on-leave doctors into `available()` to exercise validation
#[derive(Debug, Default)]
pub struct MockDoctorStore {
    doctors: Mutex<BTreeMap<DoctorId, Doctor>>,
    /// If set, the next operation will fail with this error.
    next_error: Mutex<Option<RosterError>>,
    leak_unavailable: bool,
}

impl MockDoctorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_doctors(doctors: Vec<Doctor>) -> Self {
        let store = Self::new();
        {
            let mut map = store.doctors.lock().unwrap();
            for doctor in doctors {
                map.insert(doctor.id, doctor);
            }
        }
        store
    }

    /// Return every doctor from `available()`, on leave or not.
    pub fn leaking_unavailable(mut self) -> Self {
        self.leak_unavailable = true;
        self
    }

    /// Make the next operation fail with the given error.
    pub fn fail_next(&self, error: RosterError) {
        *self.next_error.lock().unwrap() = Some(error);
    }

    fn check_error(&self) -> Result<(), RosterError> {
        match self.next_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl DoctorStore for MockDoctorStore {
    fn create(&self, request: CreateDoctorRequest) -> Result<Doctor, RosterError> {
        self.check_error()?;
        let name = request.name.trim();
        if name.is_empty() {
            return Err(RosterError::Validation("name cannot be empty".to_string()));
        }

        let mut doctors = self.doctors.lock().unwrap();
        let next_id = doctors.keys().next_back().map(|id| id.0 + 1).unwrap_or(1);
        let doctor = Doctor::new(DoctorId(next_id), name, request.availability);
        doctors.insert(doctor.id, doctor.clone());
        Ok(doctor)
    }

    fn seed(&self, seed: &[Doctor]) -> Result<usize, RosterError> {
        self.check_error()?;
        let mut doctors = self.doctors.lock().unwrap();
        let mut inserted = 0;
        for doctor in seed {
            if !doctors.contains_key(&doctor.id) {
                doctors.insert(doctor.id, doctor.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    fn get(&self, id: DoctorId) -> Result<Option<Doctor>, RosterError> {
        self.check_error()?;
        Ok(self.doctors.lock().unwrap().get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<Doctor>, RosterError> {
        self.check_error()?;
        Ok(self.doctors.lock().unwrap().values().cloned().collect())
    }

    fn available(&self) -> Result<Vec<Doctor>, RosterError> {
        self.check_error()?;
        Ok(self
            .doctors
            .lock()
            .unwrap()
            .values()
            .filter(|d| self.leak_unavailable || d.is_available())
            .cloned()
            .collect())
    }

    fn count(&self, availability: Option<Availability>) -> Result<i64, RosterError> {
        self.check_error()?;
        Ok(self
            .doctors
            .lock()
            .unwrap()
            .values()
            .filter(|d| availability.map_or(true, |a| d.availability == a))
            .count() as i64)
    }

    fn set_availability(
        &self,
        id: DoctorId,
        availability: Availability,
    ) -> Result<Doctor, RosterError> {
        self.check_error()?;
        let mut doctors = self.doctors.lock().unwrap();
        let doctor = doctors.get_mut(&id).ok_or(RosterError::NotFound(id))?;
        doctor.availability = availability;
        Ok(doctor.clone())
    }
}
