//! Doctor roster data types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::SeedDoctor;

/// Stable identifier of a doctor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoctorId(pub i64);

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a doctor can take patients right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    OnLeave,
}

impl Availability {
    /// Map the storage-level on-leave flag.
    pub fn from_on_leave(on_leave: bool) -> Self {
        if on_leave {
            Availability::OnLeave
        } else {
            Availability::Available
        }
    }

    pub fn is_on_leave(&self) -> bool {
        matches!(self, Availability::OnLeave)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::OnLeave => "on_leave",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A doctor on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub availability: Availability,
}

impl Doctor {
    pub fn new(id: DoctorId, name: impl Into<String>, availability: Availability) -> Self {
        Self {
            id,
            name: name.into(),
            availability,
        }
    }

    pub fn is_available(&self) -> bool {
        self.availability == Availability::Available
    }
}

impl From<&SeedDoctor> for Doctor {
    fn from(seed: &SeedDoctor) -> Self {
        Doctor::new(
            DoctorId(seed.id),
            seed.name.clone(),
            Availability::from_on_leave(seed.on_leave),
        )
    }
}
