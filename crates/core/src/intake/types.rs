//! Patient data types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::UrgencyKey;
use crate::roster::DoctorId;

/// Stable identifier of a patient. Allocated in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(pub i64);

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a patient stands in the care queue.
///
/// A doctor reference exists only on `Assigned`, so a pending patient can
/// never carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CareStatus {
    /// Waiting for a doctor.
    Pending,

    /// Bound to a doctor by a matching pass.
    Assigned {
        doctor_id: DoctorId,
        assigned_at: DateTime<Utc>,
    },
}

impl CareStatus {
    /// Returns the status type as a string (for filtering/display).
    pub fn status_type(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn kind(&self) -> CareStatusKind {
        match self {
            CareStatus::Pending => CareStatusKind::Pending,
            CareStatus::Assigned { .. } => CareStatusKind::Assigned,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, CareStatus::Pending)
    }

    pub fn doctor_id(&self) -> Option<DoctorId> {
        match self {
            CareStatus::Pending => None,
            CareStatus::Assigned { doctor_id, .. } => Some(*doctor_id),
        }
    }
}

/// Status without its payload, for filters and counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareStatusKind {
    Pending,
    Assigned,
}

impl CareStatusKind {
    pub const ALL: [CareStatusKind; 2] = [CareStatusKind::Pending, CareStatusKind::Assigned];

    pub fn as_str(&self) -> &'static str {
        match self {
            CareStatusKind::Pending => "pending",
            CareStatusKind::Assigned => "assigned",
        }
    }
}

impl fmt::Display for CareStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A patient in the care queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    /// Higher is more urgent. No range is enforced.
    pub severity: i32,
    /// Emergencies outrank any severity.
    pub emergency: bool,
    pub status: CareStatus,
    pub admitted_at: DateTime<Utc>,
}

impl Patient {
    /// A freshly admitted patient, not yet matched.
    pub fn pending(id: PatientId, name: impl Into<String>, severity: i32, emergency: bool) -> Self {
        Self {
            id,
            name: name.into(),
            severity,
            emergency,
            status: CareStatus::Pending,
            admitted_at: Utc::now(),
        }
    }

    pub fn urgency(&self) -> UrgencyKey {
        UrgencyKey::new(self.emergency, self.severity)
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    pub fn doctor_id(&self) -> Option<DoctorId> {
        self.status.doctor_id()
    }
}
