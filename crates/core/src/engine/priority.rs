//! Urgency ordering of pending patients.

use std::borrow::Borrow;
use std::cmp::Reverse;

use serde::Serialize;

use crate::intake::Patient;

/// The (emergency, severity) pair patients are ranked by.
///
/// Field order matters: the derived `Ord` compares `emergency` first, so any
/// emergency outranks any severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct UrgencyKey {
    pub emergency: bool,
    pub severity: i32,
}

impl UrgencyKey {
    pub fn new(emergency: bool, severity: i32) -> Self {
        Self {
            emergency,
            severity,
        }
    }
}

/// Order patients most urgent first.
///
/// Emergencies come before everyone else, then higher severity first. The
/// sort is stable, so patients with equal keys keep their arrival order.
/// Accepts owned patients or references.
pub fn order<P: Borrow<Patient>>(mut patients: Vec<P>) -> Vec<P> {
    patients.sort_by_key(|p| Reverse(Borrow::<Patient>::borrow(p).urgency()));
    patients
}
