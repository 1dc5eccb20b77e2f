//! Error kinds surfaced by the scheduling and records core.
//!
//! Every core operation either returns its typed value or one of these.
//! Turning them into user-facing text is the presentation layer's job.

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::db::DatabaseError;
use crate::models::enums::Role;
use crate::models::{DoctorId, PatientId};

/// Which calendar already holds the requested time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSide {
    /// The doctor is booked by someone at that time.
    Doctor,
    /// The patient already holds another appointment at that time.
    Patient,
}

impl ConflictSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::Patient => "patient",
        }
    }
}

impl std::fmt::Display for ConflictSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Slot {at} is already booked on the {side} side")]
    SlotConflict { side: ConflictSide, at: NaiveDateTime },

    #[error("No appointment exists between doctor {doctor_id} and patient {patient_id}")]
    NoGoverningAppointment { doctor_id: DoctorId, patient_id: PatientId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Prescription has no medicine lines")]
    EmptyPrescription,

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("A {role} may not {action}")]
    Forbidden { action: &'static str, role: Role },

    #[error("Storage failure: {0}")]
    Storage(#[from] DatabaseError),
}

impl From<rusqlite::Error> for ClinicError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(DatabaseError::Sqlite(e))
    }
}

impl ClinicError {
    pub(crate) fn not_found(entity_type: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }
}
