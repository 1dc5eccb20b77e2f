//! Caller identity passed explicitly into every core operation.
//!
//! Authentication happens outside this crate; what arrives here is an
//! already-verified identity with its role. Patients act on their own
//! calendar and history, doctors write clinical records.

use serde::{Deserialize, Serialize};

use crate::error::ClinicError;
use crate::models::enums::Role;
use crate::models::{DoctorId, PatientId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "snake_case")]
pub enum Caller {
    Patient(PatientId),
    Doctor(DoctorId),
}

impl Caller {
    pub fn role(&self) -> Role {
        match self {
            Self::Patient(_) => Role::Patient,
            Self::Doctor(_) => Role::Doctor,
        }
    }

    /// The patient id, or `Forbidden` naming `action` for any other role.
    pub fn require_patient(&self, action: &'static str) -> Result<&PatientId, ClinicError> {
        match self {
            Self::Patient(id) => Ok(id),
            other => Err(forbidden(other, action)),
        }
    }

    /// The doctor id, or `Forbidden` naming `action` for any other role.
    pub fn require_doctor(&self, action: &'static str) -> Result<DoctorId, ClinicError> {
        match self {
            Self::Doctor(id) => Ok(*id),
            other => Err(forbidden(other, action)),
        }
    }
}

fn forbidden(caller: &Caller, action: &'static str) -> ClinicError {
    tracing::warn!(role = %caller.role(), action, "Rejected caller role");
    ClinicError::Forbidden {
        action,
        role: caller.role(),
    }
}
