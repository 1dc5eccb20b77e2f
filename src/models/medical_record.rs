use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{AppointmentId, DoctorId, MedicalRecordId, PatientId};

/// Doctor-entered fields of a medical record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalRecordEntry {
    pub diagnosis: String,
    pub treatment: String,
    pub notes: Option<String>,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: MedicalRecordId,
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub doctor_name: String,
    pub appointment_id: Option<AppointmentId>,
    pub diagnosis: String,
    pub treatment: String,
    pub notes: Option<String>,
    pub created_date: NaiveDateTime,
}
