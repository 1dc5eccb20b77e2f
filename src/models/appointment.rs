use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{AppointmentId, DoctorId, PatientId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub scheduled_at: NaiveDateTime,
    pub reason: String,
}

/// A patient's own appointment, with the doctor's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientAppointment {
    pub id: AppointmentId,
    pub doctor_id: DoctorId,
    pub doctor_name: String,
    pub scheduled_at: NaiveDateTime,
    pub reason: String,
}

/// One line of a doctor's agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: AppointmentId,
    pub patient_id: PatientId,
    pub patient_name: String,
    pub scheduled_at: NaiveDateTime,
    pub reason: String,
}
