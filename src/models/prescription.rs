use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AppointmentId, DoctorId, PatientId, PrescriptionDetailId, PrescriptionId};

/// One medicine as entered by the doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineLine {
    pub medicine_name: String,
    pub dosage: String,
    pub instructions: Option<String>,
}

impl MedicineLine {
    pub fn new(medicine_name: impl Into<String>, dosage: impl Into<String>) -> Self {
        Self {
            medicine_name: medicine_name.into(),
            dosage: dosage.into(),
            instructions: None,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionDetail {
    pub id: PrescriptionDetailId,
    pub prescription_id: PrescriptionId,
    pub line_no: i64,
    pub medicine_name: String,
    pub dosage: String,
    pub instructions: Option<String>,
}

/// Prescription header with its detail lines in entry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: PrescriptionId,
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub doctor_name: String,
    pub appointment_id: AppointmentId,
    pub prescribed_date: NaiveDate,
    pub details: Vec<PrescriptionDetail>,
}
