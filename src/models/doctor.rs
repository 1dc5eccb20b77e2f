use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DoctorId, SpecializationId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialization {
    pub id: SpecializationId,
    pub name: String,
}

/// Doctor row before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDoctor {
    pub first_name: String,
    pub last_name: String,
    pub specialization_id: SpecializationId,
    pub contact_info: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub username: String,
    #[serde(skip_serializing)]
    pub credential: String,
}

/// Directory entry shown when a patient picks a doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorListing {
    pub id: DoctorId,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub contact_info: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

impl DoctorListing {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
