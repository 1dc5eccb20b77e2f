use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::enums::Gender;
use super::PatientId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub national_id: PatientId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Option<Gender>,
    pub contact_info: Option<String>,
    pub created_at: NaiveDateTime,
    pub username: String,
    /// Opaque credential handed over by the authentication layer.
    #[serde(skip_serializing)]
    pub credential: String,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
