use std::fmt;

use serde::{Deserialize, Serialize};

/// Newtype over an INTEGER PRIMARY KEY rowid.
macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

row_id!(DoctorId);
row_id!(SpecializationId);
row_id!(AppointmentId);
row_id!(TestTypeId);
row_id!(LabResultId);
row_id!(MedicalRecordId);
row_id!(PrescriptionId);
row_id!(PrescriptionDetailId);

/// National identifier of a patient; also their login key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(pub String);

impl PatientId {
    pub fn new(national_id: impl Into<String>) -> Self {
        Self(national_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
