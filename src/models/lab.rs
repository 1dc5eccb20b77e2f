use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::enums::TestKind;
use super::{AppointmentId, DoctorId, LabResultId, PatientId, TestTypeId};

/// Catalog entry from `test_types`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestType {
    pub id: TestTypeId,
    pub kind: TestKind,
    pub name: String,
    pub description: Option<String>,
}

/// MR readings. Numeric fields are optional; absent ones are not stored.
///
/// Readings keep the number exactly as submitted, so `12` reads back as
/// `12` and not `12.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MrFields {
    pub doctor_comment: String,
    #[serde(rename = "T1", default, skip_serializing_if = "Option::is_none")]
    pub t1: Option<Number>,
    #[serde(rename = "T2", default, skip_serializing_if = "Option::is_none")]
    pub t2: Option<Number>,
}

/// X-ray and CT carry the narrative comment only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImagingFields {
    pub doctor_comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BloodPanelFields {
    pub doctor_comment: String,
    #[serde(rename = "CRP", default, skip_serializing_if = "Option::is_none")]
    pub crp: Option<Number>,
    #[serde(rename = "B12", default, skip_serializing_if = "Option::is_none")]
    pub b12: Option<Number>,
    #[serde(rename = "Mg", default, skip_serializing_if = "Option::is_none")]
    pub mg: Option<Number>,
    #[serde(rename = "Fe", default, skip_serializing_if = "Option::is_none")]
    pub fe: Option<Number>,
}

/// Result data, one variant per test type.
///
/// Serializes to the flat mapping stored in `lab_results.result_data`
/// (`{"doctor_comment": "...", "CRP": 12}`); the variant itself is
/// recovered from the row's test type, see [`LabPayload::from_mapping`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LabPayload {
    Mr(MrFields),
    XRay(ImagingFields),
    Ct(ImagingFields),
    BloodPanel(BloodPanelFields),
}

impl LabPayload {
    pub fn kind(&self) -> TestKind {
        match self {
            Self::Mr(_) => TestKind::Mr,
            Self::XRay(_) => TestKind::XRay,
            Self::Ct(_) => TestKind::Ct,
            Self::BloodPanel(_) => TestKind::BloodPanel,
        }
    }

    pub fn doctor_comment(&self) -> &str {
        match self {
            Self::Mr(f) => &f.doctor_comment,
            Self::XRay(f) | Self::Ct(f) => &f.doctor_comment,
            Self::BloodPanel(f) => &f.doctor_comment,
        }
    }

    /// Decode a stored or submitted mapping as the shape `kind` requires.
    /// Keys foreign to that shape, or a missing comment, are errors.
    pub fn from_mapping(kind: TestKind, data: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            TestKind::Mr => Self::Mr(serde_json::from_value(data)?),
            TestKind::XRay => Self::XRay(serde_json::from_value(data)?),
            TestKind::Ct => Self::Ct(serde_json::from_value(data)?),
            TestKind::BloodPanel => Self::BloodPanel(serde_json::from_value(data)?),
        })
    }

    pub fn to_mapping(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Lab result as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabResult {
    pub id: LabResultId,
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub test_type_id: TestTypeId,
    /// `None` only for rows written before appointment links existed.
    pub appointment_id: Option<AppointmentId>,
    pub test_type_name: String,
    pub payload: LabPayload,
    pub test_date: NaiveDateTime,
}
