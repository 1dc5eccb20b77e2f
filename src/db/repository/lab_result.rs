use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use super::{format_datetime, parse_datetime};
use crate::db::DatabaseError;
use crate::models::enums::TestKind;
use crate::models::*;

/// Lab result about to be written; `test_type_id` must match `payload.kind()`.
#[derive(Debug, Clone)]
pub struct NewLabResult {
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub test_type_id: TestTypeId,
    pub appointment_id: AppointmentId,
    pub payload: LabPayload,
    pub test_date: NaiveDateTime,
}

pub fn insert_lab_result(conn: &Connection, lab: &NewLabResult) -> Result<LabResultId, DatabaseError> {
    let result_data = serde_json::to_string(&lab.payload)?;
    conn.execute(
        "INSERT INTO lab_results (patient_id, doctor_id, test_type_id, result_data, test_date,
         appointment_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            lab.patient_id.as_str(),
            lab.doctor_id.0,
            lab.test_type_id.0,
            result_data,
            format_datetime(&lab.test_date),
            lab.appointment_id.0,
        ],
    )?;
    Ok(LabResultId(conn.last_insert_rowid()))
}

/// All lab results of a patient, newest test first.
///
/// A row whose `result_data` does not decode as its test type fails the
/// whole listing with `CorruptValue`; no partial history is returned.
pub fn list_lab_results_for_patient(
    conn: &Connection,
    patient_id: &PatientId,
) -> Result<Vec<LabResult>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT l.id, l.patient_id, l.doctor_id, l.test_type_id, l.appointment_id,
                t.code, t.name, l.result_data, l.test_date
         FROM lab_results l
         JOIN test_types t ON l.test_type_id = t.id
         WHERE l.patient_id = ?1
         ORDER BY l.test_date DESC, l.id DESC",
    )?;

    let rows = stmt.query_map(params![patient_id.as_str()], |row| Ok(lab_row_from_rusqlite(row)))?;

    let mut labs = Vec::new();
    for row in rows {
        labs.push(lab_from_row(row??)?);
    }
    Ok(labs)
}

// Internal row type for LabResult mapping
struct LabRow {
    id: i64,
    patient_id: String,
    doctor_id: i64,
    test_type_id: i64,
    appointment_id: Option<i64>,
    test_code: String,
    test_name: String,
    result_data: String,
    test_date: String,
}

fn lab_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<LabRow, rusqlite::Error> {
    Ok(LabRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        test_type_id: row.get(3)?,
        appointment_id: row.get(4)?,
        test_code: row.get(5)?,
        test_name: row.get(6)?,
        result_data: row.get(7)?,
        test_date: row.get(8)?,
    })
}

fn lab_from_row(row: LabRow) -> Result<LabResult, DatabaseError> {
    let kind = TestKind::from_str(&row.test_code)?;
    let corrupt = || DatabaseError::CorruptValue {
        column: "result_data".into(),
        value: row.result_data.clone(),
    };
    let mapping: serde_json::Value = serde_json::from_str(&row.result_data).map_err(|_| corrupt())?;
    let payload = LabPayload::from_mapping(kind, mapping).map_err(|_| corrupt())?;

    Ok(LabResult {
        id: LabResultId(row.id),
        patient_id: PatientId(row.patient_id),
        doctor_id: DoctorId(row.doctor_id),
        test_type_id: TestTypeId(row.test_type_id),
        appointment_id: row.appointment_id.map(AppointmentId),
        test_type_name: row.test_name,
        payload,
        test_date: parse_datetime("test_date", &row.test_date)?,
    })
}
