use rusqlite::{params, Connection};

use super::{format_datetime, parse_datetime};
use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_medical_record(
    conn: &Connection,
    patient_id: &PatientId,
    doctor_id: DoctorId,
    appointment_id: AppointmentId,
    entry: &MedicalRecordEntry,
) -> Result<MedicalRecordId, DatabaseError> {
    conn.execute(
        "INSERT INTO medical_records (patient_id, doctor_id, diagnosis, treatment, notes,
         created_date, appointment_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            patient_id.as_str(),
            doctor_id.0,
            entry.diagnosis,
            entry.treatment,
            entry.notes,
            format_datetime(&entry.created_date),
            appointment_id.0,
        ],
    )?;
    Ok(MedicalRecordId(conn.last_insert_rowid()))
}

/// A patient's medical records with the authoring doctor's name, newest first.
pub fn list_medical_records_for_patient(
    conn: &Connection,
    patient_id: &PatientId,
) -> Result<Vec<MedicalRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT mr.id, mr.patient_id, mr.doctor_id, d.first_name || ' ' || d.last_name,
                mr.appointment_id, mr.diagnosis, mr.treatment, mr.notes, mr.created_date
         FROM medical_records mr
         INNER JOIN doctors d ON mr.doctor_id = d.id
         WHERE mr.patient_id = ?1
         ORDER BY mr.created_date DESC, mr.id DESC",
    )?;

    let rows = stmt.query_map(params![patient_id.as_str()], |row| {
        Ok(RecordRow {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            doctor_id: row.get(2)?,
            doctor_name: row.get(3)?,
            appointment_id: row.get(4)?,
            diagnosis: row.get(5)?,
            treatment: row.get(6)?,
            notes: row.get(7)?,
            created_date: row.get(8)?,
        })
    })?;

    let mut records = Vec::new();
    for row in rows {
        let row = row?;
        records.push(MedicalRecord {
            id: MedicalRecordId(row.id),
            patient_id: PatientId(row.patient_id),
            doctor_id: DoctorId(row.doctor_id),
            doctor_name: row.doctor_name,
            appointment_id: row.appointment_id.map(AppointmentId),
            diagnosis: row.diagnosis,
            treatment: row.treatment,
            notes: row.notes,
            created_date: parse_datetime("created_date", &row.created_date)?,
        });
    }
    Ok(records)
}

struct RecordRow {
    id: i64,
    patient_id: String,
    doctor_id: i64,
    doctor_name: String,
    appointment_id: Option<i64>,
    diagnosis: String,
    treatment: String,
    notes: Option<String>,
    created_date: String,
}
