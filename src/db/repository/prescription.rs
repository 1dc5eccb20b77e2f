use chrono::NaiveDate;
use rusqlite::{params, Connection};

use super::{format_date, parse_date};
use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_prescription(
    conn: &Connection,
    patient_id: &PatientId,
    doctor_id: DoctorId,
    appointment_id: AppointmentId,
    prescribed_date: &NaiveDate,
) -> Result<PrescriptionId, DatabaseError> {
    conn.execute(
        "INSERT INTO prescriptions (patient_id, doctor_id, appointment_id, prescribed_date)
         VALUES (?1, ?2, ?3, ?4)",
        params![patient_id.as_str(), doctor_id.0, appointment_id.0, format_date(prescribed_date)],
    )?;
    Ok(PrescriptionId(conn.last_insert_rowid()))
}

pub fn insert_prescription_detail(
    conn: &Connection,
    prescription_id: PrescriptionId,
    line_no: i64,
    line: &MedicineLine,
) -> Result<PrescriptionDetailId, DatabaseError> {
    conn.execute(
        "INSERT INTO prescription_details (prescription_id, line_no, medicine_name, dosage,
         instructions)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            prescription_id.0,
            line_no,
            line.medicine_name,
            line.dosage,
            line.instructions,
        ],
    )?;
    Ok(PrescriptionDetailId(conn.last_insert_rowid()))
}

/// A patient's prescriptions, newest first, each with its lines in entry order.
pub fn list_prescriptions_for_patient(
    conn: &Connection,
    patient_id: &PatientId,
) -> Result<Vec<Prescription>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.patient_id, p.doctor_id, d.first_name || ' ' || d.last_name,
                p.appointment_id, p.prescribed_date
         FROM prescriptions p
         JOIN doctors d ON p.doctor_id = d.id
         WHERE p.patient_id = ?1
         ORDER BY p.prescribed_date DESC, p.id DESC",
    )?;

    let rows = stmt.query_map(params![patient_id.as_str()], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i64>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, i64>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;

    let mut prescriptions = Vec::new();
    for row in rows {
        let (id, patient_id, doctor_id, doctor_name, appointment_id, prescribed_date) = row?;
        let id = PrescriptionId(id);
        prescriptions.push(Prescription {
            id,
            patient_id: PatientId(patient_id),
            doctor_id: DoctorId(doctor_id),
            doctor_name,
            appointment_id: AppointmentId(appointment_id),
            prescribed_date: parse_date("prescribed_date", &prescribed_date)?,
            details: list_prescription_details(conn, id)?,
        });
    }
    Ok(prescriptions)
}

pub fn list_prescription_details(
    conn: &Connection,
    prescription_id: PrescriptionId,
) -> Result<Vec<PrescriptionDetail>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, prescription_id, line_no, medicine_name, dosage, instructions
         FROM prescription_details
         WHERE prescription_id = ?1
         ORDER BY line_no ASC",
    )?;

    let rows = stmt.query_map(params![prescription_id.0], |row| {
        Ok(PrescriptionDetail {
            id: PrescriptionDetailId(row.get(0)?),
            prescription_id: PrescriptionId(row.get(1)?),
            line_no: row.get(2)?,
            medicine_name: row.get(3)?,
            dosage: row.get(4)?,
            instructions: row.get(5)?,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}
