use chrono::{Days, NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};

use super::{format_date, format_datetime, parse_datetime};
use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_appointment(
    conn: &Connection,
    patient_id: &PatientId,
    doctor_id: DoctorId,
    at: &NaiveDateTime,
    reason: &str,
) -> Result<AppointmentId, DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (patient_id, doctor_id, appointment_at, reason)
         VALUES (?1, ?2, ?3, ?4)",
        params![patient_id.as_str(), doctor_id.0, format_datetime(at), reason],
    )?;
    Ok(AppointmentId(conn.last_insert_rowid()))
}

pub fn get_appointment(
    conn: &Connection,
    id: AppointmentId,
) -> Result<Option<Appointment>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, patient_id, doctor_id, appointment_at, reason
             FROM appointments WHERE id = ?1",
            params![id.0],
            |row| {
                Ok(AppointmentRow {
                    id: row.get(0)?,
                    patient_id: row.get(1)?,
                    doctor_id: row.get(2)?,
                    appointment_at: row.get(3)?,
                    reason: row.get(4)?,
                })
            },
        )
        .optional()?;

    row.map(appointment_from_row).transpose()
}

/// Hard delete. Returns the number of rows removed (0 or 1).
pub fn delete_appointment(conn: &Connection, id: AppointmentId) -> Result<usize, DatabaseError> {
    let changed = conn.execute("DELETE FROM appointments WHERE id = ?1", params![id.0])?;
    Ok(changed)
}

/// Start times of the doctor's appointments on `date`, ascending.
pub fn doctor_booked_times_on(
    conn: &Connection,
    doctor_id: DoctorId,
    date: &NaiveDate,
) -> Result<Vec<NaiveDateTime>, DatabaseError> {
    let (from, until) = day_bounds(date);
    let mut stmt = conn.prepare(
        "SELECT appointment_at FROM appointments
         WHERE doctor_id = ?1 AND appointment_at >= ?2 AND appointment_at < ?3
         ORDER BY appointment_at ASC",
    )?;

    let rows = stmt.query_map(params![doctor_id.0, from, until], |row| row.get::<_, String>(0))?;

    let mut times = Vec::new();
    for row in rows {
        times.push(parse_datetime("appointment_at", &row?)?);
    }
    Ok(times)
}

pub fn doctor_has_appointment_at(
    conn: &Connection,
    doctor_id: DoctorId,
    at: &NaiveDateTime,
) -> Result<bool, DatabaseError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM appointments WHERE doctor_id = ?1 AND appointment_at = ?2",
            params![doctor_id.0, format_datetime(at)],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn patient_has_appointment_at(
    conn: &Connection,
    patient_id: &PatientId,
    at: &NaiveDateTime,
) -> Result<bool, DatabaseError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM appointments WHERE patient_id = ?1 AND appointment_at = ?2",
            params![patient_id.as_str(), format_datetime(at)],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Most recent appointment (by scheduled time) between exactly this pair.
pub fn latest_appointment_between(
    conn: &Connection,
    doctor_id: DoctorId,
    patient_id: &PatientId,
) -> Result<Option<AppointmentId>, DatabaseError> {
    let id = conn
        .query_row(
            "SELECT id FROM appointments
             WHERE doctor_id = ?1 AND patient_id = ?2
             ORDER BY appointment_at DESC, id DESC
             LIMIT 1",
            params![doctor_id.0, patient_id.as_str()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(id.map(AppointmentId))
}

/// A patient's appointments with doctor names, ascending by time.
pub fn list_appointments_for_patient(
    conn: &Connection,
    patient_id: &PatientId,
) -> Result<Vec<PatientAppointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.doctor_id, d.first_name || ' ' || d.last_name, a.appointment_at, a.reason
         FROM appointments a
         JOIN doctors d ON a.doctor_id = d.id
         WHERE a.patient_id = ?1
         ORDER BY a.appointment_at ASC",
    )?;

    let rows = stmt.query_map(params![patient_id.as_str()], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?;

    let mut appointments = Vec::new();
    for row in rows {
        let (id, doctor_id, doctor_name, at, reason) = row?;
        appointments.push(PatientAppointment {
            id: AppointmentId(id),
            doctor_id: DoctorId(doctor_id),
            doctor_name,
            scheduled_at: parse_datetime("appointment_at", &at)?,
            reason,
        });
    }
    Ok(appointments)
}

/// A doctor's agenda with patient names, ascending by time, optionally one day only.
pub fn list_appointments_for_doctor(
    conn: &Connection,
    doctor_id: DoctorId,
    on_date: Option<&NaiveDate>,
) -> Result<Vec<ScheduleEntry>, DatabaseError> {
    // Unfiltered listing: every stored value sorts below "9999-99".
    let (from, until) = match on_date {
        Some(date) => day_bounds(date),
        None => ("0000".to_string(), "9999-99".to_string()),
    };
    let mut stmt = conn.prepare(
        "SELECT a.id, a.patient_id, p.first_name || ' ' || p.last_name, a.appointment_at, a.reason
         FROM appointments a
         JOIN patients p ON a.patient_id = p.national_id
         WHERE a.doctor_id = ?1 AND a.appointment_at >= ?2 AND a.appointment_at < ?3
         ORDER BY a.appointment_at ASC",
    )?;

    let rows = stmt.query_map(params![doctor_id.0, from, until], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?;

    let mut entries = Vec::new();
    for row in rows {
        let (id, patient_id, patient_name, at, reason) = row?;
        entries.push(ScheduleEntry {
            id: AppointmentId(id),
            patient_id: PatientId(patient_id),
            patient_name,
            scheduled_at: parse_datetime("appointment_at", &at)?,
            reason,
        });
    }
    Ok(entries)
}

/// Half-open text range covering one calendar day in `DATETIME_FORMAT`.
fn day_bounds(date: &NaiveDate) -> (String, String) {
    let next = date
        .checked_add_days(Days::new(1))
        .map(|d| format_date(&d))
        .unwrap_or_else(|| "9999-99".to_string());
    (format_date(date), next)
}

struct AppointmentRow {
    id: i64,
    patient_id: String,
    doctor_id: i64,
    appointment_at: String,
    reason: String,
}

fn appointment_from_row(row: AppointmentRow) -> Result<Appointment, DatabaseError> {
    Ok(Appointment {
        id: AppointmentId(row.id),
        patient_id: PatientId(row.patient_id),
        doctor_id: DoctorId(row.doctor_id),
        scheduled_at: parse_datetime("appointment_at", &row.appointment_at)?,
        reason: row.reason,
    })
}
