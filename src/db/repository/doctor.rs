use rusqlite::{params, Connection, OptionalExtension};

use super::{format_date, parse_date};
use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_specialization(conn: &Connection, name: &str) -> Result<SpecializationId, DatabaseError> {
    conn.execute("INSERT INTO specializations (name) VALUES (?1)", params![name])?;
    Ok(SpecializationId(conn.last_insert_rowid()))
}

pub fn list_specializations(conn: &Connection) -> Result<Vec<Specialization>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, name FROM specializations ORDER BY name ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(Specialization {
            id: SpecializationId(row.get(0)?),
            name: row.get(1)?,
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn insert_doctor(conn: &Connection, doctor: &NewDoctor) -> Result<DoctorId, DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (first_name, last_name, specialization_id, contact_info,
         hire_date, username, credential)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            doctor.first_name,
            doctor.last_name,
            doctor.specialization_id.0,
            doctor.contact_info,
            doctor.hire_date.as_ref().map(format_date),
            doctor.username,
            doctor.credential,
        ],
    )?;
    Ok(DoctorId(conn.last_insert_rowid()))
}

pub fn doctor_exists(conn: &Connection, id: DoctorId) -> Result<bool, DatabaseError> {
    let found = conn
        .query_row("SELECT 1 FROM doctors WHERE id = ?1", params![id.0], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

/// "First Last", or `None` for an unknown id.
pub fn get_doctor_name(conn: &Connection, id: DoctorId) -> Result<Option<String>, DatabaseError> {
    let name = conn
        .query_row(
            "SELECT first_name || ' ' || last_name FROM doctors WHERE id = ?1",
            params![id.0],
            |row| row.get(0),
        )
        .optional()?;
    Ok(name)
}

pub fn list_doctors_by_specialization(
    conn: &Connection,
    specialization: &str,
) -> Result<Vec<DoctorListing>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT d.id, d.first_name, d.last_name, s.name, d.contact_info, d.hire_date
         FROM doctors d
         JOIN specializations s ON d.specialization_id = s.id
         WHERE s.name = ?1
         ORDER BY d.last_name ASC, d.first_name ASC",
    )?;

    let rows = stmt.query_map(params![specialization], |row| {
        Ok((
            DoctorId(row.get(0)?),
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, Option<String>>(5)?,
        ))
    })?;

    let mut doctors = Vec::new();
    for row in rows {
        let (id, first_name, last_name, specialization, contact_info, hire_date) = row?;
        doctors.push(DoctorListing {
            id,
            first_name,
            last_name,
            specialization,
            contact_info,
            hire_date: hire_date.as_deref().map(|d| parse_date("hire_date", d)).transpose()?,
        });
    }
    Ok(doctors)
}
