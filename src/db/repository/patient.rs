use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};

use super::{format_date, format_datetime, parse_date, parse_datetime};
use crate::db::DatabaseError;
use crate::models::enums::Gender;
use crate::models::*;

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (national_id, first_name, last_name, date_of_birth, gender,
         contact_info, created_at, username, credential)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            patient.national_id.as_str(),
            patient.first_name,
            patient.last_name,
            format_date(&patient.date_of_birth),
            patient.gender.map(|g| g.as_str()),
            patient.contact_info,
            format_datetime(&patient.created_at),
            patient.username,
            patient.credential,
        ],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &PatientId) -> Result<Option<Patient>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT national_id, first_name, last_name, date_of_birth, gender,
             contact_info, created_at, username, credential
             FROM patients WHERE national_id = ?1",
            params![id.as_str()],
            |row| {
                Ok(PatientRow {
                    national_id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                    date_of_birth: row.get(3)?,
                    gender: row.get(4)?,
                    contact_info: row.get(5)?,
                    created_at: row.get(6)?,
                    username: row.get(7)?,
                    credential: row.get(8)?,
                })
            },
        )
        .optional()?;

    row.map(patient_from_row).transpose()
}

pub fn patient_exists(conn: &Connection, id: &PatientId) -> Result<bool, DatabaseError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM patients WHERE national_id = ?1",
            params![id.as_str()],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

struct PatientRow {
    national_id: String,
    first_name: String,
    last_name: String,
    date_of_birth: String,
    gender: Option<String>,
    contact_info: Option<String>,
    created_at: String,
    username: String,
    credential: String,
}

fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    Ok(Patient {
        national_id: PatientId(row.national_id),
        first_name: row.first_name,
        last_name: row.last_name,
        date_of_birth: parse_date("date_of_birth", &row.date_of_birth)?,
        gender: row.gender.as_deref().map(Gender::from_str).transpose()?,
        contact_info: row.contact_info,
        created_at: parse_datetime("created_at", &row.created_at)?,
        username: row.username,
        credential: row.credential,
    })
}
