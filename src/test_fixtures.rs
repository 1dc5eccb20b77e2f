//! Seeded in-memory clinic shared by the unit test suites.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::Connection;

use crate::db::repository::{insert_doctor, insert_patient, insert_specialization};
use crate::db::sqlite::open_memory_database;
use crate::models::enums::Gender;
use crate::models::*;

pub(crate) struct Clinic {
    pub conn: Connection,
    pub dr_chen: DoctorId,
    pub dr_moreau: DoctorId,
    pub ayse: PatientId,
    pub mehmet: PatientId,
}

/// Two doctors (cardiology, neurology) and two patients, no appointments.
pub(crate) fn clinic() -> Clinic {
    let conn = open_memory_database().expect("open_memory_database");
    seeded(conn)
}

/// Seed an already-migrated connection, e.g. one opened on a temp file.
pub(crate) fn seeded(conn: Connection) -> Clinic {
    let (dr_chen, dr_moreau, ayse, mehmet) = seed(&conn);
    Clinic { conn, dr_chen, dr_moreau, ayse, mehmet }
}

fn seed(conn: &Connection) -> (DoctorId, DoctorId, PatientId, PatientId) {
    let cardiology = insert_specialization(conn, "Cardiology").unwrap();
    let neurology = insert_specialization(conn, "Neurology").unwrap();

    let dr_chen = insert_doctor(conn, &NewDoctor {
        first_name: "Wei".into(),
        last_name: "Chen".into(),
        specialization_id: cardiology,
        contact_info: Some("chen@clinic.test".into()),
        hire_date: NaiveDate::from_ymd_opt(2019, 4, 1),
        username: "wchen".into(),
        credential: "hash-1".into(),
    })
    .unwrap();

    let dr_moreau = insert_doctor(conn, &NewDoctor {
        first_name: "Claire".into(),
        last_name: "Moreau".into(),
        specialization_id: neurology,
        contact_info: None,
        hire_date: None,
        username: "cmoreau".into(),
        credential: "hash-2".into(),
    })
    .unwrap();

    let ayse = PatientId::new("10000000146");
    insert_patient(conn, &Patient {
        national_id: ayse.clone(),
        first_name: "Ayse".into(),
        last_name: "Yilmaz".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1988, 6, 2).unwrap(),
        gender: Some(Gender::Female),
        contact_info: Some("+90 555 000 0001".into()),
        created_at: at("2025-01-02", "08:00"),
        username: "ayse".into(),
        credential: "hash-3".into(),
    })
    .unwrap();

    let mehmet = PatientId::new("20000000292");
    insert_patient(conn, &Patient {
        national_id: mehmet.clone(),
        first_name: "Mehmet".into(),
        last_name: "Demir".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1975, 11, 20).unwrap(),
        gender: Some(Gender::Male),
        contact_info: None,
        created_at: at("2025-01-05", "12:30"),
        username: "mehmet".into(),
        credential: "hash-4".into(),
    })
    .unwrap();

    (dr_chen, dr_moreau, ayse, mehmet)
}

/// `date` as `YYYY-MM-DD`, `time` as `HH:MM`.
pub(crate) fn at(date: &str, time: &str) -> NaiveDateTime {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    let time = NaiveTime::parse_from_str(time, "%H:%M").unwrap();
    date.and_time(time)
}

/// 2025-03-10, a Monday.
pub(crate) fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}
