//! Availability engine: what is still free on the grid.
//!
//! All reads, no locking. Callers that go on to book must re-check inside
//! the booking transaction; `ledger::book` does exactly that.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::Connection;
use serde::Serialize;

use super::slots::{daily_slots, upcoming_business_days};
use crate::config::ClinicConfig;
use crate::db::repository;
use crate::error::ClinicError;
use crate::models::{DoctorId, PatientId};

/// Free slots of one bookable day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub free_slots: Vec<NaiveDateTime>,
}

/// The day's grid minus the doctor's booked start times, in grid order.
pub fn doctor_free_slots(
    conn: &Connection,
    doctor_id: DoctorId,
    date: NaiveDate,
) -> Result<Vec<NaiveDateTime>, ClinicError> {
    let booked: HashSet<NaiveTime> = repository::doctor_booked_times_on(conn, doctor_id, &date)?
        .into_iter()
        .map(|at| at.time())
        .collect();

    let free: Vec<NaiveDateTime> = daily_slots(date)
        .into_iter()
        .filter(|slot| !booked.contains(&slot.time()))
        .collect();

    tracing::debug!(%doctor_id, %date, booked = booked.len(), free = free.len(), "Computed free slots");
    Ok(free)
}

/// False when the doctor already has an appointment at exactly `at`.
pub fn is_doctor_slot_free(
    conn: &Connection,
    doctor_id: DoctorId,
    at: NaiveDateTime,
) -> Result<bool, ClinicError> {
    Ok(!repository::doctor_has_appointment_at(conn, doctor_id, &at)?)
}

/// False when the patient already holds an appointment at exactly `at`.
pub fn is_patient_slot_free(
    conn: &Connection,
    patient_id: &PatientId,
    at: NaiveDateTime,
) -> Result<bool, ClinicError> {
    Ok(!repository::patient_has_appointment_at(conn, patient_id, &at)?)
}

/// Free slots of a doctor across the booking window starting at `today`.
/// Days with nothing left are kept, with an empty slot list.
pub fn booking_calendar(
    conn: &Connection,
    config: &ClinicConfig,
    doctor_id: DoctorId,
    today: NaiveDate,
) -> Result<Vec<DayAvailability>, ClinicError> {
    upcoming_business_days(today, config.booking_window_days)
        .into_iter()
        .map(|date| {
            Ok(DayAvailability {
                date,
                free_slots: doctor_free_slots(conn, doctor_id, date)?,
            })
        })
        .collect()
}
