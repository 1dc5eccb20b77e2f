//! Appointment ledger: booking and cancellation.
//!
//! `book` runs its availability checks and the insert inside one IMMEDIATE
//! transaction, so the write lock is held from the first read. The UNIQUE
//! (doctor_id, appointment_at) and (patient_id, appointment_at) constraints
//! back this up; either one firing is reported as `SlotConflict`.

use chrono::NaiveDateTime;
use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};

use super::availability::{is_doctor_slot_free, is_patient_slot_free};
use crate::authorization::Caller;
use crate::db::{repository, DatabaseError};
use crate::error::{ClinicError, ConflictSide};
use crate::models::{AppointmentId, DoctorId};

/// Book `at` with `doctor_id` for the calling patient.
///
/// `at` is expected to come from the slot grid; alignment is not re-checked
/// here. No row is written when either calendar already holds `at`.
pub fn book(
    conn: &Connection,
    caller: &Caller,
    doctor_id: DoctorId,
    at: NaiveDateTime,
    reason: &str,
) -> Result<AppointmentId, ClinicError> {
    let patient_id = caller.require_patient("book an appointment")?;

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    if !repository::patient_exists(&tx, patient_id)? {
        return Err(ClinicError::not_found("Patient", patient_id));
    }
    if !repository::doctor_exists(&tx, doctor_id)? {
        return Err(ClinicError::not_found("Doctor", doctor_id));
    }

    if !is_doctor_slot_free(&tx, doctor_id, at)? {
        tracing::warn!(%doctor_id, %at, "Booking rejected: doctor slot taken");
        return Err(ClinicError::SlotConflict { side: ConflictSide::Doctor, at });
    }
    if !is_patient_slot_free(&tx, patient_id, at)? {
        tracing::warn!(%patient_id, %at, "Booking rejected: patient already booked");
        return Err(ClinicError::SlotConflict { side: ConflictSide::Patient, at });
    }

    let id = repository::insert_appointment(&tx, patient_id, doctor_id, &at, reason)
        .map_err(|e| match unique_violation_side(&e) {
            Some(side) => ClinicError::SlotConflict { side, at },
            None => ClinicError::Storage(e),
        })?;
    tx.commit()?;

    tracing::info!(appointment_id = %id, %patient_id, %doctor_id, %at, "Appointment booked");
    Ok(id)
}

/// Hard-delete an appointment of the calling patient.
///
/// Returns `Ok(false)` for an unknown id. Lab results, medical records and
/// prescriptions written against the appointment stay in place.
pub fn cancel(
    conn: &Connection,
    caller: &Caller,
    appointment_id: AppointmentId,
) -> Result<bool, ClinicError> {
    let patient_id = caller.require_patient("cancel an appointment")?;

    let tx = conn.unchecked_transaction()?;
    let Some(appointment) = repository::get_appointment(&tx, appointment_id)? else {
        tracing::debug!(%appointment_id, "Cancel ignored: no such appointment");
        return Ok(false);
    };
    if &appointment.patient_id != patient_id {
        tracing::warn!(%appointment_id, %patient_id, "Cancel rejected: appointment belongs to another patient");
        return Err(ClinicError::Forbidden {
            action: "cancel another patient's appointment",
            role: caller.role(),
        });
    }

    repository::delete_appointment(&tx, appointment_id)?;
    tx.commit()?;

    tracing::info!(%appointment_id, %patient_id, at = %appointment.scheduled_at, "Appointment cancelled");
    Ok(true)
}

/// Which appointments UNIQUE constraint an insert tripped, if any.
fn unique_violation_side(err: &DatabaseError) -> Option<ConflictSide> {
    let DatabaseError::Sqlite(rusqlite::Error::SqliteFailure(failure, Some(message))) = err else {
        return None;
    };
    if failure.code != ErrorCode::ConstraintViolation || !message.starts_with("UNIQUE") {
        return None;
    }
    if message.contains("appointments.doctor_id") {
        Some(ConflictSide::Doctor)
    } else if message.contains("appointments.patient_id") {
        Some(ConflictSide::Patient)
    } else {
        None
    }
}
