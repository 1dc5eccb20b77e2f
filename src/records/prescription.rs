//! Prescription composer: one header plus its ordered medicine lines,
//! written as a single unit.

use chrono::NaiveDate;
use rusqlite::Connection;

use super::linker::resolve_governing_appointment;
use crate::authorization::Caller;
use crate::db::repository;
use crate::error::ClinicError;
use crate::models::*;

/// Write a prescription for `patient_id` under `appointment_id`.
///
/// Lines missing a medicine name or a dosage are dropped; `EmptyPrescription`
/// when no complete line is left. Kept lines are stored in input order,
/// numbered from 1. Either the header and every kept line are committed, or
/// nothing is.
pub fn write_prescription(
    conn: &Connection,
    caller: &Caller,
    patient_id: &PatientId,
    appointment_id: AppointmentId,
    lines: &[MedicineLine],
    prescribed_date: NaiveDate,
) -> Result<PrescriptionId, ClinicError> {
    let doctor_id = caller.require_doctor("write a prescription")?;
    let lines = complete_lines(lines);
    if lines.is_empty() {
        return Err(ClinicError::EmptyPrescription);
    }

    let tx = conn.unchecked_transaction()?;

    let governs = repository::get_appointment(&tx, appointment_id)?
        .is_some_and(|a| a.doctor_id == doctor_id && &a.patient_id == patient_id);
    if !governs {
        tracing::warn!(%doctor_id, %patient_id, %appointment_id, "Prescription rejected: appointment does not link this pair");
        return Err(ClinicError::NoGoverningAppointment {
            doctor_id,
            patient_id: patient_id.clone(),
        });
    }

    let id = repository::insert_prescription(&tx, patient_id, doctor_id, appointment_id, &prescribed_date)?;
    for (line_no, line) in (1..).zip(&lines) {
        repository::insert_prescription_detail(&tx, id, line_no, line)?;
    }
    tx.commit()?;

    tracing::info!(prescription_id = %id, %doctor_id, %patient_id, lines = lines.len(), "Prescription written");
    Ok(id)
}

/// Resolve the governing appointment, then [`write_prescription`].
pub fn prescribe_for_patient(
    conn: &Connection,
    caller: &Caller,
    patient_id: &PatientId,
    lines: &[MedicineLine],
    prescribed_date: NaiveDate,
) -> Result<PrescriptionId, ClinicError> {
    let doctor_id = caller.require_doctor("write a prescription")?;
    let appointment_id = resolve_governing_appointment(conn, doctor_id, patient_id)?.ok_or_else(|| {
        ClinicError::NoGoverningAppointment {
            doctor_id,
            patient_id: patient_id.clone(),
        }
    })?;
    write_prescription(conn, caller, patient_id, appointment_id, lines, prescribed_date)
}

fn complete_lines(lines: &[MedicineLine]) -> Vec<&MedicineLine> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| {
            let complete = !line.medicine_name.trim().is_empty() && !line.dosage.trim().is_empty();
            if !complete {
                tracing::debug!(line = i + 1, "Dropping incomplete medicine line");
            }
            complete.then_some(line)
        })
        .collect()
}
