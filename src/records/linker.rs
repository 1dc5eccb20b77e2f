//! Clinical record linker.
//!
//! Lab results and medical records attach to the governing appointment,
//! the most recent appointment between the writing doctor and the patient.
//! Past appointments still govern; there is no visit window.

use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::authorization::Caller;
use crate::db::repository::{self, NewLabResult};
use crate::error::ClinicError;
use crate::models::*;

/// Most recent appointment between exactly this doctor and patient.
pub fn resolve_governing_appointment(
    conn: &Connection,
    doctor_id: DoctorId,
    patient_id: &PatientId,
) -> Result<Option<AppointmentId>, ClinicError> {
    Ok(repository::latest_appointment_between(conn, doctor_id, patient_id)?)
}

/// Record a lab result written by the calling doctor.
pub fn add_lab_result(
    conn: &Connection,
    caller: &Caller,
    patient_id: &PatientId,
    payload: LabPayload,
    test_date: NaiveDateTime,
) -> Result<LabResultId, ClinicError> {
    let doctor_id = caller.require_doctor("add a lab result")?;

    if payload.doctor_comment().trim().is_empty() {
        tracing::warn!(%doctor_id, %patient_id, kind = %payload.kind(), "Lab result rejected: empty comment");
        return Err(ClinicError::Validation("doctor_comment must not be empty".into()));
    }

    let tx = conn.unchecked_transaction()?;
    let appointment_id = governing_or_err(&tx, doctor_id, patient_id)?;
    let test_type = repository::get_test_type_by_kind(&tx, payload.kind())?
        .ok_or_else(|| ClinicError::not_found("TestType", payload.kind()))?;

    let id = repository::insert_lab_result(&tx, &NewLabResult {
        patient_id: patient_id.clone(),
        doctor_id,
        test_type_id: test_type.id,
        appointment_id,
        payload,
        test_date,
    })?;
    tx.commit()?;

    tracing::info!(lab_result_id = %id, %doctor_id, %patient_id, %appointment_id, test_type = %test_type.name, "Lab result recorded");
    Ok(id)
}

/// Same as [`add_lab_result`], for a raw field mapping keyed by test type id.
///
/// Keys the selected test type does not define, a missing comment or a
/// non-numeric reading are `Validation` errors.
pub fn add_lab_result_from_mapping(
    conn: &Connection,
    caller: &Caller,
    patient_id: &PatientId,
    test_type_id: TestTypeId,
    data: serde_json::Value,
    test_date: NaiveDateTime,
) -> Result<LabResultId, ClinicError> {
    caller.require_doctor("add a lab result")?;

    let test_type = repository::get_test_type(conn, test_type_id)?
        .ok_or_else(|| ClinicError::not_found("TestType", test_type_id))?;
    let payload = LabPayload::from_mapping(test_type.kind, data)
        .map_err(|e| ClinicError::Validation(format!("{} result data: {e}", test_type.name)))?;

    add_lab_result(conn, caller, patient_id, payload, test_date)
}

/// Record a diagnosis and treatment written by the calling doctor.
pub fn add_medical_record(
    conn: &Connection,
    caller: &Caller,
    patient_id: &PatientId,
    entry: MedicalRecordEntry,
) -> Result<MedicalRecordId, ClinicError> {
    let doctor_id = caller.require_doctor("add a medical record")?;

    for (field, value) in [("diagnosis", &entry.diagnosis), ("treatment", &entry.treatment)] {
        if value.trim().is_empty() {
            tracing::warn!(%doctor_id, %patient_id, field, "Medical record rejected: empty field");
            return Err(ClinicError::Validation(format!("{field} must not be empty")));
        }
    }

    let tx = conn.unchecked_transaction()?;
    let appointment_id = governing_or_err(&tx, doctor_id, patient_id)?;
    let id = repository::insert_medical_record(&tx, patient_id, doctor_id, appointment_id, &entry)?;
    tx.commit()?;

    tracing::info!(medical_record_id = %id, %doctor_id, %patient_id, %appointment_id, "Medical record added");
    Ok(id)
}

fn governing_or_err(
    conn: &Connection,
    doctor_id: DoctorId,
    patient_id: &PatientId,
) -> Result<AppointmentId, ClinicError> {
    resolve_governing_appointment(conn, doctor_id, patient_id)?.ok_or_else(|| {
        tracing::warn!(%doctor_id, %patient_id, "No governing appointment");
        ClinicError::NoGoverningAppointment {
            doctor_id,
            patient_id: patient_id.clone(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{insert_appointment, list_lab_results_for_patient, list_medical_records_for_patient};
    use crate::models::enums::TestKind;
    use crate::scheduling::ledger::{book, cancel};
    use crate::test_fixtures::{at, clinic, Clinic};
    use serde_json::json;

    const BLOOD_PANEL: TestTypeId = TestTypeId(4);

    fn with_visit() -> (Clinic, AppointmentId) {
        let c = clinic();
        let id = book(&c.conn, &Caller::Patient(c.ayse.clone()), c.dr_chen, at("2025-03-10", "09:00"), "Fatigue")
            .unwrap();
        (c, id)
    }

    fn lab_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM lab_results", [], |row| row.get(0))
            .unwrap()
    }

    fn entry(diagnosis: &str, treatment: &str) -> MedicalRecordEntry {
        MedicalRecordEntry {
            diagnosis: diagnosis.into(),
            treatment: treatment.into(),
            notes: None,
            created_date: at("2025-03-10", "09:25"),
        }
    }

    #[test]
    fn resolve_none_without_appointments() {
        let c = clinic();
        assert_eq!(resolve_governing_appointment(&c.conn, c.dr_chen, &c.ayse).unwrap(), None);
    }

    #[test]
    fn resolve_picks_latest_for_exact_pair() {
        let c = clinic();
        insert_appointment(&c.conn, &c.ayse, c.dr_chen, &at("2025-03-10", "09:00"), "").unwrap();
        let late = insert_appointment(&c.conn, &c.ayse, c.dr_chen, &at("2025-03-12", "11:00"), "").unwrap();
        // Inserted last but earliest in time.
        insert_appointment(&c.conn, &c.ayse, c.dr_chen, &at("2025-02-03", "10:00"), "").unwrap();
        // Different pairs do not interfere.
        insert_appointment(&c.conn, &c.ayse, c.dr_moreau, &at("2025-03-20", "10:00"), "").unwrap();
        insert_appointment(&c.conn, &c.mehmet, c.dr_chen, &at("2025-03-21", "10:00"), "").unwrap();

        assert_eq!(resolve_governing_appointment(&c.conn, c.dr_chen, &c.ayse).unwrap(), Some(late));
    }

    #[test]
    fn blood_panel_empty_comment_scenario() {
        let (c, visit) = with_visit();
        let doctor = Caller::Doctor(c.dr_chen);

        let err = add_lab_result_from_mapping(
            &c.conn, &doctor, &c.ayse, BLOOD_PANEL,
            json!({"doctor_comment": "", "CRP": 12}),
            at("2025-03-10", "09:20"),
        )
        .unwrap_err();
        assert!(matches!(err, ClinicError::Validation(_)));
        assert_eq!(lab_count(&c.conn), 0);

        let submitted = json!({"doctor_comment": "ok", "CRP": 12});
        add_lab_result_from_mapping(&c.conn, &doctor, &c.ayse, BLOOD_PANEL, submitted.clone(), at("2025-03-10", "09:20"))
            .unwrap();

        let labs = list_lab_results_for_patient(&c.conn, &c.ayse).unwrap();
        assert_eq!(labs.len(), 1);
        assert_eq!(labs[0].appointment_id, Some(visit));
        assert_eq!(labs[0].test_type_name, "Blood Panel");
        assert_eq!(labs[0].payload.to_mapping().unwrap(), submitted);
    }

    #[test]
    fn whitespace_comment_is_empty() {
        let (c, _) = with_visit();
        let payload = LabPayload::XRay(ImagingFields { doctor_comment: "  \n".into() });
        let err = add_lab_result(&c.conn, &Caller::Doctor(c.dr_chen), &c.ayse, payload, at("2025-03-10", "09:20"))
            .unwrap_err();
        assert!(matches!(err, ClinicError::Validation(_)));
    }

    #[test]
    fn keys_outside_test_type_are_validation_errors() {
        let (c, _) = with_visit();
        let err = add_lab_result_from_mapping(
            &c.conn, &Caller::Doctor(c.dr_chen), &c.ayse, TestTypeId(3),
            json!({"doctor_comment": "Lungs are clear", "T1": 4.0}),
            at("2025-03-10", "09:20"),
        )
        .unwrap_err();
        assert!(matches!(err, ClinicError::Validation(_)));
        assert_eq!(lab_count(&c.conn), 0);
    }

    #[test]
    fn unknown_test_type_not_found() {
        let (c, _) = with_visit();
        let err = add_lab_result_from_mapping(
            &c.conn, &Caller::Doctor(c.dr_chen), &c.ayse, TestTypeId(99),
            json!({"doctor_comment": "?"}),
            at("2025-03-10", "09:20"),
        )
        .unwrap_err();
        assert!(matches!(err, ClinicError::NotFound { .. }));
    }

    #[test]
    fn lab_result_needs_governing_appointment() {
        let (c, _) = with_visit();
        let payload = LabPayload::Mr(MrFields { doctor_comment: "acceptable".into(), t1: Some(10.into()), t2: None });
        // Dr. Moreau never saw this patient.
        let err = add_lab_result(&c.conn, &Caller::Doctor(c.dr_moreau), &c.ayse, payload, at("2025-03-10", "10:00"))
            .unwrap_err();
        assert!(matches!(err, ClinicError::NoGoverningAppointment { doctor_id, .. } if doctor_id == c.dr_moreau));
        assert_eq!(lab_count(&c.conn), 0);
    }

    #[test]
    fn typed_payload_is_stored_under_matching_test_type() {
        let (c, _) = with_visit();
        let payload = LabPayload::Mr(MrFields { doctor_comment: "acceptable".into(), t1: Some(10.into()), t2: Some(20.into()) });
        add_lab_result(&c.conn, &Caller::Doctor(c.dr_chen), &c.ayse, payload.clone(), at("2025-03-10", "09:40")).unwrap();

        let labs = list_lab_results_for_patient(&c.conn, &c.ayse).unwrap();
        assert_eq!(labs[0].test_type_id, TestTypeId(1));
        assert_eq!(labs[0].payload.kind(), TestKind::Mr);
        assert_eq!(labs[0].payload, payload);
    }

    #[test]
    fn patients_cannot_write_records() {
        let (c, _) = with_visit();
        let patient = Caller::Patient(c.ayse.clone());
        let payload = LabPayload::Ct(ImagingFields { doctor_comment: "self-diagnosis".into() });
        assert!(matches!(
            add_lab_result(&c.conn, &patient, &c.ayse, payload, at("2025-03-10", "09:40")),
            Err(ClinicError::Forbidden { .. })
        ));
        assert!(matches!(
            add_medical_record(&c.conn, &patient, &c.ayse, entry("flu", "rest")),
            Err(ClinicError::Forbidden { .. })
        ));
    }

    #[test]
    fn medical_record_links_latest_appointment() {
        let (c, _) = with_visit();
        let later = book(&c.conn, &Caller::Patient(c.ayse.clone()), c.dr_chen, at("2025-03-11", "14:00"), "Review")
            .unwrap();

        let mut e = entry("Iron deficiency", "Ferrous sulfate");
        e.notes = Some("Recheck in 6 weeks".into());
        add_medical_record(&c.conn, &Caller::Doctor(c.dr_chen), &c.ayse, e).unwrap();

        let records = list_medical_records_for_patient(&c.conn, &c.ayse).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].appointment_id, Some(later));
        assert_eq!(records[0].doctor_name, "Wei Chen");
        assert_eq!(records[0].notes.as_deref(), Some("Recheck in 6 weeks"));
    }

    #[test]
    fn medical_record_requires_diagnosis_and_treatment() {
        let (c, _) = with_visit();
        let doctor = Caller::Doctor(c.dr_chen);
        for bad in [entry("", "rest"), entry("flu", "   ")] {
            let err = add_medical_record(&c.conn, &doctor, &c.ayse, bad).unwrap_err();
            assert!(matches!(err, ClinicError::Validation(_)));
        }
        assert!(list_medical_records_for_patient(&c.conn, &c.ayse).unwrap().is_empty());
    }

    #[test]
    fn medical_record_without_appointment_rejected() {
        let c = clinic();
        let err = add_medical_record(&c.conn, &Caller::Doctor(c.dr_chen), &c.mehmet, entry("flu", "rest")).unwrap_err();
        assert!(matches!(err, ClinicError::NoGoverningAppointment { .. }));
    }

    #[test]
    fn cancel_leaves_clinical_records_in_place() {
        let (c, visit) = with_visit();
        let doctor = Caller::Doctor(c.dr_chen);
        add_medical_record(&c.conn, &doctor, &c.ayse, entry("Anemia", "Diet")).unwrap();
        let payload = LabPayload::BloodPanel(BloodPanelFields {
            doctor_comment: "Fe low".into(), crp: None, b12: None, mg: None, fe: Some(30.into()),
        });
        add_lab_result(&c.conn, &doctor, &c.ayse, payload, at("2025-03-10", "09:20")).unwrap();

        assert!(cancel(&c.conn, &Caller::Patient(c.ayse.clone()), visit).unwrap());

        let records = list_medical_records_for_patient(&c.conn, &c.ayse).unwrap();
        let labs = list_lab_results_for_patient(&c.conn, &c.ayse).unwrap();
        assert_eq!(records[0].appointment_id, Some(visit));
        assert_eq!(labs[0].appointment_id, Some(visit));
        assert!(repository::get_appointment(&c.conn, visit).unwrap().is_none());
    }
}
