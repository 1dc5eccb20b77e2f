//! Read-only views of the calling patient's own history.

use rusqlite::Connection;

use crate::authorization::Caller;
use crate::db::repository;
use crate::error::ClinicError;
use crate::models::*;

/// Upcoming and past appointments, ascending by time.
pub fn my_appointments(conn: &Connection, caller: &Caller) -> Result<Vec<PatientAppointment>, ClinicError> {
    let patient_id = caller.require_patient("view appointments")?;
    Ok(repository::list_appointments_for_patient(conn, patient_id)?)
}

/// Newest first. One corrupt stored row fails the whole read.
pub fn my_lab_results(conn: &Connection, caller: &Caller) -> Result<Vec<LabResult>, ClinicError> {
    let patient_id = caller.require_patient("view lab results")?;
    Ok(repository::list_lab_results_for_patient(conn, patient_id)?)
}

/// Newest first.
pub fn my_medical_records(conn: &Connection, caller: &Caller) -> Result<Vec<MedicalRecord>, ClinicError> {
    let patient_id = caller.require_patient("view medical records")?;
    Ok(repository::list_medical_records_for_patient(conn, patient_id)?)
}

pub fn my_prescriptions(conn: &Connection, caller: &Caller) -> Result<Vec<Prescription>, ClinicError> {
    let patient_id = caller.require_patient("view prescriptions")?;
    Ok(repository::list_prescriptions_for_patient(conn, patient_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{add_lab_result, add_medical_record, write_prescription};
    use crate::scheduling::ledger::book;
    use crate::test_fixtures::{at, clinic, monday};

    #[test]
    fn history_is_scoped_to_caller() {
        let c = clinic();
        let ayse = Caller::Patient(c.ayse.clone());
        let mehmet = Caller::Patient(c.mehmet.clone());
        let doctor = Caller::Doctor(c.dr_chen);

        let visit = book(&c.conn, &ayse, c.dr_chen, at("2025-03-10", "09:00"), "Fatigue").unwrap();
        book(&c.conn, &ayse, c.dr_moreau, at("2025-03-11", "10:00"), "Migraine").unwrap();
        book(&c.conn, &mehmet, c.dr_chen, at("2025-03-10", "10:00"), "Checkup").unwrap();

        add_lab_result(
            &c.conn, &doctor, &c.ayse,
            LabPayload::Ct(ImagingFields { doctor_comment: "No findings".into() }),
            at("2025-03-10", "09:20"),
        )
        .unwrap();
        add_medical_record(&c.conn, &doctor, &c.ayse, MedicalRecordEntry {
            diagnosis: "Anemia".into(),
            treatment: "Iron supplements".into(),
            notes: None,
            created_date: at("2025-03-10", "09:25"),
        })
        .unwrap();
        write_prescription(&c.conn, &doctor, &c.ayse, visit, &[MedicineLine::new("Ferrous sulfate", "325 mg")], monday())
            .unwrap();

        let appointments = my_appointments(&c.conn, &ayse).unwrap();
        let reasons: Vec<&str> = appointments.iter().map(|a| a.reason.as_str()).collect();
        assert_eq!(reasons, vec!["Fatigue", "Migraine"]);
        assert_eq!(appointments[1].doctor_name, "Claire Moreau");

        assert_eq!(my_lab_results(&c.conn, &ayse).unwrap().len(), 1);
        assert_eq!(my_medical_records(&c.conn, &ayse).unwrap()[0].diagnosis, "Anemia");
        assert_eq!(my_prescriptions(&c.conn, &ayse).unwrap()[0].details[0].medicine_name, "Ferrous sulfate");

        assert_eq!(my_appointments(&c.conn, &mehmet).unwrap().len(), 1);
        assert!(my_lab_results(&c.conn, &mehmet).unwrap().is_empty());
        assert!(my_medical_records(&c.conn, &mehmet).unwrap().is_empty());
        assert!(my_prescriptions(&c.conn, &mehmet).unwrap().is_empty());
    }

    #[test]
    fn lab_results_newest_first() {
        let c = clinic();
        let ayse = Caller::Patient(c.ayse.clone());
        let doctor = Caller::Doctor(c.dr_chen);
        book(&c.conn, &ayse, c.dr_chen, at("2025-03-10", "09:00"), "").unwrap();
        for (comment, when) in [("first", at("2025-03-10", "09:10")), ("second", at("2025-03-12", "08:00"))] {
            let payload = LabPayload::XRay(ImagingFields { doctor_comment: comment.into() });
            add_lab_result(&c.conn, &doctor, &c.ayse, payload, when).unwrap();
        }

        let labs = my_lab_results(&c.conn, &ayse).unwrap();
        let comments: Vec<&str> = labs.iter().map(|l| l.payload.doctor_comment()).collect();
        assert_eq!(comments, vec!["second", "first"]);
    }

    #[test]
    fn corrupt_lab_row_fails_lab_history() {
        let c = clinic();
        c.conn
            .execute(
                "INSERT INTO lab_results (patient_id, doctor_id, test_type_id, result_data, test_date)
                 VALUES (?1, ?2, 1, 'not json', '2025-03-10 09:00:00')",
                rusqlite::params![c.ayse.as_str(), c.dr_chen.0],
            )
            .unwrap();

        let err = my_lab_results(&c.conn, &Caller::Patient(c.ayse.clone())).unwrap_err();
        assert!(matches!(
            err,
            ClinicError::Storage(crate::db::DatabaseError::CorruptValue { ref column, .. }) if column == "result_data"
        ));
        assert!(my_lab_results(&c.conn, &Caller::Patient(c.mehmet.clone())).unwrap().is_empty());
    }

    #[test]
    fn doctors_have_no_patient_history() {
        let c = clinic();
        let doctor = Caller::Doctor(c.dr_chen);
        assert!(matches!(my_appointments(&c.conn, &doctor), Err(ClinicError::Forbidden { .. })));
        assert!(matches!(my_prescriptions(&c.conn, &doctor), Err(ClinicError::Forbidden { .. })));
    }
}
