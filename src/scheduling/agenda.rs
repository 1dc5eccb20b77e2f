use chrono::NaiveDate;
use rusqlite::Connection;

use crate::authorization::Caller;
use crate::db::repository;
use crate::error::ClinicError;
use crate::models::ScheduleEntry;

/// The calling doctor's appointments in time order, all of them or only `on`.
pub fn doctor_schedule(
    conn: &Connection,
    caller: &Caller,
    on: Option<NaiveDate>,
) -> Result<Vec<ScheduleEntry>, ClinicError> {
    let doctor_id = caller.require_doctor("view a doctor schedule")?;
    let entries = repository::list_appointments_for_doctor(conn, doctor_id, on.as_ref())?;
    tracing::debug!(%doctor_id, count = entries.len(), "Loaded doctor schedule");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::ledger::{book, cancel};
    use crate::test_fixtures::{at, clinic, monday};

    #[test]
    fn schedule_lists_own_appointments_with_patient_names() {
        let c = clinic();
        let ayse = Caller::Patient(c.ayse.clone());
        let mehmet = Caller::Patient(c.mehmet.clone());
        book(&c.conn, &mehmet, c.dr_chen, at("2025-03-11", "10:00"), "Follow-up").unwrap();
        book(&c.conn, &ayse, c.dr_chen, at("2025-03-10", "15:30"), "Chest pain").unwrap();
        book(&c.conn, &ayse, c.dr_moreau, at("2025-03-10", "09:00"), "Headache").unwrap();

        let all = doctor_schedule(&c.conn, &Caller::Doctor(c.dr_chen), None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].patient_name, "Ayse Yilmaz");
        assert_eq!(all[0].reason, "Chest pain");
        assert_eq!(all[1].patient_name, "Mehmet Demir");

        let monday_only = doctor_schedule(&c.conn, &Caller::Doctor(c.dr_chen), Some(monday())).unwrap();
        assert_eq!(monday_only.len(), 1);
        assert_eq!(monday_only[0].scheduled_at, at("2025-03-10", "15:30"));
    }

    #[test]
    fn cancelled_appointment_leaves_schedule() {
        let c = clinic();
        let ayse = Caller::Patient(c.ayse.clone());
        let id = book(&c.conn, &ayse, c.dr_chen, at("2025-03-10", "12:00"), "").unwrap();
        cancel(&c.conn, &ayse, id).unwrap();

        let entries = doctor_schedule(&c.conn, &Caller::Doctor(c.dr_chen), None).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn patients_cannot_read_a_schedule() {
        let c = clinic();
        let result = doctor_schedule(&c.conn, &Caller::Patient(c.ayse.clone()), None);
        assert!(matches!(result, Err(ClinicError::Forbidden { .. })));
    }
}
