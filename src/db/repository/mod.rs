//! Repository layer: entity-scoped database operations.
//!
//! Plain functions over a `&Connection`. A `Transaction` derefs to a
//! connection, so callers compose several of these inside one transaction.
//! All public functions are re-exported here.

mod appointment;
mod doctor;
mod lab_result;
mod medical_record;
mod patient;
mod prescription;
mod test_type;

use chrono::{NaiveDate, NaiveDateTime};

use super::DatabaseError;

/// Storage format of every date+time column. Slots compare by exact text.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub use appointment::*;
pub use doctor::*;
pub use lab_result::*;
pub use medical_record::*;
pub use patient::*;
pub use prescription::*;
pub use test_type::*;

pub fn format_datetime(at: &NaiveDateTime) -> String {
    at.format(DATETIME_FORMAT).to_string()
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_datetime(column: &str, raw: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT).map_err(|_| DatabaseError::CorruptValue {
        column: column.into(),
        value: raw.into(),
    })
}

pub(crate) fn parse_date(column: &str, raw: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| DatabaseError::CorruptValue {
        column: column.into(),
        value: raw.into(),
    })
}
