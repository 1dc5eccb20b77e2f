use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::enums::TestKind;
use crate::models::*;

const TEST_TYPE_COLUMNS: &str = "SELECT id, code, name, description FROM test_types";

pub fn list_test_types(conn: &Connection) -> Result<Vec<TestType>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{TEST_TYPE_COLUMNS} ORDER BY id ASC"))?;
    let rows = stmt.query_map([], test_type_row)?;

    let mut types = Vec::new();
    for row in rows {
        types.push(test_type_from_row(row?)?);
    }
    Ok(types)
}

pub fn get_test_type(conn: &Connection, id: TestTypeId) -> Result<Option<TestType>, DatabaseError> {
    let row = conn
        .query_row(&format!("{TEST_TYPE_COLUMNS} WHERE id = ?1"), params![id.0], test_type_row)
        .optional()?;
    row.map(test_type_from_row).transpose()
}

pub fn get_test_type_by_kind(conn: &Connection, kind: TestKind) -> Result<Option<TestType>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("{TEST_TYPE_COLUMNS} WHERE code = ?1"),
            params![kind.as_str()],
            test_type_row,
        )
        .optional()?;
    row.map(test_type_from_row).transpose()
}

type TestTypeRow = (i64, String, String, Option<String>);

fn test_type_row(row: &rusqlite::Row<'_>) -> Result<TestTypeRow, rusqlite::Error> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn test_type_from_row((id, code, name, description): TestTypeRow) -> Result<TestType, DatabaseError> {
    Ok(TestType {
        id: TestTypeId(id),
        kind: TestKind::from_str(&code)?,
        name,
        description,
    })
}
