// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee and location mutations.
//!
//! Name uniqueness is enforced by the schema; a duplicate surfaces as
//! `PersistenceError::UniqueViolation`. Deleting an employee removes its
//! step entries through `ON DELETE CASCADE`; deleting a location clears
//! the reference on its entries through `ON DELETE SET NULL`.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{employees, locations};
use crate::error::PersistenceError;

backend_fn! {
/// Creates an employee and returns its id.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the name is taken.
pub fn create_employee(conn: &mut _, name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(employees::table)
        .values(employees::name.eq(name))
        .execute(conn)?;

    let employee_id: i64 = conn.get_last_insert_rowid()?;

    info!(employee_id, "Created employee");
    Ok(employee_id)
}
}

backend_fn! {
/// Renames an employee.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no employee has this id, or
/// `PersistenceError::UniqueViolation` if the name is taken.
pub fn update_employee(conn: &mut _, employee_id: i64, name: &str) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(employees::table)
        .filter(employees::id.eq(employee_id))
        .set(employees::name.eq(name))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Employee with ID {employee_id} not found"
        )));
    }

    info!(employee_id, "Updated employee");
    Ok(())
}
}

backend_fn! {
/// Deletes an employee and, by cascade, its step entries.
///
/// Returns the number of employees removed (0 or 1).
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_employee(conn: &mut _, employee_id: i64) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(employees::table)
        .filter(employees::id.eq(employee_id))
        .execute(conn)?;

    info!(employee_id, rows_affected, "Deleted employee");
    Ok(rows_affected)
}
}

backend_fn! {
/// Creates a location and returns its id.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the name is taken.
pub fn create_location(conn: &mut _, name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(locations::table)
        .values(locations::name.eq(name))
        .execute(conn)?;

    let location_id: i64 = conn.get_last_insert_rowid()?;

    info!(location_id, "Created location");
    Ok(location_id)
}
}

backend_fn! {
/// Renames a location.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no location has this id, or
/// `PersistenceError::UniqueViolation` if the name is taken.
pub fn update_location(conn: &mut _, location_id: i64, name: &str) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(locations::table)
        .filter(locations::id.eq(location_id))
        .set(locations::name.eq(name))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Location with ID {location_id} not found"
        )));
    }

    info!(location_id, "Updated location");
    Ok(())
}
}

backend_fn! {
/// Deletes a location. Its step entries are kept with no location.
///
/// Returns the number of locations removed (0 or 1).
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_location(conn: &mut _, location_id: i64) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(locations::table)
        .filter(locations::id.eq(location_id))
        .execute(conn)?;

    info!(location_id, rows_affected, "Deleted location");
    Ok(rows_affected)
}
}
