// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Step entry mutations.
//!
//! A step entry is keyed on `(employee_id, entry_date)`: recording steps
//! twice for the same pair overwrites the steps and location of the one
//! existing row. The two engines reach that outcome differently:
//!
//! - `SQLite` runs `UPDATE` and falls back to `INSERT` when no row
//!   changed. Both statements share an `IMMEDIATE` transaction, which
//!   takes the write lock up front so no other writer can slip an insert
//!   between them.
//! - `PostgreSQL` uses a single `INSERT ... ON CONFLICT DO UPDATE`.

use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel::{PgConnection, SqliteConnection};
use tracing::{debug, info};

use crate::diesel_schema::step_entries;
use crate::error::PersistenceError;

/// A partial update of a step entry.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = step_entries)]
pub struct StepEntryChanges {
    pub employee_id: Option<i64>,
    pub location_id: Option<i64>,
    pub entry_date: Option<String>,
    pub steps: Option<i32>,
}

impl StepEntryChanges {
    /// Returns `true` if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.employee_id.is_none()
            && self.location_id.is_none()
            && self.entry_date.is_none()
            && self.steps.is_none()
    }
}

/// Records the steps for an employee on a day (`SQLite` version).
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyViolation` if the employee or the
/// location does not exist, or another error if the database operation
/// fails.
pub fn upsert_step_entry_sqlite(
    conn: &mut SqliteConnection,
    employee_id: i64,
    location_id: i64,
    entry_date: &str,
    steps: i32,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let rows_updated: usize = diesel::update(step_entries::table)
            .filter(step_entries::employee_id.eq(employee_id))
            .filter(step_entries::entry_date.eq(entry_date))
            .set((
                step_entries::steps.eq(steps),
                step_entries::location_id.eq(Some(location_id)),
            ))
            .execute(conn)?;

        if rows_updated == 0 {
            debug!(employee_id, entry_date, "No entry for this day yet, inserting");
            diesel::insert_into(step_entries::table)
                .values((
                    step_entries::employee_id.eq(employee_id),
                    step_entries::location_id.eq(Some(location_id)),
                    step_entries::entry_date.eq(entry_date),
                    step_entries::steps.eq(steps),
                ))
                .execute(conn)?;
        }

        Ok::<(), PersistenceError>(())
    })?;

    info!(employee_id, location_id, entry_date, steps, "Recorded steps");
    Ok(())
}

/// Records the steps for an employee on a day (`PostgreSQL` version).
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyViolation` if the employee or the
/// location does not exist, or another error if the database operation
/// fails.
pub fn upsert_step_entry_pg(
    conn: &mut PgConnection,
    employee_id: i64,
    location_id: i64,
    entry_date: &str,
    steps: i32,
) -> Result<(), PersistenceError> {
    diesel::insert_into(step_entries::table)
        .values((
            step_entries::employee_id.eq(employee_id),
            step_entries::location_id.eq(Some(location_id)),
            step_entries::entry_date.eq(entry_date),
            step_entries::steps.eq(steps),
        ))
        .on_conflict((step_entries::employee_id, step_entries::entry_date))
        .do_update()
        .set((
            step_entries::steps.eq(excluded(step_entries::steps)),
            step_entries::location_id.eq(excluded(step_entries::location_id)),
        ))
        .execute(conn)?;

    info!(employee_id, location_id, entry_date, steps, "Recorded steps");
    Ok(())
}

backend_fn! {
/// Applies a partial update to a step entry.
///
/// # Errors
///
/// Returns:
/// - `PersistenceError::NothingToUpdate` if `changes` is empty
/// - `PersistenceError::NotFound` if no entry has this id
/// - `PersistenceError::UniqueViolation` if the entry would collide with
///   another entry for the same employee and day
/// - `PersistenceError::ForeignKeyViolation` if a referenced employee or
///   location does not exist
pub fn update_step_entry(
    conn: &mut _,
    entry_id: i64,
    changes: &StepEntryChanges,
) -> Result<(), PersistenceError> {
    if changes.is_empty() {
        return Err(PersistenceError::NothingToUpdate);
    }

    let rows_affected: usize = diesel::update(step_entries::table)
        .filter(step_entries::id.eq(entry_id))
        .set(changes)
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Step entry with ID {entry_id} not found"
        )));
    }

    info!(entry_id, "Updated step entry");
    Ok(())
}
}

backend_fn! {
/// Deletes a step entry.
///
/// Returns the number of entries removed (0 or 1).
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_step_entry(conn: &mut _, entry_id: i64) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(step_entries::table)
        .filter(step_entries::id.eq(entry_id))
        .execute(conn)?;

    info!(entry_id, rows_affected, "Deleted step entry");
    Ok(rows_affected)
}
}
