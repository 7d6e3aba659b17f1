// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Step entry queries.
//!
//! The location reference on a step entry is nullable, so joins against
//! `locations` spell out their `ON` clause instead of relying on
//! `joinable!`.

use diesel::dsl::{count, sum};
use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::{LocationAverageData, StepEntryData};
use crate::diesel_schema::{employees, locations, step_entries};
use crate::error::PersistenceError;

/// Row shape shared by the joined step entry queries.
type StepEntryRow = (i64, String, i32, i64, String, Option<i64>, Option<String>);

fn step_entry_from_row(row: StepEntryRow) -> StepEntryData {
    let (id, entry_date, steps, employee_id, employee_name, location_id, location_name) = row;
    StepEntryData {
        id,
        entry_date,
        steps,
        employee_id,
        employee_name,
        location_id,
        location_name,
    }
}

backend_fn! {
/// Lists every step entry joined with employee and location names.
///
/// Ordered by date descending, then employee name. Entries whose
/// location was deleted are included with a `None` location.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_step_entries(conn: &mut _) -> Result<Vec<StepEntryData>, PersistenceError> {
    debug!("Listing step entries");

    let rows: Vec<StepEntryRow> = step_entries::table
        .inner_join(employees::table)
        .left_join(locations::table.on(step_entries::location_id.eq(locations::id.nullable())))
        .select((
            step_entries::id,
            step_entries::entry_date,
            step_entries::steps,
            step_entries::employee_id,
            employees::name,
            step_entries::location_id,
            locations::name.nullable(),
        ))
        .order_by((
            step_entries::entry_date.desc(),
            employees::name.asc(),
            step_entries::id.asc(),
        ))
        .load(conn)?;

    Ok(rows.into_iter().map(step_entry_from_row).collect())
}
}

backend_fn! {
/// Aggregates step entries per day and location.
///
/// Returns the sum and count for each `(date, location)` pair, ordered by
/// date ascending and then location name. Entries without a location are
/// not part of any group.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_location_averages(conn: &mut _) -> Result<Vec<LocationAverageData>, PersistenceError> {
    debug!("Aggregating daily location averages");

    let rows: Vec<(String, String, Option<i64>, i64)> = step_entries::table
        .inner_join(locations::table.on(step_entries::location_id.eq(locations::id.nullable())))
        .group_by((step_entries::entry_date, locations::name))
        .select((
            step_entries::entry_date,
            locations::name,
            sum(step_entries::steps),
            count(step_entries::id),
        ))
        .order_by((step_entries::entry_date.asc(), locations::name.asc()))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(
            |(entry_date, location_name, total_steps, entry_count)| LocationAverageData {
                entry_date,
                location_name,
                total_steps: total_steps.unwrap_or(0),
                entry_count,
            },
        )
        .collect())
}
}
