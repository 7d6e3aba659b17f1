// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee and location queries.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::{EmployeeData, LocationData};
use crate::diesel_schema::{employees, locations};
use crate::error::PersistenceError;

backend_fn! {
/// Lists all employees ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_employees(conn: &mut _) -> Result<Vec<EmployeeData>, PersistenceError> {
    debug!("Listing employees");

    let rows: Vec<(i64, String)> = employees::table
        .select((employees::id, employees::name))
        .order_by((employees::name.asc(), employees::id.asc()))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(id, name)| EmployeeData { id, name })
        .collect())
}
}

backend_fn! {
/// Lists all locations ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_locations(conn: &mut _) -> Result<Vec<LocationData>, PersistenceError> {
    debug!("Listing locations");

    let rows: Vec<(i64, String)> = locations::table
        .select((locations::id, locations::name))
        .order_by((locations::name.asc(), locations::id.asc()))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(id, name)| LocationData { id, name })
        .collect())
}
}
