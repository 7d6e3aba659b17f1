// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Administrator and session queries.
//!
//! This module contains backend-agnostic queries for retrieving admin
//! users and their sessions. All queries use Diesel DSL and work across
//! all supported database backends.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::{AdminUserData, SessionData};
use crate::diesel_schema::{admin_sessions, admin_users};
use crate::error::PersistenceError;

/// Diesel Queryable struct for admin user rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = admin_users)]
struct AdminUserRow {
    id: i64,
    email: String,
    password_hash: String,
    salt: String,
}

impl From<AdminUserRow> for AdminUserData {
    fn from(row: AdminUserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            salt: row.salt,
        }
    }
}

backend_fn! {
/// Lists all admin users ordered by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_admin_users(conn: &mut _) -> Result<Vec<AdminUserData>, PersistenceError> {
    debug!("Listing admin users");

    let rows: Vec<AdminUserRow> = admin_users::table
        .select(AdminUserRow::as_select())
        .order_by(admin_users::id.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(AdminUserData::from).collect())
}
}

backend_fn! {
/// Retrieves an admin user by email.
///
/// The comparison is exact; emails are trimmed before they get here.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no admin has this email.
pub fn get_admin_user_by_email(
    conn: &mut _,
    email: &str,
) -> Result<Option<AdminUserData>, PersistenceError> {
    debug!("Looking up admin user by email");

    let row: Option<AdminUserRow> = admin_users::table
        .filter(admin_users::email.eq(email))
        .select(AdminUserRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(AdminUserData::from))
}
}

backend_fn! {
/// Retrieves a session by token, joined with its owning admin user.
///
/// Expiry is not evaluated here.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no session carries this token.
pub fn get_session_by_token(
    conn: &mut _,
    token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    let row: Option<(i64, i64, String, String, String)> = admin_sessions::table
        .inner_join(admin_users::table)
        .filter(admin_sessions::token.eq(token))
        .select((
            admin_sessions::id,
            admin_sessions::admin_user_id,
            admin_users::email,
            admin_sessions::token,
            admin_sessions::expires_at,
        ))
        .first(conn)
        .optional()?;

    Ok(row.map(|(id, admin_user_id, email, token, expires_at)| SessionData {
        id,
        admin_user_id,
        email,
        token,
        expires_at,
    }))
}
}
