// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin user and session mutations.
//!
//! Passwords are salted and hashed here, before anything reaches the
//! database. Plain-text passwords are never stored or logged.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::credentials;
use crate::diesel_schema::{admin_sessions, admin_users};
use crate::error::PersistenceError;

/// A partial update of an admin user.
///
/// Build it with [`AdminUserChanges::new`] so a new password always
/// comes with a fresh salt.
#[derive(Debug, Clone, Default, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = admin_users)]
pub struct AdminUserChanges {
    email: Option<String>,
    password_hash: Option<String>,
    salt: Option<String>,
}

impl AdminUserChanges {
    /// Prepares an update from an optional new email and password.
    #[must_use]
    pub fn new(email: Option<&str>, password: Option<&str>) -> Self {
        let (password_hash, salt) = password.map_or((None, None), |password| {
            let salt: String = credentials::generate_salt();
            (Some(credentials::hash_password(password, &salt)), Some(salt))
        });

        Self {
            email: email.map(str::to_string),
            password_hash,
            salt,
        }
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.password_hash.is_none()
    }
}

backend_fn! {
/// Creates an admin user and returns its id.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the email is taken.
pub fn create_admin_user(conn: &mut _, email: &str, password: &str) -> Result<i64, PersistenceError> {
    let salt: String = credentials::generate_salt();
    let password_hash: String = credentials::hash_password(password, &salt);

    diesel::insert_into(admin_users::table)
        .values((
            admin_users::email.eq(email),
            admin_users::password_hash.eq(&password_hash),
            admin_users::salt.eq(&salt),
        ))
        .execute(conn)?;

    let admin_user_id: i64 = conn.get_last_insert_rowid()?;

    info!(admin_user_id, "Created admin user");
    Ok(admin_user_id)
}
}

backend_fn! {
/// Creates the first admin user if none exists.
///
/// The count and the insert share a transaction. Returns `true` if an
/// admin was created.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn seed_admin_user(conn: &mut _, email: &str, password: &str) -> Result<bool, PersistenceError> {
    conn.transaction(|conn| {
        let existing: i64 = admin_users::table.count().get_result(conn)?;
        if existing > 0 {
            debug!(existing, "Admin users present, skipping seed");
            return Ok(false);
        }

        let salt: String = credentials::generate_salt();
        let password_hash: String = credentials::hash_password(password, &salt);

        diesel::insert_into(admin_users::table)
            .values((
                admin_users::email.eq(email),
                admin_users::password_hash.eq(&password_hash),
                admin_users::salt.eq(&salt),
            ))
            .execute(conn)?;

        info!("Seeded default admin user");
        Ok(true)
    })
}
}

backend_fn! {
/// Applies a partial update to an admin user.
///
/// # Errors
///
/// Returns:
/// - `PersistenceError::NothingToUpdate` if `changes` is empty
/// - `PersistenceError::NotFound` if no admin has this id
/// - `PersistenceError::UniqueViolation` if the new email is taken
pub fn update_admin_user(
    conn: &mut _,
    admin_user_id: i64,
    changes: &AdminUserChanges,
) -> Result<(), PersistenceError> {
    if changes.is_empty() {
        return Err(PersistenceError::NothingToUpdate);
    }

    let rows_affected: usize = diesel::update(admin_users::table)
        .filter(admin_users::id.eq(admin_user_id))
        .set(changes)
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Admin user with ID {admin_user_id} not found"
        )));
    }

    info!(admin_user_id, "Updated admin user");
    Ok(())
}
}

backend_fn! {
/// Deletes an admin user and, by cascade, its sessions.
///
/// The last remaining admin cannot be deleted. Deleting an id that does
/// not exist is not an error. Returns the number of admins removed.
///
/// # Errors
///
/// Returns `PersistenceError::LastAdminUser` if `admin_user_id` is the
/// only admin left, or another error if the database operation fails.
pub fn delete_admin_user(conn: &mut _, admin_user_id: i64) -> Result<usize, PersistenceError> {
    conn.transaction(|conn| {
        let target: i64 = admin_users::table
            .filter(admin_users::id.eq(admin_user_id))
            .count()
            .get_result(conn)?;
        if target == 0 {
            return Ok(0);
        }

        let total: i64 = admin_users::table.count().get_result(conn)?;
        if total <= 1 {
            return Err(PersistenceError::LastAdminUser);
        }

        let rows_affected: usize = diesel::delete(admin_users::table)
            .filter(admin_users::id.eq(admin_user_id))
            .execute(conn)?;

        info!(admin_user_id, "Deleted admin user");
        Ok(rows_affected)
    })
}
}

backend_fn! {
/// Creates a session for an admin user.
///
/// A colliding token is reported as `PersistenceError::UniqueViolation`;
/// an existing session is never replaced.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn create_session(
    conn: &mut _,
    admin_user_id: i64,
    token: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(admin_sessions::table)
        .values((
            admin_sessions::admin_user_id.eq(admin_user_id),
            admin_sessions::token.eq(token),
            admin_sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.get_last_insert_rowid()?;

    info!(session_id, admin_user_id, "Created session");
    Ok(session_id)
}
}

backend_fn! {
/// Deletes the session carrying `token`.
///
/// Returns the number of sessions removed.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_session(conn: &mut _, token: &str) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(admin_sessions::table)
        .filter(admin_sessions::token.eq(token))
        .execute(conn)?;

    debug!(rows_affected, "Deleted session");
    Ok(rows_affected)
}
}

backend_fn! {
/// Deletes every session that expired at or before `now`.
///
/// `now` must be in the storage timestamp form.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_expired_sessions(conn: &mut _, now: &str) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(admin_sessions::table)
        .filter(admin_sessions::expires_at.le(now))
        .execute(conn)?;

    info!(rows_affected, "Purged expired sessions");
    Ok(rows_affected)
}
}
