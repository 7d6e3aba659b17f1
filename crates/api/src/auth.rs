// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session-based authentication for administrators.
//!
//! A session moves through three states: active while `now` is before
//! its expiry, expired once that instant has passed (detected lazily on
//! the next use), and deleted after logout or after an expired use.

use stepcount_persistence::{
    AdminUserData, Persistence, PersistenceError, SessionData, credentials, parse_timestamp,
};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// How long a session stays valid after login.
pub const SESSION_DURATION: Duration = Duration::hours(24);

/// The administrator behind a validated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAdmin {
    /// The admin user's id.
    pub id: i64,
    /// The admin user's email.
    pub email: String,
}

/// The result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// The opaque bearer token to hand to the client.
    pub token: String,
    /// The admin who logged in.
    pub admin: AuthenticatedAdmin,
    /// When the session stops being valid.
    pub expires_at: OffsetDateTime,
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Verifies credentials and opens a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The admin email (surrounding whitespace is ignored)
    /// * `password` - The plain-text password
    /// * `now` - The current instant
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a
    /// wrong password, and `AuthError::Internal` if storage fails,
    /// including the unlikely case of a token collision.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
        now: OffsetDateTime,
    ) -> Result<LoginOutcome, AuthError> {
        let admin: AdminUserData = persistence
            .get_admin_user_by_email(email.trim())
            .map_err(Self::map_persistence_error)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !credentials::verify_password(password, &admin.salt, &admin.password_hash) {
            warn!(admin_user_id = admin.id, "Rejected login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token: String = credentials::generate_token();
        let expires_at: OffsetDateTime = now + SESSION_DURATION;

        persistence
            .create_session(admin.id, &token, expires_at)
            .map_err(Self::map_persistence_error)?;

        info!(admin_user_id = admin.id, "Admin logged in");

        Ok(LoginOutcome {
            token,
            admin: AuthenticatedAdmin {
                id: admin.id,
                email: admin.email,
            },
            expires_at,
        })
    }

    /// Validates a session token and returns the admin it belongs to.
    ///
    /// An expired session is deleted as a side effect. A stored expiry
    /// that cannot be parsed counts as expired.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSession` if no session carries the token,
    /// `AuthError::SessionExpired` if it has expired, and
    /// `AuthError::Internal` if storage fails.
    pub fn validate_session(
        persistence: &mut Persistence,
        token: &str,
        now: OffsetDateTime,
    ) -> Result<AuthenticatedAdmin, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(token)
            .map_err(Self::map_persistence_error)?
            .ok_or(AuthError::InvalidSession)?;

        let still_valid: bool =
            parse_timestamp(&session.expires_at).is_some_and(|expires_at| now < expires_at);

        if !still_valid {
            debug!(session_id = session.id, "Session expired, deleting");
            persistence
                .delete_session(token)
                .map_err(Self::map_persistence_error)?;
            return Err(AuthError::SessionExpired);
        }

        Ok(AuthenticatedAdmin {
            id: session.admin_user_id,
            email: session.email,
        })
    }

    /// Reports whether `token` identifies a live session.
    ///
    /// Runs the same procedure as [`Self::validate_session`] but never
    /// fails; storage errors are logged and reported as `false`.
    pub fn check_session(
        persistence: &mut Persistence,
        token: Option<&str>,
        now: OffsetDateTime,
    ) -> bool {
        let Some(token) = token else {
            return false;
        };

        match Self::validate_session(persistence, token, now) {
            Ok(_) => true,
            Err(AuthError::Internal { message }) => {
                warn!("Session check failed: {message}");
                false
            }
            Err(_) => false,
        }
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted.
    pub fn logout(persistence: &mut Persistence, token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(token)
            .map_err(Self::map_persistence_error)?;

        info!("Admin logged out");
        Ok(())
    }

    /// Deletes every session that has expired by `now`.
    ///
    /// Returns the number of sessions removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the sessions cannot be deleted.
    pub fn purge_expired_sessions(
        persistence: &mut Persistence,
        now: OffsetDateTime,
    ) -> Result<usize, AuthError> {
        persistence
            .delete_expired_sessions(now)
            .map_err(Self::map_persistence_error)
    }

    /// Maps persistence errors to authentication errors.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::Internal {
            message: format!("Database error: {err}"),
        }
    }
}
