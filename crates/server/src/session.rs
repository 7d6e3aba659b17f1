// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session cookie handling and the admin session extractor.
//!
//! The session token travels only in the `admin_token` cookie. It is
//! never accepted from a header, query string or request body.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::COOKIE, request::Parts},
    response::{IntoResponse, Response},
};
use stepcount_api::{ApiError, AuthError, AuthenticatedAdmin, AuthenticationService};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "admin_token";

/// Extractor for requests made by a logged-in administrator.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     AdminSession { admin, .. }: AdminSession,
/// ) -> Result<Json<Response>, HttpError> {
///     // admin: AuthenticatedAdmin
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Authentication Flow
///
/// 1. Read the `admin_token` cookie
/// 2. Validate it via `AuthenticationService::validate_session`, which
///    deletes the session if it has expired
/// 3. Return the `AuthenticatedAdmin` together with the token
///
/// # Errors
///
/// Returns HTTP 401 if the cookie is missing, the token is unknown or
/// the session has expired, and HTTP 500 if storage fails.
pub struct AdminSession {
    /// The administrator who owns the session.
    pub admin: AuthenticatedAdmin,
    /// The session token, needed to log out.
    pub token: String,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token: String = session_token(&parts.headers).ok_or_else(|| {
            debug!("Request without session cookie");
            SessionError::MissingCookie
        })?;

        let mut persistence = state.persistence.lock().await;
        let admin: AuthenticatedAdmin = AuthenticationService::validate_session(
            &mut persistence,
            &token,
            OffsetDateTime::now_utc(),
        )
        .map_err(|e| {
            warn!(error = %e, "Session validation failed");
            SessionError::Rejected(e)
        })?;

        debug!(admin_user_id = admin.id, "Session validated successfully");

        Ok(Self { admin, token })
    }
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// No `admin_token` cookie was sent.
    MissingCookie,
    /// The session authority rejected the token.
    Rejected(AuthError),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let err: AuthError = match self {
            Self::MissingCookie => AuthError::NotAuthenticated,
            Self::Rejected(err) => err,
        };
        HttpError::from(ApiError::from(err)).into_response()
    }
}

/// Returns the session token from the request cookies, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, SESSION_COOKIE).filter(|token| !token.is_empty())
}

/// Finds a cookie by name across all `Cookie` headers.
///
/// Pairs are split on `;`, then on the first `=`; values are
/// percent-decoded.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| percent_decode(value.trim()))
}

/// Builds the `Set-Cookie` value that stores a fresh session token.
pub fn session_cookie(token: &str, max_age: Duration) -> String {
    format!(
        "{SESSION_COOKIE}={token}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        max_age.whole_seconds()
    )
}

/// Builds the `Set-Cookie` value that removes the session token.
pub fn cleared_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax")
}

/// Decodes `%XX` escapes. Malformed escapes are kept as written.
fn percent_decode(raw: &str) -> String {
    let bytes: &[u8] = raw.as_bytes();
    let mut decoded: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut index: usize = 0;

    while index < bytes.len() {
        let escaped: Option<u8> = (bytes[index] == b'%')
            .then(|| bytes.get(index + 1..index + 3))
            .flatten()
            .and_then(|escape| hex::decode(escape).ok())
            .and_then(|value| value.first().copied());

        if let Some(byte) = escaped {
            decoded.push(byte);
            index += 3;
        } else {
            decoded.push(bytes[index]);
            index += 1;
        }
    }

    String::from_utf8_lossy(&decoded).into_owned()
}
