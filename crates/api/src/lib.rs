// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Step Count service.
//!
//! This crate sits between the HTTP server and the persistence layer. It
//! owns the session authority ([`AuthenticationService`]), the domain
//! operations on employees, locations, step entries and admin users, the
//! request and response shapes, and the translation of lower-level
//! errors into [`ApiError`].
//!
//! Functions here are synchronous and take `&mut Persistence`; they know
//! nothing about HTTP. Anything that depends on the clock takes the
//! current day or instant as an argument.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedAdmin, AuthenticationService, LoginOutcome, SESSION_DURATION};
pub use error::{
    ApiError, AuthError, Resource, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    check_session, create_admin_user, create_employee, create_location, delete_admin_user,
    delete_employee, delete_location, delete_step_entry, list_admin_users, list_averages,
    list_employees, list_locations, list_step_entries, login, logout, record_steps,
    update_admin_user, update_employee, update_location, update_step_entry,
};
pub use request_response::{
    AdminUserInfo, AdminUserRequest, AverageInfo, CheckResponse, CreatedResponse, EmployeeInfo,
    LocationInfo, LoginRequest, NameRequest, RecordStepsRequest, StepEntryInfo, SuccessResponse,
    UpdateStepEntryRequest,
};
