// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Request fields are optional so that a missing field is reported as a
//! validation error with a useful message rather than a decoding failure.

use serde::{Deserialize, Serialize};
use stepcount_domain::ScalarInput;

/// API request to create or rename an employee or a location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NameRequest {
    /// The display name.
    pub name: Option<String>,
}

/// API request to record the steps of an employee for a day.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStepsRequest {
    /// The employee id.
    pub employee_id: Option<ScalarInput>,
    /// The location id.
    pub location_id: Option<ScalarInput>,
    /// The day, `YYYY-MM-DD`.
    pub date: Option<ScalarInput>,
    /// The step count.
    pub steps: Option<ScalarInput>,
}

/// API request to partially update a step entry.
///
/// Accepts the camelCase names used by [`RecordStepsRequest`] as well as
/// the snake_case names of [`StepEntryInfo`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStepEntryRequest {
    /// A new employee id.
    #[serde(alias = "employee_id")]
    pub employee_id: Option<ScalarInput>,
    /// A new location id.
    #[serde(alias = "location_id")]
    pub location_id: Option<ScalarInput>,
    /// A new day.
    pub date: Option<ScalarInput>,
    /// A new step count.
    pub steps: Option<ScalarInput>,
}

/// API request to log in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    /// The admin email.
    pub email: Option<String>,
    /// The plain-text password.
    pub password: Option<String>,
}

/// API request to create or update an admin user.
///
/// On update, absent or blank fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AdminUserRequest {
    /// The admin email.
    pub email: Option<String>,
    /// The plain-text password.
    pub password: Option<String>,
}

/// Generic success acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    /// A successful acknowledgement.
    #[must_use]
    pub const fn ok() -> Self {
        Self { success: true }
    }
}

/// Acknowledgement of a create, carrying the new id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: i64,
}

impl CreatedResponse {
    /// A successful create of the record with `id`.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self { success: true, id }
    }
}

/// An employee as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeInfo {
    pub id: i64,
    pub name: String,
}

/// A location as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub id: i64,
    pub name: String,
}

/// Mean steps for one location on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageInfo {
    /// The day, `YYYY-MM-DD`.
    pub date: String,
    /// The location name.
    pub location: String,
    /// The mean with exactly two decimals, e.g. `"1500.00"`.
    pub average: String,
}

/// A step entry as listed in the admin interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEntryInfo {
    pub id: i64,
    pub date: String,
    pub steps: i32,
    pub employee_id: i64,
    pub employee_name: String,
    pub location_id: Option<i64>,
    pub location_name: Option<String>,
}

/// An admin user as listed by the API. Credential material is omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUserInfo {
    pub id: i64,
    pub email: String,
}

/// Whether the caller holds a live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub logged_in: bool,
}
