// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Serializable representation of an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeData {
    pub id: i64,
    pub name: String,
}

/// Serializable representation of a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationData {
    pub id: i64,
    pub name: String,
}

/// A step entry joined with its employee and (optional) location names.
///
/// `location_id` and `location_name` are `None` once the referenced
/// location has been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEntryData {
    pub id: i64,
    pub entry_date: String,
    pub steps: i32,
    pub employee_id: i64,
    pub employee_name: String,
    pub location_id: Option<i64>,
    pub location_name: Option<String>,
}

/// Aggregated steps for one location on one day.
///
/// The sum and the number of entries are kept as integers so both
/// engines report the same values; the mean is derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationAverageData {
    pub entry_date: String,
    pub location_name: String,
    pub total_steps: i64,
    pub entry_count: i64,
}

impl LocationAverageData {
    /// Returns the arithmetic mean of the steps, rounded to two decimals.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average(&self) -> f64 {
        if self.entry_count == 0 {
            return 0.0;
        }
        let mean: f64 = self.total_steps as f64 / self.entry_count as f64;
        (mean * 100.0).round() / 100.0
    }
}

/// An administrator account, including its credential material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUserData {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
}

/// A login session joined with the owning administrator's email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub id: i64,
    pub admin_user_id: i64,
    pub email: String,
    pub token: String,
    pub expires_at: String,
}
