// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API operations.
//!
//! Each function validates its input, calls the persistence layer and
//! shapes the result. Authentication of admin operations happens before
//! these functions are called.

use stepcount_domain::{
    Email, EntryDate, Name, Password, RecordId, ScalarInput, StepCount,
    validate_entry_date,
};
use stepcount_persistence::{
    AdminUserChanges, LocationAverageData, Persistence, StepEntryChanges, StepEntryData,
};
use time::{Date, OffsetDateTime};
use tracing::info;

use crate::auth::{AuthenticationService, LoginOutcome};
use crate::error::{ApiError, Resource, translate_persistence_error};
use crate::request_response::{
    AdminUserInfo, AdminUserRequest, AverageInfo, CheckResponse, CreatedResponse, EmployeeInfo,
    LocationInfo, LoginRequest, NameRequest, RecordStepsRequest, StepEntryInfo, SuccessResponse,
    UpdateStepEntryRequest,
};

const STEPS_FIELDS_REQUIRED: &str = "employeeId, locationId, date and steps are required";

fn parse_name(request: &NameRequest) -> Result<Name, ApiError> {
    Ok(Name::parse(request.name.as_deref().unwrap_or_default())?)
}

/// Returns the scalar unless it is absent, null or a blank string.
fn present(input: Option<&ScalarInput>) -> Option<&ScalarInput> {
    input.filter(|value| !matches!(value, ScalarInput::Text(text) if text.trim().is_empty()))
}

/// Returns the text unless it is absent or blank.
fn non_blank(input: Option<&str>) -> Option<&str> {
    input.filter(|value| !value.trim().is_empty())
}

// ============================================================================
// Employees
// ============================================================================

/// Lists all employees ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_employees(persistence: &mut Persistence) -> Result<Vec<EmployeeInfo>, ApiError> {
    let employees = persistence
        .list_employees()
        .map_err(|e| translate_persistence_error(e, Resource::Employee))?;

    Ok(employees
        .into_iter()
        .map(|employee| EmployeeInfo {
            id: employee.id,
            name: employee.name,
        })
        .collect())
}

/// Creates an employee.
///
/// # Errors
///
/// Returns an error if the name is blank or already taken.
pub fn create_employee(
    persistence: &mut Persistence,
    request: &NameRequest,
) -> Result<CreatedResponse, ApiError> {
    let name: Name = parse_name(request)?;

    let id: i64 = persistence
        .create_employee(name.value())
        .map_err(|e| translate_persistence_error(e, Resource::Employee))?;

    Ok(CreatedResponse::new(id))
}

/// Renames an employee.
///
/// # Errors
///
/// Returns an error if the name is blank or taken, or if the employee
/// does not exist.
pub fn update_employee(
    persistence: &mut Persistence,
    employee_id: i64,
    request: &NameRequest,
) -> Result<SuccessResponse, ApiError> {
    let name: Name = parse_name(request)?;

    persistence
        .update_employee(employee_id, name.value())
        .map_err(|e| translate_persistence_error(e, Resource::Employee))?;

    Ok(SuccessResponse::ok())
}

/// Deletes an employee together with all of their step entries.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_employee(
    persistence: &mut Persistence,
    employee_id: i64,
) -> Result<SuccessResponse, ApiError> {
    persistence
        .delete_employee(employee_id)
        .map_err(|e| translate_persistence_error(e, Resource::Employee))?;

    Ok(SuccessResponse::ok())
}

// ============================================================================
// Locations
// ============================================================================

/// Lists all locations ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_locations(persistence: &mut Persistence) -> Result<Vec<LocationInfo>, ApiError> {
    let locations = persistence
        .list_locations()
        .map_err(|e| translate_persistence_error(e, Resource::Location))?;

    Ok(locations
        .into_iter()
        .map(|location| LocationInfo {
            id: location.id,
            name: location.name,
        })
        .collect())
}

/// Creates a location.
///
/// # Errors
///
/// Returns an error if the name is blank or already taken.
pub fn create_location(
    persistence: &mut Persistence,
    request: &NameRequest,
) -> Result<CreatedResponse, ApiError> {
    let name: Name = parse_name(request)?;

    let id: i64 = persistence
        .create_location(name.value())
        .map_err(|e| translate_persistence_error(e, Resource::Location))?;

    Ok(CreatedResponse::new(id))
}

/// Renames a location.
///
/// # Errors
///
/// Returns an error if the name is blank or taken, or if the location
/// does not exist.
pub fn update_location(
    persistence: &mut Persistence,
    location_id: i64,
    request: &NameRequest,
) -> Result<SuccessResponse, ApiError> {
    let name: Name = parse_name(request)?;

    persistence
        .update_location(location_id, name.value())
        .map_err(|e| translate_persistence_error(e, Resource::Location))?;

    Ok(SuccessResponse::ok())
}

/// Deletes a location. Its step entries remain, without a location.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_location(
    persistence: &mut Persistence,
    location_id: i64,
) -> Result<SuccessResponse, ApiError> {
    persistence
        .delete_location(location_id)
        .map_err(|e| translate_persistence_error(e, Resource::Location))?;

    Ok(SuccessResponse::ok())
}

// ============================================================================
// Steps
// ============================================================================

/// Records the steps of an employee for a day.
///
/// Validation runs in this order: all fields present, ids are positive
/// integers, steps is a non-negative integer, date parses, date is not
/// after `today`. Recording the same employee and day again overwrites
/// the earlier steps and location.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The submitted form
/// * `today` - The current day
///
/// # Errors
///
/// Returns an error if validation fails, if the employee or location
/// does not exist, or if the database operation fails.
pub fn record_steps(
    persistence: &mut Persistence,
    request: &RecordStepsRequest,
    today: Date,
) -> Result<SuccessResponse, ApiError> {
    let (Some(employee_id), Some(location_id), Some(date), Some(steps)) = (
        present(request.employee_id.as_ref()),
        present(request.location_id.as_ref()),
        present(request.date.as_ref()),
        present(request.steps.as_ref()),
    ) else {
        return Err(ApiError::InvalidInput {
            field: String::from("body"),
            message: String::from(STEPS_FIELDS_REQUIRED),
        });
    };

    let employee_id: RecordId = RecordId::from_input("employeeId", employee_id)?;
    let location_id: RecordId = RecordId::from_input("locationId", location_id)?;
    let steps: StepCount = StepCount::from_input(steps)?;
    let date: EntryDate = validate_entry_date(date, today)?;

    persistence
        .upsert_step_entry(
            employee_id.value(),
            location_id.value(),
            &date.to_iso_string(),
            steps.value(),
        )
        .map_err(|e| translate_persistence_error(e, Resource::StepEntry))?;

    Ok(SuccessResponse::ok())
}

/// Lists the mean steps per location and day, ordered by date.
///
/// Entries whose location has been deleted are not counted.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_averages(persistence: &mut Persistence) -> Result<Vec<AverageInfo>, ApiError> {
    let rows: Vec<LocationAverageData> = persistence
        .list_location_averages()
        .map_err(|e| translate_persistence_error(e, Resource::StepEntry))?;

    Ok(rows
        .into_iter()
        .map(|row| AverageInfo {
            average: format!("{:.2}", row.average()),
            date: row.entry_date,
            location: row.location_name,
        })
        .collect())
}

/// Lists every step entry, newest day first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_step_entries(persistence: &mut Persistence) -> Result<Vec<StepEntryInfo>, ApiError> {
    let entries: Vec<StepEntryData> = persistence
        .list_step_entries()
        .map_err(|e| translate_persistence_error(e, Resource::StepEntry))?;

    Ok(entries
        .into_iter()
        .map(|entry| StepEntryInfo {
            id: entry.id,
            date: entry.entry_date,
            steps: entry.steps,
            employee_id: entry.employee_id,
            employee_name: entry.employee_name,
            location_id: entry.location_id,
            location_name: entry.location_name,
        })
        .collect())
}

/// Partially updates a step entry.
///
/// Every field present in the request is validated the same way as in
/// [`record_steps`], including the rejection of future dates.
///
/// # Errors
///
/// Returns an error if a field is invalid, if no field is given, if the
/// entry does not exist, or if the change would create a second entry
/// for the same employee and day.
pub fn update_step_entry(
    persistence: &mut Persistence,
    entry_id: i64,
    request: &UpdateStepEntryRequest,
    today: Date,
) -> Result<SuccessResponse, ApiError> {
    let employee_id: Option<i64> = present(request.employee_id.as_ref())
        .map(|input| RecordId::from_input("employeeId", input).map(RecordId::value))
        .transpose()?;
    let location_id: Option<i64> = present(request.location_id.as_ref())
        .map(|input| RecordId::from_input("locationId", input).map(RecordId::value))
        .transpose()?;
    let steps: Option<i32> = present(request.steps.as_ref())
        .map(|input| StepCount::from_input(input).map(StepCount::value))
        .transpose()?;
    let entry_date: Option<String> = present(request.date.as_ref())
        .map(|input| validate_entry_date(input, today).map(EntryDate::to_iso_string))
        .transpose()?;

    let changes: StepEntryChanges = StepEntryChanges {
        employee_id,
        location_id,
        entry_date,
        steps,
    };

    persistence
        .update_step_entry(entry_id, &changes)
        .map_err(|e| translate_persistence_error(e, Resource::StepEntry))?;

    Ok(SuccessResponse::ok())
}

/// Deletes a step entry.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_step_entry(
    persistence: &mut Persistence,
    entry_id: i64,
) -> Result<SuccessResponse, ApiError> {
    persistence
        .delete_step_entry(entry_id)
        .map_err(|e| translate_persistence_error(e, Resource::StepEntry))?;

    Ok(SuccessResponse::ok())
}

// ============================================================================
// Admin users
// ============================================================================

/// Lists admin users. Hashes and salts are never included.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_admin_users(persistence: &mut Persistence) -> Result<Vec<AdminUserInfo>, ApiError> {
    let admins = persistence
        .list_admin_users()
        .map_err(|e| translate_persistence_error(e, Resource::AdminUser))?;

    Ok(admins
        .into_iter()
        .map(|admin| AdminUserInfo {
            id: admin.id,
            email: admin.email,
        })
        .collect())
}

/// Creates an admin user.
///
/// # Errors
///
/// Returns an error if the email or password is missing or invalid, or
/// if the email is already taken.
pub fn create_admin_user(
    persistence: &mut Persistence,
    request: &AdminUserRequest,
) -> Result<CreatedResponse, ApiError> {
    let email: Email = Email::parse(request.email.as_deref().unwrap_or_default())?;
    let password: Password = Password::parse(request.password.as_deref().unwrap_or_default())?;

    let id: i64 = persistence
        .create_admin_user(email.value(), password.expose())
        .map_err(|e| translate_persistence_error(e, Resource::AdminUser))?;

    info!(admin_user_id = id, "Admin user created via API");
    Ok(CreatedResponse::new(id))
}

/// Updates the email and/or password of an admin user.
///
/// A new password is stored with a fresh salt.
///
/// # Errors
///
/// Returns an error if no field is given, if the email is invalid or
/// taken, or if the admin does not exist.
pub fn update_admin_user(
    persistence: &mut Persistence,
    admin_user_id: i64,
    request: &AdminUserRequest,
) -> Result<SuccessResponse, ApiError> {
    let email: Option<Email> = non_blank(request.email.as_deref())
        .map(Email::parse)
        .transpose()?;
    let password: Option<Password> = request
        .password
        .as_deref()
        .filter(|password| !password.is_empty())
        .map(Password::parse)
        .transpose()?;

    let changes: AdminUserChanges = AdminUserChanges::new(
        email.as_ref().map(Email::value),
        password.as_ref().map(Password::expose),
    );

    persistence
        .update_admin_user(admin_user_id, &changes)
        .map_err(|e| translate_persistence_error(e, Resource::AdminUser))?;

    Ok(SuccessResponse::ok())
}

/// Deletes an admin user and ends their sessions.
///
/// # Errors
///
/// Returns an error if this is the last remaining admin, or if the
/// database operation fails.
pub fn delete_admin_user(
    persistence: &mut Persistence,
    admin_user_id: i64,
) -> Result<SuccessResponse, ApiError> {
    persistence
        .delete_admin_user(admin_user_id)
        .map_err(|e| translate_persistence_error(e, Resource::AdminUser))?;

    Ok(SuccessResponse::ok())
}

// ============================================================================
// Sessions
// ============================================================================

/// Logs an admin in.
///
/// # Errors
///
/// Returns an error if a field is missing or the credentials are wrong.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
    now: OffsetDateTime,
) -> Result<LoginOutcome, ApiError> {
    let (Some(email), Some(password)) = (
        non_blank(request.email.as_deref()),
        request.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::InvalidInput {
            field: String::from("body"),
            message: String::from("Email and password are required"),
        });
    };

    Ok(AuthenticationService::login(
        persistence,
        email,
        password,
        now,
    )?)
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(persistence: &mut Persistence, token: &str) -> Result<SuccessResponse, ApiError> {
    AuthenticationService::logout(persistence, token)?;
    Ok(SuccessResponse::ok())
}

/// Reports whether `token` belongs to a live session.
#[must_use]
pub fn check_session(
    persistence: &mut Persistence,
    token: Option<&str>,
    now: OffsetDateTime,
) -> CheckResponse {
    CheckResponse {
        logged_in: AuthenticationService::check_session(persistence, token, now),
    }
}
