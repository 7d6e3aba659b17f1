// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use stepcount_domain::DomainError;
use stepcount_persistence::PersistenceError;

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password.
    InvalidCredentials,
    /// No session token was presented.
    NotAuthenticated,
    /// The presented token does not match any session.
    InvalidSession,
    /// The session existed but its validity window has passed.
    SessionExpired,
    /// Storage failed while authenticating.
    Internal {
        /// A description of the failure.
        message: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "Invalid credentials"),
            Self::NotAuthenticated => write!(f, "Not authenticated"),
            Self::InvalidSession => write!(f, "Invalid session"),
            Self::SessionExpired => write!(f, "Session expired"),
            Self::Internal { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain and persistence errors and represent
/// the API contract. Each variant carries the message shown to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed or is missing.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// A uniqueness or integrity rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns the message intended for the caller.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::AuthenticationFailed { reason } => reason,
            Self::DomainRuleViolation { message, .. }
            | Self::InvalidInput { message, .. }
            | Self::ResourceNotFound { message, .. }
            | Self::Internal { message } => message,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal { message } => Self::Internal { message },
            other => Self::AuthenticationFailed {
                reason: other.to_string(),
            },
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

/// The kind of record an operation touched.
///
/// Used to phrase conflict and not-found messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Employee,
    Location,
    StepEntry,
    AdminUser,
}

impl Resource {
    const fn display_name(self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Location => "Location",
            Self::StepEntry => "Step entry",
            Self::AdminUser => "Admin user",
        }
    }

    const fn unique_rule(self) -> &'static str {
        match self {
            Self::Employee => "unique_employee_name",
            Self::Location => "unique_location_name",
            Self::StepEntry => "one_entry_per_employee_per_day",
            Self::AdminUser => "unique_admin_email",
        }
    }

    const fn conflict_message(self) -> &'static str {
        match self {
            Self::Employee => "Employee already exists",
            Self::Location => "Location already exists",
            Self::StepEntry => "An entry already exists for this employee and date",
            Self::AdminUser => "Admin user already exists",
        }
    }
}

/// Translates a domain error into an API error.
///
/// Every domain error is a validation failure of one input field.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: err.field().to_string(),
        message: err.to_string(),
    }
}

/// Translates a persistence error into an API error.
///
/// Constraint violations arrive already classified, so no message text
/// is inspected here.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError, resource: Resource) -> ApiError {
    match err {
        PersistenceError::UniqueViolation(_) => ApiError::DomainRuleViolation {
            rule: resource.unique_rule().to_string(),
            message: resource.conflict_message().to_string(),
        },
        PersistenceError::ForeignKeyViolation(_) => ApiError::InvalidInput {
            field: String::from("employeeId"),
            message: String::from("Employee or location does not exist"),
        },
        PersistenceError::NotFound(_) => ApiError::ResourceNotFound {
            resource_type: resource.display_name().to_string(),
            message: format!("{} not found", resource.display_name()),
        },
        PersistenceError::NothingToUpdate => ApiError::InvalidInput {
            field: String::from("body"),
            message: err.to_string(),
        },
        PersistenceError::LastAdminUser => ApiError::DomainRuleViolation {
            rule: String::from("keep_one_admin"),
            message: err.to_string(),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
