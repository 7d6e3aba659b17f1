// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;

/// Errors that can occur during domain validation.
///
/// The `Display` output of every variant is the message shown to the
/// caller, so it is phrased for people rather than logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Employee or location name is empty.
    InvalidName(String),
    /// Admin email is empty or malformed.
    InvalidEmail(String),
    /// Admin password is empty.
    InvalidPassword(String),
    /// Step count is not a non-negative integer.
    InvalidSteps(String),
    /// An identifier is not a positive integer.
    InvalidIdentifier {
        /// The field carrying the identifier.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },
    /// Date string is not a valid calendar date.
    InvalidDate(String),
    /// Date lies after the current day.
    FutureDate {
        /// The rejected date.
        date: Date,
        /// The day it was compared against.
        today: Date,
    },
}

impl DomainError {
    /// Returns the name of the input field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier { field, .. } => field,
            Self::InvalidName(_) => "name",
            Self::InvalidEmail(_) => "email",
            Self::InvalidPassword(_) => "password",
            Self::InvalidSteps(_) => "steps",
            Self::InvalidDate(_) | Self::FutureDate { .. } => "date",
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(msg)
            | Self::InvalidEmail(msg)
            | Self::InvalidPassword(msg)
            | Self::InvalidSteps(msg)
            | Self::InvalidDate(msg) => write!(f, "{msg}"),
            Self::InvalidIdentifier { message, .. } => write!(f, "{message}"),
            Self::FutureDate { .. } => write!(f, "Date cannot be in the future"),
        }
    }
}

impl std::error::Error for DomainError {}
