// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

/// A loosely typed JSON scalar as submitted by browser forms.
///
/// Form fields arrive either as JSON numbers or as strings holding a
/// number, so numeric inputs are accepted in both shapes and validated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarInput {
    /// A JSON integer.
    Integer(i64),
    /// A JSON number with a fractional representation.
    Float(f64),
    /// A JSON string.
    Text(String),
}

impl ScalarInput {
    /// Interprets the scalar as a whole number.
    ///
    /// Returns `None` for fractional values and non-numeric text.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    pub fn as_whole_number(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Float(value) => {
                if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
                    Some(*value as i64)
                } else {
                    None
                }
            }
            Self::Text(text) => text.trim().parse::<i64>().ok(),
        }
    }

    /// Returns the textual form of the scalar, if it is a string.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Integer(_) | Self::Float(_) => None,
        }
    }
}

impl From<i64> for ScalarInput {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for ScalarInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A display name for an employee or a location.
///
/// Names are trimmed on construction and must not be empty.
/// Uniqueness is enforced by storage, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Name(String);

impl Name {
    /// Parses and normalizes a name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidName` if the trimmed name is empty.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed: &str = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidName(String::from("Name is required")));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the normalized name.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An administrator login email.
///
/// Comparison is case-sensitive; only surrounding whitespace is removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Email(String);

impl Email {
    /// Parses and normalizes an email address.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEmail` if the trimmed value is empty
    /// or has no `@` separating a local part from a domain.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed: &str = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidEmail(String::from("Email is required")));
        }
        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(trimmed.to_string()))
            }
            _ => Err(DomainError::InvalidEmail(String::from(
                "Email must be a valid address",
            ))),
        }
    }

    /// Returns the normalized email.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A plain-text password on its way to being hashed.
///
/// The value is never trimmed and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Wraps a password.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPassword` if the password is empty.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.is_empty() {
            return Err(DomainError::InvalidPassword(String::from(
                "Password is required",
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the plain-text password.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// A daily step count.
///
/// Bounded by the storage column (a signed 32-bit integer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct StepCount(i32);

impl StepCount {
    /// Creates a step count from a whole number.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSteps` if the value is negative or
    /// too large to store.
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value < 0 {
            return Err(Self::invalid());
        }
        i32::try_from(value).map(Self).map_err(|_| Self::invalid())
    }

    /// Parses a step count from a form scalar.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSteps` if the input is not a
    /// non-negative integer.
    pub fn from_input(input: &ScalarInput) -> Result<Self, DomainError> {
        input
            .as_whole_number()
            .ok_or_else(Self::invalid)
            .and_then(Self::new)
    }

    /// Returns the raw count.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    fn invalid() -> DomainError {
        DomainError::InvalidSteps(String::from("Steps must be a non-negative integer"))
    }
}

/// A database row identifier supplied by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RecordId(i64);

impl RecordId {
    /// Creates an identifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIdentifier` if `value` is not positive.
    pub fn new(field: &'static str, value: i64) -> Result<Self, DomainError> {
        if value <= 0 {
            return Err(Self::invalid(field));
        }
        Ok(Self(value))
    }

    /// Parses an identifier from a form scalar.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIdentifier` if the input is not a
    /// positive integer.
    pub fn from_input(field: &'static str, input: &ScalarInput) -> Result<Self, DomainError> {
        input
            .as_whole_number()
            .ok_or_else(|| Self::invalid(field))
            .and_then(|value| Self::new(field, value))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    fn invalid(field: &'static str) -> DomainError {
        DomainError::InvalidIdentifier {
            field,
            message: format!("{field} must be a positive integer"),
        }
    }
}

/// The calendar day a step entry belongs to.
///
/// Stored and exchanged as `YYYY-MM-DD`. Timestamps are accepted on
/// input, moved to UTC and truncated to their date, matching the UTC
/// "today" they are checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryDate(Date);

impl EntryDate {
    /// Wraps an already valid date.
    #[must_use]
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    /// Parses a `YYYY-MM-DD` date or an RFC 3339 timestamp.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDate` if neither format matches.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed: &str = raw.trim();
        if let Ok(date) = Date::parse(trimmed, format_description!("[year]-[month]-[day]")) {
            return Ok(Self(date));
        }
        OffsetDateTime::parse(trimmed, &Rfc3339)
            .map(|timestamp| Self(timestamp.to_offset(UtcOffset::UTC).date()))
            .map_err(|_| DomainError::InvalidDate(String::from("Invalid date")))
    }

    /// Returns the underlying date.
    #[must_use]
    pub const fn date(self) -> Date {
        self.0
    }

    /// Returns the storage form, `YYYY-MM-DD`.
    #[must_use]
    pub fn to_iso_string(self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for EntryDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}
