// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{EntryDate, ScalarInput};
use time::Date;

/// Rejects dates strictly after `today`.
///
/// Both sides are plain calendar dates, so any time-of-day component has
/// already been discarded. An entry for today itself is accepted.
///
/// # Errors
///
/// Returns `DomainError::FutureDate` if `date` is after `today`.
pub fn ensure_not_in_future(date: EntryDate, today: Date) -> Result<EntryDate, DomainError> {
    if date.date() > today {
        return Err(DomainError::FutureDate {
            date: date.date(),
            today,
        });
    }
    Ok(date)
}

/// Parses a submitted date and checks it against `today`.
///
/// # Errors
///
/// Returns an error if the input is not a date string, does not parse,
/// or lies in the future.
pub fn validate_entry_date(input: &ScalarInput, today: Date) -> Result<EntryDate, DomainError> {
    let raw: &str = input
        .as_text()
        .ok_or_else(|| DomainError::InvalidDate(String::from("Invalid date")))?;
    let date: EntryDate = EntryDate::parse(raw)?;
    ensure_not_in_future(date, today)
}
