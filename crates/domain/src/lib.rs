// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and validation rules for the Step Count service.
//!
//! Everything here is pure: no storage, no clock. Callers pass "today"
//! explicitly wherever a rule depends on it.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use types::{Email, EntryDate, Name, Password, RecordId, ScalarInput, StepCount};
pub use validation::{ensure_not_in_future, validate_entry_date};
