// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod admin_tests;
mod initialization_tests;

use time::OffsetDateTime;
use time::macros::datetime;

use crate::{Persistence, PersistenceError, StepEntryData};

/// Creates an isolated in-memory database.
pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

/// Creates an employee and a location, returning their ids.
pub fn seed_employee_and_location(persistence: &mut Persistence) -> (i64, i64) {
    let employee_id: i64 = persistence
        .create_employee("Kari")
        .expect("Failed to create employee");
    let location_id: i64 = persistence
        .create_location("Oslo")
        .expect("Failed to create location");
    (employee_id, location_id)
}

/// Looks up a step entry by id through the admin listing.
pub fn find_step_entry(persistence: &mut Persistence, entry_id: i64) -> Option<StepEntryData> {
    persistence
        .list_step_entries()
        .expect("Failed to list step entries")
        .into_iter()
        .find(|entry| entry.id == entry_id)
}

/// Returns `true` if a write was rejected by a uniqueness constraint.
pub const fn is_unique_violation(err: &PersistenceError) -> bool {
    matches!(err, PersistenceError::UniqueViolation(_))
}

/// A fixed instant used as "now" by session tests.
pub const fn test_now() -> OffsetDateTime {
    datetime!(2026-03-15 12:00:00 UTC)
}
