// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use stepcount_domain::ScalarInput;
use stepcount_persistence::Persistence;
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};

use crate::{NameRequest, RecordStepsRequest};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin123";

/// The day tests treat as "today".
pub const fn today() -> Date {
    date!(2026-03-15)
}

/// The instant tests treat as "now".
pub const fn now() -> OffsetDateTime {
    datetime!(2026-03-15 09:30:00 UTC)
}

/// Creates an in-memory database with the default admin seeded.
pub fn create_test_persistence() -> Persistence {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    persistence
        .ensure_default_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
        .expect("Failed to seed admin");
    persistence
}

pub fn name_request(name: &str) -> NameRequest {
    NameRequest {
        name: Some(name.to_string()),
    }
}

/// Creates one employee ("Kari") and one location ("Oslo").
pub fn seed_catalog(persistence: &mut Persistence) -> (i64, i64) {
    let employee_id: i64 = crate::create_employee(persistence, &name_request("Kari"))
        .unwrap()
        .id;
    let location_id: i64 = crate::create_location(persistence, &name_request("Oslo"))
        .unwrap()
        .id;
    (employee_id, location_id)
}

pub fn steps_request(employee_id: i64, location_id: i64, date: &str, steps: i64) -> RecordStepsRequest {
    RecordStepsRequest {
        employee_id: Some(ScalarInput::from(employee_id)),
        location_id: Some(ScalarInput::from(location_id)),
        date: Some(ScalarInput::from(date)),
        steps: Some(ScalarInput::from(steps)),
    }
}
