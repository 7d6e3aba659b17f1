// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `catalog` — Employee and location listings
//! - `steps` — Step entry listings and per-location daily averages
//! - `admin` — Administrator and session lookups
//!
//! ## Backend-Specific Functions
//!
//! All query functions are generated in backend-specific monomorphic versions:
//! - Functions suffixed with `_sqlite` for `SQLite`
//! - Functions suffixed with `_pg` for `PostgreSQL`
//!
//! The `Persistence` adapter in `lib.rs` dispatches to the appropriate version
//! based on the active backend connection.

pub mod admin;
pub mod catalog;
pub mod steps;

pub use admin::{
    get_admin_user_by_email_pg, get_admin_user_by_email_sqlite, get_session_by_token_pg,
    get_session_by_token_sqlite, list_admin_users_pg, list_admin_users_sqlite,
};
pub use catalog::{
    list_employees_pg, list_employees_sqlite, list_locations_pg, list_locations_sqlite,
};
pub use steps::{
    list_location_averages_pg, list_location_averages_sqlite, list_step_entries_pg,
    list_step_entries_sqlite,
};
