// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Most mutations use Diesel DSL and are backend-agnostic, with minimal use of
//! backend-specific helpers (e.g., `last_insert_rowid()` for `SQLite`).
//!
//! ## Module Organization
//!
//! - `catalog` — Employee and location mutations
//! - `steps` — Step entry upsert, partial update and deletion
//! - `admin` — Admin user and session mutations
//!
//! ## Backend-Specific Code
//!
//! Backend-specific helpers (e.g., `get_last_insert_rowid()`) are imported from
//! the `backend` module. The steps upsert is written once per engine.

pub mod admin;
pub mod catalog;
pub mod steps;

pub use admin::{
    AdminUserChanges, create_admin_user_pg, create_admin_user_sqlite, create_session_pg,
    create_session_sqlite, delete_admin_user_pg, delete_admin_user_sqlite,
    delete_expired_sessions_pg, delete_expired_sessions_sqlite, delete_session_pg,
    delete_session_sqlite, seed_admin_user_pg, seed_admin_user_sqlite, update_admin_user_pg,
    update_admin_user_sqlite,
};
pub use catalog::{
    create_employee_pg, create_employee_sqlite, create_location_pg, create_location_sqlite,
    delete_employee_pg, delete_employee_sqlite, delete_location_pg, delete_location_sqlite,
    update_employee_pg, update_employee_sqlite, update_location_pg, update_location_sqlite,
};
pub use steps::{
    StepEntryChanges, delete_step_entry_pg, delete_step_entry_sqlite, update_step_entry_pg,
    update_step_entry_sqlite, upsert_step_entry_pg, upsert_step_entry_sqlite,
};
