// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other test module opens an in-memory database, so connection
//! setup and migration are exercised everywhere. The tests here cover
//! what the rest take for granted: isolation between instances, foreign
//! key enforcement, file databases, backend selection and seeding.

use std::path::{Path, PathBuf};

use crate::tests::create_test_persistence;
use crate::{DatabaseConfig, Persistence, PersistenceError};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_in_memory_backend_is_sqlite() {
    let persistence: Persistence = create_test_persistence();
    assert_eq!(persistence.backend_name(), "sqlite");
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1: Persistence = create_test_persistence();
    let mut db2: Persistence = create_test_persistence();

    db1.create_employee("Kari").unwrap();

    assert_eq!(db1.list_employees().unwrap().len(), 1);
    assert_eq!(db2.list_employees().unwrap().len(), 0);
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let mut persistence: Persistence = create_test_persistence();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_file_database_persists_across_reopen() {
    let path: PathBuf = std::env::temp_dir().join(format!(
        "stepcount_init_test_{}_{}.db",
        std::process::id(),
        rand::random::<u32>()
    ));

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        persistence.create_location("Bergen").unwrap();
    }

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        let locations = persistence.list_locations().unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].name, "Bergen");
    }

    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(path.with_extension("db-wal"));
    let _ = std::fs::remove_file(path.with_extension("db-shm"));
}

#[test]
fn test_database_config_prefers_connection_string() {
    let config: DatabaseConfig =
        DatabaseConfig::from_parts(Some("postgres://localhost/steps"), Path::new("steps.db"));
    assert_eq!(
        config,
        DatabaseConfig::Postgres {
            url: String::from("postgres://localhost/steps")
        }
    );
}

#[test]
fn test_database_config_falls_back_to_file() {
    let config: DatabaseConfig = DatabaseConfig::from_parts(None, Path::new("steps.db"));
    assert_eq!(
        config,
        DatabaseConfig::Sqlite {
            path: PathBuf::from("steps.db")
        }
    );
}

#[test]
fn test_database_config_ignores_blank_connection_string() {
    let config: DatabaseConfig = DatabaseConfig::from_parts(Some("   "), Path::new("data.db"));
    assert!(matches!(config, DatabaseConfig::Sqlite { .. }));
}

#[test]
fn test_ensure_default_admin_seeds_once() {
    let mut persistence: Persistence = create_test_persistence();

    let first: bool = persistence
        .ensure_default_admin("admin@example.com", "admin123")
        .unwrap();
    let second: bool = persistence
        .ensure_default_admin("other@example.com", "secret")
        .unwrap();

    assert!(first);
    assert!(!second);
    assert_eq!(persistence.list_admin_users().unwrap().len(), 1);

    let admin = persistence
        .get_admin_user_by_email("admin@example.com")
        .unwrap()
        .unwrap();
    assert_ne!(admin.password_hash, "admin123");
    assert!(crate::credentials::verify_password(
        "admin123",
        &admin.salt,
        &admin.password_hash
    ));
}

#[test]
fn test_ensure_default_admin_skips_when_admin_exists() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .create_admin_user("boss@example.com", "hunter2")
        .unwrap();

    let seeded: bool = persistence
        .ensure_default_admin("admin@example.com", "admin123")
        .unwrap();

    assert!(!seeded);
    assert!(
        persistence
            .get_admin_user_by_email("admin@example.com")
            .unwrap()
            .is_none()
    );
}
