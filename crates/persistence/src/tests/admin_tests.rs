// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Duration;

use crate::credentials;
use crate::tests::{create_test_persistence, is_unique_violation, test_now};
use crate::{AdminUserChanges, AdminUserData, Persistence, PersistenceError, SessionData};

#[test]
fn test_create_admin_user_hashes_password() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .create_admin_user("boss@example.com", "hunter2")
        .unwrap();

    let admin: AdminUserData = persistence
        .get_admin_user_by_email("boss@example.com")
        .unwrap()
        .unwrap();

    assert_eq!(admin.salt.len(), 32);
    assert_eq!(admin.password_hash.len(), 128);
    assert!(credentials::verify_password(
        "hunter2",
        &admin.salt,
        &admin.password_hash
    ));
}

#[test]
fn test_duplicate_admin_email_is_unique_violation() {
    let mut persistence: Persistence = create_test_persistence();
    persistence.create_admin_user("boss@example.com", "a").unwrap();

    let err: PersistenceError = persistence
        .create_admin_user("boss@example.com", "b")
        .unwrap_err();
    assert!(is_unique_violation(&err));
}

#[test]
fn test_list_admin_users_in_creation_order() {
    let mut persistence: Persistence = create_test_persistence();
    persistence.create_admin_user("b@example.com", "x").unwrap();
    persistence.create_admin_user("a@example.com", "y").unwrap();

    let emails: Vec<String> = persistence
        .list_admin_users()
        .unwrap()
        .into_iter()
        .map(|admin| admin.email)
        .collect();
    assert_eq!(emails, vec!["b@example.com", "a@example.com"]);
}

#[test]
fn test_update_admin_password_resalts() {
    let mut persistence: Persistence = create_test_persistence();
    let id: i64 = persistence.create_admin_user("boss@example.com", "old").unwrap();
    let before: AdminUserData = persistence
        .get_admin_user_by_email("boss@example.com")
        .unwrap()
        .unwrap();

    persistence
        .update_admin_user(id, &AdminUserChanges::new(None, Some("new")))
        .unwrap();

    let after: AdminUserData = persistence
        .get_admin_user_by_email("boss@example.com")
        .unwrap()
        .unwrap();
    assert_ne!(before.salt, after.salt);
    assert!(credentials::verify_password("new", &after.salt, &after.password_hash));
    assert!(!credentials::verify_password("old", &after.salt, &after.password_hash));
}

#[test]
fn test_update_admin_email_only_keeps_password() {
    let mut persistence: Persistence = create_test_persistence();
    let id: i64 = persistence.create_admin_user("boss@example.com", "pw").unwrap();

    persistence
        .update_admin_user(id, &AdminUserChanges::new(Some("chief@example.com"), None))
        .unwrap();

    assert!(
        persistence
            .get_admin_user_by_email("boss@example.com")
            .unwrap()
            .is_none()
    );
    let admin: AdminUserData = persistence
        .get_admin_user_by_email("chief@example.com")
        .unwrap()
        .unwrap();
    assert!(credentials::verify_password("pw", &admin.salt, &admin.password_hash));
}

#[test]
fn test_empty_admin_update_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let id: i64 = persistence.create_admin_user("boss@example.com", "pw").unwrap();

    let err: PersistenceError = persistence
        .update_admin_user(id, &AdminUserChanges::new(None, None))
        .unwrap_err();
    assert_eq!(err, PersistenceError::NothingToUpdate);
}

#[test]
fn test_update_missing_admin_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();

    let err: PersistenceError = persistence
        .update_admin_user(5, &AdminUserChanges::new(Some("x@example.com"), None))
        .unwrap_err();
    assert!(matches!(err, PersistenceError::NotFound(_)));
}

#[test]
fn test_last_admin_cannot_be_deleted() {
    let mut persistence: Persistence = create_test_persistence();
    let only: i64 = persistence.create_admin_user("boss@example.com", "pw").unwrap();

    let err: PersistenceError = persistence.delete_admin_user(only).unwrap_err();
    assert_eq!(err, PersistenceError::LastAdminUser);
    assert_eq!(persistence.list_admin_users().unwrap().len(), 1);
}

#[test]
fn test_delete_admin_cascades_sessions() {
    let mut persistence: Persistence = create_test_persistence();
    let first: i64 = persistence.create_admin_user("a@example.com", "pw").unwrap();
    persistence.create_admin_user("b@example.com", "pw").unwrap();
    persistence
        .create_session(first, "token-a", test_now() + Duration::hours(24))
        .unwrap();

    assert_eq!(persistence.delete_admin_user(first).unwrap(), 1);
    assert!(persistence.get_session_by_token("token-a").unwrap().is_none());
}

#[test]
fn test_delete_missing_admin_is_not_an_error() {
    let mut persistence: Persistence = create_test_persistence();
    persistence.create_admin_user("a@example.com", "pw").unwrap();

    assert_eq!(persistence.delete_admin_user(999).unwrap(), 0);
}

#[test]
fn test_session_lookup_joins_admin_email() {
    let mut persistence: Persistence = create_test_persistence();
    let admin_id: i64 = persistence.create_admin_user("boss@example.com", "pw").unwrap();
    persistence
        .create_session(admin_id, "abc123", test_now() + Duration::hours(24))
        .unwrap();

    let session: SessionData = persistence.get_session_by_token("abc123").unwrap().unwrap();
    assert_eq!(session.admin_user_id, admin_id);
    assert_eq!(session.email, "boss@example.com");
    assert_eq!(session.expires_at, "2026-03-16T12:00:00.000000000Z");
}

#[test]
fn test_duplicate_session_token_is_unique_violation() {
    let mut persistence: Persistence = create_test_persistence();
    let admin_id: i64 = persistence.create_admin_user("boss@example.com", "pw").unwrap();
    persistence
        .create_session(admin_id, "same", test_now() + Duration::hours(1))
        .unwrap();

    let err: PersistenceError = persistence
        .create_session(admin_id, "same", test_now() + Duration::hours(2))
        .unwrap_err();
    assert!(is_unique_violation(&err));

    // The original session is untouched
    let session: SessionData = persistence.get_session_by_token("same").unwrap().unwrap();
    assert_eq!(session.expires_at, "2026-03-15T13:00:00.000000000Z");
}

#[test]
fn test_delete_session_by_token() {
    let mut persistence: Persistence = create_test_persistence();
    let admin_id: i64 = persistence.create_admin_user("boss@example.com", "pw").unwrap();
    persistence
        .create_session(admin_id, "bye", test_now() + Duration::hours(1))
        .unwrap();

    assert_eq!(persistence.delete_session("bye").unwrap(), 1);
    assert_eq!(persistence.delete_session("bye").unwrap(), 0);
}

#[test]
fn test_delete_expired_sessions_keeps_active_ones() {
    let mut persistence: Persistence = create_test_persistence();
    let admin_id: i64 = persistence.create_admin_user("boss@example.com", "pw").unwrap();
    persistence
        .create_session(admin_id, "stale", test_now() - Duration::minutes(1))
        .unwrap();
    persistence
        .create_session(admin_id, "edge", test_now())
        .unwrap();
    persistence
        .create_session(admin_id, "fresh", test_now() + Duration::hours(3))
        .unwrap();

    let purged: usize = persistence.delete_expired_sessions(test_now()).unwrap();

    assert_eq!(purged, 2);
    assert!(persistence.get_session_by_token("fresh").unwrap().is_some());
    assert!(persistence.get_session_by_token("stale").unwrap().is_none());
}
