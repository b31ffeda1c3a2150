// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetbuddy::db;
use budgetbuddy::session::{self, AuthError, AuthEvent, SessionContext};
use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn auth_err(e: anyhow::Error) -> AuthError {
    e.downcast::<AuthError>().unwrap()
}

#[test]
fn sign_up_then_sign_in_persists_session() {
    let conn = setup();
    let user = session::sign_up(&conn, " Student@FIU.edu ", "panther123").unwrap();
    assert_eq!(user.email, "student@fiu.edu");

    let mut ctx = SessionContext::initialize(&conn).unwrap();
    assert!(ctx.current().is_none());
    let s = session::sign_in(&mut ctx, &conn, "student@fiu.edu", "panther123").unwrap();
    assert_eq!(s.user_id, user.id);

    // a fresh context picks the session back up
    let restored = SessionContext::initialize(&conn).unwrap();
    assert_eq!(restored.user_id().unwrap(), user.id);
}

#[test]
fn sign_out_clears_persisted_session() {
    let conn = setup();
    session::sign_up(&conn, "a@b.co", "secret1").unwrap();
    let mut ctx = SessionContext::initialize(&conn).unwrap();
    session::sign_in(&mut ctx, &conn, "a@b.co", "secret1").unwrap();
    session::sign_out(&mut ctx, &conn).unwrap();
    assert_eq!(ctx.user_id().unwrap_err(), AuthError::NotSignedIn);
    assert!(SessionContext::initialize(&conn).unwrap().current().is_none());
}

#[test]
fn rejects_bad_credentials_and_duplicates() {
    let conn = setup();
    session::sign_up(&conn, "a@b.co", "secret1").unwrap();
    assert_eq!(
        auth_err(session::sign_up(&conn, "A@B.CO", "another1").unwrap_err()),
        AuthError::EmailTaken("a@b.co".into())
    );
    assert_eq!(
        auth_err(session::sign_up(&conn, "not-an-email", "secret1").unwrap_err()),
        AuthError::InvalidEmail("not-an-email".into())
    );
    assert_eq!(
        auth_err(session::sign_up(&conn, "c@d.co", "short").unwrap_err()),
        AuthError::PasswordTooShort
    );

    let mut ctx = SessionContext::initialize(&conn).unwrap();
    assert_eq!(
        auth_err(session::sign_in(&mut ctx, &conn, "a@b.co", "wrong-pass").unwrap_err()),
        AuthError::InvalidCredentials
    );
    assert_eq!(
        auth_err(session::sign_in(&mut ctx, &conn, "nobody@b.co", "secret1").unwrap_err()),
        AuthError::InvalidCredentials
    );
    assert!(ctx.current().is_none());
}

#[test]
fn listeners_see_each_change_until_unsubscribed() {
    let conn = setup();
    session::sign_up(&conn, "a@b.co", "secret1").unwrap();
    let mut ctx = SessionContext::initialize(&conn).unwrap();

    let seen: Rc<RefCell<Vec<(AuthEvent, Option<i64>)>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let id = ctx.subscribe(move |event, s| sink.borrow_mut().push((event, s.map(|s| s.user_id))));

    let s = session::sign_in(&mut ctx, &conn, "a@b.co", "secret1").unwrap();
    session::sign_out(&mut ctx, &conn).unwrap();
    ctx.unsubscribe(id);
    session::sign_in(&mut ctx, &conn, "a@b.co", "secret1").unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![(AuthEvent::SignedIn, Some(s.user_id)), (AuthEvent::SignedOut, None)]
    );
}

#[test]
fn stale_session_for_missing_user_is_dropped() {
    let conn = setup();
    budgetbuddy::utils::set_setting(&conn, "session_user_id", "99").unwrap();
    let ctx = SessionContext::initialize(&conn).unwrap();
    assert!(ctx.current().is_none());
    assert_eq!(budgetbuddy::utils::get_setting(&conn, "session_user_id").unwrap(), None);
}

#[test]
fn stored_password_is_argon2_phc_string() {
    let conn = setup();
    let user = session::sign_up(&conn, "a@b.co", "secret1").unwrap();
    let stored: String = conn
        .query_row("SELECT password_hash FROM users WHERE id=?1", [user.id], |r| r.get(0))
        .unwrap();
    assert!(stored.starts_with("$argon2id$"));
    assert!(!stored.contains("secret1"));

    // same password, fresh salt
    let other = session::sign_up(&conn, "c@d.co", "secret1").unwrap();
    let stored_other: String = conn
        .query_row("SELECT password_hash FROM users WHERE id=?1", [other.id], |r| r.get(0))
        .unwrap();
    assert_ne!(stored, stored_other);

    let mut ctx = SessionContext::initialize(&conn).unwrap();
    assert_eq!(
        auth_err(session::sign_in(&mut ctx, &conn, "a@b.co", "secret2").unwrap_err()),
        AuthError::InvalidCredentials
    );
    assert!(session::sign_in(&mut ctx, &conn, "a@b.co", "secret1").is_ok());
}
