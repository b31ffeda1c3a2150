// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local accounts and the signed-in session.
//!
//! The session is an explicit context object created once at startup with
//! [`SessionContext::initialize`], replaced on sign-in and cleared on
//! sign-out. The persisted form is the `session_user_id` setting so a
//! session survives between CLI invocations.

use crate::models::User;
use crate::utils::{delete_setting, get_setting, set_setting};
use anyhow::{anyhow, Context, Result};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use tracing::{debug, info};

const SESSION_KEY: &str = "session_user_id";
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("An account with email '{0}' already exists")]
    EmailTaken(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Not signed in; run `budgetbuddy auth login` first")]
    NotSignedIn,
    #[error("Invalid email address '{0}'")]
    InvalidEmail(String),
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub email: String,
}

type Listener = Box<dyn Fn(AuthEvent, Option<&Session>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(usize);

#[derive(Default)]
pub struct SessionContext {
    current: Option<Session>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: usize,
}

impl SessionContext {
    /// Loads the persisted session, if any. A stored id for a user that no
    /// longer exists is discarded.
    pub fn initialize(conn: &Connection) -> Result<Self> {
        let mut ctx = SessionContext::default();
        let Some(raw) = get_setting(conn, SESSION_KEY)? else {
            return Ok(ctx);
        };
        let user_id: i64 = raw
            .parse()
            .with_context(|| format!("Invalid stored session '{}'", raw))?;
        match find_user_by_id(conn, user_id)? {
            Some(user) => {
                debug!(user_id, "restored session");
                ctx.current = Some(Session {
                    user_id: user.id,
                    email: user.email,
                });
            }
            None => delete_setting(conn, SESSION_KEY)?,
        }
        Ok(ctx)
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn require(&self) -> Result<&Session, AuthError> {
        self.current.as_ref().ok_or(AuthError::NotSignedIn)
    }

    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.require().map(|s| s.user_id)
    }

    pub fn subscribe(&mut self, f: impl Fn(AuthEvent, Option<&Session>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(f)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(lid, _)| *lid != id);
    }

    pub fn replace(&mut self, conn: &Connection, session: Session) -> Result<()> {
        set_setting(conn, SESSION_KEY, &session.user_id.to_string())?;
        self.current = Some(session);
        self.notify(AuthEvent::SignedIn);
        Ok(())
    }

    pub fn clear(&mut self, conn: &Connection) -> Result<()> {
        delete_setting(conn, SESSION_KEY)?;
        self.current = None;
        self.notify(AuthEvent::SignedOut);
        Ok(())
    }

    fn notify(&self, event: AuthEvent) {
        for (_, f) in &self.listeners {
            f(event, self.current.as_ref());
        }
    }
}

fn normalize_email(email: &str) -> Result<String, AuthError> {
    let e = email.trim().to_lowercase();
    let valid = match e.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !e.contains(' '),
        None => false,
    };
    if valid {
        Ok(e)
    } else {
        Err(AuthError::InvalidEmail(email.trim().to_string()))
    }
}

/// Argon2id PHC string; the salt travels inside it.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::encode_b64(uuid::Uuid::new_v4().as_bytes())
        .map_err(|e| anyhow!("Could not encode password salt: {e}"))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Could not hash password: {e}"))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(stored).map_err(|e| anyhow!("Corrupt stored password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub fn find_user_by_id(conn: &Connection, id: i64) -> Result<Option<User>> {
    let u = conn
        .query_row(
            "SELECT id, email FROM users WHERE id=?1",
            params![id],
            |r| {
                Ok(User {
                    id: r.get(0)?,
                    email: r.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(u)
}

pub fn sign_up(conn: &Connection, email: &str, password: &str) -> Result<User> {
    let email = normalize_email(email)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort.into());
    }
    let exists: Option<i64> = conn
        .query_row(
            "SELECT id FROM users WHERE email=?1",
            params![email],
            |r| r.get(0),
        )
        .optional()?;
    if exists.is_some() {
        return Err(AuthError::EmailTaken(email).into());
    }
    conn.execute(
        "INSERT INTO users(email, password_hash) VALUES (?1, ?2)",
        params![email, hash_password(password)?],
    )?;
    let id = conn.last_insert_rowid();
    info!(user_id = id, "account created");
    Ok(User { id, email })
}

pub fn sign_in(
    ctx: &mut SessionContext,
    conn: &Connection,
    email: &str,
    password: &str,
) -> Result<Session> {
    let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;
    let row: Option<(i64, String)> = conn
        .query_row(
            "SELECT id, password_hash FROM users WHERE email=?1",
            params![email],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    let Some((user_id, stored)) = row else {
        return Err(AuthError::InvalidCredentials.into());
    };
    if !verify_password(password, &stored)? {
        return Err(AuthError::InvalidCredentials.into());
    }
    let session = Session { user_id, email };
    ctx.replace(conn, session.clone())?;
    Ok(session)
}

pub fn sign_out(ctx: &mut SessionContext, conn: &Connection) -> Result<()> {
    ctx.clear(conn)
}
