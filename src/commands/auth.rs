// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::session::{self, AuthError, SessionContext};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, ctx: &mut SessionContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("signup", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let password = sub.get_one::<String>("password").unwrap();
            let user = session::sign_up(conn, email, password)?;
            println!("Created account '{}'", user.email);
            let s = session::sign_in(ctx, conn, email, password)?;
            println!("Signed in as {}", s.email);
        }
        Some(("login", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let password = sub.get_one::<String>("password").unwrap();
            let s = session::sign_in(ctx, conn, email, password)?;
            println!("Signed in as {}", s.email);
        }
        Some(("logout", _)) => {
            if ctx.current().is_none() {
                return Err(AuthError::NotSignedIn.into());
            }
            session::sign_out(ctx, conn)?;
            println!("Signed out");
        }
        Some(("whoami", _)) => match ctx.current() {
            Some(s) => println!("{} (user {})", s.email, s.user_id),
            None => println!("Not signed in"),
        },
        _ => {}
    }
    Ok(())
}
