// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::process::ExitCode;

use anyhow::Result;
use budgetbuddy::session::{AuthEvent, SessionContext};
use budgetbuddy::{cli, commands, db};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn init_logger(verbosity: u8) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => {
            let level = match verbosity {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let matches = cli::build_cli().get_matches();
    init_logger(matches.get_count("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // always reaches stderr, whatever the log filter
            eprintln!("Error: {e:#}");
            debug!("Exiting with error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &clap::ArgMatches) -> Result<()> {
    let conn = db::open_or_init()?;
    let mut ctx = SessionContext::initialize(&conn)?;
    ctx.subscribe(|event, session| match event {
        AuthEvent::SignedIn => info!(user = session.map(|s| s.user_id), "signed in"),
        AuthEvent::SignedOut => info!("signed out"),
    });
    debug!(signed_in = ctx.current().is_some(), "session initialized");

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("auth", sub)) => commands::auth::handle(&conn, &mut ctx, sub)?,
        Some(("category", sub)) => commands::categories::handle(&conn, &ctx, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, &ctx, sub)?,
        Some(("goal", sub)) => commands::goals::handle(&conn, &ctx, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, &ctx, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, &ctx, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn, &ctx)?,
        Some(("config", sub)) => commands::config::handle(&conn, &ctx, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
