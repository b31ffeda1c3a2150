// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn kind_arg(values: [&'static str; 2]) -> Arg {
    Arg::new("type")
        .long("type")
        .value_parser(values)
}

pub fn build_cli() -> Command {
    Command::new("budgetbuddy")
        .about("Track income and expenses, set goals, and see where the money goes")
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("auth")
                .about("Accounts and session")
                .subcommand(
                    Command::new("signup")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("password").long("password").required(true)),
                )
                .subcommand(
                    Command::new("login")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("password").long("password").required(true)),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("whoami")),
        )
        .subcommand(
            Command::new("category")
                .about("Expense categories and income sources")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(kind_arg(["expense", "income"]).default_value("expense")),
                )
                .subcommand(Command::new("list").arg(kind_arg(["expense", "income"])))
                .subcommand(
                    Command::new("rename")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .arg(kind_arg(["expense", "income"]).default_value("expense"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("source").long("source"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(kind_arg(["expense", "income"]))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals and spending limits")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name"))
                        .arg(kind_arg(["saving", "spending"]).default_value("saving"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("period").long("period")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name"))
                        .arg(kind_arg(["saving", "spending"]))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("report")
                .about("Spending analytics")
                .subcommand(json_flags(
                    Command::new("summary").arg(
                        Arg::new("days")
                            .long("days")
                            .value_parser(value_parser!(u32))
                            .default_value("30")
                            .help("Divisor for the daily average"),
                    ),
                ))
                .subcommand(json_flags(Command::new("categories"))),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Find dangling references and bad goals"))
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(
                    Command::new("set-currency").arg(Arg::new("symbol").required(true)),
                )
                .subcommand(Command::new("show")),
        )
}
