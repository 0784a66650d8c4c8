//! Argument parsing and dispatch for the `cdb` command-line front end.
//!
//! A thin, optional layer over the [`cdb`](crate) library: typed
//! [`crate::CdbError`] inside the library, `anyhow` only here at the
//! command-dispatch boundary, where errors are only ever displayed, never
//! matched on.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cdb", about = "Inspect and build Constant Database (CDB) files")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Notification verbosity: 0 = silent, 1 = warnings, 2 = verbose.
    #[arg(short, long, global = true, default_value_t = 0)]
    verbose: i32,
}

#[derive(Subcommand)]
enum Command {
    /// Build a database from `key\tvalue` lines (stdin, or --from a file).
    Create {
        db: PathBuf,
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Print the first value for a key, or exit non-zero if absent.
    Get { db: PathBuf, key: String },
    /// Print every value for a key, one per line.
    Find { db: PathBuf, key: String },
    /// Print every (key, value) pair in on-disk probe order.
    Dump { db: PathBuf },
    /// Print bucket occupancy statistics.
    Stats { db: PathBuf },
}

/// Parse `argv` and run the selected subcommand. Returns the process exit code.
pub fn run() -> i32 {
    let cli = Cli::parse();
    crate::notify::set_notification_level(cli.verbose);

    match dispatch(cli.command) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("cdb: error: {e:#}");
            1
        }
    }
}

fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Create { db, from } => commands::create(&db, from.as_deref()),
        Command::Get { db, key } => commands::get(&db, &key),
        Command::Find { db, key } => commands::find(&db, &key),
        Command::Dump { db } => commands::dump(&db),
        Command::Stats { db } => commands::stats(&db),
    }
}
