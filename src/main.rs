//! Bank client registry CLI
//!
//! Command-line interface for managing bank clients and their deposits.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- add --name "Ivan Petrov" --passport 1234567890 --category VIP --amount 10000
//! cargo run -- list --sort deposit
//! cargo run -- export --format csv > clients.csv
//! cargo run -- --database other.db import report.txt
//! cargo run -- --in-memory import report.txt
//! ```
//!
//! Clients are kept in a SQLite file (`clients.db` unless configured
//! otherwise). Command output goes to stdout, logs and errors to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (invalid input, unknown client, unreadable file, storage failure, etc.)

use bank_clients::cli;
use std::process;

fn main() {
    let args = cli::parse_args();

    let stdout = std::io::stdout();
    let mut output = stdout.lock();
    if let Err(e) = cli::run(args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
