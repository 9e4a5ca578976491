use crate::config::ExportFormat;
use crate::core::SortKey;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Manage bank clients and their deposits
#[derive(Parser, Debug)]
#[command(name = "bank-clients")]
#[command(about = "Manage bank clients and their deposits", long_about = None)]
pub struct CliArgs {
    /// TOML configuration file
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file, overrides the configuration
    #[arg(long = "database", value_name = "FILE", global = true)]
    pub database: Option<PathBuf>,

    /// Keep clients in memory only, nothing is written to disk
    #[arg(long = "in-memory", global = true, conflicts_with = "database")]
    pub in_memory: bool,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a new client
    Add(AddArgs),

    /// Change name, category or deposit of a client
    Edit(EditArgs),

    /// Delete a client
    Remove {
        #[arg(value_name = "PASSPORT")]
        passport: String,
    },

    /// Show one client
    Show {
        #[arg(value_name = "PASSPORT")]
        passport: String,
    },

    /// List all clients
    List {
        /// Order of the listing
        #[arg(long = "sort", value_name = "KEY")]
        sort: Option<SortField>,
    },

    /// Print the number of clients and the sum of deposits
    Total,

    /// Print counts, shares and average deposits per category
    Stats,

    /// Export all clients
    Export {
        /// Layout of the export, defaults to the configured one
        #[arg(long = "format", value_name = "FORMAT")]
        format: Option<ExportFormat>,

        /// Destination file, stdout when omitted
        #[arg(long = "output", short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Import clients from a text report or a tabular export
    Import {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long = "name")]
    pub name: String,

    /// 10-digit passport number
    #[arg(long = "passport")]
    pub passport: String,

    /// Regular, Pensioner or VIP
    #[arg(long = "category", default_value = "Regular")]
    pub category: String,

    /// Deposit before bonus, `.` or `,` as decimal separator
    #[arg(long = "amount")]
    pub amount: String,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    #[arg(value_name = "PASSPORT")]
    pub passport: String,

    #[arg(long = "name")]
    pub name: Option<String>,

    #[arg(long = "category")]
    pub category: Option<String>,

    #[arg(long = "amount")]
    pub amount: Option<String>,
}

/// Listing orders
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortField {
    Name,
    Deposit,
    Category,
}

impl From<SortField> for SortKey {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Name => SortKey::Name,
            SortField::Deposit => SortKey::Deposit,
            SortField::Category => SortKey::Category,
        }
    }
}
