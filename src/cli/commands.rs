//! Command dispatch
//!
//! Resolves configuration, opens the selected store and runs one subcommand
//! against a `BankService`. All user-facing output goes to the writer passed
//! in, so the commands can be exercised without a terminal.

use super::args::{CliArgs, Command, EditArgs};
use crate::config::{BankConfig, ExportFormat};
use crate::core::traits::PersistenceGateway;
use crate::core::{BankService, ClientEdit, ClientInput};
use crate::io::text_format::{format_amount, format_client, format_stats};
use crate::logging::init_cli_logger;
use crate::store::{InMemoryGateway, SqliteGateway};
use crate::types::{BankError, ClientRecord};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use tracing::debug;

/// Run the parsed command line
///
/// Installs the logger, then dispatches to the in-memory or SQLite store.
///
/// # Errors
///
/// Any `BankError` raised by configuration, storage or the command itself.
pub fn run(args: CliArgs, output: &mut dyn Write) -> Result<(), BankError> {
    let config =
        BankConfig::load(args.config.as_deref())?.with_overrides(args.database, args.verbose);
    init_cli_logger(config.logging.verbose);
    debug!(?config, "configuration resolved");

    if args.in_memory {
        let mut bank = BankService::open(InMemoryGateway::new())?;
        execute(&mut bank, args.command, &config, output)
    } else {
        let gateway = SqliteGateway::open(&config.database.path)?;
        let mut bank = BankService::open(gateway)?;
        execute(&mut bank, args.command, &config, output)
    }
}

/// Run one subcommand against an open service
pub fn execute<G: PersistenceGateway>(
    bank: &mut BankService<G>,
    command: Command,
    config: &BankConfig,
    output: &mut dyn Write,
) -> Result<(), BankError> {
    match command {
        Command::Add(add) => {
            let record = bank.add_client(&ClientInput {
                name: add.name,
                passport: add.passport,
                category: add.category,
                amount: add.amount,
            })?;
            writeln!(output, "Added: {}", record)?;
        }
        Command::Edit(edit) => {
            let record = edit_client(bank, edit)?;
            writeln!(output, "Updated: {}", record)?;
        }
        Command::Remove { passport } => {
            let record = bank.delete_client(&passport)?;
            writeln!(output, "Removed: {}", record)?;
        }
        Command::Show { passport } => {
            let record = bank
                .registry()
                .by_passport(&passport)
                .ok_or_else(|| BankError::client_not_found(&passport))?;
            writeln!(output, "{}", format_client(record))?;
        }
        Command::List { sort } => {
            if let Some(field) = sort {
                bank.sort(field.into());
            }
            write_listing(bank.registry().iter(), output)?;
        }
        Command::Total => {
            writeln!(output, "Total clients: {}", bank.registry().len())?;
            writeln!(
                output,
                "Total deposits: {}",
                format_amount(bank.total_deposits())
            )?;
        }
        Command::Stats => {
            writeln!(output, "{}", format_stats(&bank.statistics()))?;
        }
        Command::Export {
            format,
            output: path,
        } => {
            let format = format.unwrap_or(config.export.default_format);
            match path {
                Some(path) => {
                    let mut file = BufWriter::new(File::create(&path)?);
                    export(bank, format, &mut file)?;
                    writeln!(
                        output,
                        "Exported {} clients to {}",
                        bank.registry().len(),
                        path.display()
                    )?;
                }
                None => export(bank, format, output)?,
            }
        }
        Command::Import { input } => {
            // Undecodable bytes only spoil the blocks they sit in
            let bytes = fs::read(&input)?;
            let summary = bank.import_text(&String::from_utf8_lossy(&bytes));
            writeln!(output, "{}", summary)?;
        }
    }

    output.flush()?;
    Ok(())
}

fn edit_client<G: PersistenceGateway>(
    bank: &mut BankService<G>,
    edit: EditArgs,
) -> Result<ClientRecord, BankError> {
    let changes = ClientEdit {
        name: edit.name,
        category: edit.category,
        amount: edit.amount,
    };
    bank.edit_client(&edit.passport, &changes)
}

fn export<G: PersistenceGateway>(
    bank: &BankService<G>,
    format: ExportFormat,
    output: &mut dyn Write,
) -> Result<(), BankError> {
    match format {
        ExportFormat::Text => bank.export_structured(output),
        ExportFormat::Csv => bank.export_tabular(output),
    }
}

fn write_listing<'a>(
    records: impl Iterator<Item = &'a ClientRecord>,
    output: &mut dyn Write,
) -> Result<(), BankError> {
    let mut count = 0;
    for (position, record) in records.enumerate() {
        writeln!(output, "{:>3}. {}", position + 1, record)?;
        count += 1;
    }
    if count == 0 {
        writeln!(output, "No clients registered")?;
    }
    Ok(())
}
