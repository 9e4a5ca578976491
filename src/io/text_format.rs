//! Structured text export
//!
//! Writes a human-readable report: a summary header followed by one labeled
//! paragraph per client, paragraphs separated by a `---` line. The labels are
//! the ones the importer looks for, so a report can be imported back.
//!
//! ```text
//! === BANK CLIENT REGISTRY EXPORT ===
//! Export date: 2026-10-19 12:00:00
//! Total clients: 1
//! Total deposits: 11000.00
//! ===================================
//!
//! Client: Ivan Petrov
//! Category: VIP
//! Passport: 1234567890
//! Bonus: Percentage
//! Deposit (bonus included): 11000.00
//! ---
//! ```

use crate::core::registry::RegistryStats;
use crate::types::{BankError, ClientRecord};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::io::Write;

pub const EXPORT_TITLE: &str = "=== BANK CLIENT REGISTRY EXPORT ===";
pub const EXPORT_RULE: &str = "===================================";
pub const EXPORT_DATE_LABEL: &str = "Export date:";
pub const TOTAL_CLIENTS_LABEL: &str = "Total clients:";
pub const TOTAL_DEPOSITS_LABEL: &str = "Total deposits:";

pub const NAME_LABEL: &str = "Client:";
pub const CATEGORY_LABEL: &str = "Category:";
pub const PASSPORT_LABEL: &str = "Passport:";
pub const BONUS_LABEL: &str = "Bonus:";
pub const DEPOSIT_LABEL: &str = "Deposit (bonus included):";

/// Line closing every client paragraph
pub const RECORD_DELIMITER: &str = "---";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format an amount with exactly two fractional digits
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Labeled paragraph describing one client, without the trailing delimiter
pub fn format_client(record: &ClientRecord) -> String {
    format!(
        "{} {}\n{} {}\n{} {}\n{} {}\n{} {}",
        NAME_LABEL,
        record.name(),
        CATEGORY_LABEL,
        record.category().label(),
        PASSPORT_LABEL,
        record.passport(),
        BONUS_LABEL,
        record.strategy().label(),
        DEPOSIT_LABEL,
        format_amount(record.deposit()),
    )
}

/// Statistics summary, one line per figure
///
/// ```text
/// Total clients: 3
/// Total deposits: 13100.00
/// Average deposit: 4366.67
///
/// Regular: 1 (33.3%), deposits 2000.00, average 2000.00
/// ```
pub fn format_stats(stats: &RegistryStats) -> String {
    let mut lines = vec![
        format!("{} {}", TOTAL_CLIENTS_LABEL, stats.client_count),
        format!("{} {}", TOTAL_DEPOSITS_LABEL, format_amount(stats.total_deposits)),
        format!("Average deposit: {}", format_amount(stats.average_deposit)),
        String::new(),
    ];
    lines.extend(stats.by_category.iter().map(|entry| {
        format!(
            "{}: {} ({:.1}%), deposits {}, average {}",
            entry.category.label(),
            entry.client_count,
            entry.share_percent,
            format_amount(entry.total_deposits),
            format_amount(entry.average_deposit),
        )
    }));
    lines.join("\n")
}

/// Write the structured report
///
/// # Arguments
///
/// * `records` - Clients in the order they should appear
/// * `exported_at` - Timestamp printed in the header
/// * `output` - Destination writer
///
/// # Errors
///
/// Returns `IoError` if writing fails.
pub fn write_structured(
    records: &[ClientRecord],
    exported_at: NaiveDateTime,
    output: &mut dyn Write,
) -> Result<(), BankError> {
    let total: Decimal = records.iter().map(ClientRecord::deposit).sum();

    writeln!(output, "{}", EXPORT_TITLE)?;
    writeln!(output, "{} {}", EXPORT_DATE_LABEL, exported_at.format(DATE_FORMAT))?;
    writeln!(output, "{} {}", TOTAL_CLIENTS_LABEL, records.len())?;
    writeln!(output, "{} {}", TOTAL_DEPOSITS_LABEL, format_amount(total))?;
    writeln!(output, "{}", EXPORT_RULE)?;
    writeln!(output)?;

    for record in records {
        writeln!(output, "{}", format_client(record))?;
        writeln!(output, "{}", RECORD_DELIMITER)?;
    }

    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{create_client, Category};
    use chrono::NaiveDate;
    use rstest::rstest;

    fn exported_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .and_then(|d| d.and_hms_opt(12, 30, 0))
            .unwrap()
    }

    #[rstest]
    #[case(Decimal::new(11000, 0), "11000.00")]
    #[case(Decimal::new(123456, 4), "12.35")]
    #[case(Decimal::new(5, 1), "0.50")]
    #[case(Decimal::ZERO, "0.00")]
    fn test_format_amount(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_amount(amount), expected);
    }

    #[test]
    fn test_format_client() {
        let client =
            create_client(Category::Vip, "Ivan Petrov", "1234567890", Decimal::new(10000, 0))
                .unwrap();

        assert_eq!(
            format_client(&client),
            "Client: Ivan Petrov\n\
             Category: VIP\n\
             Passport: 1234567890\n\
             Bonus: Percentage\n\
             Deposit (bonus included): 11000.00"
        );
    }

    #[test]
    fn test_write_structured() {
        let records = vec![
            create_client(Category::Vip, "Ivan Petrov", "1234567890", Decimal::new(10000, 0))
                .unwrap(),
            create_client(Category::Pensioner, "Anna Ivanova", "0987654321", Decimal::new(5000, 0))
                .unwrap(),
        ];
        let mut output = Vec::new();

        write_structured(&records, exported_at(), &mut output).unwrap();

        let expected = "=== BANK CLIENT REGISTRY EXPORT ===\n\
            Export date: 2026-10-19 12:30:00\n\
            Total clients: 2\n\
            Total deposits: 19000.00\n\
            ===================================\n\
            \n\
            Client: Ivan Petrov\n\
            Category: VIP\n\
            Passport: 1234567890\n\
            Bonus: Percentage\n\
            Deposit (bonus included): 11000.00\n\
            ---\n\
            Client: Anna Ivanova\n\
            Category: Pensioner\n\
            Passport: 0987654321\n\
            Bonus: Fixed\n\
            Deposit (bonus included): 8000.00\n\
            ---\n";
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_format_stats() {
        let mut registry = crate::core::ClientRegistry::new();
        registry
            .add(create_client(Category::Vip, "Ivan", "1234567890", Decimal::new(10000, 0)).unwrap())
            .unwrap();
        registry
            .add(create_client(Category::Regular, "Anna", "0987654321", Decimal::new(2000, 0)).unwrap())
            .unwrap();

        assert_eq!(
            format_stats(&registry.statistics()),
            "Total clients: 2\n\
             Total deposits: 13000.00\n\
             Average deposit: 6500.00\n\
             \n\
             Regular: 1 (50.0%), deposits 2000.00, average 2000.00\n\
             Pensioner: 0 (0.0%), deposits 0.00, average 0.00\n\
             VIP: 1 (50.0%), deposits 11000.00, average 11000.00"
        );
    }

    #[test]
    fn test_write_structured_empty() {
        let mut output = Vec::new();
        write_structured(&[], exported_at(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Total clients: 0"));
        assert!(text.contains("Total deposits: 0.00"));
        assert!(!text.contains(RECORD_DELIMITER));
    }
}
