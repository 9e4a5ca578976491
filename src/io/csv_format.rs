//! Tabular (semicolon-separated) format handling
//!
//! This module centralizes the tabular format concerns:
//! - Header detection for imports
//! - TabularRow structure for positional deserialization
//! - Client output serialization
//!
//! Columns are fixed: `Passport;Name;Category;Deposit;BonusLabel`. The deposit
//! column is bonus-inclusive and written with two decimals.

use crate::io::text_format::format_amount;
use crate::types::{BankError, ClientRecord};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::Deserialize;
use std::io::Write;

/// Header row written by `write_tabular`
pub const TABULAR_HEADER: [&str; 5] = ["Passport", "Name", "Category", "Deposit", "BonusLabel"];

/// Header row of the older Russian-language exports, still accepted on import
const LEGACY_HEADER: [&str; 5] = ["Паспорт", "ФИО", "Тип клиента", "Вклад", "Бонус"];

const DELIMITER: u8 = b';';

/// One data row of a tabular export
///
/// Fields are kept as text; the importer applies its own validation.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TabularRow {
    pub passport: String,
    pub name: String,
    pub category: String,
    pub deposit: String,
    #[serde(default)]
    pub bonus_label: Option<String>,
}

/// Whether a line is the header row of a tabular export
pub fn is_tabular_header(line: &str) -> bool {
    let columns: Vec<String> = line
        .trim()
        .split(DELIMITER as char)
        .map(|column| column.trim().to_lowercase())
        .collect();

    [TABULAR_HEADER, LEGACY_HEADER].iter().any(|header| {
        columns.len() == header.len()
            && columns
                .iter()
                .zip(header.iter())
                .all(|(column, expected)| *column == expected.to_lowercase())
    })
}

/// Read the data rows of a tabular export
///
/// The first line is the header and is skipped. Each item is either a row or
/// the error for that row with its line number; one bad row does not stop the
/// others from being read.
pub fn read_tabular(text: &str) -> Vec<Result<TabularRow, BankError>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let rows = reader
        .records()
        .skip(1)
        .filter(|result| {
            // blank lines between rows
            result
                .as_ref()
                .map(|record| record.iter().any(|field| !field.is_empty()))
                .unwrap_or(true)
        })
        .map(|result| {
            let record = result?;
            record.deserialize::<TabularRow>(None).map_err(BankError::from)
        })
        .collect();
    rows
}

/// Write clients as semicolon-separated rows
///
/// Rows follow the order of `records`.
///
/// # Errors
///
/// Returns `ParseError`/`IoError` if writing fails.
pub fn write_tabular(records: &[ClientRecord], output: &mut dyn Write) -> Result<(), BankError> {
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(output);

    writer.write_record(TABULAR_HEADER)?;

    for record in records {
        writer.write_record([
            record.passport(),
            record.name(),
            record.category().label(),
            format_amount(record.deposit()).as_str(),
            record.strategy().label(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{create_client, Category};
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case("Passport;Name;Category;Deposit;BonusLabel", true)]
    #[case(" passport ; name;CATEGORY;deposit;bonuslabel ", true)]
    #[case("Паспорт;ФИО;Тип клиента;Вклад;Бонус", true)]
    #[case("Passport;Name;Category", false)]
    #[case("Client: Ivan Petrov", false)]
    fn test_is_tabular_header(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_tabular_header(line), expected);
    }

    #[rstest]
    #[case::empty(vec![], "Passport;Name;Category;Deposit;BonusLabel\n")]
    #[case::single_vip(
        vec![create_client(Category::Vip, "Ivan Petrov", "1234567890", Decimal::new(10000, 0)).unwrap()],
        "Passport;Name;Category;Deposit;BonusLabel\n1234567890;Ivan Petrov;VIP;11000.00;Percentage\n"
    )]
    #[case::keeps_order(
        vec![
            create_client(Category::Regular, "Boris", "0000000002", Decimal::new(2000, 0)).unwrap(),
            create_client(Category::Pensioner, "Anna", "0000000001", Decimal::new(5000, 0)).unwrap(),
        ],
        "Passport;Name;Category;Deposit;BonusLabel\n\
         0000000002;Boris;Regular;2000.00;No bonus\n\
         0000000001;Anna;Pensioner;8000.00;Fixed\n"
    )]
    fn test_write_tabular(#[case] records: Vec<ClientRecord>, #[case] expected_output: &str) {
        let mut output = Vec::new();
        write_tabular(&records, &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), expected_output);
    }

    #[test]
    fn test_read_tabular_rows() {
        let text = "Passport;Name;Category;Deposit;BonusLabel\n\
                    1234567890;Ivan Petrov;VIP;11000.00;Percentage\n\
                    \n\
                    0987654321 ; Anna ; Pensioner ; 8000,00\n";

        let rows = read_tabular(text);

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].as_ref().unwrap(),
            &TabularRow {
                passport: "1234567890".to_string(),
                name: "Ivan Petrov".to_string(),
                category: "VIP".to_string(),
                deposit: "11000.00".to_string(),
                bonus_label: Some("Percentage".to_string()),
            }
        );
        let second = rows[1].as_ref().unwrap();
        assert_eq!(second.name, "Anna");
        assert_eq!(second.deposit, "8000,00");
        assert_eq!(second.bonus_label, None);
    }

    #[test]
    fn test_read_tabular_short_row_is_an_error() {
        let text = "Passport;Name;Category;Deposit;BonusLabel\n1234567890;Ivan\n";

        let rows = read_tabular(text);

        assert_eq!(rows.len(), 1);
        assert!(matches!(rows[0], Err(BankError::ParseError { .. })));
    }
}
