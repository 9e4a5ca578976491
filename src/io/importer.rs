//! Heuristic client importer
//!
//! Reconstructs client candidates from loosely structured text. Input is
//! either a tabular export (detected by its header row) or free text cut into
//! blocks on blank lines and delimiter lines.
//!
//! # Field extraction
//!
//! For each block:
//! - **name**: first `Client:`/`Full name:` line, else the first line with no
//!   `:` and no digit
//! - **passport**: first `Passport:` line (digits only), else the first run of
//!   exactly 10 digits anywhere in the block
//! - **category**: last `Category:`/`Client type:`/`Type:` line or bare
//!   keyword (`vip`, `pensioner`, `regular`); later matches win
//! - **amount**: last whitespace token parsing to a value in (0, 1e9)
//!
//! The last-match-wins rules have no confidence scoring: a block holding
//! several numeric tokens can pick the wrong amount, and a name containing a
//! category keyword can override an earlier category line. Labeled fields
//! first would be sturdier, but the precedence is kept so that existing
//! exports import the same way they always have.
//!
//! This module only parses. Committing candidates (creation, uniqueness,
//! storage) is done by `BankService::import_text`.

use crate::core::validation::{is_valid_passport, normalize_amount, MAX_AMOUNT};
use crate::io::csv_format::{is_tabular_header, read_tabular, TabularRow};
use crate::io::text_format::{
    CATEGORY_LABEL, EXPORT_DATE_LABEL, NAME_LABEL, PASSPORT_LABEL, RECORD_DELIMITER,
    TOTAL_CLIENTS_LABEL, TOTAL_DEPOSITS_LABEL,
};
use crate::types::{create_client, BankError, Category, ClientRecord};
use regex::Regex;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::debug;

/// Lines that close the current block
const BLOCK_DELIMITERS: [&str; 3] = [RECORD_DELIMITER, "===", "=========="];

/// Report header lines, dropped before blocks are formed
const HEADER_PREFIXES: [&str; 7] = [
    "===",
    EXPORT_DATE_LABEL,
    TOTAL_CLIENTS_LABEL,
    TOTAL_DEPOSITS_LABEL,
    "Дата экспорта:",
    "Всего клиентов:",
    "Общая сумма вкладов:",
];

const NAME_LABELS: [&str; 5] = [NAME_LABEL, "Full name:", "FullName:", "Клиент:", "ФИО:"];

const PASSPORT_LABELS: [&str; 2] = [PASSPORT_LABEL, "Паспорт:"];

const CATEGORY_LABELS: [&str; 6] = [
    CATEGORY_LABEL,
    "Client type:",
    "Type:",
    "Категория:",
    "Тип клиента:",
    "Тип:",
];

/// Phrases marking an amount that already contains the bonus
const BONUS_INCLUDED_MARKERS: [&str; 3] = ["bonus included", "with bonus", "с учетом бонуса"];

static PASSPORT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9])([0-9]{10})(?:[^0-9]|$)").expect("valid passport run regex")
});

/// One unit of import input
#[derive(Debug, Clone, PartialEq)]
pub struct RawBlock {
    /// 1-based position in the input
    pub number: usize,
    /// Trimmed, non-empty lines
    pub lines: Vec<String>,
}

/// Amount found in a block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractedAmount {
    pub value: Decimal,
    /// The amount came from a line marked as bonus-inclusive
    pub bonus_included: bool,
}

/// Raw result of field extraction, before acceptance checks
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub name: String,
    pub passport: String,
    pub category: Category,
    pub amount: Option<ExtractedAmount>,
}

/// Fields of a block that passed the acceptance checks
#[derive(Debug, Clone, PartialEq)]
pub struct ClientCandidate {
    pub block: usize,
    pub name: String,
    pub passport: String,
    pub category: Category,
    pub amount: Decimal,
    pub bonus_included: bool,
}

impl ClientCandidate {
    /// Build the client record through the ordinary creation path
    ///
    /// A bonus-inclusive amount is converted back to its principal first, so
    /// the created record carries the same deposit as the source text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the amount is incompatible with the category.
    pub fn into_record(self) -> Result<ClientRecord, BankError> {
        if self.bonus_included {
            ClientRecord::from_deposit(self.category, &self.name, &self.passport, self.amount)
        } else {
            create_client(self.category, &self.name, &self.passport, self.amount)
        }
    }
}

/// Outcome of one block: a candidate or the reason it was rejected
pub type BlockOutcome = Result<ClientCandidate, BankError>;

/// Aggregate result of an import run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub imported_count: usize,
    pub error_count: usize,
    pub error_details: Vec<String>,
}

impl ImportSummary {
    pub fn record_imported(&mut self) {
        self.imported_count += 1;
    }

    pub fn record_error(&mut self, error: &BankError) {
        self.error_count += 1;
        self.error_details.push(error.to_string());
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Imported: {}, errors: {}",
            self.imported_count, self.error_count
        )?;
        for detail in &self.error_details {
            write!(f, "\n  - {}", detail)?;
        }
        Ok(())
    }
}

/// Parse import text into one outcome per block
pub fn parse_text(text: &str) -> Vec<BlockOutcome> {
    let first_line = text.lines().map(str::trim).find(|line| !line.is_empty());
    if first_line.is_some_and(is_tabular_header) {
        return parse_tabular(text);
    }

    split_blocks(text)
        .iter()
        .map(|block| {
            let fields = extract_fields(block);
            debug!(block = block.number, ?fields, "extracted block fields");
            accept(block.number, fields)
        })
        .collect()
}

/// Cut free text into blocks
///
/// Blank lines and delimiter lines close a block; report header lines are
/// dropped and never reach a block.
pub fn split_blocks(text: &str) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() || BLOCK_DELIMITERS.contains(&line) {
            flush_block(&mut blocks, &mut current);
        } else if !HEADER_PREFIXES
            .iter()
            .any(|prefix| line.starts_with(prefix))
        {
            current.push(line.to_string());
        }
    }
    flush_block(&mut blocks, &mut current);

    blocks
}

fn flush_block(blocks: &mut Vec<RawBlock>, current: &mut Vec<String>) {
    if !current.is_empty() {
        blocks.push(RawBlock {
            number: blocks.len() + 1,
            lines: std::mem::take(current),
        });
    }
}

/// Extract candidate fields from a block
pub fn extract_fields(block: &RawBlock) -> ExtractedFields {
    ExtractedFields {
        name: extract_name(&block.lines),
        passport: extract_passport(&block.lines),
        category: extract_category(&block.lines),
        amount: extract_amount(&block.lines),
    }
}

fn extract_name(lines: &[String]) -> String {
    let labeled = lines
        .iter()
        .find_map(|line| strip_label(line, &NAME_LABELS));
    if let Some(name) = labeled {
        return name.to_string();
    }

    lines
        .iter()
        .find(|line| !line.contains(':') && !line.chars().any(|c| c.is_ascii_digit()))
        .cloned()
        .unwrap_or_default()
}

fn extract_passport(lines: &[String]) -> String {
    let labeled = lines
        .iter()
        .find_map(|line| strip_label(line, &PASSPORT_LABELS));
    if let Some(value) = labeled {
        return value.chars().filter(char::is_ascii_digit).collect();
    }

    lines
        .iter()
        .find_map(|line| {
            PASSPORT_RUN_RE
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
        .unwrap_or_default()
}

fn extract_category(lines: &[String]) -> Category {
    let mut category = Category::Regular;

    for line in lines {
        if let Some(value) = strip_label(line, &CATEGORY_LABELS) {
            category = resolve_category(value);
        } else if let Some(found) = Category::from_keyword(line) {
            category = found;
        }
    }

    category
}

/// Resolve a category value, falling back to keywords and then to Regular
fn resolve_category(value: &str) -> Category {
    Category::from_label(value)
        .ok()
        .or_else(|| Category::from_keyword(value))
        .unwrap_or(Category::Regular)
}

fn extract_amount(lines: &[String]) -> Option<ExtractedAmount> {
    let mut amount = None;

    for line in lines {
        let bonus_included = is_bonus_included(line);
        for token in line.split_whitespace() {
            if let Some(value) = parse_amount_token(token) {
                // last match wins
                amount = Some(ExtractedAmount {
                    value,
                    bonus_included,
                });
            }
        }
    }

    amount
}

/// Parse a token as an amount in (0, 1e9)
fn parse_amount_token(token: &str) -> Option<Decimal> {
    let cleaned = normalize_amount(token);
    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned)
        .ok()
        .filter(|value| *value > Decimal::ZERO && *value < MAX_AMOUNT)
}

fn is_bonus_included(line: &str) -> bool {
    let lower = line.to_lowercase();
    BONUS_INCLUDED_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Strip the first matching label, case-insensitively
fn strip_label<'a>(line: &'a str, labels: &[&str]) -> Option<&'a str> {
    labels.iter().find_map(|label| {
        let prefix = line.get(..label.len())?;
        if prefix.to_lowercase() == label.to_lowercase() {
            line.get(label.len()..).map(str::trim)
        } else {
            None
        }
    })
}

/// Apply the acceptance rules to extracted fields
///
/// A block is accepted whole or rejected whole.
fn accept(block: usize, fields: ExtractedFields) -> BlockOutcome {
    let mut problems = Vec::new();

    if fields.name.trim().is_empty() {
        problems.push("missing client name".to_string());
    }

    if fields.passport.is_empty() {
        problems.push("missing passport".to_string());
    } else if !is_valid_passport(&fields.passport) {
        problems.push(format!(
            "passport '{}' must contain exactly 10 digits",
            fields.passport
        ));
    }

    let amount = fields
        .amount
        .filter(|amount| amount.value > Decimal::ZERO);
    if amount.is_none() {
        problems.push("missing deposit amount".to_string());
    }

    match amount {
        Some(amount) if problems.is_empty() => Ok(ClientCandidate {
            block,
            name: fields.name.trim().to_string(),
            passport: fields.passport,
            category: fields.category,
            amount: amount.value,
            bonus_included: amount.bonus_included,
        }),
        _ => Err(BankError::block_rejected(block, problems.join("; "))),
    }
}

fn parse_tabular(text: &str) -> Vec<BlockOutcome> {
    read_tabular(text)
        .into_iter()
        .enumerate()
        .map(|(position, row)| {
            let block = position + 1;
            match row {
                Ok(row) => accept(block, tabular_fields(row)),
                Err(e) => Err(BankError::block_rejected(block, e.to_string())),
            }
        })
        .collect()
}

fn tabular_fields(row: TabularRow) -> ExtractedFields {
    ExtractedFields {
        name: row.name,
        passport: row.passport.trim().to_string(),
        category: resolve_category(&row.category),
        amount: parse_amount_token(&row.deposit).map(|value| ExtractedAmount {
            value,
            bonus_included: true,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn block(lines: &[&str]) -> RawBlock {
        RawBlock {
            number: 1,
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn test_split_blocks_on_blank_and_delimiters() {
        let text = "Ivan\n1234567890\n\nAnna\n---\nBoris\n===\nClara\n==========\n\n\nDan";

        let blocks = split_blocks(text);

        let lines: Vec<Vec<String>> = blocks.iter().map(|b| b.lines.clone()).collect();
        assert_eq!(
            lines,
            vec![
                vec!["Ivan".to_string(), "1234567890".to_string()],
                vec!["Anna".to_string()],
                vec!["Boris".to_string()],
                vec!["Clara".to_string()],
                vec!["Dan".to_string()],
            ]
        );
        assert_eq!(
            blocks.iter().map(|b| b.number).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn test_split_blocks_drops_report_header() {
        let text = "=== BANK CLIENT REGISTRY EXPORT ===\n\
                    Export date: 2026-10-19 12:00:00\n\
                    Total clients: 1\n\
                    Total deposits: 11000.00\n\
                    ===================================\n\
                    Client: Ivan\n\
                    Всего клиентов: 3\n";

        let blocks = split_blocks(text);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines, vec!["Client: Ivan".to_string()]);
    }

    #[rstest]
    #[case::labeled(&["Passport: 1234567890", "Client: Ivan Petrov"], "Ivan Petrov")]
    #[case::full_name(&["Full name: Anna Ivanova"], "Anna Ivanova")]
    #[case::russian_label(&["ФИО: Анна Иванова"], "Анна Иванова")]
    #[case::fallback(&["1234567890", "note: none", "Boris Sidorov", "Clara"], "Boris Sidorov")]
    #[case::none(&["1234567890", "Deposit: 100"], "")]
    fn test_extract_name(#[case] lines: &[&str], #[case] expected: &str) {
        assert_eq!(extract_fields(&block(lines)).name, expected);
    }

    #[rstest]
    #[case::labeled(&["Passport: 12 34 567890"], "1234567890")]
    #[case::labeled_short(&["Passport: 12345", "id 1234567890"], "12345")]
    #[case::russian_label(&["Паспорт: 1234567890"], "1234567890")]
    #[case::run_in_text(&["Ivan", "doc no. 0987654321, issued"], "0987654321")]
    #[case::longer_run_ignored(&["acct 123456789012", "pass 1234567890"], "1234567890")]
    #[case::none(&["Ivan", "5000"], "")]
    fn test_extract_passport(#[case] lines: &[&str], #[case] expected: &str) {
        assert_eq!(extract_fields(&block(lines)).passport, expected);
    }

    #[rstest]
    #[case::default(&["Ivan"], Category::Regular)]
    #[case::labeled(&["Category: VIP"], Category::Vip)]
    #[case::client_type(&["Client type: pensioner"], Category::Pensioner)]
    #[case::russian(&["Категория: Пенсионер"], Category::Pensioner)]
    #[case::keyword(&["a vip customer"], Category::Vip)]
    #[case::last_wins(&["Category: VIP", "status: regular"], Category::Regular)]
    #[case::unknown_label_value(&["Type: gold"], Category::Regular)]
    fn test_extract_category(#[case] lines: &[&str], #[case] expected: Category) {
        assert_eq!(extract_fields(&block(lines)).category, expected);
    }

    #[rstest]
    #[case::plain(&["5000"], Some((Decimal::new(5000, 0), false)))]
    #[case::comma(&["Amount 5000,50 rub"], Some((Decimal::new(500050, 2), false)))]
    #[case::bonus_included(&["Deposit (bonus included): 11000.00"], Some((Decimal::new(1100000, 2), true)))]
    #[case::last_wins(&["100", "Deposit: 200"], Some((Decimal::new(200, 0), false)))]
    #[case::passport_out_of_range(&["1234567890"], None)]
    #[case::zero(&["0", "0.00"], None)]
    #[case::no_numbers(&["Ivan"], None)]
    fn test_extract_amount(#[case] lines: &[&str], #[case] expected: Option<(Decimal, bool)>) {
        let amount = extract_fields(&block(lines))
            .amount
            .map(|a| (a.value, a.bonus_included));
        assert_eq!(amount, expected);
    }

    #[test]
    fn test_parse_text_structured_block() {
        let text = "Client: Ivan Petrov\n\
                    Category: VIP\n\
                    Passport: 1234567890\n\
                    Bonus: Percentage\n\
                    Deposit (bonus included): 11000.00\n\
                    ---\n";

        let outcomes = parse_text(text);

        assert_eq!(outcomes.len(), 1);
        let candidate = outcomes[0].clone().unwrap();
        assert_eq!(candidate.name, "Ivan Petrov");
        assert_eq!(candidate.passport, "1234567890");
        assert_eq!(candidate.category, Category::Vip);
        assert!(candidate.bonus_included);

        let record = candidate.into_record().unwrap();
        assert_eq!(record.deposit(), Decimal::new(11000, 0));
        assert_eq!(record.principal(), Decimal::new(10000, 0));
    }

    #[test]
    fn test_parse_text_free_form_amount_is_principal() {
        let outcomes = parse_text("Ivan Petrov\n1234567890\nvip\n10000\n");

        let record = outcomes[0].clone().unwrap().into_record().unwrap();
        assert_eq!(record.category(), Category::Vip);
        assert_eq!(record.deposit(), Decimal::new(11000, 0));
    }

    #[rstest]
    #[case::missing_passport("Client: Ivan\nDeposit: 100", "missing passport")]
    #[case::short_passport("Client: Ivan\nPassport: 12345\nDeposit: 100", "passport '12345' must contain exactly 10 digits")]
    #[case::missing_amount("Client: Ivan\nPassport: 1234567890", "missing deposit amount")]
    #[case::missing_name("Passport: 1234567890\nDeposit: 100", "missing client name")]
    fn test_parse_text_rejects_block(#[case] text: &str, #[case] reason: &str) {
        let outcomes = parse_text(text);

        assert_eq!(outcomes.len(), 1);
        match &outcomes[0] {
            Err(BankError::ImportBlockRejected { block, reason: actual }) => {
                assert_eq!(*block, 1);
                assert!(actual.contains(reason), "unexpected reason: {}", actual);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_text_mixed_blocks() {
        let text = "Client: Ivan\nPassport: 1234567890\nDeposit: 100\n\
                    ---\n\
                    Client: Bad\nPassport: 12345\nDeposit: 100\n\
                    ---\n\
                    Client: Anna\nPassport: 0987654321\nDeposit: 200\n";

        let outcomes = parse_text(text);

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_ok());
        assert!(outcomes[1].is_err());
        assert!(outcomes[2].is_ok());
    }

    #[test]
    fn test_parse_text_tabular() {
        let text = "\nPassport;Name;Category;Deposit;BonusLabel\n\
                    1234567890;Ivan Petrov;VIP;11000.00;Percentage\n\
                    12345;Short;Regular;10.00;No bonus\n\
                    0987654321;Anna;Pensioner;8000,00;Fixed\n";

        let outcomes = parse_text(text);

        assert_eq!(outcomes.len(), 3);
        let ivan = outcomes[0].clone().unwrap().into_record().unwrap();
        assert_eq!(ivan.deposit(), Decimal::new(11000, 0));
        assert!(matches!(
            outcomes[1],
            Err(BankError::ImportBlockRejected { block: 2, .. })
        ));
        let anna = outcomes[2].clone().unwrap().into_record().unwrap();
        assert_eq!(anna.principal(), Decimal::new(5000, 0));
    }

    #[test]
    fn test_import_summary_display() {
        let mut summary = ImportSummary::default();
        summary.record_imported();
        summary.record_error(&BankError::block_rejected(2, "missing passport"));

        assert_eq!(
            summary.to_string(),
            "Imported: 1, errors: 1\n  - Import block 2 rejected: missing passport"
        );
    }
}
