//! Input validation rules
//!
//! Shared predicates for raw passport, name, amount and category strings.
//! Manual entry runs every rule; the importer reuses the passport and amount
//! rules on the fields it extracts.

use crate::types::{BankError, Category};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// Exclusive upper bound for amounts read from free text
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Maximum number of fractional digits accepted on manual entry
pub const MAX_DECIMAL_PLACES: usize = 2;

static PASSPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid passport regex"));

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[а-яА-ЯёЁa-zA-Z\s\-]+$").expect("valid name regex"));

/// Passport is exactly 10 digits after trimming
pub fn is_valid_passport(passport: &str) -> bool {
    PASSPORT_RE.is_match(passport.trim())
}

/// Name is non-empty and made of letters, spaces and hyphens
pub fn is_valid_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && NAME_RE.is_match(name)
}

/// Category label is known
pub fn is_valid_category(label: &str) -> bool {
    Category::from_label(label).is_ok()
}

/// Amount string describes a positive amount not above the maximum
pub fn is_valid_deposit(amount: &str) -> bool {
    deposit_error_message(amount).is_none()
}

/// Parse an amount accepting both `,` and `.` as decimal separator
///
/// Characters other than digits and separators are dropped, as in `"5 000,50 rub"`.
///
/// # Errors
///
/// Returns `InvalidArgument` if nothing parseable remains.
pub fn parse_deposit(amount: &str) -> Result<Decimal, BankError> {
    let cleaned = normalize_amount(amount);
    if cleaned.is_empty() {
        return Err(BankError::invalid_field("amount", amount, "empty amount"));
    }

    Decimal::from_str(&cleaned)
        .map_err(|_| BankError::invalid_field("amount", amount, "not a number"))
}

/// Keep digits and separators, normalising `,` to `.`
///
/// A trailing separator is dropped so that `"rub."` or `"500,"` do not leak
/// a dangling point into the number.
pub fn normalize_amount(token: &str) -> String {
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.trim_end_matches('.').to_string()
}

/// Human-readable reason why an amount string is rejected, `None` if valid
pub fn deposit_error_message(amount: &str) -> Option<&'static str> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Some("enter a deposit amount");
    }

    if !amount
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == ',')
    {
        return Some("amount may contain only digits, a point or a comma");
    }

    let value = match parse_deposit(amount) {
        Ok(value) => value,
        Err(_) => return Some("invalid number format"),
    };

    if value <= Decimal::ZERO {
        return Some("amount must be greater than 0");
    }

    if value > MAX_AMOUNT {
        return Some("amount is too large (maximum 1 000 000 000)");
    }

    if !has_valid_decimal_places(amount, MAX_DECIMAL_PLACES) {
        return Some("at most 2 digits after the decimal separator");
    }

    None
}

fn has_valid_decimal_places(amount: &str, max_decimals: usize) -> bool {
    let normalized = amount.replace(',', ".");
    match normalized.split_once('.') {
        None => true,
        Some((_, fraction)) => !fraction.contains('.') && fraction.len() <= max_decimals,
    }
}

/// Validate a passport field
///
/// # Errors
///
/// Returns `InvalidArgument` describing the problem.
pub fn validate_passport(passport: &str) -> Result<(), BankError> {
    if is_valid_passport(passport) {
        Ok(())
    } else {
        Err(BankError::invalid_field(
            "passport",
            passport,
            "must contain exactly 10 digits",
        ))
    }
}

/// Validate a name field
///
/// # Errors
///
/// Returns `InvalidArgument` describing the problem.
pub fn validate_name(name: &str) -> Result<(), BankError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(BankError::invalid_field(
            "name",
            name,
            "must be non-empty and contain only letters, spaces and hyphens",
        ))
    }
}

/// Validate and parse an amount field
///
/// # Errors
///
/// Returns `InvalidArgument` describing the problem.
pub fn validate_deposit(amount: &str) -> Result<Decimal, BankError> {
    match deposit_error_message(amount) {
        Some(reason) => Err(BankError::invalid_field("amount", amount, reason)),
        None => parse_deposit(amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1234567890", true)]
    #[case(" 1234567890 ", true)]
    #[case("12345", false)]
    #[case("12345678901", false)]
    #[case("12345abcde", false)]
    #[case("", false)]
    fn test_is_valid_passport(#[case] passport: &str, #[case] expected: bool) {
        assert_eq!(is_valid_passport(passport), expected);
    }

    #[rstest]
    #[case("Ivan Petrov", true)]
    #[case("Анна-Мария Иванова", true)]
    #[case("   ", false)]
    #[case("R2D2", false)]
    #[case("Ivan: Petrov", false)]
    fn test_is_valid_name(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_valid_name(name), expected);
    }

    #[rstest]
    #[case("vip", true)]
    #[case("пенсионер", true)]
    #[case("gold", false)]
    fn test_is_valid_category(#[case] label: &str, #[case] expected: bool) {
        assert_eq!(is_valid_category(label), expected);
    }

    #[rstest]
    #[case("5000", None)]
    #[case("5000,50", None)]
    #[case("5000.5", None)]
    #[case("1000000000", None)]
    #[case("", Some("enter a deposit amount"))]
    #[case("50 rub", Some("amount may contain only digits, a point or a comma"))]
    #[case("-5", Some("amount may contain only digits, a point or a comma"))]
    #[case("0", Some("amount must be greater than 0"))]
    #[case("1000000000.01", Some("amount is too large (maximum 1 000 000 000)"))]
    #[case("10.123", Some("at most 2 digits after the decimal separator"))]
    #[case("1.2.3", Some("invalid number format"))]
    fn test_deposit_error_message(#[case] amount: &str, #[case] expected: Option<&str>) {
        assert_eq!(deposit_error_message(amount), expected);
    }

    #[rstest]
    #[case("5000,50", Decimal::new(500050, 2))]
    #[case("  42 ", Decimal::new(42, 0))]
    #[case("11000.00 rub.", Decimal::new(1100000, 2))]
    fn test_parse_deposit(#[case] amount: &str, #[case] expected: Decimal) {
        assert_eq!(parse_deposit(amount).unwrap(), expected);
    }

    #[test]
    fn test_parse_deposit_rejects_empty() {
        assert!(parse_deposit("rub").is_err());
    }

    #[test]
    fn test_validate_deposit_returns_value() {
        assert_eq!(validate_deposit("10,5").unwrap(), Decimal::new(105, 1));
        assert!(matches!(
            validate_deposit("0"),
            Err(BankError::InvalidArgument { .. })
        ));
    }
}
