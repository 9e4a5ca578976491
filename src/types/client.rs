//! Client-related types for the bank client registry
//!
//! This module defines client categories, the client record and the factory
//! that enforces the bonus-inclusive deposit invariant.

use super::bonus::BonusStrategy;
use super::error::BankError;
use crate::core::validation::is_valid_passport;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Passport number, the unique identity of a client (10 digits)
pub type Passport = String;

/// Fixed bonus granted to pensioners
pub const PENSIONER_BONUS: Decimal = Decimal::from_parts(3000, 0, 0, false, 0);

/// Percentage bonus granted to VIP clients (10%)
pub const VIP_BONUS_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Client category
///
/// The category fixes the bonus strategy applied at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Regular client, no bonus
    Regular,

    /// Pensioner, fixed bonus of 3000
    Pensioner,

    /// VIP client, +10% of the principal
    Vip,
}

impl Category {
    /// All categories in declaration order
    pub const ALL: [Category; 3] = [Category::Regular, Category::Pensioner, Category::Vip];

    /// Canonical label used in exports and in the store
    pub fn label(&self) -> &'static str {
        match self {
            Category::Regular => "Regular",
            Category::Pensioner => "Pensioner",
            Category::Vip => "VIP",
        }
    }

    /// Bonus strategy fixed by this category
    pub fn strategy(&self) -> BonusStrategy {
        match self {
            Category::Regular => BonusStrategy::NoBonus,
            Category::Pensioner => BonusStrategy::FixedBonus(PENSIONER_BONUS),
            Category::Vip => BonusStrategy::PercentageBonus(VIP_BONUS_RATE),
        }
    }

    /// Resolve a category from a label
    ///
    /// Accepts the canonical labels and their synonyms, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an unrecognized label.
    pub fn from_label(label: &str) -> Result<Self, BankError> {
        match label.trim().to_lowercase().as_str() {
            "regular" | "regular client" | "обычный" | "обычный клиент" => Ok(Category::Regular),
            "pensioner" | "retiree" | "пенсионер" => Ok(Category::Pensioner),
            "vip" | "вип" => Ok(Category::Vip),
            _ => Err(BankError::invalid_argument(format!(
                "unknown client category '{}'",
                label.trim()
            ))),
        }
    }

    /// Guess a category from free text by keyword
    ///
    /// Used by the importer, which sees category names inside arbitrary lines.
    pub fn from_keyword(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        if lower.contains("vip") || lower.contains("вип") {
            Some(Category::Vip)
        } else if lower.contains("pension") || lower.contains("пенсион") {
            Some(Category::Pensioner)
        } else if lower.contains("regular") || lower.contains("обычн") {
            Some(Category::Regular)
        } else {
            None
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_label(s)
    }
}

/// A bank client
///
/// Records are immutable once created: edits produce a new record keyed by
/// the same passport. The deposit already contains the category bonus.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientRecord {
    passport: Passport,
    name: String,
    principal: Decimal,
    deposit: Decimal,
    category: Category,
    strategy: BonusStrategy,
}

/// Create a client record
///
/// Selects the strategy fixed by the category and computes
/// `deposit = principal + strategy.compute(principal)`.
///
/// # Errors
///
/// Returns `InvalidArgument` if the passport is not exactly 10 digits, the
/// name is blank or the principal is negative.
pub fn create_client(
    category: Category,
    name: &str,
    passport: &str,
    principal: Decimal,
) -> Result<ClientRecord, BankError> {
    if !is_valid_passport(passport) {
        return Err(BankError::invalid_field(
            "passport",
            passport,
            "must contain exactly 10 digits",
        ));
    }
    if name.trim().is_empty() {
        return Err(BankError::invalid_argument("client name must not be empty"));
    }
    if principal.is_sign_negative() && !principal.is_zero() {
        return Err(BankError::invalid_argument(format!(
            "deposit must not be negative, got {}",
            principal
        )));
    }

    let strategy = category.strategy();
    Ok(ClientRecord {
        passport: passport.trim().to_string(),
        name: name.trim().to_string(),
        principal,
        deposit: principal + strategy.compute(principal),
        category,
        strategy,
    })
}

impl ClientRecord {
    /// Rebuild a record from a bonus-inclusive deposit
    ///
    /// The principal is recovered by inverting the category strategy.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the deposit cannot contain the category bonus.
    pub fn from_deposit(
        category: Category,
        name: &str,
        passport: &str,
        deposit: Decimal,
    ) -> Result<Self, BankError> {
        let principal = category
            .strategy()
            .principal_from_deposit(deposit)
            .ok_or_else(|| {
                BankError::invalid_argument(format!(
                    "deposit {:.2} is smaller than the {} bonus",
                    deposit,
                    category.label()
                ))
            })?;
        create_client(category, name, passport, principal)
    }

    /// Rebuild a record from stored columns without re-applying the bonus
    ///
    /// The strategy always comes from the category.
    pub(crate) fn from_parts(
        category: Category,
        name: String,
        passport: Passport,
        principal: Decimal,
        deposit: Decimal,
    ) -> Self {
        ClientRecord {
            passport,
            name,
            principal,
            deposit,
            category,
            strategy: category.strategy(),
        }
    }

    /// Replacement record with a different category
    ///
    /// The deposit is recomputed from the stored principal, so changing the
    /// category back and forth always returns to the same deposit.
    pub fn with_category(&self, category: Category) -> Self {
        let strategy = category.strategy();
        ClientRecord {
            passport: self.passport.clone(),
            name: self.name.clone(),
            principal: self.principal,
            deposit: self.principal + strategy.compute(self.principal),
            category,
            strategy,
        }
    }

    /// Replacement record for an edit, keeping the passport
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the principal is negative.
    pub fn edited(
        &self,
        name: &str,
        category: Category,
        principal: Decimal,
    ) -> Result<Self, BankError> {
        create_client(category, name, &self.passport, principal)
    }

    pub fn passport(&self) -> &str {
        &self.passport
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Amount deposited before the bonus
    pub fn principal(&self) -> Decimal {
        self.principal
    }

    /// Bonus-inclusive deposit
    pub fn deposit(&self) -> Decimal {
        self.deposit
    }

    /// Bonus granted at creation
    pub fn bonus(&self) -> Decimal {
        self.deposit - self.principal
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn strategy(&self) -> BonusStrategy {
        self.strategy
    }
}

impl fmt::Display for ClientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {} {:.2} [{}]",
            self.name,
            self.passport,
            self.category,
            self.deposit.round_dp(2),
            self.strategy.label()
        )
    }
}
