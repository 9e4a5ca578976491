//! Deposit bonus strategies
//!
//! A bonus strategy is a pure value that computes the bonus granted on top of a
//! principal. The stored deposit of a client is always `principal + bonus`.

use super::error::BankError;
use rust_decimal::Decimal;

/// Bonus applied to a principal when a client record is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusStrategy {
    /// No bonus, the deposit equals the principal
    NoBonus,

    /// A fixed amount added regardless of the principal
    FixedBonus(Decimal),

    /// A share of the principal (0.10 means +10%)
    PercentageBonus(Decimal),
}

impl BonusStrategy {
    /// Create a percentage bonus
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the rate is negative.
    pub fn percentage(rate: Decimal) -> Result<Self, BankError> {
        if rate.is_sign_negative() {
            return Err(BankError::invalid_argument(format!(
                "bonus rate must not be negative, got {}",
                rate
            )));
        }
        Ok(BonusStrategy::PercentageBonus(rate))
    }

    /// Bonus amount granted for the given principal
    pub fn compute(&self, principal: Decimal) -> Decimal {
        match self {
            BonusStrategy::NoBonus => Decimal::ZERO,
            BonusStrategy::FixedBonus(amount) => *amount,
            BonusStrategy::PercentageBonus(rate) => principal * rate,
        }
    }

    /// Human-readable label used in exports
    pub fn label(&self) -> &'static str {
        match self {
            BonusStrategy::NoBonus => "No bonus",
            BonusStrategy::FixedBonus(_) => "Fixed",
            BonusStrategy::PercentageBonus(_) => "Percentage",
        }
    }

    /// Kind label written to the store's `bonus_type` column
    pub fn kind(&self) -> &'static str {
        match self {
            BonusStrategy::NoBonus => "none",
            BonusStrategy::FixedBonus(_) => "fixed",
            BonusStrategy::PercentageBonus(_) => "percentage",
        }
    }

    /// Literal parameter written to the store's `bonus_value` column
    pub fn literal_value(&self) -> Decimal {
        match self {
            BonusStrategy::NoBonus => Decimal::ZERO,
            BonusStrategy::FixedBonus(amount) => *amount,
            BonusStrategy::PercentageBonus(rate) => *rate,
        }
    }

    /// Recover the principal from a bonus-inclusive deposit
    ///
    /// Returns `None` when the deposit is too small to contain the bonus.
    /// Percentage inversions are rounded to cents.
    pub fn principal_from_deposit(&self, deposit: Decimal) -> Option<Decimal> {
        let principal = match self {
            BonusStrategy::NoBonus => deposit,
            BonusStrategy::FixedBonus(amount) => deposit - amount,
            BonusStrategy::PercentageBonus(rate) => {
                (deposit / (Decimal::ONE + rate)).round_dp(2)
            }
        };

        if principal.is_sign_negative() && !principal.is_zero() {
            None
        } else {
            Some(principal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::no_bonus(BonusStrategy::NoBonus, Decimal::new(2000, 0), Decimal::ZERO)]
    #[case::fixed(BonusStrategy::FixedBonus(Decimal::new(3000, 0)), Decimal::new(5000, 0), Decimal::new(3000, 0))]
    #[case::fixed_on_zero(BonusStrategy::FixedBonus(Decimal::new(3000, 0)), Decimal::ZERO, Decimal::new(3000, 0))]
    #[case::percentage(BonusStrategy::PercentageBonus(Decimal::new(10, 2)), Decimal::new(10000, 0), Decimal::new(1000, 0))]
    #[case::percentage_cents(BonusStrategy::PercentageBonus(Decimal::new(10, 2)), Decimal::new(12345, 2), Decimal::new(123450, 4))]
    fn test_compute(
        #[case] strategy: BonusStrategy,
        #[case] principal: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(strategy.compute(principal), expected);
    }

    #[rstest]
    #[case(BonusStrategy::NoBonus, "No bonus", "none")]
    #[case(BonusStrategy::FixedBonus(Decimal::new(3000, 0)), "Fixed", "fixed")]
    #[case(BonusStrategy::PercentageBonus(Decimal::new(10, 2)), "Percentage", "percentage")]
    fn test_labels(#[case] strategy: BonusStrategy, #[case] label: &str, #[case] kind: &str) {
        assert_eq!(strategy.label(), label);
        assert_eq!(strategy.kind(), kind);
    }

    #[test]
    fn test_negative_rate_rejected() {
        let result = BonusStrategy::percentage(Decimal::new(-1, 1));
        assert!(matches!(result, Err(BankError::InvalidArgument { .. })));
    }

    #[rstest]
    #[case::no_bonus(BonusStrategy::NoBonus, Decimal::new(2000, 0), Some(Decimal::new(2000, 0)))]
    #[case::fixed(BonusStrategy::FixedBonus(Decimal::new(3000, 0)), Decimal::new(8000, 0), Some(Decimal::new(5000, 0)))]
    #[case::fixed_too_small(BonusStrategy::FixedBonus(Decimal::new(3000, 0)), Decimal::new(1000, 0), None)]
    #[case::percentage(BonusStrategy::PercentageBonus(Decimal::new(10, 2)), Decimal::new(11000, 0), Some(Decimal::new(10000, 0)))]
    fn test_principal_from_deposit(
        #[case] strategy: BonusStrategy,
        #[case] deposit: Decimal,
        #[case] expected: Option<Decimal>,
    ) {
        assert_eq!(strategy.principal_from_deposit(deposit), expected);
    }
}
