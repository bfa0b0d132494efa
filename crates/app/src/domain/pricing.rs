//! Pricing
//!
//! Resolves the price a customer pays for a variant at purchase time. All
//! amounts are integer minor currency units.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("discount percentage {0} is outside 0..=100")]
    DiscountOutOfRange(i64),

    #[error("price arithmetic overflowed")]
    Overflow,
}

/// A discount percentage, guaranteed to lie in `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiscountPercent(u8);

impl DiscountPercent {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(100);

    /// Build a discount, rejecting anything above 100%.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::DiscountOutOfRange`] for values above 100.
    pub const fn new(percent: u8) -> Result<Self, PricingError> {
        if percent > 100 {
            return Err(PricingError::DiscountOutOfRange(percent as i64));
        }

        Ok(Self(percent))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DiscountPercent {
    type Error = PricingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i16> for DiscountPercent {
    type Error = PricingError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_overflow| PricingError::DiscountOutOfRange(i64::from(value)))
            .and_then(Self::new)
    }
}

impl TryFrom<u64> for DiscountPercent {
    type Error = PricingError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_overflow| {
                PricingError::DiscountOutOfRange(i64::try_from(value).unwrap_or(i64::MAX))
            })
            .and_then(Self::new)
    }
}

impl From<DiscountPercent> for i16 {
    fn from(value: DiscountPercent) -> Self {
        i16::from(value.0)
    }
}

impl fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Resolve the purchase-time unit price of a variant.
///
/// Rounds half away from zero to the nearest minor unit. The result never
/// exceeds `unit_price` and is never negative.
#[must_use]
pub fn final_price(unit_price: u64, discount: DiscountPercent) -> u64 {
    let remaining = Decimal::from(100 - discount.get()) / Decimal::ONE_HUNDRED;

    let price = (Decimal::from(unit_price) * remaining)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    // `remaining` is within [0, 1], so the product always fits back into u64.
    price.to_u64().unwrap_or(unit_price)
}

/// Total for `quantity` units at `unit_price`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit in `u64`.
pub fn line_total(unit_price: u64, quantity: u64) -> Result<u64, PricingError> {
    unit_price
        .checked_mul(quantity)
        .ok_or(PricingError::Overflow)
}

/// Order total: every `(unit_price, quantity)` line plus shipping and payment costs.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if any intermediate sum overflows.
pub fn order_total<I>(lines: I, shipping_cost: u64, payment_cost: u64) -> Result<u64, PricingError>
where
    I: IntoIterator<Item = (u64, u64)>,
{
    let goods = lines
        .into_iter()
        .try_fold(0_u64, |total, (unit_price, quantity)| {
            total
                .checked_add(line_total(unit_price, quantity)?)
                .ok_or(PricingError::Overflow)
        })?;

    goods
        .checked_add(shipping_cost)
        .and_then(|total| total.checked_add(payment_cost))
        .ok_or(PricingError::Overflow)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn ten_percent_off_one_hundred_thousand() -> TestResult {
        assert_eq!(final_price(100_000, DiscountPercent::new(10)?), 90_000);

        Ok(())
    }

    #[test]
    fn no_discount_keeps_list_price() {
        assert_eq!(final_price(12_345, DiscountPercent::ZERO), 12_345);
    }

    #[test]
    fn full_discount_is_free_not_negative() {
        assert_eq!(final_price(99_999, DiscountPercent::MAX), 0);
    }

    #[test]
    fn rounds_half_away_from_zero() -> TestResult {
        // 15 * 0.9 = 13.5
        assert_eq!(final_price(15, DiscountPercent::new(10)?), 14);
        // 33 * 0.67 = 22.11
        assert_eq!(final_price(33, DiscountPercent::new(33)?), 22);

        Ok(())
    }

    #[test]
    fn discount_above_one_hundred_is_rejected() {
        assert_eq!(
            DiscountPercent::new(150),
            Err(PricingError::DiscountOutOfRange(150))
        );
        assert_eq!(
            DiscountPercent::try_from(150_i16),
            Err(PricingError::DiscountOutOfRange(150))
        );
        assert_eq!(
            DiscountPercent::try_from(-5_i16),
            Err(PricingError::DiscountOutOfRange(-5))
        );
        assert_eq!(
            DiscountPercent::try_from(1_000_u64),
            Err(PricingError::DiscountOutOfRange(1_000))
        );
    }

    #[test]
    fn final_price_never_exceeds_list_price() -> TestResult {
        for percent in 0..=100 {
            let discount = DiscountPercent::new(percent)?;

            assert!(final_price(1_999, discount) <= 1_999);
        }

        Ok(())
    }

    #[test]
    fn order_total_adds_shipping_and_payment() -> TestResult {
        let unit = final_price(100_000, DiscountPercent::new(10)?);

        assert_eq!(order_total([(unit, 2)], 20_000, 0)?, 200_000);

        Ok(())
    }

    #[test]
    fn order_total_detects_overflow() {
        assert_eq!(
            order_total([(u64::MAX, 2)], 0, 0),
            Err(PricingError::Overflow)
        );
        assert_eq!(
            order_total([(u64::MAX, 1)], 1, 0),
            Err(PricingError::Overflow)
        );
    }
}
