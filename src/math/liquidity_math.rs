//! Token amounts for liquidity over a sqrt-price interval.
//!
//! Rounding direction is part of the protocol contract: amounts the pool is
//! owed round up, amounts owed out of the pool truncate.
use super::big_num::U256;
use crate::error::{QuoteError, Result};

/// Orders two sqrt prices as (lower, upper).
pub fn increasing_price_order(sqrt_price_0: u128, sqrt_price_1: u128) -> (u128, u128) {
    if sqrt_price_0 > sqrt_price_1 {
        (sqrt_price_1, sqrt_price_0)
    } else {
        (sqrt_price_0, sqrt_price_1)
    }
}

/// Token A amount between two sqrt prices at fixed liquidity.
///
/// amount_a = L * (1/sqrt(lower) - 1/sqrt(upper))
///          = (L << 64) * (upper - lower) / (lower * upper)
pub fn get_amount_delta_a(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u64> {
    let (sqrt_price_lower, sqrt_price_upper) = increasing_price_order(sqrt_price_0, sqrt_price_1);
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;

    let product = U256::from(liquidity) * U256::from(sqrt_price_diff);
    if !(product >> 192).is_zero() {
        return Err(QuoteError::LiquidityOverflow);
    }
    let numerator = product << 64;
    let denominator = U256::from(sqrt_price_lower) * U256::from(sqrt_price_upper);

    let quotient = numerator / denominator;
    let remainder = numerator % denominator;

    let amount = if round_up && !remainder.is_zero() {
        quotient + U256::one()
    } else {
        quotient
    };
    amount.try_into_u64()
}

/// Token B amount between two sqrt prices at fixed liquidity.
///
/// amount_b = L * (upper - lower), shifted out of Q64.64
pub fn get_amount_delta_b(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u64> {
    let (sqrt_price_lower, sqrt_price_upper) = increasing_price_order(sqrt_price_0, sqrt_price_1);
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;

    let product = U256::from(liquidity) * U256::from(sqrt_price_diff);
    let quotient = product >> 64;
    let should_round = round_up && !(product & U256::from(u64::MAX)).is_zero();

    let amount = if should_round {
        quotient + U256::one()
    } else {
        quotient
    };
    amount.try_into_u64()
}

/// Applies a signed liquidity delta during tick crossing.
pub fn add_liquidity_delta(liquidity: u128, delta: i128) -> Result<u128> {
    if delta >= 0 {
        liquidity
            .checked_add(delta as u128)
            .ok_or(QuoteError::LiquidityOverflow)
    } else {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or(QuoteError::LiquidityUnderflow)
    }
}

/// Token amounts covering a position's range given where the current price
/// falls: below the range the position is all token A, above it all token B,
/// inside it the split happens at the current price.
pub fn token_amounts_from_liquidity(
    liquidity: u128,
    sqrt_price_current: u128,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
    round_up: bool,
) -> Result<(u64, u64)> {
    if sqrt_price_current < sqrt_price_lower {
        let amount_a = get_amount_delta_a(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?;
        Ok((amount_a, 0))
    } else if sqrt_price_current >= sqrt_price_upper {
        let amount_b = get_amount_delta_b(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?;
        Ok((0, amount_b))
    } else {
        let amount_a =
            get_amount_delta_a(sqrt_price_current, sqrt_price_upper, liquidity, round_up)?;
        let amount_b =
            get_amount_delta_b(sqrt_price_lower, sqrt_price_current, liquidity, round_up)?;
        Ok((amount_a, amount_b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tick_math::sqrt_price_from_tick_index;

    #[test]
    fn delta_a_rounding() {
        let lower = sqrt_price_from_tick_index(0).unwrap();
        let upper = sqrt_price_from_tick_index(100).unwrap();
        let floor = get_amount_delta_a(lower, upper, 1_000_000, false).unwrap();
        let ceil = get_amount_delta_a(lower, upper, 1_000_000, true).unwrap();
        assert!(ceil == floor || ceil == floor + 1);
        assert!(floor > 0);
    }

    #[test]
    fn delta_b_is_symmetric_in_price_order() {
        let p0 = sqrt_price_from_tick_index(-50).unwrap();
        let p1 = sqrt_price_from_tick_index(50).unwrap();
        assert_eq!(
            get_amount_delta_b(p0, p1, 500_000, false).unwrap(),
            get_amount_delta_b(p1, p0, 500_000, false).unwrap()
        );
    }

    #[test]
    fn add_liquidity_delta_signed() {
        assert_eq!(add_liquidity_delta(1000, 500).unwrap(), 1500);
        assert_eq!(add_liquidity_delta(1000, -300).unwrap(), 700);
        assert_eq!(
            add_liquidity_delta(100, -101).unwrap_err(),
            QuoteError::LiquidityUnderflow
        );
        assert_eq!(
            add_liquidity_delta(u128::MAX, 1).unwrap_err(),
            QuoteError::LiquidityOverflow
        );
    }

    #[test]
    fn position_below_range_is_all_token_a() {
        let current = sqrt_price_from_tick_index(-500).unwrap();
        let lower = sqrt_price_from_tick_index(0).unwrap();
        let upper = sqrt_price_from_tick_index(128).unwrap();
        let (amount_a, amount_b) =
            token_amounts_from_liquidity(10_000_000, current, lower, upper, false).unwrap();
        assert!(amount_a > 0);
        assert_eq!(amount_b, 0);
    }

    #[test]
    fn position_above_range_is_all_token_b() {
        let current = sqrt_price_from_tick_index(500).unwrap();
        let lower = sqrt_price_from_tick_index(-128).unwrap();
        let upper = sqrt_price_from_tick_index(0).unwrap();
        let (amount_a, amount_b) =
            token_amounts_from_liquidity(10_000_000, current, lower, upper, false).unwrap();
        assert_eq!(amount_a, 0);
        assert!(amount_b > 0);
    }

    #[test]
    fn position_in_range_splits_both() {
        let current = sqrt_price_from_tick_index(0).unwrap();
        let lower = sqrt_price_from_tick_index(-128).unwrap();
        let upper = sqrt_price_from_tick_index(128).unwrap();
        let (amount_a, amount_b) =
            token_amounts_from_liquidity(10_000_000, current, lower, upper, false).unwrap();
        assert!(amount_a > 0);
        assert!(amount_b > 0);
    }
}
