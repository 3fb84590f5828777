//! Next sqrt price after consuming an amount of one token at fixed
//! liquidity. Rounding always favors the pool: the price never moves
//! further than the consumed amount strictly pays for.
use super::big_num::U256;
use super::fixed_point_64::RESOLUTION;
use super::full_math::div_round_up_u256;
use super::tick_math::{MAX_SQRT_PRICE_X64, MIN_SQRT_PRICE_X64};
use crate::error::{QuoteError, Result};

/// Dispatches on which token the amount is denominated in. The fixed token
/// is A when the trade direction and the specified side agree, B otherwise.
pub fn next_sqrt_price(
    sqrt_price: u128,
    liquidity: u128,
    amount: u64,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> Result<u128> {
    if amount_specified_is_input == a_to_b {
        next_sqrt_price_from_a_round_up(sqrt_price, liquidity, amount, amount_specified_is_input)
    } else {
        next_sqrt_price_from_b_round_down(sqrt_price, liquidity, amount, amount_specified_is_input)
    }
}

/// Price after a token A delta. Adding A pushes the price down, removing A
/// pulls it up:
///
/// new_price = (L * P << 64) / (L << 64 ± amount * P)
///
/// Always rounds up so the pool keeps the dust.
pub fn next_sqrt_price_from_a_round_up(
    sqrt_price: u128,
    liquidity: u128,
    amount: u64,
    amount_add: bool,
) -> Result<u128> {
    if amount == 0 {
        return Ok(sqrt_price);
    }

    let product = U256::from(amount) * U256::from(sqrt_price);
    let liquidity_shl = U256::from(liquidity) << RESOLUTION;
    let denominator = if amount_add {
        liquidity_shl + product
    } else {
        if product >= liquidity_shl {
            return Err(QuoteError::AmountCalcOverflow);
        }
        liquidity_shl - product
    };

    let lp = U256::from(liquidity) * U256::from(sqrt_price);
    if !(lp >> 192).is_zero() {
        return Err(QuoteError::MulDivOverflow);
    }
    let numerator = lp << RESOLUTION;

    let price = div_round_up_u256(numerator, denominator).try_into_u128()?;
    check_sqrt_price_bounds(price)?;
    Ok(price)
}

/// Price after a token B delta. Adding B pushes the price up, removing B
/// pulls it down:
///
/// new_price = P ± (amount << 64) / L
///
/// The delta truncates when adding and rounds up when removing, so the pool
/// is never over-credited.
pub fn next_sqrt_price_from_b_round_down(
    sqrt_price: u128,
    liquidity: u128,
    amount: u64,
    amount_add: bool,
) -> Result<u128> {
    if liquidity == 0 {
        return Err(QuoteError::MulDivOverflow);
    }
    let amount_x64 = U256::from(amount) << RESOLUTION;

    let delta = if amount_add {
        (amount_x64 / U256::from(liquidity)).try_into_u128()?
    } else {
        div_round_up_u256(amount_x64, U256::from(liquidity)).try_into_u128()?
    };

    let price = if amount_add {
        sqrt_price
            .checked_add(delta)
            .ok_or(QuoteError::SqrtPriceOutOfBounds)?
    } else {
        sqrt_price
            .checked_sub(delta)
            .ok_or(QuoteError::SqrtPriceOutOfBounds)?
    };
    check_sqrt_price_bounds(price)?;
    Ok(price)
}

fn check_sqrt_price_bounds(sqrt_price: u128) -> Result<()> {
    if !(MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&sqrt_price) {
        return Err(QuoteError::SqrtPriceOutOfBounds);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::liquidity_math::get_amount_delta_a;

    const P1: u128 = 1u128 << 64; // price 1.0

    #[test]
    fn zero_amount_is_identity() {
        assert_eq!(
            next_sqrt_price_from_a_round_up(P1, 1_000_000, 0, true).unwrap(),
            P1
        );
    }

    #[test]
    fn adding_a_moves_price_down() {
        let next = next_sqrt_price_from_a_round_up(P1, 10_000_000, 50_000, true).unwrap();
        assert!(next < P1);
    }

    #[test]
    fn adding_b_moves_price_up() {
        let next = next_sqrt_price_from_b_round_down(P1, 10_000_000, 50_000, true).unwrap();
        assert!(next > P1);
    }

    #[test]
    fn price_move_is_consistent_with_amount_delta() {
        // the amount needed to move back over the traversed interval must
        // not exceed what was put in (pool-favoring rounding)
        let liquidity = 10_000_000u128;
        let amount_in = 50_000u64;
        let next = next_sqrt_price_from_a_round_up(P1, liquidity, amount_in, true).unwrap();
        let consumed = get_amount_delta_a(next, P1, liquidity, true).unwrap();
        assert!(consumed <= amount_in + 1);
        assert!(consumed + 1 >= amount_in);
    }

    #[test]
    fn removing_more_b_than_reserves_fails() {
        // draining B at tiny liquidity pushes the price below the floor
        assert!(next_sqrt_price_from_b_round_down(P1, 1, u64::MAX, false).is_err());
    }
}
