//! One step of the swap loop: consume as much of the remaining amount as
//! the current liquidity allows before the target price, and price the fee.
use super::full_math::MulDiv;
use super::liquidity_math::{get_amount_delta_a, get_amount_delta_b};
use super::sqrt_price_math::next_sqrt_price;
use crate::error::{QuoteError, Result};

/// Fee rate denominator: rates are expressed in hundredths of a basis point.
pub const FEE_RATE_MUL_VALUE: u64 = 1_000_000;

/// Result of a single swap step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapStepComputation {
    /// Price after this step, never past the target
    pub next_sqrt_price: u128,
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee_amount: u64,
}

/// Computes the result of swapping up to `amount_remaining` within
/// `[sqrt_price_current, sqrt_price_target]` at fixed liquidity.
///
/// The "fixed" side is the token the specified amount is denominated in; the
/// other side is derived from the realized price move. For exact-in the fee
/// is peeled off before the price move; a step that stops short of the
/// target grants the input dust to the fee.
pub fn compute_swap_step(
    amount_remaining: u64,
    fee_rate: u16,
    liquidity: u128,
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> Result<SwapStepComputation> {
    // The fixed-side amount needed to reach the target outright. Overflowing
    // u64 here just means the target is unreachable in one step.
    let mut amount_fixed_delta = try_get_amount_fixed_delta(
        sqrt_price_current,
        sqrt_price_target,
        liquidity,
        amount_specified_is_input,
        a_to_b,
    )?;

    let amount_calc = if amount_specified_is_input {
        amount_remaining.mul_div_floor(
            FEE_RATE_MUL_VALUE - fee_rate as u64,
            FEE_RATE_MUL_VALUE,
        )?
    } else {
        amount_remaining
    };

    let next_price = match amount_fixed_delta {
        Some(fixed) if amount_calc >= fixed => sqrt_price_target,
        _ => next_sqrt_price(
            sqrt_price_current,
            liquidity,
            amount_calc,
            amount_specified_is_input,
            a_to_b,
        )?,
    };

    let is_max_swap = next_price == sqrt_price_target;

    let amount_unfixed_delta = get_amount_unfixed_delta(
        sqrt_price_current,
        next_price,
        liquidity,
        amount_specified_is_input,
        a_to_b,
    )?;

    // If the target was not reached, the fixed amount must be re-derived
    // from the price actually realized.
    if !is_max_swap || amount_fixed_delta.is_none() {
        amount_fixed_delta = Some(get_amount_fixed_delta(
            sqrt_price_current,
            next_price,
            liquidity,
            amount_specified_is_input,
            a_to_b,
        )?);
    }

    let fixed = amount_fixed_delta.unwrap_or_default();
    let (amount_in, mut amount_out) = if amount_specified_is_input {
        (fixed, amount_unfixed_delta)
    } else {
        (amount_unfixed_delta, fixed)
    };

    // Never quote more output than the request still wants.
    if !amount_specified_is_input && amount_out > amount_remaining {
        amount_out = amount_remaining;
    }

    let fee_amount = if amount_specified_is_input && !is_max_swap {
        // stopped inside the interval: the whole remainder is consumed, the
        // part above amount_in is the fee (swap dust included)
        amount_remaining - amount_in
    } else {
        amount_in.mul_div_ceil(fee_rate as u64, FEE_RATE_MUL_VALUE - fee_rate as u64)?
    };

    Ok(SwapStepComputation {
        next_sqrt_price: next_price,
        amount_in,
        amount_out,
        fee_amount,
    })
}

fn try_get_amount_fixed_delta(
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    liquidity: u128,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> Result<Option<u64>> {
    match get_amount_fixed_delta(
        sqrt_price_current,
        sqrt_price_target,
        liquidity,
        amount_specified_is_input,
        a_to_b,
    ) {
        Ok(fixed) => Ok(Some(fixed)),
        Err(QuoteError::AmountCalcOverflow) => Ok(None),
        Err(e) => Err(e),
    }
}

fn get_amount_fixed_delta(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> Result<u64> {
    if a_to_b == amount_specified_is_input {
        get_amount_delta_a(sqrt_price_0, sqrt_price_1, liquidity, amount_specified_is_input)
    } else {
        get_amount_delta_b(sqrt_price_0, sqrt_price_1, liquidity, amount_specified_is_input)
    }
}

fn get_amount_unfixed_delta(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> Result<u64> {
    if a_to_b == amount_specified_is_input {
        get_amount_delta_b(sqrt_price_0, sqrt_price_1, liquidity, !amount_specified_is_input)
    } else {
        get_amount_delta_a(sqrt_price_0, sqrt_price_1, liquidity, !amount_specified_is_input)
    }
}
