//! Single-hop swap quoting: the tick-by-tick simulation of the on-chain
//! swap instruction, plus transfer-fee and slippage adjustment around it.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::error::{QuoteError, Result};
use crate::math::full_math::MulDiv;
use crate::math::liquidity_math::add_liquidity_delta;
use crate::math::swap_math::compute_swap_step;
use crate::math::tick_math::{
    sqrt_price_from_tick_index, tick_index_from_sqrt_price, MAX_SQRT_PRICE_X64,
    MIN_SQRT_PRICE_X64,
};
use crate::state::pool::PoolSnapshot;
use crate::state::tick_array::TickArraySnapshot;
use crate::tick_sequence::TickArraySequence;
use crate::token_extension::{
    adjust_for_transfer_in, adjust_for_transfer_out, amount_with_transfer_fee,
    TokenExtensionContext,
};

/// Sentinel limit: swap to the protocol's price bound for the direction.
pub const NO_EXPLICIT_SQRT_PRICE_LIMIT: u128 = 0;

/// Protocol fee rate denominator (basis points)
pub const PROTOCOL_FEE_RATE_MUL_VALUE: u64 = 10_000;

const SLIPPAGE_DENOMINATOR: u64 = 10_000;

/// Parameters of one simulated swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    /// Input amount (`amount_specified_is_input`) or output amount otherwise
    pub amount: u64,
    pub amount_specified_is_input: bool,
    /// True when swapping token A for token B
    pub a_to_b: bool,
    /// Worst acceptable sqrt price, or [`NO_EXPLICIT_SQRT_PRICE_LIMIT`]
    pub sqrt_price_limit_x64: u128,
}

/// A fully computed swap quote. Amounts are user-side: what leaves the
/// user's account going in and what lands in it coming out, net of any
/// transfer fees on the mints involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub pool: Pubkey,
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub a_to_b: bool,
    pub amount_specified_is_input: bool,
    pub estimated_amount_in: u64,
    pub estimated_amount_out: u64,
    pub estimated_end_sqrt_price_x64: u128,
    pub estimated_end_tick_index: i32,
    /// Total swap fee paid to the pool, input-token units
    pub estimated_fee_amount: u64,
    /// Portion of the fee owed to the protocol
    pub estimated_protocol_fee_amount: u64,
    pub ticks_crossed: u32,
    /// Slippage-widened bound on the unspecified amount: minimum output for
    /// exact-in, maximum input for exact-out
    pub other_amount_threshold: u64,
}

// Pool-side outcome of the simulation loop, before transfer-fee adjustment.
struct PostSwapUpdate {
    amount_in: u64,
    amount_out: u64,
    next_sqrt_price: u128,
    next_tick_index: i32,
    fee_amount: u64,
    protocol_fee_amount: u64,
    ticks_crossed: u32,
}

/// Produces a swap quote against a pool snapshot and its tick arrays.
///
/// Validation order is deterministic: pool invariants, amount, limit
/// bounds, limit direction, then sequence construction. `slippage_bps`
/// widens the quoted threshold in the caller-protective direction.
pub fn swap_quote(
    request: &SwapRequest,
    pool: &PoolSnapshot,
    tick_arrays: &[TickArraySnapshot],
    extension_ctx: &TokenExtensionContext,
    slippage_bps: u16,
) -> Result<SwapQuote> {
    pool.validate()?;
    if request.amount == 0 {
        return Err(QuoteError::ZeroTradableAmount);
    }

    let a_to_b = request.a_to_b;
    let no_explicit_limit = request.sqrt_price_limit_x64 == NO_EXPLICIT_SQRT_PRICE_LIMIT;
    let sqrt_price_limit = if no_explicit_limit {
        if a_to_b {
            MIN_SQRT_PRICE_X64
        } else {
            MAX_SQRT_PRICE_X64
        }
    } else {
        request.sqrt_price_limit_x64
    };

    if !(MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&sqrt_price_limit) {
        return Err(QuoteError::SqrtPriceOutOfBounds);
    }
    if (a_to_b && sqrt_price_limit > pool.sqrt_price_x64)
        || (!a_to_b && sqrt_price_limit < pool.sqrt_price_x64)
    {
        return Err(QuoteError::InvalidSqrtPriceLimitDirection);
    }

    let sequence = TickArraySequence::new(
        tick_arrays,
        &pool.address,
        pool.tick_spacing,
        a_to_b,
        pool.tick_current_index,
    )?;

    let input_fee = extension_ctx.input_transfer_fee(a_to_b);
    let output_fee = extension_ctx.output_transfer_fee(a_to_b);

    // The pool's math runs on pool-side amounts. Exact-in nets the user's
    // input down by its transfer fee; exact-out grosses the requested
    // output up so the user still receives the full amount after the fee.
    let pool_side_amount = if request.amount_specified_is_input {
        adjust_for_transfer_in(request.amount, input_fee)?
    } else {
        amount_with_transfer_fee(request.amount, output_fee)?
    };

    let update = simulate_swap(
        pool,
        &sequence,
        pool_side_amount,
        sqrt_price_limit,
        no_explicit_limit,
        request.amount_specified_is_input,
        a_to_b,
    )?;

    let estimated_amount_in = amount_with_transfer_fee(update.amount_in, input_fee)?;
    // The gross-up/net round trip can overshoot the requested output by a
    // rounding unit; the user is never promised more than they asked for.
    let estimated_amount_out = if request.amount_specified_is_input {
        adjust_for_transfer_out(update.amount_out, output_fee)?
    } else {
        adjust_for_transfer_out(update.amount_out, output_fee)?.min(request.amount)
    };

    let other_amount_threshold = if request.amount_specified_is_input {
        estimated_amount_out
            .mul_div_floor(SLIPPAGE_DENOMINATOR - slippage_bps as u64, SLIPPAGE_DENOMINATOR)?
    } else {
        estimated_amount_in
            .mul_div_ceil(SLIPPAGE_DENOMINATOR + slippage_bps as u64, SLIPPAGE_DENOMINATOR)?
    };

    let (input_mint, output_mint) = if a_to_b {
        (pool.token_mint_a, pool.token_mint_b)
    } else {
        (pool.token_mint_b, pool.token_mint_a)
    };

    debug!(
        pool = %pool.address,
        amount_in = estimated_amount_in,
        amount_out = estimated_amount_out,
        ticks_crossed = update.ticks_crossed,
        "swap quote"
    );

    Ok(SwapQuote {
        pool: pool.address,
        input_mint,
        output_mint,
        a_to_b,
        amount_specified_is_input: request.amount_specified_is_input,
        estimated_amount_in,
        estimated_amount_out,
        estimated_end_sqrt_price_x64: update.next_sqrt_price,
        estimated_end_tick_index: update.next_tick_index,
        estimated_fee_amount: update.fee_amount,
        estimated_protocol_fee_amount: update.protocol_fee_amount,
        ticks_crossed: update.ticks_crossed,
        other_amount_threshold,
    })
}

// The tick-by-tick loop. Mirrors the on-chain swap step for step: each
// iteration swaps within the current liquidity region up to the nearer of
// the next bounding tick and the price limit, then crosses the tick if it
// was reached and is initialized.
fn simulate_swap(
    pool: &PoolSnapshot,
    sequence: &TickArraySequence<'_>,
    amount: u64,
    sqrt_price_limit: u128,
    no_explicit_limit: bool,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> Result<PostSwapUpdate> {
    let mut amount_remaining = amount;
    let mut amount_calculated: u64 = 0;
    let mut curr_sqrt_price = pool.sqrt_price_x64;
    let mut curr_tick_index = pool.tick_current_index;
    let mut curr_liquidity = pool.liquidity;
    let mut fee_amount: u64 = 0;
    let mut protocol_fee_amount: u64 = 0;
    let mut ticks_crossed: u32 = 0;

    while amount_remaining > 0 && curr_sqrt_price != sqrt_price_limit {
        let next = match sequence.next_initialized_tick(curr_tick_index) {
            Ok(next) => next,
            Err(QuoteError::TickArraySequenceInvalidIndex) => {
                // ran out of supplied arrays mid-trade
                if !amount_specified_is_input && no_explicit_limit {
                    return Err(QuoteError::PartialFillError);
                }
                return Err(QuoteError::TickArraySequenceInvalidIndex);
            }
            Err(e) => return Err(e),
        };

        let next_tick_sqrt_price = sqrt_price_from_tick_index(next.tick_index)?;
        let sqrt_price_target = if a_to_b {
            next_tick_sqrt_price.max(sqrt_price_limit)
        } else {
            next_tick_sqrt_price.min(sqrt_price_limit)
        };

        let step = compute_swap_step(
            amount_remaining,
            pool.fee_rate,
            curr_liquidity,
            curr_sqrt_price,
            sqrt_price_target,
            amount_specified_is_input,
            a_to_b,
        )?;

        if amount_specified_is_input {
            amount_remaining = amount_remaining
                .checked_sub(step.amount_in)
                .and_then(|r| r.checked_sub(step.fee_amount))
                .ok_or(QuoteError::AmountRemainingOverflow)?;
            amount_calculated = amount_calculated
                .checked_add(step.amount_out)
                .ok_or(QuoteError::AmountCalcOverflow)?;
        } else {
            amount_remaining = amount_remaining
                .checked_sub(step.amount_out)
                .ok_or(QuoteError::AmountRemainingOverflow)?;
            amount_calculated = amount_calculated
                .checked_add(step.amount_in)
                .and_then(|r| r.checked_add(step.fee_amount))
                .ok_or(QuoteError::AmountCalcOverflow)?;
        }

        fee_amount = fee_amount
            .checked_add(step.fee_amount)
            .ok_or(QuoteError::AmountCalcOverflow)?;
        if pool.protocol_fee_rate > 0 {
            let delta = step
                .fee_amount
                .mul_div_floor(pool.protocol_fee_rate as u64, PROTOCOL_FEE_RATE_MUL_VALUE)?;
            protocol_fee_amount = protocol_fee_amount
                .checked_add(delta)
                .ok_or(QuoteError::AmountCalcOverflow)?;
        }

        if step.next_sqrt_price == next_tick_sqrt_price {
            if let Some(tick) = next.tick {
                let liquidity_delta = if a_to_b {
                    tick.liquidity_net
                        .checked_neg()
                        .ok_or(QuoteError::LiquidityOverflow)?
                } else {
                    tick.liquidity_net
                };
                curr_liquidity = add_liquidity_delta(curr_liquidity, liquidity_delta)?;
                ticks_crossed += 1;
            }
            // the A->B search is inclusive of the current index, so step
            // past the crossed tick on that side
            curr_tick_index = if a_to_b {
                next.tick_index - 1
            } else {
                next.tick_index
            };
        } else if step.next_sqrt_price != curr_sqrt_price {
            curr_tick_index = tick_index_from_sqrt_price(step.next_sqrt_price)?;
        }

        curr_sqrt_price = step.next_sqrt_price;
    }

    // Exact-out quotes without an explicit limit are all-or-nothing.
    if amount_remaining > 0 && !amount_specified_is_input && no_explicit_limit {
        return Err(QuoteError::PartialFillError);
    }

    let amount_specified_consumed = amount - amount_remaining;
    let (amount_in, amount_out) = if amount_specified_is_input {
        (amount_specified_consumed, amount_calculated)
    } else {
        (amount_calculated, amount_specified_consumed)
    };

    Ok(PostSwapUpdate {
        amount_in,
        amount_out,
        next_sqrt_price: curr_sqrt_price,
        next_tick_index: curr_tick_index,
        fee_amount,
        protocol_fee_amount,
        ticks_crossed,
    })
}
