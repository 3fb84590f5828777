//! Deposit and withdrawal quotes for a liquidity range.
//!
//! Rounding and slippage always protect the protocol first and the caller
//! second: deposits round token amounts up and widen them further, while
//! withdrawals truncate and shrink the promised minimums.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QuoteError, Result};
use crate::math::full_math::MulDiv;
use crate::math::liquidity_math::token_amounts_from_liquidity;
use crate::math::tick_math::sqrt_price_from_tick_index;
use crate::state::pool::PoolSnapshot;
use crate::token_extension::{
    adjust_for_transfer_out, amount_with_transfer_fee, TokenExtensionContext,
};

const SLIPPAGE_DENOMINATOR: u64 = 10_000;

/// Quote for adding liquidity: what the deposit is expected to cost, and
/// the most it may cost within the slippage tolerance. Amounts are
/// user-side, grossed up for transfer fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncreaseLiquidityQuote {
    pub liquidity_delta: u128,
    pub token_est_a: u64,
    pub token_est_b: u64,
    pub token_max_a: u64,
    pub token_max_b: u64,
}

/// Quote for removing liquidity: what the withdrawal is expected to return,
/// and the least it may return within the slippage tolerance. Amounts are
/// user-side, net of transfer fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecreaseLiquidityQuote {
    pub liquidity_delta: u128,
    pub token_est_a: u64,
    pub token_est_b: u64,
    pub token_min_a: u64,
    pub token_min_b: u64,
}

fn range_sqrt_prices(
    pool: &PoolSnapshot,
    tick_lower_index: i32,
    tick_upper_index: i32,
) -> Result<(u128, u128)> {
    if tick_lower_index >= tick_upper_index {
        return Err(QuoteError::InvalidTickRange);
    }
    let spacing = pool.tick_spacing as i32;
    if tick_lower_index % spacing != 0 || tick_upper_index % spacing != 0 {
        return Err(QuoteError::InvalidTickRange);
    }
    let lower = sqrt_price_from_tick_index(tick_lower_index)?;
    let upper = sqrt_price_from_tick_index(tick_upper_index)?;
    Ok((lower, upper))
}

/// Quotes the token amounts required to deposit `liquidity_delta` into the
/// given range at the pool's current price.
pub fn increase_liquidity_quote_by_liquidity(
    liquidity_delta: u128,
    pool: &PoolSnapshot,
    tick_lower_index: i32,
    tick_upper_index: i32,
    slippage_bps: u16,
    extension_ctx: &TokenExtensionContext,
) -> Result<IncreaseLiquidityQuote> {
    pool.validate()?;
    let (lower, upper) = range_sqrt_prices(pool, tick_lower_index, tick_upper_index)?;

    // owed to the pool: round up
    let (est_a, est_b) = token_amounts_from_liquidity(
        liquidity_delta,
        pool.sqrt_price_x64,
        lower,
        upper,
        true,
    )?;

    let widen = |amount: u64| {
        amount.mul_div_ceil(SLIPPAGE_DENOMINATOR + slippage_bps as u64, SLIPPAGE_DENOMINATOR)
    };
    let max_a = widen(est_a)?;
    let max_b = widen(est_b)?;

    let fee_a = extension_ctx.transfer_fee_a.as_ref();
    let fee_b = extension_ctx.transfer_fee_b.as_ref();
    let quote = IncreaseLiquidityQuote {
        liquidity_delta,
        token_est_a: amount_with_transfer_fee(est_a, fee_a)?,
        token_est_b: amount_with_transfer_fee(est_b, fee_b)?,
        token_max_a: amount_with_transfer_fee(max_a, fee_a)?,
        token_max_b: amount_with_transfer_fee(max_b, fee_b)?,
    };
    debug!(
        pool = %pool.address,
        liquidity = liquidity_delta,
        token_est_a = quote.token_est_a,
        token_est_b = quote.token_est_b,
        "increase liquidity quote"
    );
    Ok(quote)
}

/// Quotes the token amounts returned by withdrawing `liquidity_delta` from
/// the given range at the pool's current price.
pub fn decrease_liquidity_quote_by_liquidity(
    liquidity_delta: u128,
    pool: &PoolSnapshot,
    tick_lower_index: i32,
    tick_upper_index: i32,
    slippage_bps: u16,
    extension_ctx: &TokenExtensionContext,
) -> Result<DecreaseLiquidityQuote> {
    pool.validate()?;
    let (lower, upper) = range_sqrt_prices(pool, tick_lower_index, tick_upper_index)?;

    // owed to the user: truncate
    let (est_a, est_b) = token_amounts_from_liquidity(
        liquidity_delta,
        pool.sqrt_price_x64,
        lower,
        upper,
        false,
    )?;

    let narrow = |amount: u64| {
        amount.mul_div_floor(SLIPPAGE_DENOMINATOR - slippage_bps as u64, SLIPPAGE_DENOMINATOR)
    };
    let min_a = narrow(est_a)?;
    let min_b = narrow(est_b)?;

    let fee_a = extension_ctx.transfer_fee_a.as_ref();
    let fee_b = extension_ctx.transfer_fee_b.as_ref();
    let quote = DecreaseLiquidityQuote {
        liquidity_delta,
        token_est_a: adjust_for_transfer_out(est_a, fee_a)?,
        token_est_b: adjust_for_transfer_out(est_b, fee_b)?,
        token_min_a: adjust_for_transfer_out(min_a, fee_a)?,
        token_min_b: adjust_for_transfer_out(min_b, fee_b)?,
    };
    debug!(
        pool = %pool.address,
        liquidity = liquidity_delta,
        token_est_a = quote.token_est_a,
        token_est_b = quote.token_est_b,
        "decrease liquidity quote"
    );
    Ok(quote)
}
