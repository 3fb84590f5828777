//! Fee and reward accrual quoting.
//!
//! Growth accumulators are monotone modulo u128 wraparound, so every
//! subtraction here is wrapping: the inside/outside decomposition and the
//! checkpoint deltas stay correct across counter wrap. Nothing is mutated;
//! persisting updated checkpoints is the on-chain program's job.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QuoteError, Result};
use crate::math::full_math::checked_mul_shift_right;
use crate::state::pool::{PoolSnapshot, NUM_REWARDS};
use crate::state::position::PositionSnapshot;
use crate::state::tick_array::TickSnapshot;
use crate::token_extension::{adjust_for_transfer_out, TokenExtensionContext};

/// Collectible fees for a position, net of transfer fees on the pool mints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectFeesQuote {
    pub fee_owed_a: u64,
    pub fee_owed_b: u64,
}

/// Collectible rewards per slot; `None` for uninitialized slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectRewardsQuote {
    pub rewards: [Option<u64>; NUM_REWARDS],
}

// Growth below/above a bound tick, by the initialization convention: an
// uninitialized lower bound contributes the whole global growth below, an
// uninitialized upper bound contributes nothing above.
fn growth_inside(
    tick_current_index: i32,
    tick_lower: &TickSnapshot,
    tick_lower_index: i32,
    tick_upper: &TickSnapshot,
    tick_upper_index: i32,
    growth_global: u128,
    lower_outside: u128,
    upper_outside: u128,
) -> u128 {
    let below = if !tick_lower.initialized {
        growth_global
    } else if tick_current_index < tick_lower_index {
        growth_global.wrapping_sub(lower_outside)
    } else {
        lower_outside
    };

    let above = if !tick_upper.initialized {
        0
    } else if tick_current_index < tick_upper_index {
        upper_outside
    } else {
        growth_global.wrapping_sub(upper_outside)
    };

    growth_global.wrapping_sub(below).wrapping_sub(above)
}

/// Fee growth inside the position's range for both tokens.
pub fn fee_growths_inside(
    tick_current_index: i32,
    tick_lower: &TickSnapshot,
    tick_lower_index: i32,
    tick_upper: &TickSnapshot,
    tick_upper_index: i32,
    fee_growth_global_a: u128,
    fee_growth_global_b: u128,
) -> (u128, u128) {
    let inside_a = growth_inside(
        tick_current_index,
        tick_lower,
        tick_lower_index,
        tick_upper,
        tick_upper_index,
        fee_growth_global_a,
        tick_lower.fee_growth_outside_a_x64,
        tick_upper.fee_growth_outside_a_x64,
    );
    let inside_b = growth_inside(
        tick_current_index,
        tick_lower,
        tick_lower_index,
        tick_upper,
        tick_upper_index,
        fee_growth_global_b,
        tick_lower.fee_growth_outside_b_x64,
        tick_upper.fee_growth_outside_b_x64,
    );
    (inside_a, inside_b)
}

/// Fees newly owed to the position since its last accrual checkpoint.
pub fn fee_owed_delta(
    position: &PositionSnapshot,
    tick_lower: &TickSnapshot,
    tick_upper: &TickSnapshot,
    tick_current_index: i32,
    fee_growth_global_a: u128,
    fee_growth_global_b: u128,
) -> Result<(u64, u64)> {
    let (inside_a, inside_b) = fee_growths_inside(
        tick_current_index,
        tick_lower,
        position.tick_lower_index,
        tick_upper,
        position.tick_upper_index,
        fee_growth_global_a,
        fee_growth_global_b,
    );
    let delta_a = inside_a.wrapping_sub(position.fee_growth_checkpoint_a_x64);
    let delta_b = inside_b.wrapping_sub(position.fee_growth_checkpoint_b_x64);
    Ok((
        checked_mul_shift_right(delta_a, position.liquidity)?,
        checked_mul_shift_right(delta_b, position.liquidity)?,
    ))
}

/// Projects each reward slot's global growth from the pool's last update to
/// `timestamp_now`. Growth never decreases: an uninitialized slot, zero
/// liquidity, or an overflowing projection contributes a zero delta.
pub fn next_reward_growths(
    pool: &PoolSnapshot,
    timestamp_now: u64,
) -> Result<[u128; NUM_REWARDS]> {
    if timestamp_now < pool.reward_last_updated_timestamp {
        return Err(QuoteError::InvalidTimestamp);
    }
    let time_delta = (timestamp_now - pool.reward_last_updated_timestamp) as u128;

    let mut growths = [0u128; NUM_REWARDS];
    for (i, reward) in pool.reward_infos.iter().enumerate() {
        let delta = if !reward.initialized() || pool.liquidity == 0 {
            0
        } else {
            time_delta
                .checked_mul(reward.emissions_per_second_x64)
                .map(|d| d / pool.liquidity)
                .unwrap_or(0)
        };
        growths[i] = reward.growth_global_x64.wrapping_add(delta);
    }
    Ok(growths)
}

/// Reward newly owed to the position in one slot since its checkpoint.
pub fn reward_owed_delta(
    position: &PositionSnapshot,
    tick_lower: &TickSnapshot,
    tick_upper: &TickSnapshot,
    tick_current_index: i32,
    reward_growth_global: u128,
    slot: usize,
) -> Result<u64> {
    let inside = growth_inside(
        tick_current_index,
        tick_lower,
        position.tick_lower_index,
        tick_upper,
        position.tick_upper_index,
        reward_growth_global,
        tick_lower.reward_growths_outside_x64[slot],
        tick_upper.reward_growths_outside_x64[slot],
    );
    let delta = inside.wrapping_sub(position.reward_infos[slot].growth_inside_checkpoint_x64);
    checked_mul_shift_right(delta, position.liquidity)
}

/// Quotes the fees a collect would transfer to the position owner right
/// now, net of transfer fees on the pool's mints.
pub fn collect_fees_quote(
    pool: &PoolSnapshot,
    position: &PositionSnapshot,
    tick_lower: &TickSnapshot,
    tick_upper: &TickSnapshot,
    extension_ctx: &TokenExtensionContext,
) -> Result<CollectFeesQuote> {
    position.validate(pool.tick_spacing)?;
    let (delta_a, delta_b) = fee_owed_delta(
        position,
        tick_lower,
        tick_upper,
        pool.tick_current_index,
        pool.fee_growth_global_a_x64,
        pool.fee_growth_global_b_x64,
    )?;
    let owed_a = position
        .fee_owed_a
        .checked_add(delta_a)
        .ok_or(QuoteError::AmountCalcOverflow)?;
    let owed_b = position
        .fee_owed_b
        .checked_add(delta_b)
        .ok_or(QuoteError::AmountCalcOverflow)?;

    let quote = CollectFeesQuote {
        fee_owed_a: adjust_for_transfer_out(owed_a, extension_ctx.transfer_fee_a.as_ref())?,
        fee_owed_b: adjust_for_transfer_out(owed_b, extension_ctx.transfer_fee_b.as_ref())?,
    };
    debug!(
        pool = %pool.address,
        fee_owed_a = quote.fee_owed_a,
        fee_owed_b = quote.fee_owed_b,
        "collect fees quote"
    );
    Ok(quote)
}

/// Quotes the rewards a collect would transfer to the position owner at
/// `timestamp_now`, net of transfer fees on each reward mint.
pub fn collect_rewards_quote(
    pool: &PoolSnapshot,
    position: &PositionSnapshot,
    tick_lower: &TickSnapshot,
    tick_upper: &TickSnapshot,
    timestamp_now: u64,
    extension_ctx: &TokenExtensionContext,
) -> Result<CollectRewardsQuote> {
    position.validate(pool.tick_spacing)?;
    let growths = next_reward_growths(pool, timestamp_now)?;

    let mut rewards = [None; NUM_REWARDS];
    for (slot, reward) in pool.reward_infos.iter().enumerate() {
        if !reward.initialized() {
            continue;
        }
        let delta = reward_owed_delta(
            position,
            tick_lower,
            tick_upper,
            pool.tick_current_index,
            growths[slot],
            slot,
        )?;
        let owed = position.reward_infos[slot]
            .amount_owed
            .checked_add(delta)
            .ok_or(QuoteError::AmountCalcOverflow)?;
        rewards[slot] = Some(adjust_for_transfer_out(
            owed,
            extension_ctx.reward_transfer_fees[slot].as_ref(),
        )?);
    }
    debug!(pool = %pool.address, ?rewards, "collect rewards quote");
    Ok(CollectRewardsQuote { rewards })
}
