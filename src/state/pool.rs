use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use super::account_data::AccountReader;
use crate::error::{QuoteError, Result};
use crate::math::tick_math::{sqrt_price_from_tick_index, tick_index_from_sqrt_price};

/// Number of reward slots per pool
pub const NUM_REWARDS: usize = 3;

/// Immutable read of on-chain pool state at a point in time.
///
/// The quote engine consumes this by value and never mutates it; refreshing
/// it between quotes is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Address of the whirlpool account this snapshot was read from
    pub address: Pubkey,

    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
    pub token_decimals_a: u8,
    pub token_decimals_b: u8,

    /// The minimum number of ticks between initialized ticks
    pub tick_spacing: u16,
    /// Swap fee rate in hundredths of a basis point
    pub fee_rate: u16,
    /// Portion of the swap fee taken by the protocol, in basis points
    pub protocol_fee_rate: u16,

    /// The currently in-range liquidity
    pub liquidity: u128,
    /// Current sqrt(price) as a Q64.64, token B per token A
    pub sqrt_price_x64: u128,
    /// Current tick, per the last tick transition that was run
    pub tick_current_index: i32,

    /// Fees of token A/B collected per unit of liquidity over the pool's
    /// life, Q64.64, wrapping
    pub fee_growth_global_a_x64: u128,
    pub fee_growth_global_b_x64: u128,

    pub reward_last_updated_timestamp: u64,
    pub reward_infos: [RewardInfoSnapshot; NUM_REWARDS],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardInfoSnapshot {
    /// Reward token mint; the default key marks an uninitialized slot
    pub mint: Pubkey,
    /// Tokens emitted per second per unit of liquidity, Q64.64
    pub emissions_per_second_x64: u128,
    /// Tokens earned per unit of liquidity since emissions began, Q64.64
    pub growth_global_x64: u128,
}

impl RewardInfoSnapshot {
    /// Once initialized, a reward slot cannot transition back.
    pub fn initialized(&self) -> bool {
        self.mint != Pubkey::default()
    }
}

impl PoolSnapshot {
    /// Checks the snapshot's internal invariants before it is quoted
    /// against: positive tick spacing, and a sqrt price that lies within
    /// the current tick's range.
    pub fn validate(&self) -> Result<()> {
        if self.tick_spacing == 0 {
            return Err(QuoteError::InvalidTickSpacing);
        }
        let derived_tick = tick_index_from_sqrt_price(self.sqrt_price_x64)?;
        // the stored tick lags the price by at most one tick transition
        if derived_tick != self.tick_current_index {
            let lower = sqrt_price_from_tick_index(self.tick_current_index)?;
            let upper = sqrt_price_from_tick_index(self.tick_current_index + 1)?;
            if !(lower..=upper).contains(&self.sqrt_price_x64) {
                return Err(QuoteError::SqrtPriceOutOfBounds);
            }
        }
        Ok(())
    }
}

impl PoolSnapshot {
    /// Decodes a snapshot from raw whirlpool account data, walking the
    /// on-chain field order behind the 8-byte discriminator. Token decimals
    /// live on the mints, not the pool, so they are supplied by the caller.
    pub fn from_account_data(
        address: Pubkey,
        data: &[u8],
        token_decimals_a: u8,
        token_decimals_b: u8,
    ) -> Result<Self> {
        let mut reader = AccountReader::new(data)?;
        reader.read_pubkey()?; // whirlpools_config
        reader.skip(1)?; // bump
        let tick_spacing = reader.read_u16()?;
        reader.skip(2)?; // tick_spacing_seed
        let fee_rate = reader.read_u16()?;
        let protocol_fee_rate = reader.read_u16()?;
        let liquidity = reader.read_u128()?;
        let sqrt_price_x64 = reader.read_u128()?;
        let tick_current_index = reader.read_i32()?;
        reader.read_u64()?; // protocol_fee_owed_a
        reader.read_u64()?; // protocol_fee_owed_b
        let token_mint_a = reader.read_pubkey()?;
        reader.read_pubkey()?; // token_vault_a
        let fee_growth_global_a_x64 = reader.read_u128()?;
        let token_mint_b = reader.read_pubkey()?;
        reader.read_pubkey()?; // token_vault_b
        let fee_growth_global_b_x64 = reader.read_u128()?;
        let reward_last_updated_timestamp = reader.read_u64()?;

        let mut reward_infos = [RewardInfoSnapshot::default(); NUM_REWARDS];
        for slot in reward_infos.iter_mut() {
            let mint = reader.read_pubkey()?;
            reader.read_pubkey()?; // vault
            reader.read_pubkey()?; // authority
            let emissions_per_second_x64 = reader.read_u128()?;
            let growth_global_x64 = reader.read_u128()?;
            *slot = RewardInfoSnapshot { mint, emissions_per_second_x64, growth_global_x64 };
        }

        Ok(Self {
            address,
            token_mint_a,
            token_mint_b,
            token_decimals_a,
            token_decimals_b,
            tick_spacing,
            fee_rate,
            protocol_fee_rate,
            liquidity,
            sqrt_price_x64,
            tick_current_index,
            fee_growth_global_a_x64,
            fee_growth_global_b_x64,
            reward_last_updated_timestamp,
            reward_infos,
        })
    }
}
