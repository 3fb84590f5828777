use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use super::account_data::AccountReader;
use crate::error::{QuoteError, Result};
use crate::state::pool::NUM_REWARDS;

/// Immutable read of a liquidity position's accrual state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub whirlpool: Pubkey,
    pub liquidity: u128,
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
    /// Fee growth inside the range at the last accrual, Q64.64
    pub fee_growth_checkpoint_a_x64: u128,
    pub fee_growth_checkpoint_b_x64: u128,
    /// Fees collectible as of the last accrual
    pub fee_owed_a: u64,
    pub fee_owed_b: u64,
    pub reward_infos: [PositionRewardSnapshot; NUM_REWARDS],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRewardSnapshot {
    /// Reward growth inside the range at the last accrual, Q64.64
    pub growth_inside_checkpoint_x64: u128,
    pub amount_owed: u64,
}

impl PositionSnapshot {
    /// Bounds must be ordered, on the spacing grid, and inside the protocol
    /// tick range.
    pub fn validate(&self, tick_spacing: u16) -> Result<()> {
        if self.tick_lower_index >= self.tick_upper_index {
            return Err(QuoteError::InvalidTickRange);
        }
        let spacing = tick_spacing as i32;
        if self.tick_lower_index % spacing != 0 || self.tick_upper_index % spacing != 0 {
            return Err(QuoteError::InvalidTickRange);
        }
        Ok(())
    }

    /// Decodes a snapshot from raw position account data.
    pub fn from_account_data(data: &[u8]) -> Result<Self> {
        let mut reader = AccountReader::new(data)?;
        let whirlpool = reader.read_pubkey()?;
        reader.read_pubkey()?; // position_mint
        let liquidity = reader.read_u128()?;
        let tick_lower_index = reader.read_i32()?;
        let tick_upper_index = reader.read_i32()?;
        let fee_growth_checkpoint_a_x64 = reader.read_u128()?;
        let fee_owed_a = reader.read_u64()?;
        let fee_growth_checkpoint_b_x64 = reader.read_u128()?;
        let fee_owed_b = reader.read_u64()?;
        let mut reward_infos = [PositionRewardSnapshot::default(); NUM_REWARDS];
        for slot in reward_infos.iter_mut() {
            let growth_inside_checkpoint_x64 = reader.read_u128()?;
            let amount_owed = reader.read_u64()?;
            *slot = PositionRewardSnapshot { growth_inside_checkpoint_x64, amount_owed };
        }
        Ok(Self {
            whirlpool,
            liquidity,
            tick_lower_index,
            tick_upper_index,
            fee_growth_checkpoint_a_x64,
            fee_growth_checkpoint_b_x64,
            fee_owed_a,
            fee_owed_b,
            reward_infos,
        })
    }
}
