use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use super::account_data::AccountReader;
use crate::error::{QuoteError, Result};
use crate::state::pool::NUM_REWARDS;

/// Number of tick records held by one tick-array account
pub const TICK_ARRAY_SIZE: usize = 88;

/// One tick record inside a tick array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub initialized: bool,
    /// Change applied to the pool's active liquidity when the price crosses
    /// this tick moving left to right
    pub liquidity_net: i128,
    /// Total liquidity referencing this tick from either side
    pub liquidity_gross: u128,
    pub fee_growth_outside_a_x64: u128,
    pub fee_growth_outside_b_x64: u128,
    pub reward_growths_outside_x64: [u128; NUM_REWARDS],
}

/// A contiguous block of tick records starting at an aligned tick index.
///
/// Covers `[start_tick_index, start_tick_index + tick_spacing * 88)`; ticks
/// outside that range are simply not in this account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickArraySnapshot {
    /// The whirlpool this array belongs to
    pub whirlpool: Pubkey,
    /// First tick index covered; always a multiple of tick_spacing * 88
    pub start_tick_index: i32,
    /// Exactly [`TICK_ARRAY_SIZE`] records, one per tick_spacing step
    pub ticks: Vec<TickSnapshot>,
}

impl TickArraySnapshot {
    /// Number of tick indices one array spans at the given spacing.
    pub fn span(tick_spacing: u16) -> i32 {
        TICK_ARRAY_SIZE as i32 * tick_spacing as i32
    }

    /// The aligned start index of the array that covers `tick`.
    pub fn start_index_for(tick: i32, tick_spacing: u16) -> i32 {
        let span = Self::span(tick_spacing);
        tick.div_euclid(span) * span
    }

    pub fn is_valid_start_index(start_tick_index: i32, tick_spacing: u16) -> bool {
        start_tick_index % Self::span(tick_spacing) == 0
    }

    /// Range containment against this array's covered tick indices.
    pub fn contains_tick(&self, tick: i32, tick_spacing: u16) -> bool {
        tick >= self.start_tick_index && tick < self.start_tick_index + Self::span(tick_spacing)
    }

    /// Offset of `tick` inside this array, or an error when the tick is
    /// outside the array or off the spacing grid.
    pub fn tick_offset(&self, tick: i32, tick_spacing: u16) -> Result<usize> {
        if !self.contains_tick(tick, tick_spacing) {
            return Err(QuoteError::TickArraySequenceInvalidIndex);
        }
        let delta = tick - self.start_tick_index;
        if delta % tick_spacing as i32 != 0 {
            return Err(QuoteError::TickArraySequenceInvalidIndex);
        }
        Ok((delta / tick_spacing as i32) as usize)
    }

    pub fn tick(&self, tick: i32, tick_spacing: u16) -> Result<&TickSnapshot> {
        let offset = self.tick_offset(tick, tick_spacing)?;
        self.ticks
            .get(offset)
            .ok_or(QuoteError::TickArraySequenceInvalidIndex)
    }

    /// Decodes a snapshot from raw tick-array account data.
    pub fn from_account_data(data: &[u8]) -> Result<Self> {
        let mut reader = AccountReader::new(data)?;
        let start_tick_index = reader.read_i32()?;
        let mut ticks = Vec::with_capacity(TICK_ARRAY_SIZE);
        for _ in 0..TICK_ARRAY_SIZE {
            let initialized = reader.read_bool()?;
            let liquidity_net = reader.read_i128()?;
            let liquidity_gross = reader.read_u128()?;
            let fee_growth_outside_a_x64 = reader.read_u128()?;
            let fee_growth_outside_b_x64 = reader.read_u128()?;
            let mut reward_growths_outside_x64 = [0u128; NUM_REWARDS];
            for growth in reward_growths_outside_x64.iter_mut() {
                *growth = reader.read_u128()?;
            }
            ticks.push(TickSnapshot {
                initialized,
                liquidity_net,
                liquidity_gross,
                fee_growth_outside_a_x64,
                fee_growth_outside_b_x64,
                reward_growths_outside_x64,
            });
        }
        let whirlpool = reader.read_pubkey()?;
        Ok(Self { whirlpool, start_tick_index, ticks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_account_with_trailing_whirlpool_key() {
        let whirlpool = Pubkey::new_unique();
        let mut data = vec![0u8; 8];
        data.extend_from_slice(&(-704i32).to_le_bytes());
        for i in 0..TICK_ARRAY_SIZE {
            data.push((i == 3) as u8); // initialized
            data.extend_from_slice(&(if i == 3 { 42i128 } else { 0 }).to_le_bytes());
            data.extend_from_slice(&0u128.to_le_bytes()); // liquidity_gross
            data.extend_from_slice(&0u128.to_le_bytes()); // fee_growth_outside_a
            data.extend_from_slice(&0u128.to_le_bytes()); // fee_growth_outside_b
            for _ in 0..NUM_REWARDS {
                data.extend_from_slice(&0u128.to_le_bytes());
            }
        }
        data.extend_from_slice(&whirlpool.to_bytes());

        let array = TickArraySnapshot::from_account_data(&data).unwrap();
        assert_eq!(array.whirlpool, whirlpool);
        assert_eq!(array.start_tick_index, -704);
        assert!(array.ticks[3].initialized);
        assert_eq!(array.ticks[3].liquidity_net, 42);
        assert!(!array.ticks[4].initialized);
    }

    #[test]
    fn start_index_alignment_handles_negatives() {
        // spacing 8 -> span 704
        assert_eq!(TickArraySnapshot::start_index_for(0, 8), 0);
        assert_eq!(TickArraySnapshot::start_index_for(703, 8), 0);
        assert_eq!(TickArraySnapshot::start_index_for(704, 8), 704);
        assert_eq!(TickArraySnapshot::start_index_for(-1, 8), -704);
        assert_eq!(TickArraySnapshot::start_index_for(-704, 8), -704);
        assert_eq!(TickArraySnapshot::start_index_for(-705, 8), -1408);
    }

    #[test]
    fn containment_and_offsets() {
        let array = TickArraySnapshot {
            whirlpool: Pubkey::new_unique(),
            start_tick_index: -704,
            ticks: vec![TickSnapshot::default(); TICK_ARRAY_SIZE],
        };
        assert!(array.contains_tick(-704, 8));
        assert!(array.contains_tick(-8, 8));
        assert!(!array.contains_tick(0, 8));
        assert!(!array.contains_tick(-705, 8));
        assert_eq!(array.tick_offset(-704, 8).unwrap(), 0);
        assert_eq!(array.tick_offset(-8, 8).unwrap(), 87);
        // off-grid tick
        assert!(array.tick_offset(-7, 8).is_err());
    }
}
