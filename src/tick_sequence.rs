//! Ordered traversal over caller-supplied tick arrays.
//!
//! The swap loop never fetches anything: it walks the arrays it was given,
//! in trade direction, and reports when it would need one more. The cursor
//! is stateless between calls; every lookup starts from a tick index.

use solana_sdk::pubkey::Pubkey;
use tracing::trace;

use crate::error::{QuoteError, Result};
use crate::math::tick_math::{MAX_TICK_INDEX, MIN_TICK_INDEX};
use crate::state::tick_array::{TickArraySnapshot, TickSnapshot, TICK_ARRAY_SIZE};

/// Outcome of a next-tick search.
#[derive(Debug, Clone, Copy)]
pub struct NextInitializedTick<'a> {
    /// The tick index bounding the next swap step
    pub tick_index: i32,
    /// The record at that index, or `None` when the supplied arrays hold no
    /// further initialized tick and `tick_index` is the edge of the span
    pub tick: Option<&'a TickSnapshot>,
}

/// A validated, direction-ordered sequence of tick arrays.
#[derive(Debug)]
pub struct TickArraySequence<'a> {
    arrays: &'a [TickArraySnapshot],
    tick_spacing: u16,
    a_to_b: bool,
}

impl<'a> TickArraySequence<'a> {
    /// Validates the sequence up front: every array must belong to
    /// `whirlpool`, start on an aligned index, hold a full set of records,
    /// and follow its predecessor contiguously in the trade direction. The
    /// first array must cover the traversal's starting search index.
    pub fn new(
        arrays: &'a [TickArraySnapshot],
        whirlpool: &Pubkey,
        tick_spacing: u16,
        a_to_b: bool,
        start_tick_index: i32,
    ) -> Result<Self> {
        if tick_spacing == 0 {
            return Err(QuoteError::InvalidTickSpacing);
        }
        if arrays.is_empty() {
            return Err(QuoteError::InvalidTickArraySequence);
        }
        let span = TickArraySnapshot::span(tick_spacing);
        for (i, array) in arrays.iter().enumerate() {
            if array.whirlpool != *whirlpool {
                return Err(QuoteError::DifferentWhirlpoolTickArrayAccount);
            }
            if !TickArraySnapshot::is_valid_start_index(array.start_tick_index, tick_spacing)
                || array.ticks.len() != TICK_ARRAY_SIZE
            {
                return Err(QuoteError::InvalidTickArraySequence);
            }
            if i > 0 {
                let expected = if a_to_b {
                    arrays[i - 1].start_tick_index - span
                } else {
                    arrays[i - 1].start_tick_index + span
                };
                if array.start_tick_index != expected {
                    return Err(QuoteError::InvalidTickArraySequence);
                }
            }
        }

        let sequence = Self { arrays, tick_spacing, a_to_b };
        if !arrays[0].contains_tick(sequence.search_index(start_tick_index), tick_spacing) {
            return Err(QuoteError::InvalidTickArraySequence);
        }
        Ok(sequence)
    }

    // The search is inclusive of the current index for A->B (the loop backs
    // the current tick off by one after each crossing) and starts one
    // spacing above it for B->A.
    fn search_index(&self, current_tick: i32) -> i32 {
        if self.a_to_b {
            current_tick
        } else {
            current_tick + self.tick_spacing as i32
        }
    }

    /// Finds the nearest initialized tick beyond `current_tick` in the trade
    /// direction, or the clamped edge of the supplied span when none remains.
    ///
    /// Fails with `TickArraySequenceInvalidIndex` when the search index has
    /// already left the supplied arrays; the caller needs more arrays.
    pub fn next_initialized_tick(&self, current_tick: i32) -> Result<NextInitializedTick<'a>> {
        let search = self.search_index(current_tick);
        let spacing = self.tick_spacing as i32;

        let start_cursor = self
            .arrays
            .iter()
            .position(|array| array.contains_tick(search, self.tick_spacing))
            .ok_or(QuoteError::TickArraySequenceInvalidIndex)?;

        for (cursor, array) in self.arrays.iter().enumerate().skip(start_cursor) {
            // first candidate: the search index floored to the spacing grid
            // within the entry array, the directional edge in later arrays
            let first_offset = if cursor == start_cursor {
                ((search - array.start_tick_index) / spacing) as usize
            } else if self.a_to_b {
                TICK_ARRAY_SIZE - 1
            } else {
                0
            };

            let found = if self.a_to_b {
                (0..=first_offset)
                    .rev()
                    .find(|&offset| array.ticks[offset].initialized)
            } else {
                (first_offset..TICK_ARRAY_SIZE).find(|&offset| array.ticks[offset].initialized)
            };

            if let Some(offset) = found {
                let tick_index = array.start_tick_index + offset as i32 * spacing;
                trace!(tick_index, "next initialized tick");
                return Ok(NextInitializedTick {
                    tick_index,
                    tick: Some(&array.ticks[offset]),
                });
            }
        }

        // No initialized tick left in the supplied span: stop at its edge.
        // The next search past this point reports the exhaustion.
        let last = &self.arrays[self.arrays.len() - 1];
        let edge = if self.a_to_b {
            last.start_tick_index
        } else {
            last.start_tick_index + TickArraySnapshot::span(self.tick_spacing) - 1
        };
        Ok(NextInitializedTick {
            tick_index: edge.clamp(MIN_TICK_INDEX, MAX_TICK_INDEX),
            tick: None,
        })
    }

    /// Looks up a tick record by index across the sequence.
    pub fn tick(&self, tick_index: i32) -> Result<&'a TickSnapshot> {
        let array = self
            .arrays
            .iter()
            .find(|array| array.contains_tick(tick_index, self.tick_spacing))
            .ok_or(QuoteError::TickArraySequenceInvalidIndex)?;
        array.tick(tick_index, self.tick_spacing)
    }
}
