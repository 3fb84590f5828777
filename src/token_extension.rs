//! Transfer-fee awareness for Token-2022 mints.
//!
//! A mint carrying the transfer-fee extension deducts a fee on every
//! transfer, independent of the pool's own fee. Quotes must report what the
//! pool actually receives and what the user actually keeps, so amounts are
//! adjusted around the core swap math, never inside it. The context is
//! rebuilt per quote call: fee parameters change by epoch.

use serde::{Deserialize, Serialize};
use spl_token_2022::extension::transfer_fee::TransferFeeConfig;
use spl_token_2022::extension::{BaseStateWithExtensions, StateWithExtensions};
use spl_token_2022::state::Mint;

use crate::error::{QuoteError, Result};
use crate::state::pool::NUM_REWARDS;

const ONE_IN_BASIS_POINTS: u128 = 10_000;
const MAX_FEE_BASIS_POINTS: u16 = 10_000;

/// The transfer-fee schedule selected for the current epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransferFee {
    /// First epoch the schedule applies to
    pub epoch: u64,
    pub basis_points: u16,
    pub maximum_fee: u64,
}

impl TokenTransferFee {
    /// Fee withheld when `amount` is transferred. Ceiling division, capped
    /// at the schedule's maximum; matches the extension's own calculation.
    pub fn calculate_fee(&self, amount: u64) -> Result<u64> {
        if self.basis_points == 0 || amount == 0 {
            return Ok(0);
        }
        let numerator = amount as u128 * self.basis_points as u128;
        let raw_fee = numerator.div_ceil(ONE_IN_BASIS_POINTS);
        let raw_fee = u64::try_from(raw_fee).map_err(|_| QuoteError::AmountCalcOverflow)?;
        Ok(raw_fee.min(self.maximum_fee))
    }

    /// Fee on the smallest pre-fee amount whose post-fee result covers
    /// `post_fee_amount`; used to gross amounts up.
    pub fn calculate_inverse_fee(&self, post_fee_amount: u64) -> Result<u64> {
        if self.basis_points == 0 || post_fee_amount == 0 {
            return Ok(0);
        }
        if self.basis_points >= MAX_FEE_BASIS_POINTS {
            // a 100% schedule always withholds the maximum
            return Ok(self.maximum_fee);
        }
        let numerator = post_fee_amount as u128 * ONE_IN_BASIS_POINTS;
        let denominator = ONE_IN_BASIS_POINTS - self.basis_points as u128;
        let raw_pre_fee = numerator.div_ceil(denominator);
        let raw_pre_fee =
            u64::try_from(raw_pre_fee).map_err(|_| QuoteError::AmountCalcOverflow)?;
        let fee = raw_pre_fee - post_fee_amount;
        Ok(fee.min(self.maximum_fee))
    }
}

/// Per-quote view of the transfer-fee schedules of every mint a quote can
/// touch. Built fresh per call; never cached across epochs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenExtensionContext {
    pub transfer_fee_a: Option<TokenTransferFee>,
    pub transfer_fee_b: Option<TokenTransferFee>,
    pub reward_transfer_fees: [Option<TokenTransferFee>; NUM_REWARDS],
}

impl TokenExtensionContext {
    /// Context for pools whose mints carry no value-affecting extension.
    pub fn no_extensions() -> Self {
        Self::default()
    }

    /// Schedule on the mint the user pays with, given the trade direction.
    pub fn input_transfer_fee(&self, a_to_b: bool) -> Option<&TokenTransferFee> {
        if a_to_b {
            self.transfer_fee_a.as_ref()
        } else {
            self.transfer_fee_b.as_ref()
        }
    }

    /// Schedule on the mint the user receives, given the trade direction.
    pub fn output_transfer_fee(&self, a_to_b: bool) -> Option<&TokenTransferFee> {
        if a_to_b {
            self.transfer_fee_b.as_ref()
        } else {
            self.transfer_fee_a.as_ref()
        }
    }
}

/// Reads the epoch-applicable transfer-fee schedule out of raw mint account
/// data. Plain SPL mints and Token-2022 mints without the extension yield
/// `None`.
pub fn transfer_fee_from_mint_data(
    data: &[u8],
    current_epoch: u64,
) -> Result<Option<TokenTransferFee>> {
    let state = StateWithExtensions::<Mint>::unpack(data)
        .map_err(|_| QuoteError::AccountDeserializeError)?;
    match state.get_extension::<TransferFeeConfig>() {
        Ok(config) => {
            let fee = config.get_epoch_fee(current_epoch);
            Ok(Some(TokenTransferFee {
                epoch: u64::from(fee.epoch),
                basis_points: u16::from(fee.transfer_fee_basis_points),
                maximum_fee: u64::from(fee.maximum_fee),
            }))
        }
        Err(_) => Ok(None),
    }
}

/// Net amount the pool receives when the user transfers `amount` in.
pub fn adjust_for_transfer_in(amount: u64, fee: Option<&TokenTransferFee>) -> Result<u64> {
    match fee {
        Some(fee) => Ok(amount - fee.calculate_fee(amount)?),
        None => Ok(amount),
    }
}

/// Net amount the user receives when the pool transfers `amount` out.
pub fn adjust_for_transfer_out(amount: u64, fee: Option<&TokenTransferFee>) -> Result<u64> {
    match fee {
        Some(fee) => Ok(amount - fee.calculate_fee(amount)?),
        None => Ok(amount),
    }
}

/// Gross amount that must be transferred so `net_amount` arrives after the
/// fee. Inverse of the adjustments above.
pub fn amount_with_transfer_fee(net_amount: u64, fee: Option<&TokenTransferFee>) -> Result<u64> {
    match fee {
        Some(fee) => net_amount
            .checked_add(fee.calculate_inverse_fee(net_amount)?)
            .ok_or(QuoteError::AmountCalcOverflow),
        None => Ok(net_amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fee(basis_points: u16, maximum_fee: u64) -> TokenTransferFee {
        TokenTransferFee { epoch: 0, basis_points, maximum_fee }
    }

    #[test]
    fn no_extension_is_identity() {
        assert_eq!(adjust_for_transfer_in(123_456, None).unwrap(), 123_456);
        assert_eq!(adjust_for_transfer_out(123_456, None).unwrap(), 123_456);
        assert_eq!(amount_with_transfer_fee(123_456, None).unwrap(), 123_456);
    }

    #[test]
    fn zero_bps_is_identity() {
        let f = fee(0, u64::MAX);
        assert_eq!(adjust_for_transfer_in(1_000, Some(&f)).unwrap(), 1_000);
    }

    #[test]
    fn fee_rounds_up_and_caps() {
        let f = fee(100, u64::MAX); // 1%
        // ceil(999 * 100 / 10000) = 10
        assert_eq!(f.calculate_fee(999).unwrap(), 10);
        let capped = fee(100, 5);
        assert_eq!(capped.calculate_fee(999).unwrap(), 5);
    }

    #[test]
    fn inverse_round_trips_to_at_least_net() {
        for bps in [1u16, 30, 100, 2500, 9999] {
            let f = fee(bps, u64::MAX);
            for net in [1u64, 999, 10_000, 123_456_789] {
                let gross = amount_with_transfer_fee(net, Some(&f)).unwrap();
                let arrived = adjust_for_transfer_in(gross, Some(&f)).unwrap();
                assert!(arrived >= net, "bps={bps} net={net} arrived={arrived}");
            }
        }
    }

    #[test]
    fn hundred_percent_fee_withholds_maximum() {
        let f = fee(10_000, 777);
        assert_eq!(f.calculate_fee(1_000_000).unwrap(), 777);
        assert_eq!(f.calculate_inverse_fee(500).unwrap(), 777);
    }
}
