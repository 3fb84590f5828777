//! Double-width integer used for fixed-point intermediates.
//! U256 keeps every mul-div in this crate exact before narrowing back to
//! the protocol's native widths (u128 prices, u64 amounts).
use uint::construct_uint;

construct_uint! {
    pub struct U256(4);
}

impl U256 {
    /// Narrows to u64, or fails when the value exceeds the token amount width.
    pub fn try_into_u64(self) -> crate::error::Result<u64> {
        if self > U256::from(u64::MAX) {
            return Err(crate::error::QuoteError::AmountCalcOverflow);
        }
        Ok(self.as_u64())
    }

    /// Narrows to u128, or fails when the value exceeds the sqrt-price width.
    pub fn try_into_u128(self) -> crate::error::Result<u128> {
        if self > U256::from(u128::MAX) {
            return Err(crate::error::QuoteError::NumberDownCastError);
        }
        Ok(self.as_u128())
    }
}
