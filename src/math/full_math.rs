//! Full-precision multiply-divide. All products are accumulated in U256
//! before narrowing so no intermediate ever truncates.
use super::big_num::U256;
use crate::error::{QuoteError, Result};

/// Multiply-divide with an explicit rounding direction and no intermediate
/// overflow.
pub trait MulDiv: Sized {
    /// floor(self * num / denom)
    fn mul_div_floor(self, num: Self, denom: Self) -> Result<Self>;

    /// ceil(self * num / denom)
    fn mul_div_ceil(self, num: Self, denom: Self) -> Result<Self>;
}

impl MulDiv for u64 {
    fn mul_div_floor(self, num: Self, denom: Self) -> Result<Self> {
        if denom == 0 {
            return Err(QuoteError::MulDivOverflow);
        }
        let r = (self as u128) * (num as u128) / (denom as u128);
        u64::try_from(r).map_err(|_| QuoteError::NumberDownCastError)
    }

    fn mul_div_ceil(self, num: Self, denom: Self) -> Result<Self> {
        if denom == 0 {
            return Err(QuoteError::MulDivOverflow);
        }
        let r = ((self as u128) * (num as u128) + (denom as u128 - 1)) / (denom as u128);
        u64::try_from(r).map_err(|_| QuoteError::NumberDownCastError)
    }
}

impl MulDiv for u128 {
    fn mul_div_floor(self, num: Self, denom: Self) -> Result<Self> {
        if denom == 0 {
            return Err(QuoteError::MulDivOverflow);
        }
        let r = U256::from(self) * U256::from(num) / U256::from(denom);
        r.try_into_u128()
    }

    fn mul_div_ceil(self, num: Self, denom: Self) -> Result<Self> {
        if denom == 0 {
            return Err(QuoteError::MulDivOverflow);
        }
        let product = U256::from(self) * U256::from(num);
        let quotient = div_round_up_u256(product, U256::from(denom));
        quotient.try_into_u128()
    }
}

/// ceil(numerator / denominator) in 256 bits. Denominator must be non-zero.
pub fn div_round_up_u256(numerator: U256, denominator: U256) -> U256 {
    let quotient = numerator / denominator;
    if (numerator % denominator).is_zero() {
        quotient
    } else {
        quotient + U256::one()
    }
}

/// floor((n0 * n1) >> 64), the Q64.64 product of two u128 values.
pub fn checked_mul_shift_right(n0: u128, n1: u128) -> Result<u64> {
    let product = U256::from(n0) * U256::from(n1);
    (product >> 64).try_into_u64()
}
