// Fixed-point math replicating the on-chain program bit for bit. Rounding
// direction per operation is a hard protocol contract, not a detail.

pub mod big_num;
pub mod fixed_point_64;
pub mod full_math;
pub mod liquidity_math;
pub mod sqrt_price_math;
pub mod swap_math;
pub mod tick_math;

pub use big_num::U256;
pub use full_math::MulDiv;
pub use swap_math::{compute_swap_step, SwapStepComputation, FEE_RATE_MUL_VALUE};
