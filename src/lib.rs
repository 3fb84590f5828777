//! Client-side quote engine for the Whirlpool concentrated-liquidity AMM.
//!
//! Given immutable snapshots of on-chain state (pool, tick arrays,
//! position, mint extensions), this crate computes the exact token amounts,
//! fees and price movement a swap, liquidity change or reward collection
//! would produce on chain, without submitting anything. The fixed-point
//! arithmetic, tick traversal and rounding rules replicate the on-chain
//! program bit for bit; a quote that cannot be computed faithfully fails
//! with a typed [`error::QuoteError`] instead of approximating.
//!
//! Everything here is synchronous, stateless and re-entrant: snapshots go
//! in by value, results come out, and no state survives between calls.
//! Fetching accounts, building instructions and signing are the
//! surrounding layers' jobs.

pub mod error;
pub mod math;
pub mod quote;
pub mod state;
pub mod tick_sequence;
pub mod token_extension;

pub use error::QuoteError;
pub use quote::{
    collect_fees_quote, collect_rewards_quote, decrease_liquidity_quote_by_liquidity,
    increase_liquidity_quote_by_liquidity, swap_quote, two_hop_swap_quote_from_params,
    two_hop_swap_quote_from_quotes, CollectFeesQuote, CollectRewardsQuote,
    DecreaseLiquidityQuote, IncreaseLiquidityQuote, SwapQuote, SwapRequest, TwoHopPoolParams,
    TwoHopSwapQuote, NO_EXPLICIT_SQRT_PRICE_LIMIT,
};
pub use state::{
    PoolSnapshot, PositionRewardSnapshot, PositionSnapshot, RewardInfoSnapshot,
    TickArraySnapshot, TickSnapshot, NUM_REWARDS, TICK_ARRAY_SIZE,
};
pub use tick_sequence::{NextInitializedTick, TickArraySequence};
pub use token_extension::{TokenExtensionContext, TokenTransferFee};
