// Top-level quote entry points. Each one is a pure function over snapshots;
// nothing is fetched, cached, or mutated here.

pub mod liquidity;
pub mod rewards;
pub mod swap;
pub mod two_hop;

pub use liquidity::{
    decrease_liquidity_quote_by_liquidity, increase_liquidity_quote_by_liquidity,
    DecreaseLiquidityQuote, IncreaseLiquidityQuote,
};
pub use rewards::{
    collect_fees_quote, collect_rewards_quote, CollectFeesQuote, CollectRewardsQuote,
};
pub use swap::{swap_quote, SwapQuote, SwapRequest, NO_EXPLICIT_SQRT_PRICE_LIMIT};
pub use two_hop::{
    two_hop_swap_quote_from_params, two_hop_swap_quote_from_quotes, TwoHopPoolParams,
    TwoHopSwapQuote,
};
