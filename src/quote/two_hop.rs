//! Two-hop swap quoting: two single-hop quotes chained through an
//! intermediary mint, with consistency checks matching the on-chain
//! two-hop instruction's validation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::swap::{swap_quote, SwapQuote, SwapRequest};
use crate::error::{QuoteError, Result};
use crate::state::pool::PoolSnapshot;
use crate::state::tick_array::TickArraySnapshot;
use crate::token_extension::TokenExtensionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoHopSwapQuote {
    pub quote_one: SwapQuote,
    pub quote_two: SwapQuote,
    /// User-side input to hop one
    pub estimated_amount_in: u64,
    /// User-side output of hop two
    pub estimated_amount_out: u64,
    /// Slippage bound on the route's unspecified end: hop two's minimum
    /// output for exact-in, hop one's maximum input for exact-out
    pub other_amount_threshold: u64,
}

/// Composes two already-computed quotes into a two-hop quote.
///
/// The quotes must have been computed against a mutually consistent
/// intermediate amount: hop two's input is hop one's output, exactly. Use
/// [`two_hop_swap_quote_from_params`] to produce such a pair.
pub fn two_hop_swap_quote_from_quotes(
    quote_one: &SwapQuote,
    quote_two: &SwapQuote,
) -> Result<TwoHopSwapQuote> {
    if quote_one.output_mint != quote_two.input_mint {
        return Err(QuoteError::InvalidIntermediaryMint);
    }
    if quote_one.pool == quote_two.pool {
        return Err(QuoteError::DuplicateTwoHopPool);
    }
    if quote_one.estimated_amount_out != quote_two.estimated_amount_in {
        return Err(QuoteError::IntermediateTokenAmountMismatch);
    }
    let other_amount_threshold = if quote_two.amount_specified_is_input {
        quote_two.other_amount_threshold
    } else {
        quote_one.other_amount_threshold
    };
    Ok(TwoHopSwapQuote {
        quote_one: *quote_one,
        quote_two: *quote_two,
        estimated_amount_in: quote_one.estimated_amount_in,
        estimated_amount_out: quote_two.estimated_amount_out,
        other_amount_threshold,
    })
}

/// Parameters for one leg of a two-hop quote.
pub struct TwoHopPoolParams<'a> {
    pub pool: &'a PoolSnapshot,
    pub tick_arrays: &'a [TickArraySnapshot],
    pub a_to_b: bool,
    pub extension_ctx: &'a TokenExtensionContext,
}

/// Quotes a two-hop swap end to end.
///
/// For exact-in, hop one is quoted first and hop two's input is fixed to
/// hop one's post-transfer-fee output. For exact-out, hop two is quoted
/// first and hop one's requested output is fixed to hop two's required
/// input. Neither leg takes an explicit price limit: a two-hop route
/// bounded by price is quoted leg by leg instead.
pub fn two_hop_swap_quote_from_params(
    amount: u64,
    amount_specified_is_input: bool,
    hop_one: &TwoHopPoolParams<'_>,
    hop_two: &TwoHopPoolParams<'_>,
    slippage_bps: u16,
) -> Result<TwoHopSwapQuote> {
    let (quote_one, quote_two) = if amount_specified_is_input {
        let quote_one = swap_quote(
            &SwapRequest {
                amount,
                amount_specified_is_input: true,
                a_to_b: hop_one.a_to_b,
                sqrt_price_limit_x64: 0,
            },
            hop_one.pool,
            hop_one.tick_arrays,
            hop_one.extension_ctx,
            // slippage only widens the route's outer threshold
            0,
        )?;
        let quote_two = swap_quote(
            &SwapRequest {
                amount: quote_one.estimated_amount_out,
                amount_specified_is_input: true,
                a_to_b: hop_two.a_to_b,
                sqrt_price_limit_x64: 0,
            },
            hop_two.pool,
            hop_two.tick_arrays,
            hop_two.extension_ctx,
            slippage_bps,
        )?;
        (quote_one, quote_two)
    } else {
        let quote_two = swap_quote(
            &SwapRequest {
                amount,
                amount_specified_is_input: false,
                a_to_b: hop_two.a_to_b,
                sqrt_price_limit_x64: 0,
            },
            hop_two.pool,
            hop_two.tick_arrays,
            hop_two.extension_ctx,
            0,
        )?;
        let quote_one = swap_quote(
            &SwapRequest {
                amount: quote_two.estimated_amount_in,
                amount_specified_is_input: false,
                a_to_b: hop_one.a_to_b,
                sqrt_price_limit_x64: 0,
            },
            hop_one.pool,
            hop_one.tick_arrays,
            hop_one.extension_ctx,
            slippage_bps,
        )?;
        (quote_one, quote_two)
    };

    let quote = two_hop_swap_quote_from_quotes(&quote_one, &quote_two)?;
    debug!(
        pool_one = %quote.quote_one.pool,
        pool_two = %quote.quote_two.pool,
        amount_in = quote.estimated_amount_in,
        amount_out = quote.estimated_amount_out,
        "two-hop swap quote"
    );
    Ok(quote)
}
