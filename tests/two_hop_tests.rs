//! Two-hop composition: intermediate amount consistency and the mint/pool
//! checks that mirror the on-chain two-hop instruction.

use solana_sdk::pubkey::Pubkey;
use whirlpool_quote_sdk::token_extension::{TokenExtensionContext, TokenTransferFee};
use whirlpool_quote_sdk::{
    two_hop_swap_quote_from_params, two_hop_swap_quote_from_quotes, QuoteError, TwoHopPoolParams,
};

use test_helpers::{empty_tick_array, set_tick, test_pool};

// pool1 swaps A->M, pool2 swaps M->C; both legs a_to_b
fn route() -> (
    whirlpool_quote_sdk::PoolSnapshot,
    whirlpool_quote_sdk::PoolSnapshot,
    Vec<whirlpool_quote_sdk::TickArraySnapshot>,
    Vec<whirlpool_quote_sdk::TickArraySnapshot>,
) {
    let intermediate = Pubkey::new_unique();
    let mut pool_one = test_pool(0, 8, 10_000_000, 3000);
    pool_one.token_mint_b = intermediate;
    let mut pool_two = test_pool(0, 8, 20_000_000, 3000);
    pool_two.token_mint_a = intermediate;

    let arrays_for = |pool: &whirlpool_quote_sdk::PoolSnapshot| {
        let mut outer = empty_tick_array(pool.address, -704);
        set_tick(&mut outer, -696, 8, pool.liquidity as i128);
        vec![empty_tick_array(pool.address, 0), outer]
    };
    let arrays_one = arrays_for(&pool_one);
    let arrays_two = arrays_for(&pool_two);
    (pool_one, pool_two, arrays_one, arrays_two)
}

#[test]
fn exact_in_chains_the_intermediate_amount() {
    let (pool_one, pool_two, arrays_one, arrays_two) = route();
    let ctx = TokenExtensionContext::no_extensions();

    let quote = two_hop_swap_quote_from_params(
        100_000,
        true,
        &TwoHopPoolParams {
            pool: &pool_one,
            tick_arrays: &arrays_one,
            a_to_b: true,
            extension_ctx: &ctx,
        },
        &TwoHopPoolParams {
            pool: &pool_two,
            tick_arrays: &arrays_two,
            a_to_b: true,
            extension_ctx: &ctx,
        },
        0,
    )
    .unwrap();

    assert_eq!(quote.estimated_amount_in, 100_000);
    assert_eq!(
        quote.quote_one.estimated_amount_out,
        quote.quote_two.estimated_amount_in
    );
    assert!(quote.estimated_amount_out > 0);
    // two 0.3% pools: strictly worse than one
    assert!(quote.estimated_amount_out < quote.quote_one.estimated_amount_out);
}

#[test]
fn exact_out_fixes_hop_one_to_hop_two_needs() {
    let (pool_one, pool_two, arrays_one, arrays_two) = route();
    let ctx = TokenExtensionContext::no_extensions();

    let quote = two_hop_swap_quote_from_params(
        50_000,
        false,
        &TwoHopPoolParams {
            pool: &pool_one,
            tick_arrays: &arrays_one,
            a_to_b: true,
            extension_ctx: &ctx,
        },
        &TwoHopPoolParams {
            pool: &pool_two,
            tick_arrays: &arrays_two,
            a_to_b: true,
            extension_ctx: &ctx,
        },
        0,
    )
    .unwrap();

    assert_eq!(quote.estimated_amount_out, 50_000);
    assert_eq!(
        quote.quote_one.estimated_amount_out,
        quote.quote_two.estimated_amount_in
    );
    assert!(quote.estimated_amount_in > 50_000);
}

#[test]
fn intermediate_transfer_fee_propagates_between_hops() {
    let (pool_one, pool_two, arrays_one, arrays_two) = route();
    // the intermediate mint (B of pool one, A of pool two) taxes transfers
    let fee = TokenTransferFee { epoch: 0, basis_points: 200, maximum_fee: u64::MAX };
    let ctx_one = TokenExtensionContext {
        transfer_fee_b: Some(fee),
        ..TokenExtensionContext::no_extensions()
    };
    let ctx_two = TokenExtensionContext {
        transfer_fee_a: Some(fee),
        ..TokenExtensionContext::no_extensions()
    };

    let quote = two_hop_swap_quote_from_params(
        100_000,
        true,
        &TwoHopPoolParams {
            pool: &pool_one,
            tick_arrays: &arrays_one,
            a_to_b: true,
            extension_ctx: &ctx_one,
        },
        &TwoHopPoolParams {
            pool: &pool_two,
            tick_arrays: &arrays_two,
            a_to_b: true,
            extension_ctx: &ctx_two,
        },
        0,
    )
    .unwrap();
    assert_eq!(
        quote.quote_one.estimated_amount_out,
        quote.quote_two.estimated_amount_in
    );
}

#[test]
fn mismatched_intermediary_mint_is_rejected() {
    let (pool_one, pool_two, arrays_one, arrays_two) = route();
    let ctx = TokenExtensionContext::no_extensions();
    let request = |pool, arrays| {
        whirlpool_quote_sdk::swap_quote(
            &whirlpool_quote_sdk::SwapRequest {
                amount: 10_000,
                amount_specified_is_input: true,
                a_to_b: true,
                sqrt_price_limit_x64: 0,
            },
            pool,
            arrays,
            &ctx,
            0,
        )
        .unwrap()
    };
    let quote_one = request(&pool_one, &arrays_one);
    let mut quote_two = request(&pool_two, &arrays_two);

    quote_two.input_mint = Pubkey::new_unique();
    assert_eq!(
        two_hop_swap_quote_from_quotes(&quote_one, &quote_two).unwrap_err(),
        QuoteError::InvalidIntermediaryMint
    );
}

#[test]
fn duplicate_pool_is_rejected() {
    let (pool_one, _, arrays_one, _) = route();
    let ctx = TokenExtensionContext::no_extensions();
    let quote = whirlpool_quote_sdk::swap_quote(
        &whirlpool_quote_sdk::SwapRequest {
            amount: 10_000,
            amount_specified_is_input: true,
            a_to_b: true,
            sqrt_price_limit_x64: 0,
        },
        &pool_one,
        &arrays_one,
        &ctx,
        0,
    )
    .unwrap();

    let mut second = quote;
    second.input_mint = quote.output_mint;
    assert_eq!(
        two_hop_swap_quote_from_quotes(&quote, &second).unwrap_err(),
        QuoteError::DuplicateTwoHopPool
    );
}

#[test]
fn inconsistent_intermediate_amount_is_rejected() {
    let (pool_one, pool_two, arrays_one, arrays_two) = route();
    let ctx = TokenExtensionContext::no_extensions();
    let request = |pool, arrays, amount| {
        whirlpool_quote_sdk::swap_quote(
            &whirlpool_quote_sdk::SwapRequest {
                amount,
                amount_specified_is_input: true,
                a_to_b: true,
                sqrt_price_limit_x64: 0,
            },
            pool,
            arrays,
            &ctx,
            0,
        )
        .unwrap()
    };
    let quote_one = request(&pool_one, &arrays_one, 10_000);
    // quoted independently instead of from hop one's output
    let quote_two = request(&pool_two, &arrays_two, 20_000);

    assert_eq!(
        two_hop_swap_quote_from_quotes(&quote_one, &quote_two).unwrap_err(),
        QuoteError::IntermediateTokenAmountMismatch
    );
}
