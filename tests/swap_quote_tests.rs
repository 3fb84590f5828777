//! Swap quote scenarios: uniform-liquidity moves, tick crossings, fill
//! policy, direction/limit validation, and transfer-fee adjustment.

use whirlpool_quote_sdk::math::tick_math::{
    sqrt_price_from_tick_index, MAX_SQRT_PRICE_X64,
};
use whirlpool_quote_sdk::token_extension::{TokenExtensionContext, TokenTransferFee};
use whirlpool_quote_sdk::{swap_quote, QuoteError, SwapRequest};

use test_helpers::{empty_tick_array, set_tick, test_pool};

const NO_LIMIT: u128 = 0;

fn exact_in(amount: u64, a_to_b: bool) -> SwapRequest {
    SwapRequest {
        amount,
        amount_specified_is_input: true,
        a_to_b,
        sqrt_price_limit_x64: NO_LIMIT,
    }
}

#[test]
fn uniform_range_exact_in_stays_within_spacing() {
    // liquidity spans [-696, 696] uniformly; a 200k swap moves a few hundred
    // ticks and crosses nothing
    let pool = test_pool(0, 8, 10_000_000, 3000);
    let mut array0 = empty_tick_array(pool.address, 0);
    set_tick(&mut array0, 696, 8, -10_000_000);
    let mut array1 = empty_tick_array(pool.address, -704);
    set_tick(&mut array1, -696, 8, 10_000_000);
    let arrays = vec![array0, array1];

    let quote = swap_quote(
        &exact_in(200_000, true),
        &pool,
        &arrays,
        &TokenExtensionContext::no_extensions(),
        0,
    )
    .unwrap();

    assert_eq!(quote.ticks_crossed, 0);
    assert!(quote.estimated_amount_out > 0);
    // the full input is consumed; fee is 0.3% of it, up to rounding dust
    assert_eq!(quote.estimated_amount_in, 200_000);
    assert!((600..=602).contains(&quote.estimated_fee_amount));
    // price moved down but nowhere near the range boundary
    assert!(quote.estimated_end_tick_index < 0);
    assert!(quote.estimated_end_tick_index > -696);
    // zero slippage: the threshold is the estimate itself
    assert_eq!(quote.other_amount_threshold, quote.estimated_amount_out);
}

#[test]
fn crossing_an_initialized_tick_updates_liquidity() {
    let pool = test_pool(0, 8, 10_000_000, 3000);
    let array0 = empty_tick_array(pool.address, 0);
    let mut array1 = empty_tick_array(pool.address, -704);
    // entering the region below -8 drops active liquidity by 4M
    set_tick(&mut array1, -8, 8, 4_000_000);
    set_tick(&mut array1, -696, 8, 6_000_000);
    let arrays = vec![array0, array1];

    let quote = swap_quote(
        &exact_in(200_000, true),
        &pool,
        &arrays,
        &TokenExtensionContext::no_extensions(),
        0,
    )
    .unwrap();

    assert_eq!(quote.ticks_crossed, 1);
    assert!(quote.estimated_end_tick_index < -8);
}

#[test]
fn exact_out_without_limit_is_all_or_nothing() {
    // only ~17k of token B is reachable before the supplied span runs out
    let pool = test_pool(350, 8, 1_000_000, 3000);
    let arrays = vec![empty_tick_array(pool.address, 0)];

    let err = swap_quote(
        &SwapRequest {
            amount: 100_000,
            amount_specified_is_input: false,
            a_to_b: true,
            sqrt_price_limit_x64: NO_LIMIT,
        },
        &pool,
        &arrays,
        &TokenExtensionContext::no_extensions(),
        0,
    )
    .unwrap_err();
    assert_eq!(err, QuoteError::PartialFillError);
}

#[test]
fn exact_out_with_explicit_limit_fills_partially() {
    let pool = test_pool(350, 8, 1_000_000, 3000);
    let arrays = vec![empty_tick_array(pool.address, 0)];
    let limit = sqrt_price_from_tick_index(8).unwrap();

    let quote = swap_quote(
        &SwapRequest {
            amount: 100_000,
            amount_specified_is_input: false,
            a_to_b: true,
            sqrt_price_limit_x64: limit,
        },
        &pool,
        &arrays,
        &TokenExtensionContext::no_extensions(),
        0,
    )
    .unwrap();

    assert!(quote.estimated_amount_out < 100_000);
    assert!(quote.estimated_amount_out > 0);
    assert_eq!(quote.estimated_end_sqrt_price_x64, limit);
}

#[test]
fn output_is_monotonic_in_input() {
    let pool = test_pool(0, 8, 10_000_000, 3000);
    let mut array1 = empty_tick_array(pool.address, -704);
    set_tick(&mut array1, -696, 8, 10_000_000);
    let arrays = vec![empty_tick_array(pool.address, 0), array1];

    let ctx = TokenExtensionContext::no_extensions();
    let mut last_out = 0;
    for amount in [10_000u64, 50_000, 120_000, 200_000] {
        let quote = swap_quote(&exact_in(amount, true), &pool, &arrays, &ctx, 0).unwrap();
        assert!(quote.estimated_amount_out >= last_out);
        last_out = quote.estimated_amount_out;
    }
}

#[test]
fn b_to_a_traverses_upward() {
    let pool = test_pool(0, 8, 10_000_000, 3000);
    let mut array0 = empty_tick_array(pool.address, 0);
    set_tick(&mut array0, 696, 8, -10_000_000);
    let arrays = vec![array0, empty_tick_array(pool.address, 704)];

    let quote = swap_quote(
        &exact_in(200_000, false),
        &pool,
        &arrays,
        &TokenExtensionContext::no_extensions(),
        0,
    )
    .unwrap();
    assert!(quote.estimated_amount_out > 0);
    assert!(quote.estimated_end_tick_index > 0);
    assert_eq!(quote.input_mint, pool.token_mint_b);
    assert_eq!(quote.output_mint, pool.token_mint_a);
}

#[test]
fn request_validation_order() {
    let pool = test_pool(0, 8, 10_000_000, 3000);
    let arrays = vec![empty_tick_array(pool.address, 0)];
    let ctx = TokenExtensionContext::no_extensions();

    let err = swap_quote(&exact_in(0, true), &pool, &arrays, &ctx, 0).unwrap_err();
    assert_eq!(err, QuoteError::ZeroTradableAmount);

    // limit below the protocol floor
    let err = swap_quote(
        &SwapRequest {
            amount: 1_000,
            amount_specified_is_input: true,
            a_to_b: true,
            sqrt_price_limit_x64: 1,
        },
        &pool,
        &arrays,
        &ctx,
        0,
    )
    .unwrap_err();
    assert_eq!(err, QuoteError::SqrtPriceOutOfBounds);

    // limit above the current price on an A->B trade
    let err = swap_quote(
        &SwapRequest {
            amount: 1_000,
            amount_specified_is_input: true,
            a_to_b: true,
            sqrt_price_limit_x64: MAX_SQRT_PRICE_X64,
        },
        &pool,
        &arrays,
        &ctx,
        0,
    )
    .unwrap_err();
    assert_eq!(err, QuoteError::InvalidSqrtPriceLimitDirection);

    let mut degenerate = pool;
    degenerate.tick_spacing = 0;
    let err = swap_quote(&exact_in(1_000, true), &degenerate, &arrays, &ctx, 0).unwrap_err();
    assert_eq!(err, QuoteError::InvalidTickSpacing);
}

#[test]
fn slippage_widens_the_threshold() {
    let pool = test_pool(0, 8, 10_000_000, 3000);
    let mut array1 = empty_tick_array(pool.address, -704);
    set_tick(&mut array1, -696, 8, 10_000_000);
    let arrays = vec![empty_tick_array(pool.address, 0), array1];
    let ctx = TokenExtensionContext::no_extensions();

    let tight = swap_quote(&exact_in(200_000, true), &pool, &arrays, &ctx, 0).unwrap();
    let loose = swap_quote(&exact_in(200_000, true), &pool, &arrays, &ctx, 100).unwrap();
    assert_eq!(tight.estimated_amount_out, loose.estimated_amount_out);
    // 1% tolerance: accept up to 1% less output
    assert_eq!(
        loose.other_amount_threshold,
        tight.estimated_amount_out * 9_900 / 10_000
    );
}

#[test]
fn input_transfer_fee_reduces_what_the_pool_swaps() {
    let pool = test_pool(0, 8, 10_000_000, 3000);
    let mut array1 = empty_tick_array(pool.address, -704);
    set_tick(&mut array1, -696, 8, 10_000_000);
    let arrays = vec![empty_tick_array(pool.address, 0), array1];

    let no_fee_ctx = TokenExtensionContext::no_extensions();
    let fee_ctx = TokenExtensionContext {
        transfer_fee_a: Some(TokenTransferFee {
            epoch: 0,
            basis_points: 100,
            maximum_fee: u64::MAX,
        }),
        ..TokenExtensionContext::no_extensions()
    };

    let plain = swap_quote(&exact_in(200_000, true), &pool, &arrays, &no_fee_ctx, 0).unwrap();
    let taxed = swap_quote(&exact_in(200_000, true), &pool, &arrays, &fee_ctx, 0).unwrap();

    // the user still sends 200k, but 1% never reaches the pool
    assert_eq!(taxed.estimated_amount_in, 200_000);
    assert!(taxed.estimated_amount_out < plain.estimated_amount_out);
}

#[test]
fn empty_extension_context_is_transparent() {
    let pool = test_pool(0, 8, 10_000_000, 3000);
    let mut array1 = empty_tick_array(pool.address, -704);
    set_tick(&mut array1, -696, 8, 10_000_000);
    let arrays = vec![empty_tick_array(pool.address, 0), array1];

    let a = swap_quote(
        &exact_in(150_000, true),
        &pool,
        &arrays,
        &TokenExtensionContext::no_extensions(),
        50,
    )
    .unwrap();
    let b = swap_quote(
        &exact_in(150_000, true),
        &pool,
        &arrays,
        &TokenExtensionContext::default(),
        50,
    )
    .unwrap();
    assert_eq!(a, b);
}
