/// Errors surfaced by the quote engine.
///
/// Every variant is a deterministic validation or arithmetic-limit failure.
/// Nothing here is transient: callers should adjust parameters (supply more
/// tick arrays, change the limit, lower the amount) or abort the quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    // -- input validation --
    #[error("swap amount must not be zero")]
    ZeroTradableAmount,
    #[error("sqrt price limit is on the wrong side of the current price for this direction")]
    InvalidSqrtPriceLimitDirection,
    #[error("sqrt price is outside the protocol's min/max bounds")]
    SqrtPriceOutOfBounds,
    #[error("pool tick spacing must not be zero")]
    InvalidTickSpacing,
    #[error("tick index is outside the protocol's min/max bounds")]
    TickOutOfBounds,
    #[error("tick range is inverted or not aligned to the tick spacing")]
    InvalidTickRange,

    // -- traversal / state consistency --
    #[error("tick arrays are not sequential in the trade direction")]
    InvalidTickArraySequence,
    #[error("tick index lies outside the supplied tick arrays; supply more arrays")]
    TickArraySequenceInvalidIndex,
    #[error("tick array does not belong to the quoted whirlpool")]
    DifferentWhirlpoolTickArrayAccount,

    // -- arithmetic limits --
    #[error("liquidity overflowed 128 bits")]
    LiquidityOverflow,
    #[error("liquidity underflowed during tick crossing")]
    LiquidityUnderflow,
    #[error("calculated token amount exceeds the u64 range")]
    AmountCalcOverflow,
    #[error("remaining token amount underflowed the specified amount")]
    AmountRemainingOverflow,
    #[error("intermediate mul-div product exceeded 256 bits")]
    MulDivOverflow,
    #[error("value does not fit in the target integer width")]
    NumberDownCastError,

    // -- composition consistency --
    #[error("intermediary mint of hop one does not match the input mint of hop two")]
    InvalidIntermediaryMint,
    #[error("both hops of a two-hop swap reference the same pool")]
    DuplicateTwoHopPool,
    #[error("hop one output does not match hop two input")]
    IntermediateTokenAmountMismatch,

    // -- fill policy --
    #[error("exact-output swap cannot be filled with the supplied liquidity")]
    PartialFillError,

    // -- rewards --
    #[error("timestamp precedes the pool's last reward update")]
    InvalidTimestamp,

    // -- account decoding --
    #[error("account data is not a valid whirlpool account of the expected kind")]
    AccountDeserializeError,
}

pub type Result<T> = std::result::Result<T, QuoteError>;
