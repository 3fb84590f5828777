// Immutable snapshots of on-chain state, passed into the quote engine by
// value. The engine holds no references to them across calls.

pub mod account_data;
pub mod pool;
pub mod position;
pub mod tick_array;

pub use pool::{PoolSnapshot, RewardInfoSnapshot, NUM_REWARDS};
pub use position::{PositionRewardSnapshot, PositionSnapshot};
pub use tick_array::{TickArraySnapshot, TickSnapshot, TICK_ARRAY_SIZE};
