#![no_std]
pub mod admin;
pub mod audit;
pub mod errors;
pub mod interfaces;
pub mod storage_keys;
pub mod types;
pub mod validation;

pub use errors::ContractError;
pub use interfaces::*;
pub use storage_keys::*;
pub use types::*;

// Fixed-point basis
pub const BPS_DENOMINATOR: u32 = 10_000;
pub const BASE_MULTIPLIER_BPS: u32 = 10_000; // 1x

// Staking defaults
pub const DEFAULT_MAX_LOCK_BLOCKS: u64 = 100_000;
pub const DEFAULT_DISTRIBUTION_BPS: u32 = 5_000; // 50% of the treasury per claim cycle
pub const MAX_CURVE_POINTS: u32 = 32;

// Marketplace defaults
pub const DEFAULT_TREASURY_FEE_BPS: u32 = 250; // 2.5% of every sale

// Registry limits
pub const MAX_CONTENT_HASH_LENGTH: u32 = 256;

// Audit log paging
pub const DEFAULT_AUDIT_QUERY_LIMIT: u32 = 100;
pub const MAX_AUDIT_QUERY_LIMIT: u32 = 500;

/// Current block height as seen by the contracts.
pub fn current_block(env: &soroban_sdk::Env) -> u64 {
    u64::from(env.ledger().sequence())
}
