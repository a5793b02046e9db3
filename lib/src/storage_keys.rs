use soroban_sdk::Env;

pub const ADMIN_KEY: &str = "admin";

/// TTL constants (in ledgers). Ledgers close roughly every 5 seconds.
pub const INSTANCE_TTL_THRESHOLD: u32 = 17_280; // ~1 day
pub const INSTANCE_TTL_EXTEND: u32 = 518_400; // ~30 days
pub const RECORD_TTL_THRESHOLD: u32 = 518_400; // ~30 days
pub const RECORD_TTL_EXTEND: u32 = 1_036_800; // ~60 days

/// Keeps configuration and counters alive; called by every mutating entry point.
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}
