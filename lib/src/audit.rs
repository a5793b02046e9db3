//! Append-only audit log for administrative changes.
//!
//! Entries get auto-incrementing ids and live in persistent storage under
//! their own keys, so they never collide with contract state.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::{current_block, DEFAULT_AUDIT_QUERY_LIMIT, MAX_AUDIT_QUERY_LIMIT, RECORD_TTL_EXTEND, RECORD_TTL_THRESHOLD};

// ============================================================================
// AUDIT LOG TYPES
// ============================================================================

#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum OperationType {
    AdminTransferred = 1,

    // Staking
    CurveUpdated = 10,
    DistributionUpdated = 11,
    MaxLockUpdated = 12,
    FeeSourceUpdated = 13,

    // Registry
    MarketplaceLinked = 20,

    // Marketplace
    TreasuryFeeUpdated = 30,
}

/// Immutable audit log entry
#[contracttype]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditLog {
    pub id: u64,
    /// Block height at which the change was applied
    pub block: u64,
    pub operator: Address,
    pub operation_type: OperationType,
    /// New numeric value of the setting, when it has one
    pub value: Option<i128>,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct AuditLogQueryResult {
    pub logs: Vec<AuditLog>,
    pub total_count: u64,
    pub start_id: u64,
    pub end_id: u64,
    pub has_more: bool,
}

#[contracttype]
#[derive(Clone)]
pub enum AuditStorageKey {
    LogIdCounter,
    LogEntry(u64),
}

// ============================================================================
// STORAGE
// ============================================================================

pub fn get_log_id_counter(env: &Env) -> u64 {
    env.storage()
        .persistent()
        .get::<_, u64>(&AuditStorageKey::LogIdCounter)
        .unwrap_or(0)
}

fn increment_log_id_counter(env: &Env) -> u64 {
    let next = get_log_id_counter(env).saturating_add(1);
    let key = AuditStorageKey::LogIdCounter;
    env.storage().persistent().set(&key, &next);
    env.storage()
        .persistent()
        .extend_ttl(&key, RECORD_TTL_THRESHOLD, RECORD_TTL_EXTEND);
    next
}

pub fn get_audit_log(env: &Env, log_id: u64) -> Option<AuditLog> {
    env.storage()
        .persistent()
        .get(&AuditStorageKey::LogEntry(log_id))
}

// ============================================================================
// CREATION
// ============================================================================

pub fn record(
    env: &Env,
    operator: &Address,
    operation_type: OperationType,
    value: Option<i128>,
) -> u64 {
    let id = increment_log_id_counter(env);
    let log = AuditLog {
        id,
        block: current_block(env),
        operator: operator.clone(),
        operation_type,
        value,
    };

    let key = AuditStorageKey::LogEntry(id);
    env.storage().persistent().set(&key, &log);
    env.storage()
        .persistent()
        .extend_ttl(&key, RECORD_TTL_THRESHOLD, RECORD_TTL_EXTEND);
    id
}

// ============================================================================
// QUERYING
// ============================================================================

/// Returns logs in `[start_id, end_id]`, at most `max_results` of them.
/// A zero `start_id` means the first entry; a zero `max_results` means the
/// default page size.
pub fn query_audit_logs(env: &Env, start_id: u64, end_id: u64, max_results: u32) -> AuditLogQueryResult {
    let total_count = get_log_id_counter(env);

    let actual_start = if start_id == 0 { 1 } else { start_id };
    let actual_end = if end_id > total_count { total_count } else { end_id };
    let limit = match max_results {
        0 => DEFAULT_AUDIT_QUERY_LIMIT,
        n if n > MAX_AUDIT_QUERY_LIMIT => MAX_AUDIT_QUERY_LIMIT,
        n => n,
    };

    let mut logs: Vec<AuditLog> = Vec::new(env);

    if actual_start > actual_end {
        return AuditLogQueryResult {
            logs,
            total_count,
            start_id: actual_start,
            end_id: actual_end,
            has_more: false,
        };
    }

    let mut count = 0u32;
    let mut current_id = actual_start;

    while current_id <= actual_end && count < limit {
        if let Some(log) = get_audit_log(env, current_id) {
            logs.push_back(log);
            count += 1;
        }
        current_id += 1;
    }

    // stopped on the limit rather than the end of the range
    let has_more = count == limit && current_id <= actual_end;

    AuditLogQueryResult {
        logs,
        total_count,
        start_id: actual_start,
        end_id: if has_more { current_id - 1 } else { actual_end },
        has_more,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::{contract, contractimpl};

    #[contract]
    struct AuditHarness;

    #[contractimpl]
    impl AuditHarness {}

    #[test]
    fn ids_increment_and_pages_split() {
        let env = Env::default();
        let contract_id = env.register(AuditHarness, ());
        let operator = Address::generate(&env);

        env.as_contract(&contract_id, || {
            for bps in 0..5 {
                record(&env, &operator, OperationType::DistributionUpdated, Some(bps));
            }
            assert_eq!(get_log_id_counter(&env), 5);

            let first = query_audit_logs(&env, 0, 100, 2);
            assert_eq!(first.logs.len(), 2);
            assert!(first.has_more);
            assert_eq!(first.end_id, 2);

            let rest = query_audit_logs(&env, 3, 100, 0);
            assert_eq!(rest.logs.len(), 3);
            assert!(!rest.has_more);
            assert_eq!(rest.logs.get(2).unwrap().value, Some(4));

            let empty = query_audit_logs(&env, 9, 100, 0);
            assert_eq!(empty.logs.len(), 0);
        });
    }
}
