use bloctime_lib::{ContractError, MultiplierPoint, Stake, StakingConfig, RECORD_TTL_EXTEND, RECORD_TTL_THRESHOLD};
use soroban_sdk::{contracttype, Address, Env, Vec};

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Token, lock ceiling, distribution share, fee source
    Config,
    /// Ordered multiplier control points
    Curve,
    /// Sum of every active stake's weight
    TotalWeight,
    /// Sum of every active stake's principal
    TotalStaked,
    /// Pooled fee income awaiting distribution
    Treasury,
    /// Active stake per owner (persistent)
    Stake(Address),
}

/* ---------------- CONFIG ---------------- */

pub fn get_config(env: &Env) -> Result<StakingConfig, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(ContractError::NotInitialized)
}

pub fn set_config(env: &Env, config: &StakingConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

/* ---------------- CURVE ---------------- */

pub fn get_curve(env: &Env) -> Vec<MultiplierPoint> {
    env.storage()
        .instance()
        .get(&DataKey::Curve)
        .unwrap_or(Vec::new(env))
}

pub fn set_curve(env: &Env, points: &Vec<MultiplierPoint>) {
    env.storage().instance().set(&DataKey::Curve, points);
}

/* ---------------- TOTALS ---------------- */

pub fn get_total_weight(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::TotalWeight).unwrap_or(0)
}

pub fn set_total_weight(env: &Env, total: i128) {
    env.storage().instance().set(&DataKey::TotalWeight, &total);
}

pub fn get_total_staked(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::TotalStaked).unwrap_or(0)
}

pub fn set_total_staked(env: &Env, total: i128) {
    env.storage().instance().set(&DataKey::TotalStaked, &total);
}

pub fn get_treasury(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::Treasury).unwrap_or(0)
}

pub fn set_treasury(env: &Env, balance: i128) {
    env.storage().instance().set(&DataKey::Treasury, &balance);
}

/* ---------------- STAKES ---------------- */

pub fn get_stake(env: &Env, owner: &Address) -> Option<Stake> {
    env.storage().persistent().get(&DataKey::Stake(owner.clone()))
}

pub fn set_stake(env: &Env, stake: &Stake) {
    let key = DataKey::Stake(stake.owner.clone());
    env.storage().persistent().set(&key, stake);
    env.storage()
        .persistent()
        .extend_ttl(&key, RECORD_TTL_THRESHOLD, RECORD_TTL_EXTEND);
}

pub fn remove_stake(env: &Env, owner: &Address) {
    env.storage().persistent().remove(&DataKey::Stake(owner.clone()));
}
