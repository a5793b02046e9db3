use bloctime_lib::{ContractError, Module, RECORD_TTL_EXTEND, RECORD_TTL_THRESHOLD};
use soroban_sdk::{contracttype, Address, Env, Vec};

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Only caller allowed to move capacity counters
    Marketplace,
    ModuleCounter,
    Module(u64),
    OwnerModules(Address),
}

/* ---------------- MARKETPLACE ---------------- */

pub fn get_marketplace(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Marketplace)
}

pub fn set_marketplace(env: &Env, marketplace: &Address) {
    env.storage().instance().set(&DataKey::Marketplace, marketplace);
}

/* ---------------- MODULES ---------------- */

pub fn get_module_count(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::ModuleCounter).unwrap_or(0)
}

pub fn next_module_id(env: &Env) -> Result<u64, ContractError> {
    let id = get_module_count(env)
        .checked_add(1)
        .ok_or(ContractError::ArithmeticOverflow)?;
    env.storage().instance().set(&DataKey::ModuleCounter, &id);
    Ok(id)
}

pub fn get_module(env: &Env, module_id: u64) -> Result<Module, ContractError> {
    env.storage()
        .persistent()
        .get(&DataKey::Module(module_id))
        .ok_or(ContractError::ModuleNotFound)
}

pub fn set_module(env: &Env, module: &Module) {
    let key = DataKey::Module(module.id);
    env.storage().persistent().set(&key, module);
    env.storage()
        .persistent()
        .extend_ttl(&key, RECORD_TTL_THRESHOLD, RECORD_TTL_EXTEND);
}

/* ---------------- OWNER INDEX ---------------- */

pub fn get_owner_modules(env: &Env, owner: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::OwnerModules(owner.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn owner_modules_append(env: &Env, owner: &Address, module_id: u64) {
    let key = DataKey::OwnerModules(owner.clone());
    let mut ids = get_owner_modules(env, owner);
    ids.push_back(module_id);
    env.storage().persistent().set(&key, &ids);
    env.storage()
        .persistent()
        .extend_ttl(&key, RECORD_TTL_THRESHOLD, RECORD_TTL_EXTEND);
}
