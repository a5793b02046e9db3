use soroban_sdk::{Address, Env, Symbol};

use crate::{errors::ContractError, ADMIN_KEY};

pub fn has_admin(env: &Env) -> bool {
    env.storage().instance().has(&Symbol::new(env, ADMIN_KEY))
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage()
        .instance()
        .set(&Symbol::new(env, ADMIN_KEY), admin);
}

pub fn get_admin(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&Symbol::new(env, ADMIN_KEY))
        .ok_or(ContractError::NotInitialized)
}

pub fn verify_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
    let admin = get_admin(env)?;
    if &admin != caller {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

/// Authenticates `caller` and checks it is the stored admin.
pub fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
    caller.require_auth();
    verify_admin(env, caller)
}

pub fn transfer_admin(
    env: &Env,
    current_admin: &Address,
    new_admin: &Address,
) -> Result<(), ContractError> {
    require_admin(env, current_admin)?;
    set_admin(env, new_admin);
    Ok(())
}
