#![no_std]

use bloctime_lib::{
    admin,
    audit::{self, AuditLogQueryResult, OperationType},
    extend_instance_ttl,
    validation::validate_content_hash,
    ContractError, Module,
};
use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, String, Vec};

mod storage;


use storage::*;

#[contract]
pub struct BlocTimeRegistry;

#[contractimpl]
impl BlocTimeRegistry {
    /// Initialize contract with admin
    pub fn init_contract(env: Env, admin: Address) -> Result<(), ContractError> {
        if admin::has_admin(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        admin.require_auth();
        admin::set_admin(&env, &admin);
        extend_instance_ttl(&env);

        env.events().publish((symbol_short!("init"),), admin);
        Ok(())
    }

    pub fn set_admin(env: Env, current_admin: Address, new_admin: Address) -> Result<(), ContractError> {
        admin::transfer_admin(&env, &current_admin, &new_admin)?;
        audit::record(&env, &current_admin, OperationType::AdminTransferred, None);
        Ok(())
    }

    /// Wire the marketplace allowed to move capacity counters.
    pub fn set_marketplace(env: Env, admin: Address, marketplace: Address) -> Result<(), ContractError> {
        admin::require_admin(&env, &admin)?;
        set_marketplace(&env, &marketplace);
        extend_instance_ttl(&env);
        audit::record(&env, &admin, OperationType::MarketplaceLinked, None);
        Ok(())
    }

    pub fn marketplace(env: Env) -> Result<Address, ContractError> {
        get_marketplace(&env).ok_or(ContractError::NotInitialized)
    }

    // ---------------- MODULES ----------------

    pub fn register_module(
        env: Env,
        owner: Address,
        price_per_block: i128,
        max_concurrent_users: u32,
        content_hash: String,
    ) -> Result<u64, ContractError> {
        owner.require_auth();
        if !admin::has_admin(&env) {
            return Err(ContractError::NotInitialized);
        }
        if price_per_block <= 0 {
            return Err(ContractError::InvalidPrice);
        }
        if max_concurrent_users == 0 {
            return Err(ContractError::InvalidMaxUsers);
        }
        validate_content_hash(&content_hash)?;

        let module_id = next_module_id(&env)?;
        let module = Module {
            id: module_id,
            owner: owner.clone(),
            price_per_block,
            max_concurrent_users,
            content_hash,
            active_rental_count: 0,
            active: true,
        };
        set_module(&env, &module);
        owner_modules_append(&env, &owner, module_id);
        extend_instance_ttl(&env);

        env.events().publish(
            (symbol_short!("mod_reg"), owner),
            (module_id, price_per_block, max_concurrent_users),
        );
        Ok(module_id)
    }

    /// Reprice or resize a module. Capacity can never drop below the
    /// rentals already holding a slot.
    pub fn update_module(
        env: Env,
        caller: Address,
        module_id: u64,
        new_price: i128,
        new_max_users: u32,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        let mut module = get_module(&env, module_id)?;
        if module.owner != caller {
            return Err(ContractError::NotModuleOwner);
        }
        if new_price <= 0 {
            return Err(ContractError::InvalidPrice);
        }
        if new_max_users == 0 {
            return Err(ContractError::InvalidMaxUsers);
        }
        if new_max_users < module.active_rental_count {
            return Err(ContractError::MaxUsersBelowCurrent);
        }

        module.price_per_block = new_price;
        module.max_concurrent_users = new_max_users;
        set_module(&env, &module);
        extend_instance_ttl(&env);

        env.events().publish(
            (symbol_short!("mod_upd"), module_id),
            (new_price, new_max_users),
        );
        Ok(())
    }

    /// Take a module off the market. Existing rentals run out normally.
    pub fn deactivate_module(env: Env, caller: Address, module_id: u64) -> Result<(), ContractError> {
        caller.require_auth();
        let mut module = get_module(&env, module_id)?;
        if module.owner != caller {
            return Err(ContractError::NotModuleOwner);
        }

        module.active = false;
        set_module(&env, &module);
        extend_instance_ttl(&env);

        env.events().publish((symbol_short!("mod_off"), module_id), caller);
        Ok(())
    }

    pub fn is_module_available(env: Env, module_id: u64) -> bool {
        get_module(&env, module_id)
            .map(|m| m.is_available())
            .unwrap_or(false)
    }

    pub fn get_module(env: Env, module_id: u64) -> Result<Module, ContractError> {
        get_module(&env, module_id)
    }

    pub fn get_user_modules(env: Env, owner: Address) -> Vec<u64> {
        get_owner_modules(&env, &owner)
    }

    pub fn module_count(env: Env) -> u64 {
        get_module_count(&env)
    }

    // ---------------- CAPACITY ----------------

    /// Claim a rental slot. Marketplace only.
    pub fn increment_users(env: Env, module_id: u64) -> Result<u32, ContractError> {
        Self::require_marketplace(&env)?;
        let mut module = get_module(&env, module_id)?;
        if !module.active {
            return Err(ContractError::ModuleInactive);
        }
        if !module.has_capacity() {
            return Err(ContractError::ModuleFull);
        }

        module.active_rental_count += 1;
        set_module(&env, &module);

        env.events().publish(
            (symbol_short!("users"), module_id),
            module.active_rental_count,
        );
        Ok(module.active_rental_count)
    }

    /// Release a rental slot. Marketplace only.
    pub fn decrement_users(env: Env, module_id: u64) -> Result<u32, ContractError> {
        Self::require_marketplace(&env)?;
        let mut module = get_module(&env, module_id)?;
        module.active_rental_count = module
            .active_rental_count
            .checked_sub(1)
            .ok_or(ContractError::RentalCountUnderflow)?;
        set_module(&env, &module);

        env.events().publish(
            (symbol_short!("users"), module_id),
            module.active_rental_count,
        );
        Ok(module.active_rental_count)
    }

    pub fn get_audit_logs(env: Env, start_id: u64, end_id: u64, max_results: u32) -> AuditLogQueryResult {
        audit::query_audit_logs(&env, start_id, end_id, max_results)
    }
}

impl BlocTimeRegistry {
    fn require_marketplace(env: &Env) -> Result<(), ContractError> {
        let marketplace = get_marketplace(env).ok_or(ContractError::NotInitialized)?;
        marketplace.require_auth();
        Ok(())
    }
}
