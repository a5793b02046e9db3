#![no_std]

//! Read-only view across the staking, registry and marketplace contracts.
//!
//! Components are probed through the fallible client calls, so a broken or
//! miswired contract shows up in the report instead of aborting it.

use bloctime_lib::{
    admin, extend_instance_ttl, ContractError, MarketplaceClient, RegistryClient, StakingClient,
    SystemStats,
};
use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, Address, Env, String};


const STATUS_OK: &str = "All systems operational";

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Wiring,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Wiring {
    pub marketplace: Address,
    pub registry: Address,
    pub staking: Address,
}

fn get_wiring(env: &Env) -> Result<Wiring, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Wiring)
        .ok_or(ContractError::NotInitialized)
}

#[contract]
pub struct BlocTimeIntegration;

#[contractimpl]
impl BlocTimeIntegration {
    pub fn init_contract(
        env: Env,
        admin: Address,
        marketplace: Address,
        registry: Address,
        staking: Address,
    ) -> Result<(), ContractError> {
        if admin::has_admin(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        admin.require_auth();
        admin::set_admin(&env, &admin);
        env.storage().instance().set(
            &DataKey::Wiring,
            &Wiring {
                marketplace,
                registry,
                staking,
            },
        );
        extend_instance_ttl(&env);

        env.events().publish((symbol_short!("init"),), admin);
        Ok(())
    }

    pub fn get_wiring(env: Env) -> Result<Wiring, ContractError> {
        get_wiring(&env)
    }

    /// `(marketplace_ok, registry_ok, staking_ok, status)`.
    ///
    /// A component is healthy when it answers and points back at the same
    /// contracts this view was wired with.
    pub fn health_check(env: Env) -> Result<(bool, bool, bool, String), ContractError> {
        let wiring = get_wiring(&env)?;

        let marketplace_ok = match MarketplaceClient::new(&env, &wiring.marketplace).try_get_config() {
            Ok(Ok(config)) => config.registry == wiring.registry && config.staking == wiring.staking,
            _ => false,
        };
        let registry_ok = match RegistryClient::new(&env, &wiring.registry).try_marketplace() {
            Ok(Ok(marketplace)) => marketplace == wiring.marketplace,
            _ => false,
        };
        let staking_ok = match StakingClient::new(&env, &wiring.staking).try_get_config() {
            Ok(Ok(config)) => config.fee_source == Some(wiring.marketplace.clone()),
            _ => false,
        };

        let status = if !marketplace_ok {
            "Marketplace unreachable or miswired"
        } else if !registry_ok {
            "Registry not linked to marketplace"
        } else if !staking_ok {
            "Staking not accepting marketplace fees"
        } else {
            STATUS_OK
        };

        Ok((marketplace_ok, registry_ok, staking_ok, String::from_str(&env, status)))
    }

    pub fn get_system_stats(env: Env) -> Result<SystemStats, ContractError> {
        let wiring = get_wiring(&env)?;
        let staking = StakingClient::new(&env, &wiring.staking);

        Ok(SystemStats {
            total_modules: RegistryClient::new(&env, &wiring.registry).module_count(),
            total_rentals: MarketplaceClient::new(&env, &wiring.marketplace).rental_count(),
            total_staked: staking.total_staked(),
            total_weight: staking.total_weight(),
            treasury_balance: staking.treasury_balance(),
        })
    }

    pub fn validate_module_registration(env: Env, module_id: u64) -> Result<(bool, String), ContractError> {
        let wiring = get_wiring(&env)?;
        let reason = match RegistryClient::new(&env, &wiring.registry).try_get_module(&module_id) {
            Ok(Ok(module)) => {
                if !module.active {
                    "Module inactive"
                } else if module.active_rental_count > module.max_concurrent_users {
                    "Active rentals exceed capacity"
                } else {
                    "Module valid"
                }
            }
            _ => "Module not found",
        };
        Ok((reason == "Module valid", String::from_str(&env, reason)))
    }

    pub fn validate_rental_flow(env: Env, rental_id: u64) -> Result<(bool, String), ContractError> {
        let wiring = get_wiring(&env)?;
        let reason = match MarketplaceClient::new(&env, &wiring.marketplace).try_get_rental(&rental_id) {
            Ok(Ok(rental)) => {
                let registry = RegistryClient::new(&env, &wiring.registry);
                if !matches!(registry.try_get_module(&rental.module_id), Ok(Ok(_))) {
                    "Rental module missing"
                } else if rental.paid_blocks == 0 {
                    "Rental has no paid blocks"
                } else {
                    "Rental valid"
                }
            }
            _ => "Rental not found",
        };
        Ok((reason == "Rental valid", String::from_str(&env, reason)))
    }
}
