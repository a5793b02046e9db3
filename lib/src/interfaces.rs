//! Cross-contract clients.
//!
//! Each trait mirrors the subset of a contract's entry points that the other
//! BlocTime contracts call. The generated clients carry no contract exports,
//! so any contract can link them without symbol clashes.

use soroban_sdk::{contractclient, Address, ConversionError, Env, InvokeError};

use crate::{errors::ContractError, MarketplaceConfig, Module, Rental, StakingConfig};

#[contractclient(name = "StakingClient")]
pub trait StakingInterface {
    /// Credits a fee the caller already transferred to the staking contract.
    fn deposit_fee(env: Env, source: Address, amount: i128) -> Result<(), ContractError>;
    fn get_config(env: Env) -> Result<StakingConfig, ContractError>;
    fn total_staked(env: Env) -> i128;
    fn total_weight(env: Env) -> i128;
    fn treasury_balance(env: Env) -> i128;
}

#[contractclient(name = "RegistryClient")]
pub trait RegistryInterface {
    fn get_module(env: Env, module_id: u64) -> Result<Module, ContractError>;
    fn is_module_available(env: Env, module_id: u64) -> bool;
    fn increment_users(env: Env, module_id: u64) -> Result<u32, ContractError>;
    fn decrement_users(env: Env, module_id: u64) -> Result<u32, ContractError>;
    fn module_count(env: Env) -> u64;
    fn marketplace(env: Env) -> Result<Address, ContractError>;
}

#[contractclient(name = "MarketplaceClient")]
pub trait MarketplaceInterface {
    fn get_config(env: Env) -> Result<MarketplaceConfig, ContractError>;
    fn get_rental(env: Env, rental_id: u64) -> Result<Rental, ContractError>;
    fn rental_count(env: Env) -> u64;
}

/// Flattens the result of a `try_` client call.
///
/// A `ContractError` raised by the callee is passed through unchanged; a host
/// failure or an undecodable return value becomes `CrossContractFailed`.
pub fn call_result<T>(
    result: Result<Result<T, ConversionError>, Result<ContractError, InvokeError>>,
) -> Result<T, ContractError> {
    match result {
        Ok(Ok(value)) => Ok(value),
        Err(Ok(err)) => Err(err),
        _ => Err(ContractError::CrossContractFailed),
    }
}
