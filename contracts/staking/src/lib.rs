#![no_std]

#[cfg(test)]
extern crate std;

use bloctime_lib::{
    admin,
    audit::{self, AuditLogQueryResult, OperationType},
    current_block, extend_instance_ttl,
    validation::{mul_div, validate_bps, validate_positive_amount},
    ContractError, MultiplierPoint, Stake, StakingConfig, BPS_DENOMINATOR,
    DEFAULT_DISTRIBUTION_BPS, DEFAULT_MAX_LOCK_BLOCKS,
};
use soroban_sdk::{contract, contractimpl, symbol_short, token, Address, Env, Vec};

mod curve;
mod storage;

#[cfg(test)]
mod test;

use storage::*;

#[contract]
pub struct BlocTimeStaking;

#[contractimpl]
impl BlocTimeStaking {
    /// Initialize with the admin, the staked/payout token and optional
    /// lock ceiling and distribution share.
    pub fn init_contract(
        env: Env,
        admin: Address,
        token: Address,
        max_lock_blocks: Option<u64>,
        distribution_bps: Option<u32>,
    ) -> Result<(), ContractError> {
        if admin::has_admin(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        admin.require_auth();

        let distribution_bps = distribution_bps.unwrap_or(DEFAULT_DISTRIBUTION_BPS);
        validate_bps(distribution_bps)?;

        admin::set_admin(&env, &admin);
        set_config(
            &env,
            &StakingConfig {
                token,
                max_lock_blocks: max_lock_blocks.unwrap_or(DEFAULT_MAX_LOCK_BLOCKS),
                distribution_bps,
                fee_source: None,
            },
        );
        extend_instance_ttl(&env);

        env.events().publish((symbol_short!("init"),), admin);
        Ok(())
    }

    pub fn set_admin(env: Env, current_admin: Address, new_admin: Address) -> Result<(), ContractError> {
        admin::transfer_admin(&env, &current_admin, &new_admin)?;
        audit::record(&env, &current_admin, OperationType::AdminTransferred, None);
        Ok(())
    }

    pub fn get_config(env: Env) -> Result<StakingConfig, ContractError> {
        get_config(&env)
    }

    // ---------------- MULTIPLIER CURVE ----------------

    /// Replace the whole curve. Existing stakes keep the weight they were
    /// minted with.
    pub fn set_points(env: Env, admin: Address, points: Vec<MultiplierPoint>) -> Result<(), ContractError> {
        admin::require_admin(&env, &admin)?;
        curve::validate_points(&points)?;

        set_curve(&env, &points);
        extend_instance_ttl(&env);
        audit::record(&env, &admin, OperationType::CurveUpdated, Some(points.len() as i128));

        env.events().publish((symbol_short!("curve_set"),), points.len());
        Ok(())
    }

    /// Insert or replace a single control point.
    pub fn set_multiplier(
        env: Env,
        admin: Address,
        blocks: u64,
        multiplier_bps: u32,
    ) -> Result<(), ContractError> {
        admin::require_admin(&env, &admin)?;
        if multiplier_bps < bloctime_lib::BASE_MULTIPLIER_BPS {
            return Err(ContractError::MultiplierBelowBase);
        }

        let updated = curve::upsert_point(
            &env,
            &get_curve(&env),
            MultiplierPoint { blocks, multiplier_bps },
        );
        curve::validate_points(&updated)?;

        set_curve(&env, &updated);
        extend_instance_ttl(&env);
        audit::record(&env, &admin, OperationType::CurveUpdated, Some(multiplier_bps as i128));

        env.events().publish((symbol_short!("curve_set"),), updated.len());
        Ok(())
    }

    pub fn get_points(env: Env) -> Vec<MultiplierPoint> {
        get_curve(&env)
    }

    pub fn get_multiplier(env: Env, lock_blocks: u64) -> u32 {
        curve::multiplier_at(&get_curve(&env), lock_blocks)
    }

    // ---------------- STAKE LEDGER ----------------

    /// Lock `principal` for `lock_blocks` and mint weight from the curve.
    /// Returns the minted weight.
    pub fn stake(env: Env, owner: Address, principal: i128, lock_blocks: u64) -> Result<i128, ContractError> {
        owner.require_auth();
        validate_positive_amount(principal)?;

        let config = get_config(&env)?;
        if lock_blocks > config.max_lock_blocks {
            return Err(ContractError::ExceedsMaxLock);
        }
        if get_stake(&env, &owner).is_some() {
            return Err(ContractError::AlreadyStaking);
        }

        let multiplier = curve::multiplier_at(&get_curve(&env), lock_blocks);
        let weight = mul_div(principal, multiplier as i128, BPS_DENOMINATOR as i128)?;

        let total_weight = get_total_weight(&env)
            .checked_add(weight)
            .ok_or(ContractError::ArithmeticOverflow)?;
        let total_staked = get_total_staked(&env)
            .checked_add(principal)
            .ok_or(ContractError::ArithmeticOverflow)?;

        let stake = Stake {
            owner: owner.clone(),
            principal,
            lock_blocks,
            start_block: current_block(&env),
            weight,
        };
        set_stake(&env, &stake);
        set_total_weight(&env, total_weight);
        set_total_staked(&env, total_staked);
        extend_instance_ttl(&env);

        token::Client::new(&env, &config.token).transfer(
            &owner,
            &env.current_contract_address(),
            &principal,
        );

        env.events().publish(
            (symbol_short!("staked"), owner),
            (principal, lock_blocks, weight),
        );
        Ok(weight)
    }

    /// Return the full principal once the lock has elapsed and burn the weight.
    pub fn unstake(env: Env, owner: Address) -> Result<i128, ContractError> {
        owner.require_auth();

        let config = get_config(&env)?;
        let stake = get_stake(&env, &owner).ok_or(ContractError::NoActiveStake)?;
        if !stake.is_unlocked_at(current_block(&env)) {
            return Err(ContractError::StillLocked);
        }

        let total_weight = get_total_weight(&env) - stake.weight;
        if total_weight < 0 {
            return Err(ContractError::WeightUnderflow);
        }
        let total_staked = get_total_staked(&env) - stake.principal;
        if total_staked < 0 {
            return Err(ContractError::WeightUnderflow);
        }

        remove_stake(&env, &owner);
        set_total_weight(&env, total_weight);
        set_total_staked(&env, total_staked);
        extend_instance_ttl(&env);

        token::Client::new(&env, &config.token).transfer(
            &env.current_contract_address(),
            &owner,
            &stake.principal,
        );

        env.events().publish(
            (symbol_short!("unstaked"), owner),
            (stake.principal, stake.weight),
        );
        Ok(stake.principal)
    }

    pub fn get_stake_info(env: Env, owner: Address) -> Option<Stake> {
        get_stake(&env, &owner)
    }

    /// Derived weight balance; zero when `owner` has no active stake.
    pub fn weight_of(env: Env, owner: Address) -> i128 {
        get_stake(&env, &owner).map(|s| s.weight).unwrap_or(0)
    }

    pub fn total_weight(env: Env) -> i128 {
        get_total_weight(&env)
    }

    pub fn total_staked(env: Env) -> i128 {
        get_total_staked(&env)
    }

    pub fn set_max_lock_blocks(env: Env, admin: Address, max_lock_blocks: u64) -> Result<(), ContractError> {
        admin::require_admin(&env, &admin)?;
        let mut config = get_config(&env)?;
        config.max_lock_blocks = max_lock_blocks;
        set_config(&env, &config);
        extend_instance_ttl(&env);
        audit::record(&env, &admin, OperationType::MaxLockUpdated, Some(max_lock_blocks as i128));

        env.events().publish((symbol_short!("max_lock"),), max_lock_blocks);
        Ok(())
    }

    // ---------------- TREASURY ----------------

    /// Move `amount` from `from` into the treasury pool.
    pub fn fund_treasury(env: Env, from: Address, amount: i128) -> Result<(), ContractError> {
        from.require_auth();
        validate_positive_amount(amount)?;

        let config = get_config(&env)?;
        let balance = get_treasury(&env)
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        set_treasury(&env, balance);
        extend_instance_ttl(&env);

        token::Client::new(&env, &config.token).transfer(&from, &env.current_contract_address(), &amount);

        env.events().publish((symbol_short!("funded"), from), (amount, balance));
        Ok(())
    }

    /// Credit a sale fee that `source` has already transferred here.
    ///
    /// Only the configured fee source may call this, and the contract's token
    /// holdings must still cover the treasury plus all staked principal.
    pub fn deposit_fee(env: Env, source: Address, amount: i128) -> Result<(), ContractError> {
        source.require_auth();
        validate_positive_amount(amount)?;

        let config = get_config(&env)?;
        if config.fee_source.as_ref() != Some(&source) {
            return Err(ContractError::Unauthorized);
        }

        let balance = get_treasury(&env)
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        let required = balance
            .checked_add(get_total_staked(&env))
            .ok_or(ContractError::ArithmeticOverflow)?;
        let held = token::Client::new(&env, &config.token).balance(&env.current_contract_address());
        if held < required {
            return Err(ContractError::UnbackedDeposit);
        }

        set_treasury(&env, balance);
        extend_instance_ttl(&env);

        env.events().publish((symbol_short!("fee_in"), source), (amount, balance));
        Ok(())
    }

    pub fn set_fee_source(env: Env, admin: Address, source: Address) -> Result<(), ContractError> {
        admin::require_admin(&env, &admin)?;
        let mut config = get_config(&env)?;
        config.fee_source = Some(source.clone());
        set_config(&env, &config);
        extend_instance_ttl(&env);
        audit::record(&env, &admin, OperationType::FeeSourceUpdated, None);

        env.events().publish((symbol_short!("fee_src"),), source);
        Ok(())
    }

    pub fn set_distribution_bps(env: Env, admin: Address, bps: u32) -> Result<(), ContractError> {
        admin::require_admin(&env, &admin)?;
        validate_bps(bps)?;

        let mut config = get_config(&env)?;
        config.distribution_bps = bps;
        set_config(&env, &config);
        extend_instance_ttl(&env);
        audit::record(&env, &admin, OperationType::DistributionUpdated, Some(bps as i128));

        env.events().publish((symbol_short!("dist_set"),), bps);
        Ok(())
    }

    pub fn treasury_balance(env: Env) -> i128 {
        get_treasury(&env)
    }

    /// Live share of the eligible pool:
    /// `treasury * distribution_bps / 10_000 * weight / total_weight`.
    ///
    /// Recomputed from the current balance on every call, so earlier claims
    /// shrink what later claimants see.
    pub fn pending_rewards(env: Env, owner: Address) -> Result<i128, ContractError> {
        let config = get_config(&env)?;
        Self::compute_rewards(&env, &config, &owner)
    }

    pub fn claim_rewards(env: Env, owner: Address) -> Result<i128, ContractError> {
        owner.require_auth();

        let config = get_config(&env)?;
        let reward = Self::compute_rewards(&env, &config, &owner)?;
        if reward == 0 {
            return Err(ContractError::NothingToClaim);
        }

        let balance = get_treasury(&env) - reward;
        set_treasury(&env, balance);
        extend_instance_ttl(&env);

        token::Client::new(&env, &config.token).transfer(&env.current_contract_address(), &owner, &reward);

        env.events().publish((symbol_short!("claimed"), owner), (reward, balance));
        Ok(reward)
    }

    pub fn get_audit_logs(env: Env, start_id: u64, end_id: u64, max_results: u32) -> AuditLogQueryResult {
        audit::query_audit_logs(&env, start_id, end_id, max_results)
    }
}

impl BlocTimeStaking {
    fn compute_rewards(env: &Env, config: &StakingConfig, owner: &Address) -> Result<i128, ContractError> {
        let total_weight = get_total_weight(env);
        let weight = match get_stake(env, owner) {
            Some(stake) => stake.weight,
            None => return Ok(0),
        };
        if total_weight == 0 || weight == 0 {
            return Ok(0);
        }

        let eligible = mul_div(
            get_treasury(env),
            config.distribution_bps as i128,
            BPS_DENOMINATOR as i128,
        )?;
        mul_div(eligible, weight, total_weight)
    }
}
