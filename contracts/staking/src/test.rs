#![cfg(test)]

use bloctime_lib::{audit::OperationType, ContractError, MultiplierPoint};
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{token, vec, Address, Env};

use crate::{BlocTimeStaking, BlocTimeStakingClient};

struct Setup<'a> {
    env: Env,
    admin: Address,
    token: token::Client<'a>,
    token_admin: token::StellarAssetClient<'a>,
    staking: BlocTimeStakingClient<'a>,
}

fn setup<'a>() -> Setup<'a> {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let issuer = Address::generate(&env);
    let token_id = env.register_stellar_asset_contract_v2(issuer).address();
    let token = token::Client::new(&env, &token_id);
    let token_admin = token::StellarAssetClient::new(&env, &token_id);

    let contract_id = env.register(BlocTimeStaking, ());
    let staking = BlocTimeStakingClient::new(&env, &contract_id);
    staking.init_contract(&admin, &token_id, &None, &None);

    Setup { env, admin, token, token_admin, staking }
}

fn funded_user(s: &Setup, amount: i128) -> Address {
    let user = Address::generate(&s.env);
    s.token_admin.mint(&user, &amount);
    user
}

fn set_block(env: &Env, block: u32) {
    env.ledger().with_mut(|li| li.sequence_number = block);
}

fn linear_curve(s: &Setup) {
    s.staking.set_points(
        &s.admin,
        &vec![
            &s.env,
            MultiplierPoint { blocks: 0, multiplier_bps: 10_000 },
            MultiplierPoint { blocks: 10_000, multiplier_bps: 20_000 },
        ],
    );
}

#[test]
fn test_init_defaults_and_double_init() {
    let s = setup();
    let config = s.staking.get_config();
    assert_eq!(config.max_lock_blocks, 100_000);
    assert_eq!(config.distribution_bps, 5_000);
    assert_eq!(config.fee_source, None);

    let result = s.staking.try_init_contract(&s.admin, &s.token.address, &None, &None);
    assert_eq!(result, Err(Ok(ContractError::AlreadyInitialized)));
}

#[test]
fn test_init_rejects_distribution_above_full() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(BlocTimeStaking, ());
    let staking = BlocTimeStakingClient::new(&env, &contract_id);

    let result = staking.try_init_contract(
        &Address::generate(&env),
        &Address::generate(&env),
        &None,
        &Some(10_001),
    );
    assert_eq!(result, Err(Ok(ContractError::InvalidBps)));
}

#[test]
fn test_curve_admin_only_and_validated() {
    let s = setup();
    let stranger = Address::generate(&s.env);
    let points = vec![&s.env, MultiplierPoint { blocks: 0, multiplier_bps: 10_000 }];

    assert_eq!(
        s.staking.try_set_points(&stranger, &points),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        s.staking.try_set_multiplier(&s.admin, &100, &9_999),
        Err(Ok(ContractError::MultiplierBelowBase))
    );

    s.staking.set_multiplier(&s.admin, &10_000, &20_000);
    s.staking.set_multiplier(&s.admin, &0, &10_000);
    assert_eq!(s.staking.get_points().len(), 2);
    assert_eq!(s.staking.get_multiplier(&5_000), 15_000);

    // a higher point with a lower multiplier would break monotonicity
    assert_eq!(
        s.staking.try_set_multiplier(&s.admin, &20_000, &15_000),
        Err(Ok(ContractError::InvalidCurve))
    );
    assert_eq!(s.staking.get_points().len(), 2);
}

#[test]
fn test_stake_mints_weight_from_curve() {
    let s = setup();
    linear_curve(&s);
    let user = funded_user(&s, 1_000);

    let weight = s.staking.stake(&user, &1_000, &10_000);
    assert_eq!(weight, 2_000);
    assert_eq!(s.staking.weight_of(&user), 2_000);
    assert_eq!(s.staking.total_weight(), 2_000);
    assert_eq!(s.staking.total_staked(), 1_000);
    assert_eq!(s.token.balance(&user), 0);
    assert_eq!(s.token.balance(&s.staking.address), 1_000);

    let info = s.staking.get_stake_info(&user).unwrap();
    assert_eq!(info.principal, 1_000);
    assert_eq!(info.lock_blocks, 10_000);
}

#[test]
fn test_stake_without_curve_is_one_to_one() {
    let s = setup();
    let user = funded_user(&s, 500);
    assert_eq!(s.staking.stake(&user, &500, &1_000), 500);
}

#[test]
fn test_stake_rejections() {
    let s = setup();
    let user = funded_user(&s, 1_000);

    assert_eq!(
        s.staking.try_stake(&user, &0, &10),
        Err(Ok(ContractError::InvalidAmount))
    );
    assert_eq!(
        s.staking.try_stake(&user, &100, &100_001),
        Err(Ok(ContractError::ExceedsMaxLock))
    );

    s.staking.stake(&user, &100, &10);
    assert_eq!(
        s.staking.try_stake(&user, &100, &10),
        Err(Ok(ContractError::AlreadyStaking))
    );
}

#[test]
fn test_unstake_gated_by_lock() {
    let s = setup();
    set_block(&s.env, 100);
    let user = funded_user(&s, 1_000);
    s.staking.stake(&user, &1_000, &500);

    set_block(&s.env, 599);
    assert_eq!(s.staking.try_unstake(&user), Err(Ok(ContractError::StillLocked)));

    set_block(&s.env, 600);
    assert_eq!(s.staking.unstake(&user), 1_000);
    assert_eq!(s.token.balance(&user), 1_000);
    assert_eq!(s.staking.weight_of(&user), 0);
    assert_eq!(s.staking.total_weight(), 0);
    assert_eq!(s.staking.total_staked(), 0);
    assert!(s.staking.get_stake_info(&user).is_none());

    assert_eq!(s.staking.try_unstake(&user), Err(Ok(ContractError::NoActiveStake)));
}

#[test]
fn test_max_lock_update() {
    let s = setup();
    s.staking.set_max_lock_blocks(&s.admin, &50);
    let user = funded_user(&s, 100);
    assert_eq!(
        s.staking.try_stake(&user, &100, &51),
        Err(Ok(ContractError::ExceedsMaxLock))
    );
    s.staking.stake(&user, &100, &50);
}

#[test]
fn test_rewards_split_by_weight() {
    let s = setup();
    let alice = funded_user(&s, 1_000);
    let bob = funded_user(&s, 3_000);
    let funder = funded_user(&s, 10_000);

    s.staking.stake(&alice, &1_000, &0);
    s.staking.stake(&bob, &3_000, &0);
    s.staking.fund_treasury(&funder, &10_000);
    assert_eq!(s.staking.treasury_balance(), 10_000);

    assert_eq!(s.staking.pending_rewards(&alice), 1_250);
    assert_eq!(s.staking.pending_rewards(&bob), 3_750);

    s.staking.set_distribution_bps(&s.admin, &7_500);
    assert_eq!(s.staking.pending_rewards(&bob), 5_625);
}

#[test]
fn test_claims_recompute_from_remaining_balance() {
    let s = setup();
    let alice = funded_user(&s, 1_000);
    let bob = funded_user(&s, 3_000);
    let funder = funded_user(&s, 10_000);

    s.staking.stake(&alice, &1_000, &0);
    s.staking.stake(&bob, &3_000, &0);
    s.staking.fund_treasury(&funder, &10_000);

    assert_eq!(s.staking.claim_rewards(&alice), 1_250);
    assert_eq!(s.token.balance(&alice), 1_250);
    assert_eq!(s.staking.treasury_balance(), 8_750);

    // 8_750 * 50% * 3/4, floored
    assert_eq!(s.staking.pending_rewards(&bob), 3_281);
    assert_eq!(s.staking.claim_rewards(&bob), 3_281);
    assert_eq!(s.staking.treasury_balance(), 5_469);
}

#[test]
fn test_nothing_to_claim() {
    let s = setup();
    let user = funded_user(&s, 100);

    // no stake
    assert_eq!(s.staking.pending_rewards(&user), 0);
    assert_eq!(s.staking.try_claim_rewards(&user), Err(Ok(ContractError::NothingToClaim)));

    // stake but empty treasury
    s.staking.stake(&user, &100, &0);
    assert_eq!(s.staking.try_claim_rewards(&user), Err(Ok(ContractError::NothingToClaim)));

    // zero distribution share
    let funder = funded_user(&s, 1_000);
    s.staking.fund_treasury(&funder, &1_000);
    s.staking.set_distribution_bps(&s.admin, &0);
    assert_eq!(s.staking.try_claim_rewards(&user), Err(Ok(ContractError::NothingToClaim)));
}

#[test]
fn test_deposit_fee_requires_fee_source_and_backing() {
    let s = setup();
    let marketplace = funded_user(&s, 1_000);

    assert_eq!(
        s.staking.try_deposit_fee(&marketplace, &100),
        Err(Ok(ContractError::Unauthorized))
    );

    s.staking.set_fee_source(&s.admin, &marketplace);
    assert_eq!(s.staking.get_config().fee_source, Some(marketplace.clone()));

    // nothing transferred yet
    assert_eq!(
        s.staking.try_deposit_fee(&marketplace, &100),
        Err(Ok(ContractError::UnbackedDeposit))
    );

    s.token.transfer(&marketplace, &s.staking.address, &100);
    s.staking.deposit_fee(&marketplace, &100);
    assert_eq!(s.staking.treasury_balance(), 100);

    let other = Address::generate(&s.env);
    assert_eq!(
        s.staking.try_deposit_fee(&other, &1),
        Err(Ok(ContractError::Unauthorized))
    );
}

#[test]
fn test_deposit_fee_cannot_claim_staked_principal() {
    let s = setup();
    let marketplace = Address::generate(&s.env);
    s.staking.set_fee_source(&s.admin, &marketplace);

    let user = funded_user(&s, 1_000);
    s.staking.stake(&user, &1_000, &0);

    // contract holds 1_000 of principal, none of it is fee income
    assert_eq!(
        s.staking.try_deposit_fee(&marketplace, &500),
        Err(Ok(ContractError::UnbackedDeposit))
    );
}

#[test]
fn test_admin_changes_are_audited() {
    let s = setup();
    linear_curve(&s);
    s.staking.set_distribution_bps(&s.admin, &6_000);
    s.staking.set_max_lock_blocks(&s.admin, &20_000);

    let logs = s.staking.get_audit_logs(&0, &100, &0);
    assert_eq!(logs.total_count, 3);
    assert_eq!(logs.logs.get(0).unwrap().operation_type, OperationType::CurveUpdated);
    let dist = logs.logs.get(1).unwrap();
    assert_eq!(dist.operation_type, OperationType::DistributionUpdated);
    assert_eq!(dist.value, Some(6_000));
    assert_eq!(dist.operator, s.admin);
}

#[test]
fn test_set_admin_hands_over_control() {
    let s = setup();
    let next = Address::generate(&s.env);
    s.staking.set_admin(&s.admin, &next);

    assert_eq!(
        s.staking.try_set_distribution_bps(&s.admin, &1_000),
        Err(Ok(ContractError::Unauthorized))
    );
    s.staking.set_distribution_bps(&next, &1_000);
    assert_eq!(s.staking.get_config().distribution_bps, 1_000);
}

#[test]
fn test_full_cycle() {
    let s = setup();
    linear_curve(&s);
    set_block(&s.env, 10);

    let user = funded_user(&s, 1_000);
    let funder = funded_user(&s, 4_000);

    assert_eq!(s.staking.stake(&user, &1_000, &1_000), 1_100);
    s.staking.fund_treasury(&funder, &4_000);

    // sole staker takes the whole eligible half
    assert_eq!(s.staking.claim_rewards(&user), 2_000);

    set_block(&s.env, 1_010);
    assert_eq!(s.staking.unstake(&user), 1_000);
    assert_eq!(s.token.balance(&user), 3_000);
    assert_eq!(s.token.balance(&s.staking.address), 2_000);
    assert_eq!(s.staking.treasury_balance(), 2_000);
}
