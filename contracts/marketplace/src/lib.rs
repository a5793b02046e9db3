#![no_std]

use bloctime_lib::{
    admin,
    audit::{self, AuditLogQueryResult, OperationType},
    call_result, current_block, extend_instance_ttl,
    validation::{apply_bps, validate_bps, validate_positive_amount},
    ContractError, Listing, MarketplaceConfig, Module, RegistryClient, Rental, StakingClient,
    DEFAULT_TREASURY_FEE_BPS,
};
use soroban_sdk::{contract, contractimpl, symbol_short, token, Address, Env, Vec};

mod storage;


use storage::*;

#[contract]
pub struct BlocTimeMarketplace;

#[contractimpl]
impl BlocTimeMarketplace {
    /// Initialize with the payment token, the staking contract that receives
    /// sale fees and the module registry.
    pub fn init_contract(
        env: Env,
        admin: Address,
        token: Address,
        staking: Address,
        registry: Address,
        treasury_fee_bps: Option<u32>,
    ) -> Result<(), ContractError> {
        if has_config(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        admin.require_auth();

        let treasury_fee_bps = treasury_fee_bps.unwrap_or(DEFAULT_TREASURY_FEE_BPS);
        validate_bps(treasury_fee_bps)?;

        admin::set_admin(&env, &admin);
        set_config(
            &env,
            &MarketplaceConfig {
                token,
                staking,
                registry,
                treasury_fee_bps,
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

    pub fn set_treasury_fee_bps(env: Env, admin: Address, bps: u32) -> Result<(), ContractError> {
        admin::require_admin(&env, &admin)?;
        validate_bps(bps)?;

        let mut config = get_config(&env)?;
        config.treasury_fee_bps = bps;
        set_config(&env, &config);
        extend_instance_ttl(&env);
        audit::record(&env, &admin, OperationType::TreasuryFeeUpdated, Some(bps as i128));
        Ok(())
    }

    pub fn get_config(env: Env) -> Result<MarketplaceConfig, ContractError> {
        get_config(&env)
    }

    // ---------------- RENTALS ----------------

    /// Pay `price_per_block * blocks` upfront for access starting now.
    pub fn rent(env: Env, renter: Address, module_id: u64, blocks: u64) -> Result<u64, ContractError> {
        renter.require_auth();
        if blocks == 0 {
            return Err(ContractError::InvalidBlocks);
        }

        let config = get_config(&env)?;
        let registry = RegistryClient::new(&env, &config.registry);
        let module: Module = call_result(registry.try_get_module(&module_id))?;
        if !module.active {
            return Err(ContractError::ModuleInactive);
        }
        if !module.has_capacity() {
            return Err(ContractError::ModuleFull);
        }

        let cost = module
            .price_per_block
            .checked_mul(blocks as i128)
            .ok_or(ContractError::ArithmeticOverflow)?;

        let rental_id = next_rental_id(&env)?;
        let rental = Rental {
            id: rental_id,
            renter: renter.clone(),
            module_id,
            start_block: current_block(&env),
            paid_blocks: blocks,
            active: true,
            parent_rental: None,
            sold_blocks: 0,
        };
        set_rental(&env, &rental);
        user_rentals_append(&env, &renter, rental_id);
        extend_instance_ttl(&env);

        call_result(registry.try_increment_users(&module_id))?;
        Self::settle_payment(&env, &config, &renter, &module.owner, cost)?;

        env.events().publish(
            (symbol_short!("rented"), renter),
            (rental_id, module_id, blocks, cost),
        );
        Ok(rental_id)
    }

    /// Stop a rental early. Its capacity slot is released and every open
    /// listing on it is withdrawn; blocks already sold stay with their buyers.
    pub fn end_rental(env: Env, caller: Address, rental_id: u64) -> Result<(), ContractError> {
        caller.require_auth();

        let config = get_config(&env)?;
        let mut rental = get_rental(&env, rental_id)?;
        if rental.renter != caller {
            return Err(ContractError::NotRenter);
        }
        if !rental.active {
            return Err(ContractError::RentalInactive);
        }

        rental.active = false;
        set_rental(&env, &rental);
        Self::withdraw_open_listings(&env, rental_id)?;

        call_result(RegistryClient::new(&env, &config.registry).try_decrement_users(&rental.module_id))?;

        env.events().publish((symbol_short!("rent_end"), caller), rental_id);
        Ok(())
    }

    /// `max(0, start + paid - now)`.
    pub fn get_remaining_blocks(env: Env, rental_id: u64) -> Result<u64, ContractError> {
        let rental = get_rental(&env, rental_id)?;
        Ok(rental.remaining_at(current_block(&env)))
    }

    pub fn get_rental(env: Env, rental_id: u64) -> Result<Rental, ContractError> {
        get_rental(&env, rental_id)
    }

    pub fn get_user_rentals(env: Env, user: Address) -> Vec<u64> {
        get_user_rentals(&env, &user)
    }

    pub fn rental_count(env: Env) -> u64 {
        get_rental_count(&env)
    }

    // ---------------- FRACTIONAL RESALE ----------------

    /// Offer `[from_block, to_block)` of a rental for `price`.
    pub fn list_fractional_for_sale(
        env: Env,
        seller: Address,
        rental_id: u64,
        from_block: u64,
        to_block: u64,
        price: i128,
    ) -> Result<u64, ContractError> {
        seller.require_auth();
        validate_positive_amount(price)?;

        let rental = get_rental(&env, rental_id)?;
        if rental.renter != seller {
            return Err(ContractError::NotRenter);
        }
        if !rental.active {
            return Err(ContractError::RentalInactive);
        }
        // only blocks that have not elapsed can be resold
        if !rental.contains_range(from_block, to_block) || from_block < current_block(&env) {
            return Err(ContractError::InvalidRange);
        }

        for listing in get_rental_listings(&env, rental_id)?.iter() {
            if listing.books_interval() && listing.overlaps(from_block, to_block) {
                return Err(ContractError::OverlappingListing);
            }
        }

        let listing_id = next_listing_id(&env)?;
        let listing = Listing {
            id: listing_id,
            seller: seller.clone(),
            rental_id,
            from_block,
            to_block,
            price,
            active: true,
            sold: false,
        };
        set_listing(&env, &listing);
        rental_listings_append(&env, rental_id, listing_id);
        extend_instance_ttl(&env);

        env.events().publish(
            (symbol_short!("listed"), seller),
            (listing_id, rental_id, from_block, to_block, price),
        );
        Ok(listing_id)
    }

    pub fn cancel_listing(env: Env, seller: Address, listing_id: u64) -> Result<(), ContractError> {
        seller.require_auth();

        let mut listing = get_listing(&env, listing_id)?;
        if listing.seller != seller {
            return Err(ContractError::NotRenter);
        }
        if !listing.active {
            return Err(ContractError::ListingInactive);
        }

        listing.active = false;
        set_listing(&env, &listing);

        env.events().publish((symbol_short!("unlisted"), seller), listing_id);
        Ok(())
    }

    /// Buy a listed interval. The buyer receives a new rental over exactly
    /// that interval, holding its own capacity slot.
    pub fn buy(env: Env, buyer: Address, listing_id: u64) -> Result<u64, ContractError> {
        buyer.require_auth();

        let config = get_config(&env)?;
        let mut listing = get_listing(&env, listing_id)?;
        if !listing.active {
            return Err(ContractError::ListingInactive);
        }
        if listing.from_block < current_block(&env) {
            return Err(ContractError::InvalidRange);
        }
        let mut parent = get_rental(&env, listing.rental_id)?;
        if !parent.active {
            return Err(ContractError::RentalInactive);
        }

        listing.active = false;
        listing.sold = true;
        set_listing(&env, &listing);

        parent.sold_blocks = parent
            .sold_blocks
            .checked_add(listing.blocks())
            .ok_or(ContractError::ArithmeticOverflow)?;
        let consumed = parent.is_fully_sold();
        if consumed {
            parent.active = false;
        }
        set_rental(&env, &parent);

        let rental_id = next_rental_id(&env)?;
        let rental = Rental {
            id: rental_id,
            renter: buyer.clone(),
            module_id: parent.module_id,
            start_block: listing.from_block,
            paid_blocks: listing.blocks(),
            active: true,
            parent_rental: Some(parent.id),
            sold_blocks: 0,
        };
        set_rental(&env, &rental);
        user_rentals_append(&env, &buyer, rental_id);
        extend_instance_ttl(&env);

        // release the consumed parent's slot before the buyer claims one
        let registry = RegistryClient::new(&env, &config.registry);
        if consumed {
            call_result(registry.try_decrement_users(&parent.module_id))?;
        }
        call_result(registry.try_increment_users(&parent.module_id))?;
        Self::settle_payment(&env, &config, &buyer, &listing.seller, listing.price)?;

        env.events().publish(
            (symbol_short!("sold"), buyer),
            (listing_id, rental_id, listing.price),
        );
        Ok(rental_id)
    }

    pub fn get_listing(env: Env, listing_id: u64) -> Result<Listing, ContractError> {
        get_listing(&env, listing_id)
    }

    /// All listings ever made on a rental, active and inactive.
    pub fn get_rental_listings(env: Env, rental_id: u64) -> Result<Vec<Listing>, ContractError> {
        get_rental_listings(&env, rental_id)
    }

    pub fn listing_count(env: Env) -> u64 {
        get_listing_count(&env)
    }

    pub fn get_audit_logs(env: Env, start_id: u64, end_id: u64, max_results: u32) -> AuditLogQueryResult {
        audit::query_audit_logs(&env, start_id, end_id, max_results)
    }
}

impl BlocTimeMarketplace {
    /// Splits `amount` into the treasury fee and the payee's share and moves
    /// both out of `payer`. The fee goes straight to the staking contract and
    /// is then credited to its treasury.
    fn settle_payment(
        env: &Env,
        config: &MarketplaceConfig,
        payer: &Address,
        payee: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        let fee = apply_bps(amount, config.treasury_fee_bps)?;
        let share = amount - fee;
        let token = token::Client::new(env, &config.token);

        if fee > 0 {
            token.transfer(payer, &config.staking, &fee);
            call_result(
                StakingClient::new(env, &config.staking)
                    .try_deposit_fee(&env.current_contract_address(), &fee),
            )?;
        }
        if share > 0 {
            token.transfer(payer, payee, &share);
        }
        Ok(())
    }

    fn withdraw_open_listings(env: &Env, rental_id: u64) -> Result<(), ContractError> {
        for mut listing in get_rental_listings(env, rental_id)?.iter() {
            if listing.active {
                listing.active = false;
                set_listing(env, &listing);
                env.events()
                    .publish((symbol_short!("unlisted"), listing.seller.clone()), listing.id);
            }
        }
        Ok(())
    }
}
