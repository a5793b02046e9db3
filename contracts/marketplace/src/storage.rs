use bloctime_lib::{
    ContractError, Listing, MarketplaceConfig, Rental, RECORD_TTL_EXTEND, RECORD_TTL_THRESHOLD,
};
use soroban_sdk::{contracttype, Address, Env, IntoVal, Val, Vec};

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Config,
    RentalCounter,
    ListingCounter,
    Rental(u64),
    Listing(u64),
    /// Every listing ever created on a rental, in creation order
    RentalListings(u64),
    /// Rentals held by a renter, including resale rentals
    UserRentals(Address),
}

fn persist<V: IntoVal<Env, Val>>(env: &Env, key: &DataKey, value: &V) {
    env.storage().persistent().set(key, value);
    env.storage()
        .persistent()
        .extend_ttl(key, RECORD_TTL_THRESHOLD, RECORD_TTL_EXTEND);
}

/* ---------------- CONFIG ---------------- */

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<MarketplaceConfig, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(ContractError::NotInitialized)
}

pub fn set_config(env: &Env, config: &MarketplaceConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

/* ---------------- COUNTERS ---------------- */

pub fn get_rental_count(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::RentalCounter).unwrap_or(0)
}

pub fn next_rental_id(env: &Env) -> Result<u64, ContractError> {
    let id = get_rental_count(env)
        .checked_add(1)
        .ok_or(ContractError::ArithmeticOverflow)?;
    env.storage().instance().set(&DataKey::RentalCounter, &id);
    Ok(id)
}

pub fn get_listing_count(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::ListingCounter).unwrap_or(0)
}

pub fn next_listing_id(env: &Env) -> Result<u64, ContractError> {
    let id = get_listing_count(env)
        .checked_add(1)
        .ok_or(ContractError::ArithmeticOverflow)?;
    env.storage().instance().set(&DataKey::ListingCounter, &id);
    Ok(id)
}

/* ---------------- RENTALS ---------------- */

pub fn get_rental(env: &Env, rental_id: u64) -> Result<Rental, ContractError> {
    env.storage()
        .persistent()
        .get(&DataKey::Rental(rental_id))
        .ok_or(ContractError::RentalNotFound)
}

pub fn set_rental(env: &Env, rental: &Rental) {
    persist(env, &DataKey::Rental(rental.id), rental);
}

pub fn get_user_rentals(env: &Env, user: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::UserRentals(user.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn user_rentals_append(env: &Env, user: &Address, rental_id: u64) {
    let mut ids = get_user_rentals(env, user);
    ids.push_back(rental_id);
    persist(env, &DataKey::UserRentals(user.clone()), &ids);
}

/* ---------------- LISTINGS ---------------- */

pub fn get_listing(env: &Env, listing_id: u64) -> Result<Listing, ContractError> {
    env.storage()
        .persistent()
        .get(&DataKey::Listing(listing_id))
        .ok_or(ContractError::ListingNotFound)
}

pub fn set_listing(env: &Env, listing: &Listing) {
    persist(env, &DataKey::Listing(listing.id), listing);
}

pub fn get_rental_listing_ids(env: &Env, rental_id: u64) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::RentalListings(rental_id))
        .unwrap_or(Vec::new(env))
}

pub fn rental_listings_append(env: &Env, rental_id: u64, listing_id: u64) {
    let mut ids = get_rental_listing_ids(env, rental_id);
    ids.push_back(listing_id);
    persist(env, &DataKey::RentalListings(rental_id), &ids);
}

/// Full listing records for a rental, active and inactive.
pub fn get_rental_listings(env: &Env, rental_id: u64) -> Result<Vec<Listing>, ContractError> {
    let mut listings = Vec::new(env);
    for listing_id in get_rental_listing_ids(env, rental_id).iter() {
        listings.push_back(get_listing(env, listing_id)?);
    }
    Ok(listings)
}
