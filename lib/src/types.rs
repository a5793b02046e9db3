use soroban_sdk::{contracttype, Address, String};

/// A control point on the lock-duration multiplier curve.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct MultiplierPoint {
    pub blocks: u64,
    /// Basis points, 10_000 = 1.0x.
    pub multiplier_bps: u32,
}

/// An owner's single active stake.
///
/// `weight` is the derived, non-transferable balance minted on stake and
/// burned on unstake.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Stake {
    pub owner: Address,
    pub principal: i128,
    pub lock_blocks: u64,
    pub start_block: u64,
    pub weight: i128,
}

impl Stake {
    pub fn unlock_block(&self) -> u64 {
        self.start_block.saturating_add(self.lock_blocks)
    }

    pub fn is_unlocked_at(&self, block: u64) -> bool {
        block >= self.unlock_block()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct StakingConfig {
    pub token: Address,
    pub max_lock_blocks: u64,
    pub distribution_bps: u32,
    /// Only this address may credit marketplace fees to the treasury.
    pub fee_source: Option<Address>,
}

/// A registered module that can be rented by the block.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Module {
    pub id: u64,
    pub owner: Address,
    pub price_per_block: i128,
    pub max_concurrent_users: u32,
    pub content_hash: String,
    pub active_rental_count: u32,
    pub active: bool,
}

impl Module {
    pub fn has_capacity(&self) -> bool {
        self.active_rental_count < self.max_concurrent_users
    }

    pub fn is_available(&self) -> bool {
        self.active && self.has_capacity()
    }
}

/// A pre-paid access grant over `[start_block, start_block + paid_blocks)`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Rental {
    pub id: u64,
    pub renter: Address,
    pub module_id: u64,
    pub start_block: u64,
    pub paid_blocks: u64,
    pub active: bool,
    /// Set when the rental was bought from a fractional listing.
    pub parent_rental: Option<u64>,
    /// Blocks of this window already resold to other renters.
    pub sold_blocks: u64,
}

impl Rental {
    pub fn end_block(&self) -> u64 {
        self.start_block.saturating_add(self.paid_blocks)
    }

    /// `max(0, start + paid - block)`.
    pub fn remaining_at(&self, block: u64) -> u64 {
        self.end_block().saturating_sub(block)
    }

    /// `true` when `[from, to)` is a non-empty interval inside the window.
    /// `to` is exclusive, so it may equal `end_block()`.
    pub fn contains_range(&self, from: u64, to: u64) -> bool {
        from < to && from >= self.start_block && to <= self.end_block()
    }

    pub fn is_fully_sold(&self) -> bool {
        self.sold_blocks >= self.paid_blocks
    }
}

/// Offer to resell `[from_block, to_block)` of an existing rental.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Listing {
    pub id: u64,
    pub seller: Address,
    pub rental_id: u64,
    pub from_block: u64,
    pub to_block: u64,
    pub price: i128,
    pub active: bool,
    /// A sold interval stays booked even though the listing is inactive.
    pub sold: bool,
}

impl Listing {
    /// Half-open interval intersection: `[a, b)` and `[c, d)` overlap iff
    /// `a < d && c < b`.
    pub fn overlaps(&self, from: u64, to: u64) -> bool {
        self.from_block < to && from < self.to_block
    }

    pub fn books_interval(&self) -> bool {
        self.active || self.sold
    }

    pub fn blocks(&self) -> u64 {
        self.to_block - self.from_block
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct MarketplaceConfig {
    pub token: Address,
    pub staking: Address,
    pub registry: Address,
    pub treasury_fee_bps: u32,
}

/// Aggregate dashboard figures assembled by the integration contract.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct SystemStats {
    pub total_modules: u64,
    pub total_rentals: u64,
    pub total_staked: i128,
    pub total_weight: i128,
    pub treasury_balance: i128,
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::Env;

    fn rental(env: &Env, start_block: u64, paid_blocks: u64) -> Rental {
        Rental {
            id: 1,
            renter: Address::generate(env),
            module_id: 1,
            start_block,
            paid_blocks,
            active: true,
            parent_rental: None,
            sold_blocks: 0,
        }
    }

    fn listing(env: &Env, from_block: u64, to_block: u64) -> Listing {
        Listing {
            id: 1,
            seller: Address::generate(env),
            rental_id: 1,
            from_block,
            to_block,
            price: 10,
            active: true,
            sold: false,
        }
    }

    #[test]
    fn half_open_intervals_touching_do_not_overlap() {
        let env = Env::default();
        let l = listing(&env, 100, 300);
        assert!(!l.overlaps(300, 500));
        assert!(!l.overlaps(0, 100));
        assert!(l.overlaps(299, 301));
        assert!(l.overlaps(50, 101));
        assert!(l.overlaps(150, 200));
    }

    #[test]
    fn remaining_blocks_saturate_at_zero() {
        let env = Env::default();
        let r = rental(&env, 10, 100);
        assert_eq!(r.remaining_at(10), 100);
        assert_eq!(r.remaining_at(60), 50);
        assert_eq!(r.remaining_at(110), 0);
        assert_eq!(r.remaining_at(5_000), 0);
        // window that opens later still counts from `block`
        assert_eq!(r.remaining_at(3), 107);
    }

    #[test]
    fn range_must_sit_inside_window() {
        let env = Env::default();
        let r = rental(&env, 10, 100);
        assert!(r.contains_range(10, 110));
        assert!(r.contains_range(20, 30));
        assert!(!r.contains_range(9, 30));
        assert!(!r.contains_range(20, 111));
        assert!(!r.contains_range(30, 30));
        assert!(!r.contains_range(40, 30));
    }
}
