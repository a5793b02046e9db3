use soroban_sdk::contracterror;

/// Rejections shared by every BlocTime contract.
///
/// Discriminants are part of the on-chain ABI and must never be reused.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    // Lifecycle / access
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,

    // Generic input validation
    InvalidAmount = 10,
    InvalidBps = 11,
    ArithmeticOverflow = 12,

    // Multiplier curve
    InvalidCurve = 20,
    MultiplierBelowBase = 21,
    TooManyPoints = 22,

    // Stake ledger
    ExceedsMaxLock = 30,
    AlreadyStaking = 31,
    StillLocked = 32,
    NoActiveStake = 33,
    WeightUnderflow = 34,

    // Treasury
    NothingToClaim = 40,
    UnbackedDeposit = 41,

    // Module registry
    ModuleNotFound = 50,
    NotModuleOwner = 51,
    InvalidPrice = 52,
    InvalidMaxUsers = 53,
    InvalidContentHash = 54,
    MaxUsersBelowCurrent = 55,
    ModuleFull = 56,
    ModuleInactive = 57,
    RentalCountUnderflow = 58,

    // Rental marketplace
    RentalNotFound = 60,
    RentalInactive = 61,
    NotRenter = 62,
    InvalidBlocks = 63,
    InvalidRange = 64,
    OverlappingListing = 65,
    ListingNotFound = 66,
    ListingInactive = 67,

    // Cross-contract
    CrossContractFailed = 70,
}
