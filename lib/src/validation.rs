use soroban_sdk::String;

use crate::{errors::ContractError, BPS_DENOMINATOR, MAX_CONTENT_HASH_LENGTH};

pub fn validate_positive_amount(amount: i128) -> Result<(), ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    Ok(())
}

pub fn validate_bps(bps: u32) -> Result<(), ContractError> {
    if bps > BPS_DENOMINATOR {
        return Err(ContractError::InvalidBps);
    }
    Ok(())
}

pub fn validate_content_hash(hash: &String) -> Result<(), ContractError> {
    if hash.len() == 0 || hash.len() > MAX_CONTENT_HASH_LENGTH {
        return Err(ContractError::InvalidContentHash);
    }
    Ok(())
}

/// `amount * bps / 10_000`, floored.
pub fn apply_bps(amount: i128, bps: u32) -> Result<i128, ContractError> {
    amount
        .checked_mul(bps as i128)
        .map(|scaled| scaled / BPS_DENOMINATOR as i128)
        .ok_or(ContractError::ArithmeticOverflow)
}

/// `value * numerator / denominator`, floored. `denominator` must be positive.
pub fn mul_div(value: i128, numerator: i128, denominator: i128) -> Result<i128, ContractError> {
    if denominator <= 0 {
        return Err(ContractError::ArithmeticOverflow);
    }
    value
        .checked_mul(numerator)
        .map(|scaled| scaled / denominator)
        .ok_or(ContractError::ArithmeticOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;

    #[test]
    fn content_hash_validation_works() {
        let env = Env::default();
        assert!(validate_content_hash(&String::from_str(&env, "QmTest123")).is_ok());
        assert_eq!(
            validate_content_hash(&String::from_str(&env, "")),
            Err(ContractError::InvalidContentHash)
        );
    }

    #[test]
    fn bps_math_floors() {
        assert_eq!(apply_bps(100_000, 250), Ok(2_500));
        assert_eq!(apply_bps(999, 250), Ok(24));
        assert_eq!(apply_bps(i128::MAX, 2), Err(ContractError::ArithmeticOverflow));
        assert_eq!(validate_bps(10_001), Err(ContractError::InvalidBps));
        assert!(validate_bps(10_000).is_ok());
    }

    #[test]
    fn mul_div_floors_and_guards_zero() {
        assert_eq!(mul_div(5_000, 1_000, 4_000), Ok(1_250));
        assert_eq!(mul_div(10, 1, 3), Ok(3));
        assert_eq!(mul_div(10, 1, 0), Err(ContractError::ArithmeticOverflow));
    }
}
