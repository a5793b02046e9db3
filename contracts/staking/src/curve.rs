//! Piecewise-linear lock-duration → multiplier curve.
//!
//! A curve is an ordered list of [`MultiplierPoint`]s. Below the first point
//! the first multiplier applies, above the last point the last multiplier
//! applies, and in between the multiplier is interpolated linearly with floor
//! division. An empty curve means every lock earns the base 1x.

use bloctime_lib::{ContractError, MultiplierPoint, BASE_MULTIPLIER_BPS, MAX_CURVE_POINTS};
use soroban_sdk::{Env, Vec};

/// Checks the curve invariants: at least one point, blocks strictly
/// increasing, multipliers non-decreasing and never below 1x.
pub fn validate_points(points: &Vec<MultiplierPoint>) -> Result<(), ContractError> {
    if points.is_empty() {
        return Err(ContractError::InvalidCurve);
    }
    if points.len() > MAX_CURVE_POINTS {
        return Err(ContractError::TooManyPoints);
    }

    let mut previous: Option<MultiplierPoint> = None;
    for point in points.iter() {
        match &previous {
            None => {
                if point.multiplier_bps < BASE_MULTIPLIER_BPS {
                    return Err(ContractError::MultiplierBelowBase);
                }
            }
            Some(prev) => {
                if point.blocks <= prev.blocks {
                    return Err(ContractError::InvalidCurve);
                }
                if point.multiplier_bps < prev.multiplier_bps {
                    return Err(ContractError::InvalidCurve);
                }
            }
        }
        previous = Some(point);
    }
    Ok(())
}

/// Multiplier in basis points for a lock of `lock_blocks`.
pub fn multiplier_at(points: &Vec<MultiplierPoint>, lock_blocks: u64) -> u32 {
    let Some(first) = points.first() else {
        return BASE_MULTIPLIER_BPS;
    };
    if lock_blocks <= first.blocks {
        return first.multiplier_bps;
    }

    let mut lower = first;
    for upper in points.iter().skip(1) {
        if lock_blocks == upper.blocks {
            return upper.multiplier_bps;
        }
        if lock_blocks < upper.blocks {
            return interpolate(&lower, &upper, lock_blocks);
        }
        lower = upper;
    }
    lower.multiplier_bps
}

/// `m0 + (m1 - m0) * (x - x0) / (x1 - x0)`; callers guarantee `x0 < x < x1`.
fn interpolate(lower: &MultiplierPoint, upper: &MultiplierPoint, x: u64) -> u32 {
    let rise = (upper.multiplier_bps - lower.multiplier_bps) as u128;
    let run = (upper.blocks - lower.blocks) as u128;
    let offset = (x - lower.blocks) as u128;
    // rise * offset / run <= rise, so the result fits back into u32
    lower.multiplier_bps + (rise * offset / run) as u32
}

/// Inserts `point` in block order, replacing any point at the same height.
pub fn upsert_point(env: &Env, points: &Vec<MultiplierPoint>, point: MultiplierPoint) -> Vec<MultiplierPoint> {
    let mut updated = Vec::new(env);
    let mut placed = false;

    for existing in points.iter() {
        if !placed && point.blocks <= existing.blocks {
            updated.push_back(point.clone());
            placed = true;
            if point.blocks == existing.blocks {
                continue;
            }
        }
        updated.push_back(existing);
    }
    if !placed {
        updated.push_back(point);
    }
    updated
}
