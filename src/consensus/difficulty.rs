//! Difficulty arithmetic
//!
//! Pure functions over the compact target encoding: expansion, compaction,
//! work conversion, and the periodic retarget rule. All results are fully
//! determined by their inputs so every node recomputes identical values.

use super::network::NetworkParams;
use crate::codec::Hash;

/// Calculate the compact bits for the period following a retarget boundary
///
/// The timespan between the first and last header of the closing period is
/// clamped to `adjustment_factor` in either direction, then scales the
/// current target. The result never drops below the network's PoW limit.
pub fn calculate_next_bits(
    current_bits: u32,
    first_block_time: u32,
    last_block_time: u32,
    params: &NetworkParams,
) -> u32 {
    let expected = params.target_timespan_secs;
    let actual = (last_block_time.saturating_sub(first_block_time) as u64).clamp(
        expected / params.adjustment_factor,
        expected * params.adjustment_factor,
    );

    let current_target = compact_to_target(current_bits);
    let new_target = multiply_target(&current_target, actual, expected);

    // Never go easier than the network's PoW limit
    let limit = compact_to_target(params.pow_limit_bits);
    if new_target > limit {
        params.pow_limit_bits
    } else {
        target_to_compact(&new_target)
    }
}

/// Check whether a height sits on a retarget boundary
pub fn is_retarget_height(height: u32, params: &NetworkParams) -> bool {
    let interval = params.retarget_interval();
    interval != 0 && height != 0 && height % interval == 0
}

/// Convert compact difficulty to a 256-bit big-endian target
pub fn compact_to_target(compact: u32) -> [u8; 32] {
    let exponent = (compact >> 24) as usize;
    let mantissa = compact & 0x007fffff;

    let mut target = [0u8; 32];

    if exponent == 0 || exponent > 32 {
        return target;
    }

    let negative = (compact & 0x0080_0000) != 0;
    if negative {
        return target; // Negative targets are invalid
    }

    if exponent <= 3 {
        let value = mantissa >> (8 * (3 - exponent));
        target[31] = (value & 0xff) as u8;
        if exponent >= 2 {
            target[30] = ((value >> 8) & 0xff) as u8;
        }
        if exponent >= 3 {
            target[29] = ((value >> 16) & 0xff) as u8;
        }
    } else {
        let start = 32 - exponent;
        target[start] = ((mantissa >> 16) & 0xff) as u8;
        if start + 1 < 32 {
            target[start + 1] = ((mantissa >> 8) & 0xff) as u8;
        }
        if start + 2 < 32 {
            target[start + 2] = (mantissa & 0xff) as u8;
        }
    }

    target
}

/// Convert a 256-bit big-endian target to compact difficulty
pub fn target_to_compact(target: &[u8; 32]) -> u32 {
    // Find the first non-zero byte
    let mut first_nonzero = 32;
    for (i, &byte) in target.iter().enumerate() {
        if byte != 0 {
            first_nonzero = i;
            break;
        }
    }

    if first_nonzero == 32 {
        return 0;
    }

    let exponent = (32 - first_nonzero) as u32;

    let mut mantissa: u32 = (target[first_nonzero] as u32) << 16;
    if first_nonzero + 1 < 32 {
        mantissa |= (target[first_nonzero + 1] as u32) << 8;
    }
    if first_nonzero + 2 < 32 {
        mantissa |= target[first_nonzero + 2] as u32;
    }

    // Top mantissa bit is the sign flag; shift it clear
    if mantissa & 0x0080_0000 != 0 {
        mantissa >>= 8;
        return ((exponent + 1) << 24) | mantissa;
    }

    (exponent << 24) | mantissa
}

/// Work contributed by one header with the given compact bits
///
/// Work is the inverse of the target (lower target means more work), folded
/// into a u128 scalar: target = mantissa * 2^(8*(exponent-3)), so
/// work = 2^(280 - 8*exponent) / mantissa, saturating when the shift
/// exceeds the scalar's width. Degenerate encodings contribute zero.
pub fn work_for_bits(bits: u32) -> u128 {
    let exponent = (bits >> 24) as i64;
    let mantissa = (bits & 0x007fffff) as u128;

    if mantissa == 0 || exponent == 0 || exponent > 32 || (bits & 0x0080_0000) != 0 {
        return 0;
    }

    let shift = 280 - 8 * exponent;
    if shift >= 128 {
        return u128::MAX / mantissa;
    }
    (1u128 << shift) / mantissa
}

/// Check a header hash against a 256-bit big-endian target; fails closed
pub fn meets_target(hash: &Hash, target: &[u8; 32]) -> bool {
    if target.iter().all(|&b| b == 0) {
        return false;
    }
    // Wire hashes are numerically little-endian
    let mut be = hash.0;
    be.reverse();
    be <= *target
}

/// Scale a target by actual_time / expected_time
fn multiply_target(target: &[u8; 32], numerator: u64, denominator: u64) -> [u8; 32] {
    // 256-bit * u64 into a 320-bit product, least-significant byte first
    let mut product = [0u8; 40];
    let mut carry: u128 = 0;
    for i in (0..32).rev() {
        let v = (target[i] as u128) * (numerator as u128) + carry;
        product[i + 8] = (v & 0xff) as u8;
        carry = v >> 8;
    }
    for i in (0..8).rev() {
        product[i] = (carry & 0xff) as u8;
        carry >>= 8;
    }

    // Long division by the denominator, most-significant byte first
    let mut quotient = [0u8; 40];
    let mut rem: u128 = 0;
    for i in 0..40 {
        let v = (rem << 8) | product[i] as u128;
        quotient[i] = (v / denominator as u128) as u8;
        rem = v % denominator as u128;
    }

    // Saturate if the scaled target no longer fits 256 bits
    if quotient[..8].iter().any(|&b| b != 0) {
        return [0xff; 32];
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&quotient[8..]);
    out
}
