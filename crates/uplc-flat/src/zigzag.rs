//! Zigzag mapping between signed and unsigned integers
//!
//! Non-negative `n` maps to `2n` and negative `n` to `-2n - 1`, so small
//! magnitudes of either sign stay small as variable-length words.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Signed, Zero};

#[inline]
pub fn zigzag(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

#[inline]
pub fn unzigzag(u: u64) -> i64 {
    ((u >> 1) as i64) ^ -((u & 1) as i64)
}

pub fn zigzag_big(n: &BigInt) -> BigUint {
    let doubled = n.magnitude() << 1u32;
    if n.is_negative() {
        doubled - BigUint::one()
    } else {
        doubled
    }
}

pub fn unzigzag_big(u: &BigUint) -> BigInt {
    let odd = u.bit(0);
    let half = u >> 1u32;
    if odd {
        // u = -2n - 1, so n = -(u + 1) / 2
        BigInt::from_biguint(Sign::Minus, half + BigUint::one())
    } else if half.is_zero() {
        BigInt::zero()
    } else {
        BigInt::from_biguint(Sign::Plus, half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_small_values() {
        assert_eq!(zigzag(0), 0);
        assert_eq!(zigzag(-1), 1);
        assert_eq!(zigzag(1), 2);
        assert_eq!(zigzag(-2), 3);
        assert_eq!(zigzag(i64::MAX), u64::MAX - 1);
        assert_eq!(zigzag(i64::MIN), u64::MAX);
    }

    #[test]
    fn test_big_matches_fixed_width() {
        for n in [0i64, -1, 1, -2, 63, -64, i64::MAX, i64::MIN] {
            assert_eq!(zigzag_big(&BigInt::from(n)), BigUint::from(zigzag(n)));
            assert_eq!(unzigzag_big(&BigUint::from(zigzag(n))), BigInt::from(n));
        }
    }

    #[test]
    fn test_big_beyond_64_bits() {
        let n: BigInt = BigInt::from(i64::MIN) - 1;
        let u = zigzag_big(&n);
        assert_eq!(u, BigUint::from(u64::MAX) + 2u32);
        assert_eq!(unzigzag_big(&u), n);
    }

    proptest! {
        #[test]
        fn prop_zigzag_is_a_bijection(n in any::<i64>()) {
            prop_assert_eq!(unzigzag(zigzag(n)), n);
        }

        #[test]
        fn prop_big_zigzag_is_a_bijection(n in any::<i128>()) {
            let n = BigInt::from(n);
            prop_assert_eq!(unzigzag_big(&zigzag_big(&n)), n);
        }
    }
}
