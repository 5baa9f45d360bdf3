//! Arithmetic in the finite field `GF(2^w)`.
//!
//! Elements are `w`-bit integers in polynomial basis: bit `i` is the
//! coefficient of `z^i`. Reduction is modulo an irreducible polynomial
//! `Q(z) = z^w + q_{w-1} z^{w-1} + ... + q_0`, supplied as the mask of its
//! lower `w` coefficients.

use crate::error::ConfigError;

/// Largest supported extension degree.
pub const MAX_FIELD_BITS: u32 = 31;

/// The field `GF(2^w)` defined by an irreducible modulus.
///
/// # Examples
///
/// ```rust
/// use qmc_core::field::Gf2w;
///
/// // GF(8) with Q(z) = z^3 + z + 1
/// let field = Gf2w::new(3, 0b011).unwrap();
/// // z * z^2 = z^3 = z + 1
/// assert_eq!(field.multiply(0b010, 0b100), 0b011);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gf2w {
    w: u32,
    modulus: u32,
    mask: u32,
}

impl Gf2w {
    /// Creates the field `GF(2^w)` reduced by `z^w + modulus(z)`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `w` is outside `[1, 31]`, if `modulus` has
    /// bits at or above position `w`, or if the full polynomial is reducible.
    pub fn new(w: u32, modulus: u32) -> Result<Self, ConfigError> {
        if w == 0 || w > MAX_FIELD_BITS {
            return Err(ConfigError::InvalidParameter {
                name: "w",
                value: format!("{} not in [1, {}]", w, MAX_FIELD_BITS),
            });
        }
        let mask = ((1u64 << w) - 1) as u32;
        if modulus & !mask != 0 {
            return Err(ConfigError::InvalidParameter {
                name: "modulus",
                value: format!("{:#x} has bits beyond degree {}", modulus, w),
            });
        }
        let full = (1u64 << w) | u64::from(modulus);
        if !is_irreducible(full) {
            return Err(ConfigError::InvalidParameter {
                name: "modulus",
                value: format!("z^{} + {:#x} is reducible over GF(2)", w, modulus),
            });
        }
        Ok(Self { w, modulus, mask })
    }

    /// Returns the extension degree `w`.
    #[inline]
    pub fn bits(&self) -> u32 {
        self.w
    }

    /// Returns the lower coefficients of the modulus.
    #[inline]
    pub fn modulus(&self) -> u32 {
        self.modulus
    }

    /// Returns the number of field elements, `2^w`.
    #[inline]
    pub fn order(&self) -> u64 {
        1u64 << self.w
    }

    /// Field addition (XOR).
    #[inline]
    pub fn add(&self, a: u32, b: u32) -> u32 {
        a ^ b
    }

    /// Multiplies `a` by `z` and reduces.
    #[inline]
    pub fn multiply_by_z(&self, a: u32) -> u32 {
        let carry = (a >> (self.w - 1)) & 1;
        let shifted = (a << 1) & self.mask;
        if carry == 1 {
            shifted ^ self.modulus
        } else {
            shifted
        }
    }

    /// Multiplies `a` by `z^k` and reduces.
    pub fn multiply_by_z_pow(&self, mut a: u32, k: u32) -> u32 {
        for _ in 0..k {
            a = self.multiply_by_z(a);
        }
        a
    }

    /// Multiplies two field elements.
    ///
    /// Horner evaluation over the bits of `b`, most significant first: each
    /// step doubles the accumulator (multiply by `z` and reduce) and adds
    /// `a` when the bit is set.
    pub fn multiply(&self, a: u32, b: u32) -> u32 {
        let mut acc = 0u32;
        for bit in (0..self.w).rev() {
            acc = self.multiply_by_z(acc);
            if (b >> bit) & 1 == 1 {
                acc ^= a;
            }
        }
        acc
    }

    /// Raises `a` to the power `e` by square-and-multiply.
    pub fn pow(&self, a: u32, mut e: u64) -> u32 {
        let mut base = a;
        let mut result = 1u32;
        while e > 0 {
            if e & 1 == 1 {
                result = self.multiply(result, base);
            }
            base = self.multiply(base, base);
            e >>= 1;
        }
        result
    }
}

/// Degree of a binary polynomial (`-1` for zero).
fn degree(p: u64) -> i32 {
    63 - p.leading_zeros() as i32
}

/// Remainder of binary polynomial division.
fn poly_rem(mut a: u64, b: u64) -> u64 {
    let db = degree(b);
    while degree(a) >= db {
        a ^= b << (degree(a) - db);
    }
    a
}

/// Trial division by every polynomial of degree at most `deg(p)/2`.
fn is_irreducible(p: u64) -> bool {
    let d = degree(p);
    if d < 1 {
        return false;
    }
    let half = d / 2;
    for divisor in 2u64..(1u64 << (half + 1)) {
        if poly_rem(p, divisor) == 0 {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_reducible_modulus() {
        // z^2 + 1 = (z + 1)^2
        assert!(Gf2w::new(2, 0b01).is_err());
        // z^2 + z + 1 is irreducible
        assert!(Gf2w::new(2, 0b11).is_ok());
    }

    #[test]
    fn test_rejects_bad_width() {
        assert!(Gf2w::new(0, 0).is_err());
        assert!(Gf2w::new(32, 0).is_err());
        assert!(Gf2w::new(3, 0b1011).is_err());
    }

    #[test]
    fn test_multiply_gf8() {
        let f = Gf2w::new(3, 0b011).unwrap();
        // Every non-zero element has an inverse: a^(2^3 - 2) * a = 1
        for a in 1..8u32 {
            let inv = f.pow(a, 6);
            assert_eq!(f.multiply(a, inv), 1, "a = {}", a);
        }
        // Multiplication by zero and one
        for a in 0..8u32 {
            assert_eq!(f.multiply(a, 0), 0);
            assert_eq!(f.multiply(a, 1), a);
        }
    }

    #[test]
    fn test_multiply_matches_z_powers() {
        let f = Gf2w::new(5, 0b00101).unwrap();
        for a in 0..32u32 {
            for k in 0..5u32 {
                assert_eq!(f.multiply(a, 1 << k), f.multiply_by_z_pow(a, k));
            }
        }
    }

    #[test]
    fn test_multiplication_commutes() {
        let f = Gf2w::new(4, 0b0011).unwrap();
        for a in 0..16u32 {
            for b in 0..16u32 {
                assert_eq!(f.multiply(a, b), f.multiply(b, a));
            }
        }
    }

    #[test]
    fn test_multiplicative_group_order() {
        // z is a generator for the primitive polynomial z^4 + z + 1
        let f = Gf2w::new(4, 0b0011).unwrap();
        let mut x = 1u32;
        let mut seen = std::collections::HashSet::new();
        for _ in 0..15 {
            seen.insert(x);
            x = f.multiply_by_z(x);
        }
        assert_eq!(x, 1);
        assert_eq!(seen.len(), 15);
    }
}
