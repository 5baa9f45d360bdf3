//! Linear recurrences over `GF(2^w)`.
//!
//! Both generators here have a finite state space of `2^(r*w)` states, read
//! out as an `r*w`-bit word. The state map is a bijection, so the state
//! space splits into disjoint cycles; this is what cycle-based point sets
//! enumerate.

use super::gf2w::Gf2w;
use crate::error::ConfigError;

/// Largest supported state size in bits.
pub const MAX_STATE_BITS: u32 = 31;

/// A deterministic recurrence with a small, fully enumerable state space.
pub trait StateRecurrence {
    /// Number of bits in the packed state word.
    fn state_bits(&self) -> u32;

    /// Current state, packed MSB first.
    fn state_word(&self) -> u32;

    /// Replaces the current state with a packed word.
    fn set_state_word(&mut self, word: u32);

    /// Advances by one visible output (`step` internal iterations).
    fn advance(&mut self);

    /// Current state as a fraction in `[0, 1)`.
    fn output(&self) -> f64 {
        f64::from(self.state_word()) / (1u64 << self.state_bits()) as f64
    }
}

fn validate_sizes(field: &Gf2w, r: usize, step: usize) -> Result<(), ConfigError> {
    if r == 0 {
        return Err(ConfigError::InvalidParameter {
            name: "r",
            value: "recurrence order must be positive".to_string(),
        });
    }
    let bits = r as u64 * u64::from(field.bits());
    if bits > u64::from(MAX_STATE_BITS) {
        return Err(ConfigError::InvalidParameter {
            name: "r",
            value: format!(
                "r * w = {} exceeds {} state bits",
                bits, MAX_STATE_BITS
            ),
        });
    }
    if step == 0 {
        return Err(ConfigError::InvalidParameter {
            name: "step",
            value: "must be positive".to_string(),
        });
    }
    Ok(())
}

fn pack(field: &Gf2w, elems: &[u32]) -> u32 {
    elems
        .iter()
        .fold(0u32, |acc, &e| (acc << field.bits()) | e)
}

fn unpack(field: &Gf2w, mut word: u32, elems: &mut [u32]) {
    let mask = ((1u64 << field.bits()) - 1) as u32;
    for e in elems.iter_mut().rev() {
        *e = word & mask;
        word >>= field.bits();
    }
}

/// Linear feedback shift register of order `r` over `GF(2^w)`.
///
/// `x_n = b_1 x_{n-1} + ... + b_r x_{n-r}`. The packed state lists
/// `x_{n-1}` in the most significant `w` bits down to `x_{n-r}`.
#[derive(Clone, Debug)]
pub struct Gf2wLfsr {
    field: Gf2w,
    coeffs: Vec<u32>,
    state: Vec<u32>,
    step: usize,
}

impl Gf2wLfsr {
    /// Creates an LFSR with feedback coefficients `b_1..b_r`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `r * w > 31`, if `step` is zero, if a
    /// coefficient is not a field element, or if `b_r` is zero (the state
    /// map would not be invertible).
    pub fn new(field: Gf2w, coeffs: Vec<u32>, step: usize) -> Result<Self, ConfigError> {
        validate_sizes(&field, coeffs.len(), step)?;
        if coeffs.iter().any(|&c| u64::from(c) >= field.order()) {
            return Err(ConfigError::InvalidParameter {
                name: "coeffs",
                value: "coefficient is not an element of the field".to_string(),
            });
        }
        if coeffs.last() == Some(&0) {
            return Err(ConfigError::InvalidParameter {
                name: "coeffs",
                value: "last coefficient must be non-zero".to_string(),
            });
        }
        let r = coeffs.len();
        Ok(Self {
            field,
            coeffs,
            state: vec![0; r],
            step,
        })
    }

    /// Returns the underlying field.
    pub fn field(&self) -> &Gf2w {
        &self.field
    }

    /// Recurrence order `r`.
    pub fn order(&self) -> usize {
        self.coeffs.len()
    }

    /// Performs one recurrence step (without the `step` collapse).
    fn single_step(&mut self) {
        let next = self
            .coeffs
            .iter()
            .zip(self.state.iter())
            .fold(0u32, |acc, (&b, &x)| acc ^ self.field.multiply(b, x));
        self.state.rotate_right(1);
        self.state[0] = next;
    }

    /// Advances the register by `step` iterations.
    pub fn advance_lfsr(&mut self) {
        for _ in 0..self.step {
            self.single_step();
        }
    }
}

impl StateRecurrence for Gf2wLfsr {
    fn state_bits(&self) -> u32 {
        self.coeffs.len() as u32 * self.field.bits()
    }

    fn state_word(&self) -> u32 {
        pack(&self.field, &self.state)
    }

    fn set_state_word(&mut self, word: u32) {
        let field = self.field;
        unpack(&field, word, &mut self.state);
    }

    fn advance(&mut self) {
        self.advance_lfsr();
    }
}

/// Polynomial linear congruential generator over `GF(2^w)`.
///
/// The state is a polynomial `p(z)` of degree below `r` with coefficients
/// in `GF(2^w)`; each step sets `p(z) <- z * p(z) mod P(z)` where
/// `P(z) = z^r + c_{r-1} z^{r-1} + ... + c_0`. The packed state lists the
/// coefficient of `z^{r-1}` in the most significant `w` bits.
#[derive(Clone, Debug)]
pub struct Gf2wPolyLcg {
    field: Gf2w,
    modulus: Vec<u32>,
    coeffs: Vec<u32>,
    step: usize,
}

impl Gf2wPolyLcg {
    /// Creates a polynomial LCG with modulus coefficients `c_0..c_{r-1}`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `r * w > 31`, if `step` is zero, if a
    /// coefficient is not a field element, or if `c_0` is zero (multiplication
    /// by `z` would not be invertible modulo `P`).
    pub fn new(field: Gf2w, modulus: Vec<u32>, step: usize) -> Result<Self, ConfigError> {
        validate_sizes(&field, modulus.len(), step)?;
        if modulus.iter().any(|&c| u64::from(c) >= field.order()) {
            return Err(ConfigError::InvalidParameter {
                name: "modulus",
                value: "coefficient is not an element of the field".to_string(),
            });
        }
        if modulus.first() == Some(&0) {
            return Err(ConfigError::InvalidParameter {
                name: "modulus",
                value: "constant coefficient must be non-zero".to_string(),
            });
        }
        let r = modulus.len();
        Ok(Self {
            field,
            modulus,
            coeffs: vec![0; r],
            step,
        })
    }

    /// Returns the underlying field.
    pub fn field(&self) -> &Gf2w {
        &self.field
    }

    /// Degree `r` of the modulus polynomial.
    pub fn order(&self) -> usize {
        self.modulus.len()
    }

    fn single_step(&mut self) {
        let r = self.modulus.len();
        let top = self.coeffs[r - 1];
        for i in (1..r).rev() {
            self.coeffs[i] = self.coeffs[i - 1] ^ self.field.multiply(top, self.modulus[i]);
        }
        self.coeffs[0] = self.field.multiply(top, self.modulus[0]);
    }

    /// Advances the generator by `step` multiplications by `z`.
    pub fn advance_poly_lcg(&mut self) {
        for _ in 0..self.step {
            self.single_step();
        }
    }
}

impl StateRecurrence for Gf2wPolyLcg {
    fn state_bits(&self) -> u32 {
        self.modulus.len() as u32 * self.field.bits()
    }

    fn state_word(&self) -> u32 {
        // highest-degree coefficient first
        self.coeffs
            .iter()
            .rev()
            .fold(0u32, |acc, &e| (acc << self.field.bits()) | e)
    }

    fn set_state_word(&mut self, mut word: u32) {
        let mask = ((1u64 << self.field.bits()) - 1) as u32;
        for c in self.coeffs.iter_mut() {
            *c = word & mask;
            word >>= self.field.bits();
        }
    }

    fn advance(&mut self) {
        self.advance_poly_lcg();
    }
}
