//! Cycle-based point sets.
//!
//! A bijective recurrence on a finite state space splits the states into
//! disjoint cycles. Every state `x_0` yields one point: the `s` successive
//! outputs `(u_0, ..., u_{s-1})` of its cycle starting at `x_0`, wrapping
//! around the cycle. Point `i` is located by a binary search over the
//! cumulative cycle lengths.
//!
//! Cycles are listed in increasing order of their smallest state, so the
//! all-zero cycle of a linear recurrence comes first. Unshifted values keep
//! exact zeros.

use qmc_core::error::ConfigError;
use qmc_core::field::StateRecurrence;
use qmc_core::stream::RandomStream;
use tracing::debug;

use crate::pointset::{CoordinateIterator, ModuloShift, PointSet, ShiftablePointSet};

/// Largest state space that is enumerated into cycles.
pub const MAX_CYCLE_STATES: u64 = 1 << 24;

/// Point set made of the full cycles of a recurrence.
#[derive(Clone, Debug)]
pub struct CycleBasedPointSet {
    dim: usize,
    cycles: Vec<Vec<f64>>,
    starts: Vec<usize>,
    num_points: usize,
    shift: ModuloShift,
}

impl CycleBasedPointSet {
    /// Builds the point set from explicit cycles of output values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `dim == 0`, there are no cycles, or a cycle
    /// is empty.
    pub fn from_cycles(cycles: Vec<Vec<f64>>, dim: usize) -> Result<Self, ConfigError> {
        if dim == 0 {
            return Err(ConfigError::InvalidDimension(dim));
        }
        if cycles.is_empty() || cycles.iter().any(Vec::is_empty) {
            return Err(ConfigError::InvalidParameter {
                name: "cycles",
                value: "every cycle must hold at least one value".to_string(),
            });
        }
        let mut starts = Vec::with_capacity(cycles.len());
        let mut total = 0;
        for cycle in &cycles {
            starts.push(total);
            total += cycle.len();
        }
        Ok(Self {
            dim,
            cycles,
            starts,
            num_points: total,
            shift: ModuloShift::new(),
        })
    }

    /// Enumerates the cycles of `step` on the states `0..num_states`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the state space is too large or `step` is
    /// not a permutation of the states.
    pub fn from_map(
        num_states: u64,
        dim: usize,
        mut step: impl FnMut(u64) -> u64,
        output: impl Fn(u64) -> f64,
    ) -> Result<Self, ConfigError> {
        if num_states == 0 || num_states > MAX_CYCLE_STATES {
            return Err(ConfigError::InvalidParameter {
                name: "num_states",
                value: format!("{} is outside [1, {}]", num_states, MAX_CYCLE_STATES),
            });
        }
        let mut visited = vec![false; num_states as usize];
        let mut cycles = Vec::new();
        for start in 0..num_states {
            if visited[start as usize] {
                continue;
            }
            let mut cycle = Vec::new();
            let mut x = start;
            loop {
                if x >= num_states || visited[x as usize] {
                    return Err(ConfigError::InvalidParameter {
                        name: "step",
                        value: format!("state {} is reached twice or out of range", x),
                    });
                }
                visited[x as usize] = true;
                cycle.push(output(x));
                x = step(x);
                if x == start {
                    break;
                }
            }
            cycles.push(cycle);
        }
        debug!(num_states, cycles = cycles.len(), "enumerated recurrence cycles");
        Self::from_cycles(cycles, dim)
    }

    /// Multiplicative LCG `x -> a x mod n` on all residues `0..n`, output
    /// `x / n`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `gcd(a, n) != 1` or `n` is out of range.
    pub fn lcg(n: u64, a: u64, dim: usize) -> Result<Self, ConfigError> {
        if n < 2 {
            return Err(ConfigError::InvalidParameter {
                name: "n",
                value: format!("{} must be at least 2", n),
            });
        }
        if gcd(a % n, n) != 1 {
            return Err(ConfigError::InvalidParameter {
                name: "a",
                value: format!("{} is not coprime to {}", a, n),
            });
        }
        let scale = n as f64;
        Self::from_map(
            n,
            dim,
            |x| ((u128::from(x) * u128::from(a)) % u128::from(n)) as u64,
            |x| x as f64 / scale,
        )
    }

    /// Cycles of a recurrence over `GF(2^w)` (LFSR or polynomial LCG),
    /// output the state word as a binary fraction.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the state space is too large.
    pub fn from_recurrence<R: StateRecurrence>(
        mut recurrence: R,
        dim: usize,
    ) -> Result<Self, ConfigError> {
        let bits = recurrence.state_bits();
        let num_states = 1u64 << bits;
        let scale = num_states as f64;
        Self::from_map(
            num_states,
            dim,
            |x| {
                recurrence.set_state_word(x as u32);
                recurrence.advance();
                u64::from(recurrence.state_word())
            },
            |x| x as f64 / scale,
        )
    }

    /// Number of cycles.
    pub fn num_cycles(&self) -> usize {
        self.cycles.len()
    }

    /// Output values of cycle `c`.
    pub fn cycle(&self, c: usize) -> &[f64] {
        &self.cycles[c]
    }

    /// Cycle holding point `i` and the offset of `i` within it.
    fn locate(&self, i: usize) -> (usize, usize) {
        let c = self.starts.partition_point(|&s| s <= i) - 1;
        (c, i - self.starts[c])
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

impl PointSet for CycleBasedPointSet {
    type Iter<'a> = CoordinateIterator<'a, Self>;

    fn dimension(&self) -> usize {
        self.dim
    }

    fn num_points(&self) -> usize {
        self.num_points
    }

    fn coordinate(&self, i: usize, j: usize) -> f64 {
        let (c, offset) = self.locate(i);
        let cycle = &self.cycles[c];
        self.shift.apply(j, cycle[(offset + j) % cycle.len()])
    }

    fn iter(&self) -> Self::Iter<'_> {
        CoordinateIterator::new(self)
    }
}

impl ShiftablePointSet for CycleBasedPointSet {
    fn add_random_shift(
        &mut self,
        d1: usize,
        d2: usize,
        stream: &mut dyn RandomStream,
    ) -> Result<(), ConfigError> {
        self.shift.add(d1, d2, stream)
    }

    fn clear_random_shift(&mut self) {
        self.shift.clear();
    }
}
