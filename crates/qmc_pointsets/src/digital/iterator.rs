//! Incremental enumeration of digital nets.
//!
//! The cursor caches the output digits of the current point for every
//! dimension. Moving from point `i` to `i + 1` changes the counter at a
//! single position `pos`:
//!
//! - Gray order: only Gray digit `pos` changes, by +1, so column `pos` of
//!   each generator matrix is added once.
//! - Natural order: digits `0..pos` wrap from `b - 1` to 0 and digit `pos`
//!   gains 1; modulo `b` both amount to adding columns `0..=pos`.
//!
//! In base 2 the cache holds one packed word per dimension and the update
//! is a single XOR per column.

use qmc_core::error::PointSetError;
use qmc_core::math::{DigitCounter, IndexOrder};

use super::net::DigitalNet;
use crate::pointset::{PointSet, PointSetIterator};

/// Iterator state that can outlive a borrow of its net.
///
/// Obtained from [`DigitalNetIterator::detach`] and re-attached with
/// [`DigitalNet::resume`]; the cached digits are recomputed if the net was
/// mutated in between.
#[derive(Clone, Debug)]
pub struct NetCursor {
    order: IndexOrder,
    point: usize,
    coord: usize,
    counter: DigitCounter,
    cache: Vec<u32>,
    generation: u64,
}

impl NetCursor {
    pub(crate) fn new(net: &DigitalNet, order: IndexOrder) -> Self {
        let mut cursor = Self {
            order,
            point: 0,
            coord: 0,
            counter: DigitCounter::new(net.base(), net.num_cols()),
            cache: Vec::new(),
            generation: net.generation(),
        };
        cursor.set_point(net, 0);
        cursor
    }

    /// Enumeration order.
    pub fn order(&self) -> IndexOrder {
        self.order
    }

    /// Current point index.
    pub fn point_index(&self) -> usize {
        self.point
    }

    /// Generation of the net the cache was computed against.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Counter digits of the current point under the cursor's order.
    pub(crate) fn counter(&self) -> &DigitCounter {
        &self.counter
    }

    pub(crate) fn sync(&mut self, net: &DigitalNet) {
        if self.generation != net.generation() {
            self.recompute(net);
        }
    }

    pub(crate) fn set_point(&mut self, net: &DigitalNet, i: usize) {
        self.point = i;
        self.coord = 0;
        self.counter.set(i as u64);
        self.recompute(net);
    }

    fn recompute(&mut self, net: &DigitalNet) {
        let dim = net.dimension();
        let k = net.num_cols();
        self.generation = net.generation();
        if self.counter.len() != k {
            self.counter = DigitCounter::new(net.base(), k);
            self.counter.set(self.point as u64);
        }

        if let Some(packed) = net.packed() {
            self.cache.clear();
            self.cache.extend_from_slice(&packed.shift);
            for c in 0..k {
                if self.counter.digit_in(self.order, c) != 0 {
                    for (j, word) in self.cache.iter_mut().enumerate() {
                        *word ^= packed.columns[j * k + c];
                    }
                }
            }
            return;
        }

        let w = net.out_digits();
        self.cache.clear();
        self.cache.resize(dim * w, 0);
        for j in 0..dim {
            for l in 0..w {
                self.cache[j * w + l] = net.shift_digit(j, l);
            }
        }
        for c in 0..k {
            let d = self.counter.digit_in(self.order, c);
            if d != 0 {
                self.add_column(net, c, d);
            }
        }
    }

    /// Adds `times` copies of column `c` to every dimension's digits.
    fn add_column(&mut self, net: &DigitalNet, c: usize, times: u32) {
        let b = u64::from(net.base());
        let w = net.out_digits();
        let matrices = net.generator_matrices();
        for j in 0..net.dimension() {
            let column = matrices.column(j, c);
            let digits = &mut self.cache[j * w..j * w + column.len()];
            for (d, &x) in digits.iter_mut().zip(column) {
                if x != 0 {
                    *d = ((u64::from(*d) + u64::from(x) * u64::from(times)) % b) as u32;
                }
            }
        }
    }

    pub(crate) fn advance(&mut self, net: &DigitalNet) -> usize {
        self.point += 1;
        self.coord = 0;
        if self.point >= net.num_points() {
            return self.point;
        }
        let pos = self.counter.increment();
        let k = net.num_cols();
        let (first, last) = match self.order {
            IndexOrder::Gray => (pos, pos),
            IndexOrder::Natural => (0, pos),
        };

        if let Some(packed) = net.packed() {
            for c in first..=last {
                for (j, word) in self.cache.iter_mut().enumerate() {
                    *word ^= packed.columns[j * k + c];
                }
            }
            return self.point;
        }

        for c in first..=last {
            self.add_column(net, c, 1);
        }
        self.point
    }

    pub(crate) fn value(&self, net: &DigitalNet, j: usize) -> f64 {
        if net.packed().is_some() {
            return net.finish(f64::from(self.cache[j]) * net.norm());
        }
        let w = net.out_digits();
        let total: u64 = self.cache[j * w..(j + 1) * w]
            .iter()
            .zip(net.weights())
            .map(|(&d, &weight)| u64::from(d) * weight)
            .sum();
        net.finish(total as f64 * net.norm())
    }
}

/// Sequential iterator over a digital net.
///
/// Each call to [`reset_to_next_point`](PointSetIterator::reset_to_next_point)
/// costs one column update per dimension, independent of the point index.
#[derive(Debug)]
pub struct DigitalNetIterator<'a> {
    net: &'a DigitalNet,
    cursor: NetCursor,
}

impl<'a> DigitalNetIterator<'a> {
    pub(crate) fn new(net: &'a DigitalNet, cursor: NetCursor) -> Self {
        Self { net, cursor }
    }

    /// The net being enumerated.
    pub fn net(&self) -> &'a DigitalNet {
        self.net
    }

    /// Enumeration order.
    pub fn order(&self) -> IndexOrder {
        self.cursor.order
    }

    /// Releases the borrow and returns the iterator state.
    pub fn detach(self) -> NetCursor {
        self.cursor
    }

    pub(crate) fn cursor(&self) -> &NetCursor {
        &self.cursor
    }
}

impl PointSetIterator for DigitalNetIterator<'_> {
    fn dimension(&self) -> usize {
        self.net.dimension()
    }

    fn num_points(&self) -> usize {
        self.net.num_points()
    }

    fn cur_point_index(&self) -> usize {
        self.cursor.point
    }

    fn cur_coordinate_index(&self) -> usize {
        self.cursor.coord
    }

    fn set_cur_point_index(&mut self, i: usize) {
        self.cursor.set_point(self.net, i);
    }

    fn reset_to_next_point(&mut self) -> usize {
        self.cursor.advance(self.net)
    }

    fn set_cur_coordinate_index(&mut self, j: usize) {
        self.cursor.coord = j;
    }

    fn next_coordinate(&mut self) -> Result<f64, PointSetError> {
        self.check_position()?;
        let value = self.cursor.value(self.net, self.cursor.coord);
        self.cursor.coord += 1;
        Ok(value)
    }
}

/// Iterator over a sequence's points with the point index prepended as
/// coordinate 0.
///
/// Coordinate 0 of point `i` is `i / b^k` in natural order (with the usual
/// zero avoidance); coordinates `1..=s` are those of the wrapped net.
#[derive(Debug)]
pub struct ShiftCjIterator<'a> {
    inner: DigitalNetIterator<'a>,
    coord: usize,
}

impl<'a> ShiftCjIterator<'a> {
    pub(crate) fn new(inner: DigitalNetIterator<'a>) -> Self {
        Self { inner, coord: 0 }
    }

    fn leading_value(&self) -> f64 {
        let net = self.inner.net;
        let counter = self.inner.cursor().counter();
        let numerator = counter.value_in(self.inner.order());
        net.finish(numerator as f64 / net.num_points() as f64)
    }
}

impl PointSetIterator for ShiftCjIterator<'_> {
    fn dimension(&self) -> usize {
        self.inner.dimension() + 1
    }

    fn num_points(&self) -> usize {
        self.inner.num_points()
    }

    fn cur_point_index(&self) -> usize {
        self.inner.cur_point_index()
    }

    fn cur_coordinate_index(&self) -> usize {
        self.coord
    }

    fn set_cur_point_index(&mut self, i: usize) {
        self.inner.set_cur_point_index(i);
        self.coord = 0;
    }

    fn reset_to_next_point(&mut self) -> usize {
        self.coord = 0;
        self.inner.reset_to_next_point()
    }

    fn set_cur_coordinate_index(&mut self, j: usize) {
        self.coord = j;
        self.inner.set_cur_coordinate_index(j.saturating_sub(1));
    }

    fn next_coordinate(&mut self) -> Result<f64, PointSetError> {
        self.check_position()?;
        let value = if self.coord == 0 {
            self.inner.set_cur_coordinate_index(0);
            self.leading_value()
        } else {
            self.inner.next_coordinate()?
        };
        self.coord += 1;
        Ok(value)
    }
}
