// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Hardware resource vectors and budgets.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::ops::AddAssign;
use std::ops::Index;
use std::ops::Sub;
use std::ops::SubAssign;

/// Number of independent resource kinds tracked per bucket.
pub const NUM_RESOURCES: usize = 4;

/// Display names of the resource slots, in slot order.
pub const RESOURCE_NAMES: [&str; NUM_RESOURCES] = ["LUT", "FF", "BRAM", "DSP"];

/// Quantities of the four resource kinds (LUT, FF, BRAM, DSP equivalents).
///
/// Used both for the fixed cost of a bucket and for a global budget. BRAM is fractional
/// (half blocks exist), so every slot is an `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResourceVector([f64; NUM_RESOURCES]);

impl ResourceVector {
    /// The empty vector.
    pub const ZERO: ResourceVector = ResourceVector([0.0; NUM_RESOURCES]);

    /// Reference budget of a Zynq UltraScale+ class device.
    pub const ZYNQ: ResourceVector = ResourceVector([230400.0, 460800.0, 312.0, 1728.0]);

    /// Reference budget of a Basys 3 (Artix-7 35T) board.
    pub const BASYS3: ResourceVector = ResourceVector([20800.0, 41600.0, 50.0, 90.0]);

    /// Creates a vector from its four components.
    pub const fn new(lut: f64, ff: f64, bram: f64, dsp: f64) -> Self {
        Self([lut, ff, bram, dsp])
    }

    /// Look-up tables.
    pub fn lut(&self) -> f64 {
        self.0[0]
    }

    /// Flip-flops.
    pub fn ff(&self) -> f64 {
        self.0[1]
    }

    /// Block RAM tiles.
    pub fn bram(&self) -> f64 {
        self.0[2]
    }

    /// DSP slices.
    pub fn dsp(&self) -> f64 {
        self.0[3]
    }

    /// Returns the components as an array, in slot order.
    pub fn as_array(&self) -> [f64; NUM_RESOURCES] {
        self.0
    }

    /// Sum of the four components.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Returns true if no component is negative.
    pub fn is_non_negative(&self) -> bool {
        self.0.iter().all(|r| *r >= 0.0)
    }

    /// Returns true if every component is at most the matching budget component.
    ///
    /// Equivalent to `(budget - self).is_non_negative()`.
    pub fn fits_within(&self, budget: &ResourceVector) -> bool {
        (*budget - *self).is_non_negative()
    }

    /// Splits the vector into `parts` equal shares, rounding every component down.
    ///
    /// # Panics
    ///
    /// Panics if `parts` is 0.
    pub fn split_even(&self, parts: usize) -> ResourceVector {
        assert!(parts > 0, "parts must be at least 1");
        let n = parts as f64;
        ResourceVector(self.0.map(|r| (r / n).floor()))
    }

    /// Per-slot weight of a budget: each component's share of the budget total.
    pub fn weights(&self) -> [f64; NUM_RESOURCES] {
        let total = self.total();
        if total <= 0.0 {
            return [0.0; NUM_RESOURCES];
        }
        self.0.map(|b| b / total)
    }

    /// Budget-weighted usage score of `self` against `budget`.
    ///
    /// Each component is weighted by its share of the budget, and the weighted sum is divided
    /// by the budget total. Scarce resources therefore count for less per unit than plentiful
    /// ones. A budget with a zero total scores 0.
    pub fn weighted_usage(&self, budget: &ResourceVector) -> f64 {
        let total = budget.total();
        if total <= 0.0 {
            return 0.0;
        }
        let weights = budget.weights();
        let weighted: f64 = weights.iter().zip(self.0.iter()).map(|(w, r)| w * r).sum();
        weighted / total
    }

    /// Percentage of each budget component consumed by `self`.
    ///
    /// A zero budget component reports 0% when unused and infinity otherwise.
    pub fn utilisation_percent(&self, budget: &ResourceVector) -> [f64; NUM_RESOURCES] {
        let mut out = [0.0; NUM_RESOURCES];
        for (i, slot) in out.iter_mut().enumerate() {
            let (used, available) = (self.0[i], budget.0[i]);
            *slot = if available > 0.0 {
                used / available * 100.0
            } else if used > 0.0 {
                f64::INFINITY
            } else {
                0.0
            };
        }
        out
    }

    /// How many copies of `cost` fit in `self` when treated as a budget.
    ///
    /// Components where `cost` is zero impose no bound; an all-zero cost fits without limit.
    pub fn max_instances(&self, cost: &ResourceVector) -> u64 {
        self.0
            .iter()
            .zip(cost.0.iter())
            .filter(|(_, c)| **c > 0.0)
            .map(|(b, c)| (b / c).floor().max(0.0) as u64)
            .min()
            .unwrap_or(u64::MAX)
    }

    /// Orders two vectors slot by slot, LUT first.
    pub(crate) fn lexicographic_cmp(&self, other: &ResourceVector) -> std::cmp::Ordering {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.total_cmp(b))
            .find(|o| o.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}

impl From<[f64; NUM_RESOURCES]> for ResourceVector {
    fn from(value: [f64; NUM_RESOURCES]) -> Self {
        Self(value)
    }
}

impl Index<usize> for ResourceVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl Add for ResourceVector {
    type Output = ResourceVector;

    fn add(mut self, rhs: ResourceVector) -> ResourceVector {
        self += rhs;
        self
    }
}

impl AddAssign for ResourceVector {
    fn add_assign(&mut self, rhs: ResourceVector) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
    }
}

impl Sub for ResourceVector {
    type Output = ResourceVector;

    fn sub(mut self, rhs: ResourceVector) -> ResourceVector {
        self -= rhs;
        self
    }
}

impl SubAssign for ResourceVector {
    fn sub_assign(&mut self, rhs: ResourceVector) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a -= b;
        }
    }
}

impl Sum for ResourceVector {
    fn sum<I: Iterator<Item = ResourceVector>>(iter: I) -> Self {
        iter.fold(ResourceVector::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a ResourceVector> for ResourceVector {
    fn sum<I: Iterator<Item = &'a ResourceVector>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [lut, ff, bram, dsp] = self.0;
        write!(f, "({lut}, {ff}, {bram}, {dsp})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_and_fit() {
        let budget = ResourceVector::new(1000.0, 1000.0, 4.0, 0.0);
        let cost = ResourceVector::new(678.0, 540.0, 0.5, 0.0);
        let remaining = budget - cost;
        assert_eq!(remaining, ResourceVector::new(322.0, 460.0, 3.5, 0.0));
        assert!(cost.fits_within(&budget));
        assert!(!(cost + cost).fits_within(&budget));
        assert!(ResourceVector::ZERO.fits_within(&ResourceVector::ZERO));
        assert!(!ResourceVector::new(0.0, 0.0, 0.0, 1.0).fits_within(&budget));
    }

    #[test]
    fn test_split_even_rounds_down() {
        let share = ResourceVector::BASYS3.split_even(3);
        assert_eq!(share, ResourceVector::new(6933.0, 13866.0, 16.0, 30.0));
    }

    #[test]
    fn test_weighted_usage() {
        let budget = ResourceVector::new(3.0, 1.0, 0.0, 0.0);
        assert_eq!(budget.weights(), [0.75, 0.25, 0.0, 0.0]);
        let usage = ResourceVector::new(2.0, 4.0, 0.0, 0.0);
        // (0.75 * 2 + 0.25 * 4) / 4
        assert_eq!(usage.weighted_usage(&budget), 0.625);
        assert_eq!(usage.weighted_usage(&ResourceVector::ZERO), 0.0);
    }

    #[test]
    fn test_max_instances() {
        let cost = ResourceVector::new(193.0, 301.0, 0.0, 0.0);
        assert_eq!(ResourceVector::BASYS3.max_instances(&cost), 107);
        assert_eq!(ResourceVector::BASYS3.max_instances(&ResourceVector::ZERO), u64::MAX);
    }

    #[test]
    fn test_utilisation_percent() {
        let budget = ResourceVector::new(200.0, 100.0, 0.0, 0.0);
        let usage = ResourceVector::new(50.0, 100.0, 0.0, 1.0);
        assert_eq!(
            usage.utilisation_percent(&budget),
            [25.0, 100.0, 0.0, f64::INFINITY]
        );
    }

    #[test]
    fn test_lexicographic_order() {
        use std::cmp::Ordering;
        let a = ResourceVector::new(678.0, 540.0, 0.5, 0.0);
        let b = ResourceVector::new(678.0, 540.0, 2.0, 0.0);
        assert_eq!(a.lexicographic_cmp(&b), Ordering::Less);
        assert_eq!(b.lexicographic_cmp(&a), Ordering::Greater);
        assert_eq!(a.lexicographic_cmp(&a), Ordering::Equal);
    }
}
