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

use crate::bucket::SizeTier;
use crate::bucket::Span;
use crate::range::ValueRange;

/// Counts occurrences and approximately-distinct values, answering with their ratio.
///
/// Values are folded onto `M` presence slots by `value mod M`; the first occurrence that lands
/// on an empty slot counts as a new distinct value. Colliding values are merged, so the
/// distinct count can only under-estimate and the average can only over-estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct DistinctBucket {
    span: Span,
    count: u64,
    distinct_count: u64,
    slots: Vec<bool>,
}

impl DistinctBucket {
    /// Creates an unconfigured bucket with `max_distincts` presence slots.
    ///
    /// # Panics
    ///
    /// Panics if `max_distincts` is 0.
    pub fn new(max_distincts: usize) -> Self {
        assert!(max_distincts > 0, "max_distincts must be at least 1");
        Self {
            span: Span::default(),
            count: 0,
            distinct_count: 0,
            slots: vec![false; max_distincts],
        }
    }

    /// Fixes the range; ignored once configured.
    pub fn configure(&mut self, range: ValueRange) {
        self.span.configure(range);
    }

    /// Records `value` if it lies in the range.
    pub fn update(&mut self, value: i64) {
        if !self.span.admits(value) {
            return;
        }
        self.count += 1;
        let slot = self.slot(value);
        if !self.slots[slot] {
            self.slots[slot] = true;
            self.distinct_count += 1;
        }
    }

    /// `floor(count / distinct_count)` for in-range values, 0 otherwise.
    pub fn query(&self, value: i64) -> u64 {
        if self.span.admits(value) && self.distinct_count > 0 {
            self.count / self.distinct_count
        } else {
            0
        }
    }

    /// The configured range, if any.
    pub fn range(&self) -> Option<ValueRange> {
        self.span.range()
    }

    /// Total in-range occurrences.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Number of presence slots marked so far.
    pub fn distinct_count(&self) -> u64 {
        self.distinct_count
    }

    /// Number of presence slots.
    pub fn max_distincts(&self) -> usize {
        self.slots.len()
    }

    /// Resource tier of the slot count.
    pub fn tier(&self) -> SizeTier {
        SizeTier::classify(self.slots.len(), 64, 256)
    }

    fn slot(&self, value: i64) -> usize {
        value.rem_euclid(self.slots.len() as i64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_values_fold_into_slots() {
        let mut bucket = DistinctBucket::new(4);
        bucket.configure(ValueRange::new(-8, 8));
        bucket.update(-1);
        bucket.update(3);
        // -1 mod 4 == 3
        assert_eq!(bucket.distinct_count(), 1);
        assert_eq!(bucket.query(0), 2);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(DistinctBucket::new(64).tier(), SizeTier::Small);
        assert_eq!(DistinctBucket::new(256).tier(), SizeTier::Medium);
        assert_eq!(DistinctBucket::new(512).tier(), SizeTier::Large);
    }
}
