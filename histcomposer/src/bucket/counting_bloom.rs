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
use crate::hash::DEFAULT_NUM_HASHES;
use crate::hash::DEFAULT_SEEDS;
use crate::hash::slot_index;
use crate::range::ValueRange;

const MAX_FILTER_BITS: u32 = 30;

/// A counting Bloom filter answering with the count-min estimate.
///
/// Each update increments the counter addressed by every hash seed. A query returns the
/// smallest addressed counter, which is never below the true occurrence count of the value.
#[derive(Debug, Clone, PartialEq)]
pub struct CountingBloomBucket {
    span: Span,
    count: u64,
    distinct_count: u64,
    filter_bits: u32,
    seeds: Vec<u32>,
    counters: Vec<u64>,
}

impl CountingBloomBucket {
    /// Creates an unconfigured bucket of `2^filter_bits` counters using the catalog seeds.
    ///
    /// # Panics
    ///
    /// Panics if `filter_bits` is 0 or larger than 30.
    pub fn new(filter_bits: u32) -> Self {
        Self::with_seeds(filter_bits, &DEFAULT_SEEDS[..DEFAULT_NUM_HASHES])
    }

    /// Creates an unconfigured bucket with one hash function per seed.
    ///
    /// # Panics
    ///
    /// Panics if `seeds` is empty, or `filter_bits` is 0 or larger than 30.
    pub fn with_seeds(filter_bits: u32, seeds: &[u32]) -> Self {
        assert!(
            (1..=MAX_FILTER_BITS).contains(&filter_bits),
            "filter_bits must be in [1, {MAX_FILTER_BITS}], got {filter_bits}"
        );
        assert!(!seeds.is_empty(), "at least one seed is required");
        Self {
            span: Span::default(),
            count: 0,
            distinct_count: 0,
            filter_bits,
            seeds: seeds.to_vec(),
            counters: vec![0; 1 << filter_bits],
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

        let mut is_new = false;
        for seed in &self.seeds {
            let counter = &mut self.counters[slot_index(value, *seed, self.filter_bits)];
            if *counter == 0 {
                is_new = true;
            }
            *counter += 1;
        }
        if is_new {
            self.distinct_count += 1;
        }
    }

    /// Minimum of the counters addressed by `value`; 0 out of range.
    pub fn query(&self, value: i64) -> u64 {
        if !self.span.admits(value) {
            return 0;
        }
        self.seeds
            .iter()
            .map(|seed| self.counters[slot_index(value, *seed, self.filter_bits)])
            .min()
            .unwrap_or(0)
    }

    /// The configured range, if any.
    pub fn range(&self) -> Option<ValueRange> {
        self.span.range()
    }

    /// Total in-range occurrences.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Number of updates that found at least one zero counter.
    pub fn distinct_count(&self) -> u64 {
        self.distinct_count
    }

    /// Number of hash functions.
    pub fn num_hashes(&self) -> usize {
        self.seeds.len()
    }

    /// `log2` of the number of counters.
    pub fn filter_bits(&self) -> u32 {
        self.filter_bits
    }

    /// The counter array.
    pub fn counters(&self) -> &[u64] {
        &self.counters
    }

    /// Resource tier of the filter size.
    pub fn tier(&self) -> SizeTier {
        SizeTier::classify(self.filter_bits, 5, 8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_sum_to_hashes_times_count() {
        let mut bucket = CountingBloomBucket::new(5);
        bucket.configure(ValueRange::new(0, 200));
        for v in 0..200 {
            bucket.update(v);
        }
        let total: u64 = bucket.counters().iter().sum();
        assert_eq!(total, 3 * 200);
        assert_eq!(bucket.count(), 200);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(CountingBloomBucket::new(5).tier(), SizeTier::Small);
        assert_eq!(CountingBloomBucket::new(8).tier(), SizeTier::Medium);
        assert_eq!(CountingBloomBucket::new(10).tier(), SizeTier::Large);
        assert_eq!(CountingBloomBucket::with_seeds(2, &[704]).tier(), SizeTier::Small);
    }
}
