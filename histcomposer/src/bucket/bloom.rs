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

/// A Bloom filter in front of a shared occurrence average.
///
/// Every update sets the bits addressed by each hash seed; an update that found at least one of
/// them clear counts as a new distinct value. A query answers 0 when any addressed bit is clear
/// (the value was never seen) and `floor(count / distinct_count)` otherwise:
///
/// - No false negatives: a value that was updated always answers non-zero.
/// - False positives only inflate the answer for unseen values; they never hide seen ones.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomBucket {
    span: Span,
    count: u64,
    distinct_count: u64,
    filter_bits: u32,
    seeds: Vec<u32>,
    /// Bit array packed into u64 words, `ceil(2^filter_bits / 64)` long.
    bit_array: Vec<u64>,
}

impl BloomBucket {
    /// Creates an unconfigured bucket of `2^filter_bits` bits using the catalog seeds.
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
        let num_words = (1usize << filter_bits).div_ceil(64);
        Self {
            span: Span::default(),
            count: 0,
            distinct_count: 0,
            filter_bits,
            seeds: seeds.to_vec(),
            bit_array: vec![0; num_words],
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

        let mut was_present = true;
        for seed in &self.seeds {
            let index = slot_index(value, *seed, self.filter_bits);
            if !get_bit(&self.bit_array, index) {
                was_present = false;
            }
            set_bit(&mut self.bit_array, index);
        }
        if !was_present {
            self.distinct_count += 1;
        }
    }

    /// 0 if `value` was definitely never recorded, else the shared average.
    pub fn query(&self, value: i64) -> u64 {
        if !self.span.admits(value) || !self.contains(value) {
            return 0;
        }
        if self.distinct_count == 0 {
            return 0;
        }
        self.count / self.distinct_count
    }

    /// Tests whether all bits addressed by `value` are set.
    pub fn contains(&self, value: i64) -> bool {
        self.seeds.iter().all(|seed| {
            get_bit(&self.bit_array, slot_index(value, *seed, self.filter_bits))
        })
    }

    /// The configured range, if any.
    pub fn range(&self) -> Option<ValueRange> {
        self.span.range()
    }

    /// Total in-range occurrences.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Number of updates that set at least one new bit.
    pub fn distinct_count(&self) -> u64 {
        self.distinct_count
    }

    /// Number of hash functions.
    pub fn num_hashes(&self) -> usize {
        self.seeds.len()
    }

    /// `log2` of the number of bits.
    pub fn filter_bits(&self) -> u32 {
        self.filter_bits
    }

    /// Number of bits currently set.
    pub fn bits_used(&self) -> u64 {
        self.bit_array.iter().map(|w| w.count_ones() as u64).sum()
    }

    /// Resource tier of the filter size.
    pub fn tier(&self) -> SizeTier {
        SizeTier::classify(self.filter_bits, 4, 8)
    }
}

#[inline]
fn get_bit(words: &[u64], index: usize) -> bool {
    (words[index >> 6] >> (index & 63)) & 1 == 1
}

#[inline]
fn set_bit(words: &mut [u64], index: usize) {
    words[index >> 6] |= 1u64 << (index & 63);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_filter_uses_partial_word() {
        let mut bucket = BloomBucket::new(4);
        bucket.configure(ValueRange::new(0, 1000));
        for v in 0..1000 {
            bucket.update(v);
        }
        // 16 bits, all in the first word
        assert!(bucket.bits_used() <= 16);
        assert_eq!(bucket.bit_array.len(), 1);
    }

    #[test]
    fn test_first_update_is_distinct() {
        let mut bucket = BloomBucket::new(10);
        bucket.configure(ValueRange::new(0, 10));
        bucket.update(3);
        assert_eq!(bucket.distinct_count(), 1);
        bucket.update(3);
        assert_eq!(bucket.distinct_count(), 1);
        assert_eq!(bucket.query(3), 2);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(BloomBucket::new(4).tier(), SizeTier::Small);
        assert_eq!(BloomBucket::new(8).tier(), SizeTier::Medium);
        assert_eq!(BloomBucket::new(10).tier(), SizeTier::Large);
    }
}
