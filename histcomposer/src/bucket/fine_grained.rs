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

const MAX_SUB_BUCKET_BITS: u32 = 24;

/// An array of `2^s` exact counters, each covering an equal slice of the range.
///
/// The slice width is the smallest power of two that spreads the range over at most `2^s`
/// sub-buckets. Narrow ranges get one sub-bucket per value, which makes the bucket exact.
#[derive(Debug, Clone, PartialEq)]
pub struct FineGrainedBucket {
    span: Span,
    count: u64,
    sub_bucket_bits: u32,
    shift: u32,
    histogram: Vec<u64>,
}

impl FineGrainedBucket {
    /// Creates an unconfigured bucket of `2^sub_bucket_bits` sub-buckets.
    ///
    /// # Panics
    ///
    /// Panics if `sub_bucket_bits` is larger than 24.
    pub fn new(sub_bucket_bits: u32) -> Self {
        assert!(
            sub_bucket_bits <= MAX_SUB_BUCKET_BITS,
            "sub_bucket_bits must be at most {MAX_SUB_BUCKET_BITS}, got {sub_bucket_bits}"
        );
        Self {
            span: Span::default(),
            count: 0,
            sub_bucket_bits,
            shift: 0,
            histogram: vec![0; 1 << sub_bucket_bits],
        }
    }

    /// Fixes the range and the sub-bucket width; ignored once configured.
    pub fn configure(&mut self, range: ValueRange) {
        if self.span.configure(range) {
            let msb = range
                .width()
                .checked_next_power_of_two()
                .map_or(u64::BITS, u64::trailing_zeros);
            self.shift = msb.saturating_sub(self.sub_bucket_bits);
        }
    }

    /// Counts `value` in its sub-bucket if it lies in the range.
    pub fn update(&mut self, value: i64) {
        if let Some(address) = self.address(value) {
            self.histogram[address] += 1;
            self.count += 1;
        }
    }

    /// Count of the sub-bucket holding `value`; 0 out of range.
    pub fn query(&self, value: i64) -> u64 {
        self.address(value).map_or(0, |a| self.histogram[a])
    }

    /// Sub-bucket index of `value`, or `None` when unconfigured or out of range.
    pub fn address(&self, value: i64) -> Option<usize> {
        let range = self.span.range().filter(|r| r.contains(value))?;
        let offset = value.abs_diff(range.low()) >> self.shift;
        Some((offset as usize).min(self.histogram.len() - 1))
    }

    /// The configured range, if any.
    pub fn range(&self) -> Option<ValueRange> {
        self.span.range()
    }

    /// Total in-range occurrences.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Values per sub-bucket, as a power of two.
    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// The sub-bucket counters.
    pub fn sub_buckets(&self) -> &[u64] {
        &self.histogram
    }

    /// Resource tier of the sub-bucket count.
    pub fn tier(&self) -> SizeTier {
        SizeTier::classify(self.sub_bucket_bits, 7, 11)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_from_range_width() {
        let mut bucket = FineGrainedBucket::new(7);
        bucket.configure(ValueRange::new(0, 1000));
        // 1000 -> 1024 = 2^10, 10 - 7
        assert_eq!(bucket.shift(), 3);
        assert_eq!(bucket.address(0), Some(0));
        assert_eq!(bucket.address(7), Some(0));
        assert_eq!(bucket.address(8), Some(1));
        assert_eq!(bucket.address(999), Some(124));
        assert_eq!(bucket.address(1000), None);
    }

    #[test]
    fn test_narrow_range_is_exact() {
        let mut bucket = FineGrainedBucket::new(7);
        bucket.configure(ValueRange::new(100, 150));
        assert_eq!(bucket.shift(), 0);
        bucket.update(100);
        bucket.update(149);
        bucket.update(149);
        assert_eq!(bucket.query(100), 1);
        assert_eq!(bucket.query(101), 0);
        assert_eq!(bucket.query(149), 2);
    }

    #[test]
    fn test_full_i64_range() {
        let mut bucket = FineGrainedBucket::new(7);
        bucket.configure(ValueRange::new(i64::MIN, i64::MAX));
        assert_eq!(bucket.shift(), 57);
        assert_eq!(bucket.address(i64::MIN), Some(0));
        assert_eq!(bucket.address(0), Some(64));
        assert_eq!(bucket.address(i64::MAX - 1), Some(127));
        bucket.update(i64::MAX - 1);
        assert_eq!(bucket.query(i64::MAX - 1), 1);
    }

    #[test]
    fn test_address_clamps_to_last_sub_bucket() {
        let mut bucket = FineGrainedBucket::new(2);
        bucket.configure(ValueRange::new(0, 5));
        // 5 -> 8 = 2^3, shift 1: offsets 0..4 map to 0, 0, 1, 1, 2
        assert_eq!(bucket.shift(), 1);
        assert_eq!(bucket.address(4), Some(2));

        let mut single = FineGrainedBucket::new(0);
        single.configure(ValueRange::new(0, 3));
        assert_eq!(single.address(2), Some(0));
    }

    #[test]
    fn test_reconfigure_keeps_geometry() {
        let mut bucket = FineGrainedBucket::new(7);
        bucket.configure(ValueRange::new(0, 1000));
        bucket.configure(ValueRange::new(0, 10));
        assert_eq!(bucket.shift(), 3);
        assert_eq!(bucket.range(), Some(ValueRange::new(0, 1000)));
    }
}
