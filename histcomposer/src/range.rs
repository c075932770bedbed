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

//! Half-open value ranges.

use std::fmt;

/// Half-open interval `[low, high)` of sample values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueRange {
    low: i64,
    high: i64,
}

impl ValueRange {
    /// Creates the range `[low, high)`.
    ///
    /// # Panics
    ///
    /// Panics if `low >= high`.
    pub fn new(low: i64, high: i64) -> Self {
        assert!(low < high, "range must satisfy low < high, got [{low}, {high})");
        Self { low, high }
    }

    /// Inclusive lower bound.
    pub fn low(&self) -> i64 {
        self.low
    }

    /// Exclusive upper bound.
    pub fn high(&self) -> i64 {
        self.high
    }

    /// Number of values covered.
    pub fn width(&self) -> u64 {
        self.high.abs_diff(self.low)
    }

    /// Returns true if `value` lies in the range.
    pub fn contains(&self, value: i64) -> bool {
        value >= self.low && value < self.high
    }

    /// Iterates over every value of the range in ascending order.
    pub fn values(&self) -> std::ops::Range<i64> {
        self.low..self.high
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let range = ValueRange::new(-3, 4);
        assert_eq!(range.width(), 7);
        assert!(range.contains(-3));
        assert!(range.contains(3));
        assert!(!range.contains(4));
        assert_eq!(range.values().count(), 7);
        assert_eq!(range.to_string(), "[-3, 4)");
    }

    #[test]
    fn test_width_of_extreme_ranges() {
        assert_eq!(ValueRange::new(i64::MIN, i64::MAX).width(), u64::MAX);
        assert_eq!(ValueRange::new(i64::MIN, 0).width(), 1 << 63);
    }

    #[test]
    #[should_panic(expected = "low < high")]
    fn test_empty_range_panics() {
        ValueRange::new(5, 5);
    }
}
