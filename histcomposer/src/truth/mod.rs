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

//! Exact per-value counts and the error metrics measured against them.
//!
//! # Usage
//!
//! ```rust
//! use histcomposer::bucket::ExactBucket;
//! use histcomposer::range::ValueRange;
//! use histcomposer::truth::GroundTruth;
//!
//! let truth = GroundTruth::from_samples(&[0, 0, 0, 0, 0, 3, 3, 3, 9, 9]).unwrap();
//! assert_eq!(truth.domain(), ValueRange::new(0, 10));
//!
//! let mut bucket = ExactBucket::new();
//! bucket.configure(truth.domain());
//! for value in truth.occurrences(truth.domain()) {
//!     bucket.update(value);
//! }
//! assert_eq!(bucket.query(4), 10);
//! assert_eq!(truth.mean_absolute_error(&bucket, truth.domain()), 9.0);
//! ```

mod metrics;

pub use self::metrics::PointQuery;

use crate::error::Error;
use crate::range::ValueRange;

/// Exact occurrence counts over `[domain_min, domain_max]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundTruth {
    domain_min: i64,
    counts: Vec<u64>,
}

impl GroundTruth {
    /// Counts the occurrences of every value between the smallest and largest sample.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if `samples`
    /// is empty, if `max + 1` does not fit in an `i64` (the domain is half-open), or if the
    /// count array cannot be allocated.
    pub fn from_samples(samples: &[i64]) -> Result<Self, Error> {
        let (Some(&min), Some(&max)) = (samples.iter().min(), samples.iter().max()) else {
            return Err(Error::config_invalid("cannot build ground truth from no samples"));
        };
        let len = domain_len(min, max.abs_diff(min))?;
        let mut counts = Vec::new();
        counts.try_reserve_exact(len).map_err(|e| {
            Error::config_invalid("sample spread is too wide for a count array")
                .with_context("min", min)
                .with_context("max", max)
                .set_source(e)
        })?;
        counts.resize(len, 0u64);
        for &sample in samples {
            counts[sample.abs_diff(min) as usize] += 1;
        }
        Ok(Self {
            domain_min: min,
            counts,
        })
    }

    /// Wraps an existing count array whose first slot holds the count of `domain_min`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if `counts`
    /// is empty or the domain would run past `i64::MAX`.
    pub fn from_counts(domain_min: i64, counts: Vec<u64>) -> Result<Self, Error> {
        if counts.is_empty() {
            return Err(Error::config_invalid("count array must not be empty")
                .with_context("domain_min", domain_min));
        }
        domain_len(domain_min, counts.len() as u64 - 1)?;
        Ok(Self { domain_min, counts })
    }

    /// Smallest value of the domain.
    pub fn domain_min(&self) -> i64 {
        self.domain_min
    }

    /// Largest value of the domain (inclusive).
    pub fn domain_max(&self) -> i64 {
        self.domain_min + self.counts.len() as i64 - 1
    }

    /// The domain as the half-open range `[domain_min, domain_max + 1)`.
    pub fn domain(&self) -> ValueRange {
        ValueRange::new(self.domain_min, self.domain_max() + 1)
    }

    /// Exact occurrences of `value`; 0 outside the domain.
    pub fn count(&self, value: i64) -> u64 {
        if value < self.domain_min {
            return 0;
        }
        self.counts
            .get(value.abs_diff(self.domain_min) as usize)
            .copied()
            .unwrap_or(0)
    }

    /// The count array, indexed by `value - domain_min`.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total number of samples.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of values that occur at least once.
    pub fn distinct(&self) -> u64 {
        self.counts.iter().filter(|c| **c > 0).count() as u64
    }

    /// Occurrences inside `range`.
    pub fn total_in(&self, range: ValueRange) -> u64 {
        range.values().map(|v| self.count(v)).sum()
    }

    /// Every occurrence inside `range`, in ascending value order, each value repeated as often
    /// as it occurred. Replaying this stream rebuilds the range's slice of the data.
    pub fn occurrences(&self, range: ValueRange) -> impl Iterator<Item = i64> + '_ {
        range
            .values()
            .flat_map(move |v| std::iter::repeat_n(v, self.count(v) as usize))
    }

    /// Mean squared error of `histogram` against the exact counts over `range`.
    pub fn mean_squared_error<H: PointQuery + ?Sized>(
        &self,
        histogram: &H,
        range: ValueRange,
    ) -> f64 {
        metrics::mean_squared_error(histogram, self, range)
    }

    /// Mean absolute error of `histogram` against the exact counts over `range`.
    pub fn mean_absolute_error<H: PointQuery + ?Sized>(
        &self,
        histogram: &H,
        range: ValueRange,
    ) -> f64 {
        metrics::mean_absolute_error(histogram, self, range)
    }

    /// Root mean squared error of `histogram` against the exact counts over `range`.
    pub fn root_mean_squared_error<H: PointQuery + ?Sized>(
        &self,
        histogram: &H,
        range: ValueRange,
    ) -> f64 {
        metrics::mean_squared_error(histogram, self, range).sqrt()
    }
}

/// Number of slots for a domain starting at `min` and spanning `spread` further values.
///
/// The exclusive end `min + spread + 1` must be representable.
fn domain_len(min: i64, spread: u64) -> Result<usize, Error> {
    let end = i64::try_from(spread)
        .ok()
        .and_then(|s| min.checked_add(s))
        .and_then(|last| last.checked_add(1));
    let len = spread.checked_add(1).and_then(|n| usize::try_from(n).ok());
    match (end, len) {
        (Some(_), Some(len)) => Ok(len),
        _ => Err(Error::config_invalid("domain end does not fit in an i64")
            .with_context("domain_min", min)
            .with_context("spread", spread)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_from_samples() {
        let truth = GroundTruth::from_samples(&[3, 3, 5]).unwrap();
        assert_eq!(truth.domain_min(), 3);
        assert_eq!(truth.domain_max(), 5);
        assert_eq!(truth.counts(), &[2, 0, 1]);
        assert_eq!(truth.total(), 3);
        assert_eq!(truth.distinct(), 2);
        assert_eq!(truth.count(2), 0);
        assert_eq!(truth.count(6), 0);
    }

    #[test]
    fn test_negative_domain() {
        let truth = GroundTruth::from_samples(&[-2, 1, -2]).unwrap();
        assert_eq!(truth.domain(), ValueRange::new(-2, 2));
        assert_eq!(truth.count(-2), 2);
        assert_eq!(truth.count(1), 1);
    }

    #[test]
    fn test_empty_inputs_are_rejected() {
        assert!(GroundTruth::from_samples(&[]).is_err());
        assert!(GroundTruth::from_counts(0, vec![]).is_err());
    }

    #[test]
    fn test_extreme_spreads_are_rejected() {
        let err = GroundTruth::from_samples(&[i64::MIN, i64::MAX]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        // the half-open domain would end at i64::MAX + 1
        assert!(GroundTruth::from_samples(&[i64::MAX]).is_err());
        assert!(GroundTruth::from_counts(i64::MAX, vec![1]).is_err());
        // representable, but far too large to allocate
        let err = GroundTruth::from_samples(&[i64::MIN, -1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_extreme_values_inside_domain() {
        let truth = GroundTruth::from_samples(&[i64::MAX - 1, i64::MAX - 2]).unwrap();
        assert_eq!(truth.domain(), ValueRange::new(i64::MAX - 2, i64::MAX));
        assert_eq!(truth.count(i64::MAX - 1), 1);
        assert_eq!(truth.count(i64::MIN), 0);
        let truth = GroundTruth::from_counts(i64::MIN, vec![4]).unwrap();
        assert_eq!(truth.count(i64::MIN), 4);
        assert_eq!(truth.count(i64::MAX), 0);
    }

    #[test]
    fn test_occurrences_replay() {
        let truth = GroundTruth::from_counts(10, vec![2, 0, 1, 3]).unwrap();
        let all: Vec<i64> = truth.occurrences(truth.domain()).collect();
        assert_eq!(all, vec![10, 10, 12, 13, 13, 13]);
        let slice: Vec<i64> = truth.occurrences(ValueRange::new(11, 13)).collect();
        assert_eq!(slice, vec![12]);
        assert_eq!(truth.total_in(ValueRange::new(12, 20)), 4);
    }
}
