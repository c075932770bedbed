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

use crate::range::ValueRange;
use crate::truth::GroundTruth;

/// Anything that answers "how many times did `value` occur?".
pub trait PointQuery {
    /// Estimated occurrence count of `value`.
    fn query(&self, value: i64) -> u64;
}

impl<T: PointQuery + ?Sized> PointQuery for &T {
    fn query(&self, value: i64) -> u64 {
        (**self).query(value)
    }
}

/// mean((estimate - truth)²) over `range`.
pub(crate) fn mean_squared_error<H: PointQuery + ?Sized>(
    histogram: &H,
    truth: &GroundTruth,
    range: ValueRange,
) -> f64 {
    mean_of(histogram, truth, range, |diff| diff * diff)
}

/// mean(|estimate - truth|) over `range`.
pub(crate) fn mean_absolute_error<H: PointQuery + ?Sized>(
    histogram: &H,
    truth: &GroundTruth,
    range: ValueRange,
) -> f64 {
    mean_of(histogram, truth, range, f64::abs)
}

fn mean_of<H, F>(histogram: &H, truth: &GroundTruth, range: ValueRange, f: F) -> f64
where
    H: PointQuery + ?Sized,
    F: Fn(f64) -> f64,
{
    let sum: f64 = range
        .values()
        .map(|v| f(histogram.query(v) as f64 - truth.count(v) as f64))
        .sum();
    sum / range.width() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(u64);

    impl PointQuery for Constant {
        fn query(&self, _value: i64) -> u64 {
            self.0
        }
    }

    #[test]
    fn test_metrics_against_constant_estimate() {
        let truth = GroundTruth::from_counts(0, vec![5, 0, 0, 3, 0, 0, 0, 0, 0, 2]).unwrap();
        let estimate = Constant(10);
        let domain = truth.domain();
        assert_eq!(truth.mean_squared_error(&estimate, domain), 83.8);
        assert_eq!(truth.mean_absolute_error(&estimate, domain), 9.0);
        assert_eq!(truth.root_mean_squared_error(&estimate, domain), 83.8f64.sqrt());
    }

    struct Lookup<'a>(&'a GroundTruth);

    impl PointQuery for Lookup<'_> {
        fn query(&self, value: i64) -> u64 {
            self.0.count(value)
        }
    }

    #[test]
    fn test_exact_estimate_has_zero_error() {
        let truth = GroundTruth::from_counts(-5, vec![1, 2, 3]).unwrap();
        assert_eq!(truth.mean_squared_error(&Lookup(&truth), truth.domain()), 0.0);
        assert_eq!(truth.mean_absolute_error(&Lookup(&truth), truth.domain()), 0.0);
    }

    #[test]
    fn test_range_restricted() {
        let truth = GroundTruth::from_counts(0, vec![4, 4, 0, 0]).unwrap();
        let estimate = Constant(4);
        assert_eq!(truth.mean_squared_error(&estimate, ValueRange::new(0, 2)), 0.0);
        assert_eq!(truth.mean_squared_error(&estimate, ValueRange::new(2, 4)), 16.0);
    }
}
