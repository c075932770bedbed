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

//! The composite histogram assembled from a solution.

use crate::bucket::Bucket;
use crate::error::Error;
use crate::range::ValueRange;
use crate::resource::ResourceVector;
use crate::truth::GroundTruth;
use crate::truth::PointQuery;

/// Disjoint configured buckets that together answer point queries over a domain.
///
/// # Examples
///
/// ```
/// use histcomposer::bucket::ExactBucket;
/// use histcomposer::bucket::FineGrainedBucket;
/// use histcomposer::histogram::CompositeHistogram;
/// use histcomposer::range::ValueRange;
///
/// let mut low = ExactBucket::new();
/// low.configure(ValueRange::new(0, 100));
/// let mut high = FineGrainedBucket::new(7);
/// high.configure(ValueRange::new(100, 200));
///
/// let mut histogram = CompositeHistogram::new(ValueRange::new(0, 200));
/// histogram.add_bucket(low.into()).unwrap();
/// histogram.add_bucket(high.into()).unwrap();
/// histogram.update(150);
/// assert_eq!(histogram.query(150), 1);
/// assert_eq!(histogram.query(500), 0);
/// assert_eq!(histogram.total_latency(), 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeHistogram {
    domain: ValueRange,
    buckets: Vec<Bucket>,
}

impl CompositeHistogram {
    /// Creates an empty histogram over `domain`.
    pub fn new(domain: ValueRange) -> Self {
        Self {
            domain,
            buckets: vec![],
        }
    }

    /// Adds a configured bucket.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if the
    /// bucket is not configured or its range overlaps a bucket already held.
    pub fn add_bucket(&mut self, bucket: Bucket) -> Result<(), Error> {
        let Some(range) = bucket.range() else {
            return Err(Error::config_invalid("bucket must be configured before it is added"));
        };
        let overlapping = self
            .buckets
            .iter()
            .filter_map(Bucket::range)
            .find(|held| held.low() < range.high() && range.low() < held.high());
        if let Some(held) = overlapping {
            return Err(Error::config_invalid("bucket range overlaps a held bucket")
                .with_context("range", range)
                .with_context("held", held));
        }
        self.buckets.push(bucket);
        Ok(())
    }

    /// Estimated count of `value`: the first non-zero bucket estimate, or 0.
    pub fn query(&self, value: i64) -> u64 {
        self.buckets
            .iter()
            .map(|b| b.query(value))
            .find(|estimate| *estimate != 0)
            .unwrap_or(0)
    }

    /// Streams `value` into every bucket; only the bucket whose range holds it counts it.
    pub fn update(&mut self, value: i64) {
        for bucket in &mut self.buckets {
            bucket.update(value);
        }
    }

    /// The held buckets, in insertion order.
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// The covered domain.
    pub fn domain(&self) -> ValueRange {
        self.domain
    }

    /// Sum of the buckets' resource costs.
    pub fn total_cost(&self) -> ResourceVector {
        self.buckets.iter().map(Bucket::resource_cost).sum()
    }

    /// Sum of the buckets' latencies.
    pub fn total_latency(&self) -> u32 {
        self.buckets.iter().map(Bucket::latency).sum()
    }

    /// Budget-weighted usage score of the total cost, as used by the annealing cost model.
    pub fn weighted_resource_usage(&self, budget: &ResourceVector) -> f64 {
        self.total_cost().weighted_usage(budget)
    }

    /// Estimates for every value of the domain, lowest first.
    pub fn to_vec(&self) -> Vec<u64> {
        self.domain.values().map(|v| self.query(v)).collect()
    }

    /// Root mean squared error against `truth` over its whole domain.
    pub fn rmse(&self, truth: &GroundTruth) -> f64 {
        truth.root_mean_squared_error(self, truth.domain())
    }

    /// Mean squared error of every bucket over its own range.
    pub fn mse_per_bucket(&self, truth: &GroundTruth) -> Vec<f64> {
        self.per_bucket(|bucket, range| truth.mean_squared_error(bucket, range))
    }

    /// Mean absolute error of every bucket over its own range.
    pub fn mae_per_bucket(&self, truth: &GroundTruth) -> Vec<f64> {
        self.per_bucket(|bucket, range| truth.mean_absolute_error(bucket, range))
    }

    /// Root mean squared error of every bucket over its own range.
    pub fn rmse_per_bucket(&self, truth: &GroundTruth) -> Vec<f64> {
        self.per_bucket(|bucket, range| truth.root_mean_squared_error(bucket, range))
    }

    fn per_bucket<F>(&self, metric: F) -> Vec<f64>
    where
        F: Fn(&Bucket, ValueRange) -> f64,
    {
        self.buckets
            .iter()
            .filter_map(|bucket| bucket.range().map(|range| metric(bucket, range)))
            .collect()
    }
}

impl PointQuery for CompositeHistogram {
    fn query(&self, value: i64) -> u64 {
        CompositeHistogram::query(self, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::BucketKind;
    use crate::bucket::ExactBucket;
    use crate::bucket::SizeTier;
    use crate::error::ErrorKind;

    fn exact(low: i64, high: i64) -> Bucket {
        let mut bucket = ExactBucket::new();
        bucket.configure(ValueRange::new(low, high));
        bucket.into()
    }

    #[test]
    fn test_rejects_bad_buckets() {
        let mut histogram = CompositeHistogram::new(ValueRange::new(0, 10));
        let unconfigured = BucketKind::Exact.create(SizeTier::Small);
        let err = histogram.add_bucket(unconfigured).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

        histogram.add_bucket(exact(0, 5)).unwrap();
        let err = histogram.add_bucket(exact(4, 10)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(err.context_value("held"), Some("[0, 5)"));
        histogram.add_bucket(exact(5, 10)).unwrap();
        assert_eq!(histogram.buckets().len(), 2);
    }

    #[test]
    fn test_totals() {
        let mut histogram = CompositeHistogram::new(ValueRange::new(0, 10));
        histogram.add_bucket(exact(0, 5)).unwrap();
        histogram.add_bucket(exact(5, 10)).unwrap();
        assert_eq!(histogram.total_cost(), ResourceVector::new(386.0, 602.0, 0.0, 0.0));
        assert_eq!(histogram.total_latency(), 2);
        assert_eq!(
            histogram.weighted_resource_usage(&ResourceVector::new(1.0, 0.0, 0.0, 0.0)),
            386.0
        );
    }

    #[test]
    fn test_to_vec_and_errors() {
        let truth = GroundTruth::from_counts(0, vec![5, 0, 0, 3, 0, 0, 0, 0, 0, 2]).unwrap();
        let mut histogram = CompositeHistogram::new(truth.domain());
        histogram.add_bucket(exact(0, 5)).unwrap();
        histogram.add_bucket(exact(5, 10)).unwrap();
        for value in truth.occurrences(truth.domain()) {
            histogram.update(value);
        }
        assert_eq!(histogram.to_vec(), vec![8, 8, 8, 8, 8, 2, 2, 2, 2, 2]);
        // (9 + 64 + 64 + 25 + 64) / 5 and (4 * 4 + 0) / 5
        assert_eq!(histogram.mse_per_bucket(&truth), vec![45.2, 3.2]);
        assert_eq!(histogram.mae_per_bucket(&truth), vec![6.4, 1.6]);
        // (226 + 16) / 10
        assert!((histogram.rmse(&truth) - 24.2_f64.sqrt()).abs() < 1e-9);
    }
}
