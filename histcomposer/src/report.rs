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

//! Summaries of a composed histogram for experiment drivers.

use std::fmt;

use crate::bucket::BucketKind;
use crate::bucket::SizeTier;
use crate::histogram::CompositeHistogram;
use crate::range::ValueRange;
use crate::resource::NUM_RESOURCES;
use crate::resource::RESOURCE_NAMES;
use crate::resource::ResourceVector;
use crate::truth::GroundTruth;

/// Accuracy of one range of a composed histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeReport {
    /// The bucket's range.
    pub range: ValueRange,
    /// The bucket variant.
    pub kind: BucketKind,
    /// The bucket's size tier.
    pub tier: SizeTier,
    /// Root mean squared error over the range.
    pub rmse: f64,
}

/// Accuracy and cost of one composed histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramReport {
    /// Free-form label, typically "strategy/selector".
    pub label: String,
    /// Number of ranges asked of the partitioner.
    pub requested_ranges: usize,
    /// Number of ranges actually composed.
    pub actual_ranges: usize,
    /// Root mean squared error over the whole domain.
    pub rmse: f64,
    /// Total resource cost.
    pub total_cost: ResourceVector,
    /// Budget-weighted usage score of the total cost.
    pub weighted_usage: f64,
    /// Sum of bucket latencies.
    pub latency: u32,
    /// Percentage of each budget component in use.
    pub utilisation: [f64; NUM_RESOURCES],
    /// Per-range breakdown, lowest range first.
    pub ranges: Vec<RangeReport>,
}

impl HistogramReport {
    /// Evaluates `histogram` against `truth` and `budget`.
    pub fn new(
        label: impl Into<String>,
        requested_ranges: usize,
        histogram: &CompositeHistogram,
        truth: &GroundTruth,
        budget: &ResourceVector,
    ) -> Self {
        let total_cost = histogram.total_cost();
        let mut ranges: Vec<RangeReport> = histogram
            .buckets()
            .iter()
            .filter_map(|bucket| {
                let range = bucket.range()?;
                Some(RangeReport {
                    range,
                    kind: bucket.kind(),
                    tier: bucket.tier(),
                    rmse: truth.root_mean_squared_error(bucket, range),
                })
            })
            .collect();
        ranges.sort_by_key(|r| r.range.low());

        Self {
            label: label.into(),
            requested_ranges,
            actual_ranges: ranges.len(),
            rmse: histogram.rmse(truth),
            total_cost,
            weighted_usage: total_cost.weighted_usage(budget),
            latency: histogram.total_latency(),
            utilisation: total_cost.utilisation_percent(budget),
            ranges,
        }
    }
}

impl fmt::Display for HistogramReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: ranges={}/{} rmse={:.4} weighted={:.4} latency={}",
            self.label,
            self.actual_ranges,
            self.requested_ranges,
            self.rmse,
            self.weighted_usage,
            self.latency
        )?;
        for (name, percent) in RESOURCE_NAMES.iter().zip(self.utilisation) {
            write!(f, " {name}={percent:.1}%")?;
        }
        f.write_str(" [")?;
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}/{} {:.4}", range.range, range.kind, range.tier, range.rmse)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::ExactBucket;

    #[test]
    fn test_report() {
        let truth = GroundTruth::from_counts(0, vec![5, 0, 0, 3, 0, 0, 0, 0, 0, 2]).unwrap();
        let mut bucket = ExactBucket::new();
        bucket.configure(truth.domain());
        for value in truth.occurrences(truth.domain()) {
            bucket.update(value);
        }
        let mut histogram = CompositeHistogram::new(truth.domain());
        histogram.add_bucket(bucket.into()).unwrap();

        let budget = ResourceVector::new(386.0, 602.0, 0.0, 0.0);
        let report = HistogramReport::new("width/greedy", 2, &histogram, &truth, &budget);
        assert_eq!(report.actual_ranges, 1);
        assert_eq!(report.latency, 1);
        assert_eq!(report.utilisation, [50.0, 50.0, 0.0, 0.0]);
        assert_eq!(report.ranges[0].kind, BucketKind::Exact);
        assert_eq!(report.ranges[0].rmse, report.rmse);
        assert!(report.to_string().starts_with("width/greedy: ranges=1/2 "));
    }
}
