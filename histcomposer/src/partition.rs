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

//! Range partitioners.
//!
//! A partition splits the ground-truth domain into disjoint, contiguous ranges. The selectors
//! accept any such partition; the strategies here are the stock heuristics. Each may return
//! fewer ranges than requested when the data cannot be split further, and
//! [`Partition::is_complete`] lets callers reject those partitions.
//!
//! # Usage
//!
//! ```rust
//! use histcomposer::partition::PartitionStrategy;
//! use histcomposer::truth::GroundTruth;
//!
//! let truth = GroundTruth::from_counts(0, vec![5, 0, 0, 3, 0, 0, 0, 0, 0, 2]).unwrap();
//! let partition = PartitionStrategy::Width.partition(&truth, 2).unwrap();
//! assert_eq!(partition.len(), 2);
//! assert_eq!(partition.ranges()[0].range().high(), 5);
//! ```

use std::fmt;

use crate::error::Error;
use crate::range::ValueRange;
use crate::truth::GroundTruth;

/// One range of a partition, with the statistic its strategy balanced on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionRange {
    range: ValueRange,
    stat: u64,
}

impl PartitionRange {
    /// Creates a partition range.
    pub fn new(range: ValueRange, stat: u64) -> Self {
        Self { range, stat }
    }

    /// The value range.
    pub fn range(&self) -> ValueRange {
        self.range
    }

    /// Occurrence count or distinct count, depending on the strategy. Reporting only.
    pub fn stat(&self) -> u64 {
        self.stat
    }
}

/// Ordered, disjoint, contiguous ranges covering a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    ranges: Vec<PartitionRange>,
}

impl Partition {
    /// Wraps ranges produced elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if `ranges`
    /// is empty or two consecutive ranges are not contiguous.
    pub fn new(ranges: Vec<PartitionRange>) -> Result<Self, Error> {
        if ranges.is_empty() {
            return Err(Error::config_invalid("partition must hold at least one range"));
        }
        for (i, pair) in ranges.windows(2).enumerate() {
            if pair[0].range.high() != pair[1].range.low() {
                return Err(Error::config_invalid("partition ranges must be contiguous")
                    .with_context("index", i + 1)
                    .with_context("previous", pair[0].range)
                    .with_context("next", pair[1].range));
            }
        }
        Ok(Self { ranges })
    }

    /// Builds a partition from plain ranges, with every statistic set to 0.
    ///
    /// # Errors
    ///
    /// See [`Partition::new`].
    pub fn from_ranges(ranges: impl IntoIterator<Item = ValueRange>) -> Result<Self, Error> {
        Self::new(ranges.into_iter().map(|r| PartitionRange::new(r, 0)).collect())
    }

    /// The ranges, lowest first.
    pub fn ranges(&self) -> &[PartitionRange] {
        &self.ranges
    }

    /// Iterates over the value ranges.
    pub fn value_ranges(&self) -> impl Iterator<Item = ValueRange> + '_ {
        self.ranges.iter().map(|r| r.range)
    }

    /// Number of ranges.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Always false: a partition holds at least one range.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Returns true if the partition has at least `requested` ranges.
    pub fn is_complete(&self, requested: usize) -> bool {
        self.ranges.len() >= requested
    }
}

/// Stock partitioning heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionStrategy {
    /// Equal occurrence counts per range.
    DepthCount,
    /// Equal numbers of occurring values per range.
    DepthDistinct,
    /// Equal value widths per range.
    Width,
}

impl PartitionStrategy {
    /// Every strategy.
    pub const ALL: [PartitionStrategy; 3] = [
        PartitionStrategy::DepthCount,
        PartitionStrategy::DepthDistinct,
        PartitionStrategy::Width,
    ];

    /// Splits the domain of `truth` into at most `num_ranges` ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if
    /// `num_ranges` is 0.
    pub fn partition(self, truth: &GroundTruth, num_ranges: usize) -> Result<Partition, Error> {
        if num_ranges == 0 {
            return Err(Error::config_invalid("number of ranges must be at least 1")
                .with_context("strategy", self));
        }
        let ranges = match self {
            PartitionStrategy::DepthCount => depth(truth, num_ranges, |c| c),
            PartitionStrategy::DepthDistinct => depth(truth, num_ranges, |c| (c > 0) as u64),
            PartitionStrategy::Width => width(truth, num_ranges),
        };
        if ranges.len() < num_ranges {
            tracing::debug!(
                strategy = %self,
                requested = num_ranges,
                produced = ranges.len(),
                "partition produced fewer ranges than requested"
            );
        }
        Ok(Partition { ranges })
    }

    /// Short name.
    pub fn name(self) -> &'static str {
        match self {
            PartitionStrategy::DepthCount => "depth-count",
            PartitionStrategy::DepthDistinct => "depth-distinct",
            PartitionStrategy::Width => "width",
        }
    }
}

impl fmt::Display for PartitionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Greedy equi-depth split on `weight(count)`.
///
/// Each range takes at least one value and keeps growing while its weight plus the overshoot
/// carried from earlier ranges stays below the target. The last range absorbs the tail.
fn depth(
    truth: &GroundTruth,
    num_ranges: usize,
    weight: impl Fn(u64) -> u64,
) -> Vec<PartitionRange> {
    let counts = truth.counts();
    let end = counts.len();
    let total: u64 = counts.iter().map(|c| weight(*c)).sum();
    let target = total / num_ranges as u64;

    let mut ranges = Vec::with_capacity(num_ranges);
    let mut low = 0usize;
    let mut carry = 0u64;
    for i in 0..num_ranges {
        let mut high = low;
        let mut acc = 0u64;
        while high < end && (high == low || acc + carry < target) {
            acc += weight(counts[high]);
            high += 1;
        }
        carry = if acc > target { carry + acc - target } else { 0 };

        if i == num_ranges - 1 {
            acc += counts[high..].iter().map(|c| weight(*c)).sum::<u64>();
            high = end;
        }
        ranges.push(to_partition_range(truth, low, high, acc));
        if high == end {
            break;
        }
        low = high;
    }
    ranges
}

/// Equal-width split; the first `(max - min) % n` ranges are one value wider and the last
/// range runs to the end of the domain. Empty ranges are dropped.
fn width(truth: &GroundTruth, num_ranges: usize) -> Vec<PartitionRange> {
    let counts = truth.counts();
    let end = counts.len();
    let span = end - 1;
    let step = span / num_ranges;
    let mut wider = span % num_ranges;

    let mut ranges = Vec::with_capacity(num_ranges);
    let mut low = 0usize;
    for i in 0..num_ranges {
        let mut high = low + step;
        if wider > 0 {
            high += 1;
            wider -= 1;
        }
        if i == num_ranges - 1 {
            high = end;
        }
        let high = high.min(end);
        if high > low {
            let acc = counts[low..high].iter().sum();
            ranges.push(to_partition_range(truth, low, high, acc));
        }
        low = high;
    }
    ranges
}

fn to_partition_range(truth: &GroundTruth, low: usize, high: usize, stat: u64) -> PartitionRange {
    let min = truth.domain_min();
    PartitionRange::new(ValueRange::new(min + low as i64, min + high as i64), stat)
}
