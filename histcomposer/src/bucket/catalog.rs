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

use std::fmt;

use crate::bucket::BloomBucket;
use crate::bucket::Bucket;
use crate::bucket::CountingBloomBucket;
use crate::bucket::DistinctBucket;
use crate::bucket::ExactBucket;
use crate::bucket::FineGrainedBucket;
use crate::resource::ResourceVector;

/// Ranges narrower than this skip the variants with large fixed costs
/// ([`BucketKind::FineGrained`] and [`BucketKind::CountingBloom`]).
pub const NARROW_RANGE_WIDTH: u64 = 50;

// Synthesis results, (LUT, FF, BRAM, DSP) per tier.
const EXACT_COST: ResourceVector = ResourceVector::new(193.0, 301.0, 0.0, 0.0);
const DISTINCT_COST: [ResourceVector; 3] = [
    ResourceVector::new(1489.0, 403.0, 0.0, 0.0),
    ResourceVector::new(1815.0, 595.0, 0.0, 0.0),
    ResourceVector::new(2105.0, 851.0, 0.0, 0.0),
];
const BLOOM_COST: [ResourceVector; 3] = [
    ResourceVector::new(1729.0, 349.0, 0.0, 30.0),
    ResourceVector::new(2892.0, 589.0, 0.0, 30.0),
    ResourceVector::new(6198.0, 1357.0, 0.0, 30.0),
];
const COUNTING_BLOOM_COST: [ResourceVector; 3] = [
    ResourceVector::new(2665.0, 1325.0, 0.0, 24.0),
    ResourceVector::new(16438.0, 8493.0, 0.0, 24.0),
    ResourceVector::new(66979.0, 33069.0, 0.0, 24.0),
];
const FINE_GRAINED_COST: [ResourceVector; 3] = [
    ResourceVector::new(678.0, 540.0, 0.5, 0.0),
    ResourceVector::new(678.0, 540.0, 2.0, 0.0),
    ResourceVector::new(678.0, 540.0, 7.5, 0.0),
];

// Geometry per tier.
const DISTINCT_SLOTS: [usize; 3] = [64, 256, 512];
const BLOOM_FILTER_BITS: [u32; 3] = [4, 8, 10];
const COUNTING_BLOOM_FILTER_BITS: [u32; 3] = [5, 8, 10];
const FINE_GRAINED_SUB_BUCKET_BITS: [u32; 3] = [7, 11, 13];

/// Size tier of a bucket variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SizeTier {
    /// Smallest geometry.
    Small,
    /// Middle geometry.
    Medium,
    /// Largest geometry.
    Large,
}

impl SizeTier {
    /// All tiers, smallest first.
    pub const ALL: [SizeTier; 3] = [SizeTier::Small, SizeTier::Medium, SizeTier::Large];

    fn index(self) -> usize {
        match self {
            SizeTier::Small => 0,
            SizeTier::Medium => 1,
            SizeTier::Large => 2,
        }
    }

    /// Tier of a geometry parameter given the small and medium upper thresholds.
    pub(crate) fn classify<T: PartialOrd>(value: T, small: T, medium: T) -> SizeTier {
        if value <= small {
            SizeTier::Small
        } else if value <= medium {
            SizeTier::Medium
        } else {
            SizeTier::Large
        }
    }

    /// One-letter label (`S`, `M`, `L`).
    pub fn label(self) -> &'static str {
        match self {
            SizeTier::Small => "S",
            SizeTier::Medium => "M",
            SizeTier::Large => "L",
        }
    }
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The closed set of bucket variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BucketKind {
    /// One shared counter for the whole range.
    Exact,
    /// Presence array addressed by `value mod M`.
    Distinct,
    /// Bloom filter guarding a shared average.
    Bloom,
    /// Counting Bloom filter with a count-min estimator.
    CountingBloom,
    /// Array of exact sub-range counters.
    FineGrained,
}

impl BucketKind {
    /// Every variant, in catalog order.
    pub const ALL: [BucketKind; 5] = [
        BucketKind::Exact,
        BucketKind::Distinct,
        BucketKind::Bloom,
        BucketKind::CountingBloom,
        BucketKind::FineGrained,
    ];

    /// Creates an unconfigured bucket of this variant at the given tier.
    pub fn create(self, tier: SizeTier) -> Bucket {
        let i = tier.index();
        match self {
            BucketKind::Exact => ExactBucket::with_tier(tier).into(),
            BucketKind::Distinct => DistinctBucket::new(DISTINCT_SLOTS[i]).into(),
            BucketKind::Bloom => BloomBucket::new(BLOOM_FILTER_BITS[i]).into(),
            BucketKind::CountingBloom => {
                CountingBloomBucket::new(COUNTING_BLOOM_FILTER_BITS[i]).into()
            }
            BucketKind::FineGrained => {
                FineGrainedBucket::new(FINE_GRAINED_SUB_BUCKET_BITS[i]).into()
            }
        }
    }

    /// Hardware cost of this variant at `tier`.
    pub fn cost(self, tier: SizeTier) -> ResourceVector {
        let i = tier.index();
        match self {
            BucketKind::Exact => EXACT_COST,
            BucketKind::Distinct => DISTINCT_COST[i],
            BucketKind::Bloom => BLOOM_COST[i],
            BucketKind::CountingBloom => COUNTING_BLOOM_COST[i],
            BucketKind::FineGrained => FINE_GRAINED_COST[i],
        }
    }

    /// Lookup latency in clock cycles.
    pub fn latency(self) -> u32 {
        match self {
            BucketKind::FineGrained => 4,
            _ => 1,
        }
    }

    /// Returns true if the variant is worth instantiating for a range of `width` values.
    pub fn suits_width(self, width: u64) -> bool {
        match self {
            BucketKind::FineGrained | BucketKind::CountingBloom => width >= NARROW_RANGE_WIDTH,
            _ => true,
        }
    }

    /// Short human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            BucketKind::Exact => "exact",
            BucketKind::Distinct => "distinct",
            BucketKind::Bloom => "bloom",
            BucketKind::CountingBloom => "counting-bloom",
            BucketKind::FineGrained => "fine-grained",
        }
    }
}

impl fmt::Display for BucketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
