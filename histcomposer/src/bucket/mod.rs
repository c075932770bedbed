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

//! Approximate counting buckets.
//!
//! A bucket counts occurrences of the values of one contiguous [`ValueRange`]. Five variants
//! trade accuracy against hardware cost:
//!
//! | Variant | Estimate of `query(v)` | Latency |
//! |---|---|---|
//! | [`ExactBucket`] | occurrences of the whole range | 1 |
//! | [`DistinctBucket`] | occurrences / distinct slots seen (`v mod M`) | 1 |
//! | [`BloomBucket`] | 0 if `v` was provably never seen, else occurrences / distinct | 1 |
//! | [`CountingBloomBucket`] | count-min over the addressed counters | 1 |
//! | [`FineGrainedBucket`] | exact count of the sub-bucket holding `v` | 4 |
//!
//! Configuration is one-shot: the first [`Bucket::configure`] fixes the range and later calls
//! are ignored, the way a synthesized circuit keeps its geometry.
//!
//! # Usage
//!
//! ```rust
//! use histcomposer::bucket::BucketKind;
//! use histcomposer::bucket::SizeTier;
//! use histcomposer::range::ValueRange;
//! use histcomposer::truth::PointQuery;
//!
//! let mut bucket = BucketKind::CountingBloom.create(SizeTier::Medium);
//! bucket.configure(ValueRange::new(0, 100));
//! bucket.update(7);
//! bucket.update(7);
//! assert!(bucket.query(7) >= 2);
//! assert_eq!(bucket.query(500), 0);
//! ```

mod bloom;
mod catalog;
mod counting_bloom;
mod distinct;
mod exact;
mod fine_grained;

pub use self::bloom::BloomBucket;
pub use self::catalog::BucketKind;
pub use self::catalog::NARROW_RANGE_WIDTH;
pub use self::catalog::SizeTier;
pub use self::counting_bloom::CountingBloomBucket;
pub use self::distinct::DistinctBucket;
pub use self::exact::ExactBucket;
pub use self::fine_grained::FineGrainedBucket;

use crate::range::ValueRange;
use crate::resource::ResourceVector;
use crate::truth::PointQuery;

/// Any bucket variant behind one contract.
#[derive(Debug, Clone, PartialEq)]
pub enum Bucket {
    /// See [`ExactBucket`].
    Exact(ExactBucket),
    /// See [`DistinctBucket`].
    Distinct(DistinctBucket),
    /// See [`BloomBucket`].
    Bloom(BloomBucket),
    /// See [`CountingBloomBucket`].
    CountingBloom(CountingBloomBucket),
    /// See [`FineGrainedBucket`].
    FineGrained(FineGrainedBucket),
}

macro_rules! dispatch {
    ($self:expr, $b:ident => $body:expr) => {
        match $self {
            Bucket::Exact($b) => $body,
            Bucket::Distinct($b) => $body,
            Bucket::Bloom($b) => $body,
            Bucket::CountingBloom($b) => $body,
            Bucket::FineGrained($b) => $body,
        }
    };
}

impl Bucket {
    /// Fixes the value range. Ignored if the bucket is already configured.
    pub fn configure(&mut self, range: ValueRange) {
        dispatch!(self, b => b.configure(range))
    }

    /// Records one occurrence of `value`.
    ///
    /// Ignored if the bucket is unconfigured or `value` lies outside its range.
    pub fn update(&mut self, value: i64) {
        dispatch!(self, b => b.update(value))
    }

    /// Estimated occurrence count of `value`; 0 when unconfigured or out of range.
    pub fn query(&self, value: i64) -> u64 {
        dispatch!(self, b => b.query(value))
    }

    /// Fixed hardware cost of this bucket.
    pub fn resource_cost(&self) -> ResourceVector {
        self.kind().cost(self.tier())
    }

    /// Fixed lookup latency, in clock cycles.
    pub fn latency(&self) -> u32 {
        self.kind().latency()
    }

    /// The configured range, if any.
    pub fn range(&self) -> Option<ValueRange> {
        dispatch!(self, b => b.range())
    }

    /// Returns true once [`configure`](Self::configure) has taken effect.
    pub fn is_configured(&self) -> bool {
        self.range().is_some()
    }

    /// Total in-range occurrences recorded so far.
    pub fn count(&self) -> u64 {
        dispatch!(self, b => b.count())
    }

    /// Which variant this is.
    pub fn kind(&self) -> BucketKind {
        match self {
            Bucket::Exact(_) => BucketKind::Exact,
            Bucket::Distinct(_) => BucketKind::Distinct,
            Bucket::Bloom(_) => BucketKind::Bloom,
            Bucket::CountingBloom(_) => BucketKind::CountingBloom,
            Bucket::FineGrained(_) => BucketKind::FineGrained,
        }
    }

    /// The resource tier the bucket's geometry falls into.
    pub fn tier(&self) -> SizeTier {
        dispatch!(self, b => b.tier())
    }
}

impl PointQuery for Bucket {
    fn query(&self, value: i64) -> u64 {
        Bucket::query(self, value)
    }
}

macro_rules! impl_point_query {
    ($($ty:ty),*) => {
        $(
            impl PointQuery for $ty {
                fn query(&self, value: i64) -> u64 {
                    <$ty>::query(self, value)
                }
            }
        )*
    };
}

impl_point_query!(
    ExactBucket,
    DistinctBucket,
    BloomBucket,
    CountingBloomBucket,
    FineGrainedBucket
);

impl From<ExactBucket> for Bucket {
    fn from(b: ExactBucket) -> Self {
        Bucket::Exact(b)
    }
}

impl From<DistinctBucket> for Bucket {
    fn from(b: DistinctBucket) -> Self {
        Bucket::Distinct(b)
    }
}

impl From<BloomBucket> for Bucket {
    fn from(b: BloomBucket) -> Self {
        Bucket::Bloom(b)
    }
}

impl From<CountingBloomBucket> for Bucket {
    fn from(b: CountingBloomBucket) -> Self {
        Bucket::CountingBloom(b)
    }
}

impl From<FineGrainedBucket> for Bucket {
    fn from(b: FineGrainedBucket) -> Self {
        Bucket::FineGrained(b)
    }
}

/// One-shot range guard shared by every variant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Span {
    range: Option<ValueRange>,
}

impl Span {
    /// Sets the range unless one is already set. Returns whether it took effect.
    pub(crate) fn configure(&mut self, range: ValueRange) -> bool {
        if self.range.is_some() {
            return false;
        }
        self.range = Some(range);
        true
    }

    pub(crate) fn range(&self) -> Option<ValueRange> {
        self.range
    }

    /// Returns true if configured and `value` is in range.
    #[inline]
    pub(crate) fn admits(&self, value: i64) -> bool {
        self.range.is_some_and(|r| r.contains(value))
    }
}
