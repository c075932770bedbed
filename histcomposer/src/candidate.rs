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

//! Candidate construction.
//!
//! For one range, every catalog variant and tier is instantiated, configured to the range and
//! fed the range's exact occurrences. The resulting bucket, its mean squared error over the
//! range and its cost form a [`Candidate`]. Candidates that exceed the budget in any component
//! are dropped; the survivors are sorted by error, then by LUT, FF, BRAM and DSP usage.
//!
//! Ranges are independent of each other, so lists for different ranges can be built in any
//! order or concurrently.
//!
//! # Usage
//!
//! ```rust
//! use histcomposer::candidate::build_candidates;
//! use histcomposer::range::ValueRange;
//! use histcomposer::resource::ResourceVector;
//! use histcomposer::truth::GroundTruth;
//!
//! let truth = GroundTruth::from_counts(0, vec![1; 100]).unwrap();
//! let list = build_candidates(ValueRange::new(0, 100), &truth, &ResourceVector::BASYS3);
//! assert!(!list.is_empty());
//! assert_eq!(list.candidates()[0].error(), 0.0);
//! ```

use std::cmp::Ordering;

use crate::bucket::Bucket;
use crate::bucket::BucketKind;
use crate::bucket::SizeTier;
use crate::partition::Partition;
use crate::range::ValueRange;
use crate::resource::ResourceVector;
use crate::truth::GroundTruth;

/// A configured, replayed bucket with its measured error and cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    bucket: Bucket,
    range: ValueRange,
    error: f64,
    cost: ResourceVector,
}

impl Candidate {
    /// Wraps a configured bucket and the error measured for it.
    ///
    /// # Panics
    ///
    /// Panics if `bucket` is not configured.
    pub fn new(bucket: Bucket, error: f64) -> Self {
        let range = bucket.range().expect("candidate bucket must be configured");
        let cost = bucket.resource_cost();
        Self {
            bucket,
            range,
            error,
            cost,
        }
    }

    /// Instantiates `kind` at `tier` for `range`, replays the exact occurrences of the range
    /// and measures the mean squared error.
    pub fn replay(
        kind: BucketKind,
        tier: SizeTier,
        range: ValueRange,
        truth: &GroundTruth,
    ) -> Self {
        let mut bucket = kind.create(tier);
        bucket.configure(range);
        for value in truth.occurrences(range) {
            bucket.update(value);
        }
        let error = truth.mean_squared_error(&bucket, range);
        Self::new(bucket, error)
    }

    /// The replayed bucket.
    pub fn bucket(&self) -> &Bucket {
        &self.bucket
    }

    /// Consumes the candidate, returning its bucket.
    pub fn into_bucket(self) -> Bucket {
        self.bucket
    }

    /// The range the bucket covers.
    pub fn range(&self) -> ValueRange {
        self.range
    }

    /// Mean squared error over the range.
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Hardware cost.
    pub fn cost(&self) -> ResourceVector {
        self.cost
    }

    /// Orders by error, then by cost slot by slot.
    pub fn quality_cmp(&self, other: &Candidate) -> Ordering {
        self.error
            .total_cmp(&other.error)
            .then_with(|| self.cost.lexicographic_cmp(&other.cost))
    }
}

/// The sorted candidates of one range.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateList {
    range: ValueRange,
    candidates: Vec<Candidate>,
}

impl CandidateList {
    /// Sorts `candidates` best first and wraps them.
    ///
    /// # Panics
    ///
    /// Panics if a candidate covers a range other than `range`.
    pub fn new(range: ValueRange, mut candidates: Vec<Candidate>) -> Self {
        assert!(
            candidates.iter().all(|c| c.range() == range),
            "every candidate must cover {range}"
        );
        candidates.sort_by(Candidate::quality_cmp);
        Self { range, candidates }
    }

    /// The range all candidates cover.
    pub fn range(&self) -> ValueRange {
        self.range
    }

    /// Candidates, best first.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns true if nothing fits the budget for this range.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The candidate at `index`.
    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    /// Iterates over candidates, best first.
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

/// Builds the sorted candidate list of one range.
///
/// Variants unsuited to the range width are skipped, and so is any tier whose cost exceeds
/// `budget` in some component. The result may be empty.
pub fn build_candidates(
    range: ValueRange,
    truth: &GroundTruth,
    budget: &ResourceVector,
) -> CandidateList {
    let mut candidates = Vec::new();
    for kind in BucketKind::ALL {
        if !kind.suits_width(range.width()) {
            continue;
        }
        for tier in SizeTier::ALL {
            let cost = kind.cost(tier);
            if !cost.fits_within(budget) {
                tracing::trace!(%range, %kind, %tier, %cost, "candidate exceeds budget");
                continue;
            }
            candidates.push(Candidate::replay(kind, tier, range, truth));
        }
    }
    CandidateList::new(range, candidates)
}

/// Builds one candidate list per range of `partition`, in partition order.
pub fn build_all_candidates(
    partition: &Partition,
    truth: &GroundTruth,
    budget: &ResourceVector,
) -> Vec<CandidateList> {
    partition
        .value_ranges()
        .map(|range| build_candidates(range, truth, budget))
        .collect()
}

/// Same as [`build_all_candidates`], with ranges built on the rayon thread pool.
#[cfg(feature = "parallel")]
pub fn build_all_candidates_parallel(
    partition: &Partition,
    truth: &GroundTruth,
    budget: &ResourceVector,
) -> Vec<CandidateList> {
    use rayon::prelude::*;

    partition
        .ranges()
        .par_iter()
        .map(|r| build_candidates(r.range(), truth, budget))
        .collect()
}

/// Reorders per-range lists narrowest range first. The order is stable for equal widths.
///
/// Greedy selectors spend the budget in list order, so this hands narrow ranges the first pick.
pub fn sort_by_range_width(lists: &mut [CandidateList]) {
    lists.sort_by_key(|list| list.range().width());
}
