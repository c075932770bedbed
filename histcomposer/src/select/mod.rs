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

//! Budget-constrained selection of one candidate per range.
//!
//! A [`Selector`] receives the sorted candidate lists of every range and the global budget,
//! and either returns a [`Solution`] whose summed cost fits the budget or fails with
//! [`ErrorKind::Infeasible`](crate::error::ErrorKind::Infeasible). A partial solution is never
//! returned.
//!
//! Three selectors are provided:
//!
//! - [`GreedyMinError`]: best candidate that fits the remaining global budget, range by range.
//! - [`GreedyAverageResource`]: best candidate that fits an even per-range share of the
//!   budget plus whatever the previous range left unused.
//! - [`SimulatedAnnealing`]: minimizes a weighted sum of total error and budget-weighted
//!   resource usage.
//!
//! # Usage
//!
//! ```rust
//! use histcomposer::candidate::build_all_candidates;
//! use histcomposer::partition::PartitionStrategy;
//! use histcomposer::resource::ResourceVector;
//! use histcomposer::select::GreedyMinError;
//! use histcomposer::select::Selector;
//! use histcomposer::truth::GroundTruth;
//!
//! let truth = GroundTruth::from_counts(0, vec![1; 200]).unwrap();
//! let partition = PartitionStrategy::Width.partition(&truth, 2).unwrap();
//! let budget = ResourceVector::BASYS3;
//! let lists = build_all_candidates(&partition, &truth, &budget);
//!
//! let solution = GreedyMinError.select(&lists, &budget).unwrap();
//! assert!(solution.total_cost().fits_within(&budget));
//! let histogram = solution.into_histogram().unwrap();
//! assert_eq!(histogram.query(42), 1);
//! ```

mod annealing;
mod greedy;

pub use self::annealing::CostModel;
pub use self::annealing::InitialPolicy;
pub use self::annealing::SimulatedAnnealing;
pub use self::annealing::SimulatedAnnealingBuilder;
pub use self::greedy::GreedyAverageResource;
pub use self::greedy::GreedyMinError;

use crate::candidate::Candidate;
use crate::candidate::CandidateList;
use crate::error::Error;
use crate::histogram::CompositeHistogram;
use crate::range::ValueRange;
use crate::resource::ResourceVector;

/// Chooses one candidate per range within a resource budget.
pub trait Selector {
    /// Selects one candidate from each list.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if `lists`
    /// is empty and [`ErrorKind::Infeasible`](crate::error::ErrorKind::Infeasible) if no
    /// complete assignment fits `budget`.
    fn select(&self, lists: &[CandidateList], budget: &ResourceVector) -> Result<Solution, Error>;

    /// Name used in reports.
    fn name(&self) -> String;
}

/// One chosen candidate per range, ordered by range.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    chosen: Vec<Candidate>,
}

impl Solution {
    /// Wraps chosen candidates, reordering them by range.
    pub fn new(mut chosen: Vec<Candidate>) -> Self {
        chosen.sort_by_key(|c| c.range().low());
        Self { chosen }
    }

    /// The chosen candidates, lowest range first.
    pub fn candidates(&self) -> &[Candidate] {
        &self.chosen
    }

    /// Number of ranges.
    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    /// Returns true if nothing was chosen.
    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    /// Sum of the candidates' errors.
    pub fn total_error(&self) -> f64 {
        self.chosen.iter().map(Candidate::error).sum()
    }

    /// Sum of the candidates' costs.
    pub fn total_cost(&self) -> ResourceVector {
        self.chosen.iter().map(Candidate::cost).sum()
    }

    /// Smallest range covering every chosen range, if any.
    pub fn span(&self) -> Option<ValueRange> {
        let low = self.chosen.first()?.range().low();
        let high = self.chosen.iter().map(|c| c.range().high()).max()?;
        Some(ValueRange::new(low, high))
    }

    /// Moves the chosen buckets into a composite histogram over [`span`](Self::span).
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if the
    /// solution is empty or two chosen ranges overlap.
    pub fn into_histogram(self) -> Result<CompositeHistogram, Error> {
        let Some(domain) = self.span() else {
            return Err(Error::config_invalid("solution must cover at least one range"));
        };
        let mut histogram = CompositeHistogram::new(domain);
        for candidate in self.chosen {
            histogram.add_bucket(candidate.into_bucket())?;
        }
        Ok(histogram)
    }
}

fn ensure_not_empty(lists: &[CandidateList]) -> Result<(), Error> {
    if lists.is_empty() {
        return Err(Error::config_invalid("no candidate lists to select from"));
    }
    Ok(())
}

fn out_of_resources(index: usize, list: &CandidateList, available: &ResourceVector) -> Error {
    tracing::debug!(
        range_index = index,
        range = %list.range(),
        available = %available,
        candidates = list.len(),
        "out of resources"
    );
    Error::infeasible("out of resources")
        .with_context("range_index", index)
        .with_context("range", list.range())
        .with_context("available", available)
}
