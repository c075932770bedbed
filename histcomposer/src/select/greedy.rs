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

use crate::candidate::CandidateList;
use crate::error::Error;
use crate::resource::ResourceVector;
use crate::select::Selector;
use crate::select::Solution;
use crate::select::ensure_not_empty;
use crate::select::out_of_resources;

/// Picks, range by range, the lowest-error candidate that fits the remaining budget.
///
/// Earlier ranges are served first and may leave later ranges with nothing that fits, in which
/// case the whole selection fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyMinError;

impl Selector for GreedyMinError {
    fn select(&self, lists: &[CandidateList], budget: &ResourceVector) -> Result<Solution, Error> {
        ensure_not_empty(lists)?;

        let mut remaining = *budget;
        let mut chosen = Vec::with_capacity(lists.len());
        for (index, list) in lists.iter().enumerate() {
            let Some(candidate) = list.iter().find(|c| c.cost().fits_within(&remaining)) else {
                return Err(out_of_resources(index, list, &remaining));
            };
            remaining -= candidate.cost();
            chosen.push(candidate.clone());
        }
        Ok(Solution::new(chosen))
    }

    fn name(&self) -> String {
        "greedy-min-error".to_string()
    }
}

/// Picks, range by range, the lowest-error candidate that fits a floating per-range allowance.
///
/// Every range is granted `budget / n` (rounded down per component). The allowance of a range
/// is its grant plus whatever the previous range left of its own allowance, not the globally
/// remaining budget, so unused resources only ever flow forward.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyAverageResource;

impl Selector for GreedyAverageResource {
    fn select(&self, lists: &[CandidateList], budget: &ResourceVector) -> Result<Solution, Error> {
        ensure_not_empty(lists)?;

        let share = budget.split_even(lists.len());
        let mut unused = ResourceVector::ZERO;
        let mut chosen = Vec::with_capacity(lists.len());
        for (index, list) in lists.iter().enumerate() {
            let allowance = share + unused;
            let Some(candidate) = list.iter().find(|c| c.cost().fits_within(&allowance)) else {
                return Err(out_of_resources(index, list, &allowance));
            };
            unused = allowance - candidate.cost();
            chosen.push(candidate.clone());
        }
        Ok(Solution::new(chosen))
    }

    fn name(&self) -> String {
        "greedy-avg-resource".to_string()
    }
}
