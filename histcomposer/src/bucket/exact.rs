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

use crate::bucket::SizeTier;
use crate::bucket::Span;
use crate::range::ValueRange;

/// A single counter shared by every value of the range.
///
/// `query` returns the number of in-range occurrences regardless of which value is asked
/// for. It is the cheapest and coarsest variant. All tiers are the same circuit; the tier is
/// only a label.
#[derive(Debug, Clone, PartialEq)]
pub struct ExactBucket {
    span: Span,
    count: u64,
    tier: SizeTier,
}

impl Default for ExactBucket {
    fn default() -> Self {
        Self::new()
    }
}

impl ExactBucket {
    /// Creates an unconfigured bucket.
    pub fn new() -> Self {
        Self::with_tier(SizeTier::Small)
    }

    pub(crate) fn with_tier(tier: SizeTier) -> Self {
        Self {
            span: Span::default(),
            count: 0,
            tier,
        }
    }

    /// Fixes the range; ignored once configured.
    pub fn configure(&mut self, range: ValueRange) {
        self.span.configure(range);
    }

    /// Counts `value` if it lies in the range.
    pub fn update(&mut self, value: i64) {
        if self.span.admits(value) {
            self.count += 1;
        }
    }

    /// Total in-range occurrences, for any in-range `value`.
    pub fn query(&self, value: i64) -> u64 {
        if self.span.admits(value) {
            self.count
        } else {
            0
        }
    }

    /// The configured range, if any.
    pub fn range(&self) -> Option<ValueRange> {
        self.span.range()
    }

    /// Total in-range occurrences.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Resource tier label.
    pub fn tier(&self) -> SizeTier {
        self.tier
    }
}
