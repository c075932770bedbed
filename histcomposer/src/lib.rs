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

//! Resource-budgeted composition of approximate histograms.
//!
//! A value domain is cut into contiguous ranges, every range gets a list of candidate
//! counting buckets ranked by error against the exact counts, and a selector picks one
//! candidate per range so the summed hardware cost (LUT, FF, BRAM, DSP) stays within a
//! device budget. The chosen buckets form a [`CompositeHistogram`](histogram::CompositeHistogram)
//! answering point queries.
//!
//! # Usage
//!
//! ```rust
//! use histcomposer::candidate::build_all_candidates;
//! use histcomposer::partition::PartitionStrategy;
//! use histcomposer::resource::ResourceVector;
//! use histcomposer::select::SimulatedAnnealing;
//! use histcomposer::select::Selector;
//! use histcomposer::truth::GroundTruth;
//!
//! let samples: Vec<i64> = (0..1000).map(|i| (i * i) % 300).collect();
//! let truth = GroundTruth::from_samples(&samples).unwrap();
//! let partition = PartitionStrategy::DepthCount.partition(&truth, 4).unwrap();
//! let budget = ResourceVector::ZYNQ;
//! let lists = build_all_candidates(&partition, &truth, &budget);
//!
//! let annealer = SimulatedAnnealing::builder().seed(7).build().unwrap();
//! let solution = annealer.select(&lists, &budget).unwrap();
//! assert!(solution.total_cost().fits_within(&budget));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub mod bucket;
pub mod candidate;
pub mod error;
pub mod hash;
pub mod histogram;
pub mod partition;
pub mod random;
pub mod range;
pub mod report;
pub mod resource;
pub mod select;
pub mod truth;
