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

use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::le;
use histcomposer::bucket::BucketKind;
use histcomposer::bucket::SizeTier;
use histcomposer::candidate::CandidateList;
use histcomposer::candidate::build_all_candidates;
use histcomposer::candidate::sort_by_range_width;
use histcomposer::error::ErrorKind;
use histcomposer::partition::Partition;
use histcomposer::partition::PartitionStrategy;
use histcomposer::random::XorShift64;
use histcomposer::range::ValueRange;
use histcomposer::resource::ResourceVector;
use histcomposer::select::GreedyAverageResource;
use histcomposer::select::GreedyMinError;
use histcomposer::select::InitialPolicy;
use histcomposer::select::Selector;
use histcomposer::select::SimulatedAnnealing;
use histcomposer::select::Solution;
use histcomposer::truth::GroundTruth;

fn lists_for(truth: &GroundTruth, bounds: &[i64], budget: &ResourceVector) -> Vec<CandidateList> {
    let ranges = bounds.windows(2).map(|w| ValueRange::new(w[0], w[1]));
    let partition = Partition::from_ranges(ranges).unwrap();
    build_all_candidates(&partition, truth, budget)
}

fn kinds(solution: &Solution) -> Vec<(BucketKind, SizeTier)> {
    solution
        .candidates()
        .iter()
        .map(|c| (c.bucket().kind(), c.bucket().tier()))
        .collect()
}

#[test]
fn test_greedy_min_error_spends_global_budget() {
    let truth = GroundTruth::from_counts(0, vec![1; 200]).unwrap();
    let budget = ResourceVector::new(1000.0, 1000.0, 4.0, 0.0);
    let lists = lists_for(&truth, &[0, 100, 200], &budget);

    let solution = GreedyMinError.select(&lists, &budget).unwrap();
    assert_eq!(
        kinds(&solution),
        vec![
            (BucketKind::FineGrained, SizeTier::Small),
            (BucketKind::Exact, SizeTier::Small),
        ]
    );
    assert!(solution.total_cost().fits_within(&budget));
}

#[test]
fn test_greedy_average_carries_unused_allowance() {
    let truth = GroundTruth::from_counts(0, vec![1; 200]).unwrap();
    let budget = ResourceVector::new(1000.0, 1000.0, 4.0, 0.0);
    let lists = lists_for(&truth, &[0, 100, 200], &budget);

    let solution = GreedyAverageResource.select(&lists, &budget).unwrap();
    assert_eq!(
        kinds(&solution),
        vec![
            (BucketKind::Exact, SizeTier::Small),
            (BucketKind::FineGrained, SizeTier::Small),
        ]
    );
}

#[test]
fn test_selectors_report_infeasible() {
    let truth = GroundTruth::from_counts(0, vec![2; 30]).unwrap();
    let budget = ResourceVector::new(400.0, 700.0, 0.0, 0.0);
    let lists = lists_for(&truth, &[0, 10, 20, 30], &budget);
    assert!(lists.iter().all(|list| list.len() == 3));

    let annealer = SimulatedAnnealing::builder()
        .seed(3)
        .max_iterations(500)
        .build()
        .unwrap();
    let selectors: Vec<Box<dyn Selector>> = vec![
        Box::new(GreedyMinError),
        Box::new(GreedyAverageResource),
        Box::new(annealer),
    ];
    for selector in &selectors {
        let err = selector.select(&lists, &budget).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Infeasible, "{}", selector.name());
    }

    let err = GreedyMinError.select(&lists, &budget).unwrap_err();
    assert_eq!(err.context_value("range_index"), Some("2"));
    assert_that!(err.to_string(), contains_substring("out of resources"));
}

#[test]
fn test_empty_inputs() {
    let truth = GroundTruth::from_counts(0, vec![1; 10]).unwrap();
    let budget = ResourceVector::new(100.0, 100.0, 0.0, 0.0);
    let lists = lists_for(&truth, &[0, 10], &budget);
    assert!(lists[0].is_empty());

    let err = GreedyMinError.select(&lists, &budget).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Infeasible);
    let annealer = SimulatedAnnealing::builder().seed(1).build().unwrap();
    let err = annealer.select(&lists, &budget).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Infeasible);

    for selector in [&GreedyMinError as &dyn Selector, &GreedyAverageResource, &annealer] {
        let err = selector.select(&[], &budget).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }
}

#[test]
fn test_greedy_solutions_fit_budget() {
    let samples: Vec<i64> = (0..20_000).map(|i| (i * 7919) % 4_000).collect();
    let truth = GroundTruth::from_samples(&samples).unwrap();
    for strategy in PartitionStrategy::ALL {
        for n in [1, 4, 16] {
            let partition = strategy.partition(&truth, n).unwrap();
            let budget = ResourceVector::BASYS3;
            let mut lists = build_all_candidates(&partition, &truth, &budget);
            sort_by_range_width(&mut lists);
            for selector in [&GreedyMinError as &dyn Selector, &GreedyAverageResource] {
                if let Ok(solution) = selector.select(&lists, &budget) {
                    assert!(solution.total_cost().fits_within(&budget));
                    assert_eq!(solution.len(), partition.len());
                }
            }
        }
    }
}

#[test]
fn test_annealing_never_worse_than_start() {
    let samples: Vec<i64> = (0..5_000).map(|i| (i * i) % 1_500).collect();
    let truth = GroundTruth::from_samples(&samples).unwrap();
    let partition = PartitionStrategy::Width.partition(&truth, 6).unwrap();
    let budget = ResourceVector::BASYS3;
    let lists = build_all_candidates(&partition, &truth, &budget);

    let deterministic = [InitialPolicy::First, InitialPolicy::Middle, InitialPolicy::Last];
    for policy in deterministic {
        let start = Solution::new(
            lists
                .iter()
                .map(|l| {
                    let index = match policy {
                        InitialPolicy::Middle => l.len() / 2,
                        InitialPolicy::Last => l.len() - 1,
                        _ => 0,
                    };
                    l.candidates()[index].clone()
                })
                .collect(),
        );
        let annealer = SimulatedAnnealing::builder()
            .initial_policy(policy)
            .max_iterations(2_000)
            .build()
            .unwrap();
        let model = annealer.cost_model(&budget);
        let start_cost = model.solution_cost(&start);
        let mut rng = XorShift64::seeded(99);
        match annealer.anneal(&lists, &budget, &mut rng) {
            Ok(best) => {
                assert!(best.total_cost().fits_within(&budget));
                assert_that!(model.solution_cost(&best), le(start_cost));
            }
            // only a start outside the budget can fail to reach a feasible state
            Err(err) => {
                assert_eq!(start_cost, f64::INFINITY, "{policy}");
                assert_eq!(err.kind(), ErrorKind::Infeasible);
            }
        }
    }
}

#[test]
fn test_annealing_is_deterministic_with_seed() {
    let truth = GroundTruth::from_counts(0, (0..400).map(|i| i % 13).collect()).unwrap();
    let partition = PartitionStrategy::DepthCount.partition(&truth, 5).unwrap();
    let budget = ResourceVector::BASYS3;
    let lists = build_all_candidates(&partition, &truth, &budget);

    let annealer = SimulatedAnnealing::builder()
        .initial_policy(InitialPolicy::First)
        .seed(2024)
        .build()
        .unwrap();
    let a = annealer.select(&lists, &budget).unwrap();
    let b = annealer.select(&lists, &budget).unwrap();
    assert_eq!(a, b);
    assert_eq!(annealer.name(), "simulated-annealing-first");
}
