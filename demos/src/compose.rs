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

use histcomposer::candidate::build_all_candidates;
use histcomposer::candidate::sort_by_range_width;
use histcomposer::partition::PartitionStrategy;
use histcomposer::random::RandomSource;
use histcomposer::random::XorShift64;
use histcomposer::report::HistogramReport;
use histcomposer::resource::ResourceVector;
use histcomposer::select::GreedyAverageResource;
use histcomposer::select::GreedyMinError;
use histcomposer::select::InitialPolicy;
use histcomposer::select::Selector;
use histcomposer::select::SimulatedAnnealing;
use histcomposer::select::Solution;
use histcomposer::truth::GroundTruth;

fn main() {
    // Skewed synthetic workload: a dense hot spot plus a long uniform tail.
    let mut rng = XorShift64::seeded(0x5eed);
    let samples: Vec<i64> = (0..50_000)
        .map(|_| {
            if rng.next_f64() < 0.7 {
                200 + rng.next_index(64) as i64
            } else {
                rng.next_index(4_096) as i64
            }
        })
        .collect();
    let truth = GroundTruth::from_samples(&samples).unwrap();
    println!(
        "Domain {} with {} samples, {} distinct values",
        truth.domain(),
        truth.total(),
        truth.distinct()
    );

    let mut selectors: Vec<Box<dyn Selector>> =
        vec![Box::new(GreedyMinError), Box::new(GreedyAverageResource)];
    for policy in InitialPolicy::ALL {
        let annealer = SimulatedAnnealing::builder()
            .initial_policy(policy)
            .seed(42)
            .build()
            .unwrap();
        selectors.push(Box::new(annealer));
    }

    let budget = ResourceVector::BASYS3;
    println!("Budget {budget}\n");
    for strategy in PartitionStrategy::ALL {
        for requested in [4, 8, 16] {
            let partition = strategy.partition(&truth, requested).unwrap();
            if !partition.is_complete(requested) {
                println!("{strategy}: only {} of {requested} ranges", partition.len());
            }
            let mut lists = build_all_candidates(&partition, &truth, &budget);
            sort_by_range_width(&mut lists);

            for selector in &selectors {
                let label = format!("{strategy}/{}", selector.name());
                match selector
                    .select(&lists, &budget)
                    .and_then(Solution::into_histogram)
                {
                    Ok(histogram) => {
                        let report =
                            HistogramReport::new(label, requested, &histogram, &truth, &budget);
                        println!("{report}");
                    }
                    Err(err) => println!("{label}: {err}"),
                }
            }
        }
        println!();
    }
}
