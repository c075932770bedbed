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
use googletest::prelude::ge;
use histcomposer::bucket::BloomBucket;
use histcomposer::bucket::Bucket;
use histcomposer::bucket::BucketKind;
use histcomposer::bucket::CountingBloomBucket;
use histcomposer::bucket::ExactBucket;
use histcomposer::bucket::FineGrainedBucket;
use histcomposer::bucket::SizeTier;
use histcomposer::random::RandomSource;
use histcomposer::random::XorShift64;
use histcomposer::range::ValueRange;
use histcomposer::truth::GroundTruth;

fn replay(mut bucket: Bucket, range: ValueRange, truth: &GroundTruth) -> Bucket {
    bucket.configure(range);
    for value in truth.occurrences(range) {
        bucket.update(value);
    }
    bucket
}

fn random_truth(seed: u64, len: usize, domain: usize) -> GroundTruth {
    let mut rng = XorShift64::seeded(seed);
    let samples: Vec<i64> = (0..len).map(|_| rng.next_index(domain) as i64).collect();
    GroundTruth::from_samples(&samples).unwrap()
}

#[test]
fn test_exact_shares_the_range_count() {
    let truth = GroundTruth::from_counts(0, vec![5, 0, 0, 3, 0, 0, 0, 0, 0, 2]).unwrap();
    let bucket = replay(ExactBucket::new().into(), truth.domain(), &truth);
    for value in truth.domain().values() {
        assert_eq!(bucket.query(value), 10);
    }
    assert_eq!(bucket.query(10), 0);
    assert_eq!(bucket.query(-1), 0);
}

#[test]
fn test_counting_bloom_single_hash_counters() {
    let mut bucket = CountingBloomBucket::with_seeds(2, &[704]);
    bucket.configure(ValueRange::new(0, 4));
    for value in [0, 0, 1, 2] {
        bucket.update(value);
    }
    assert_eq!(bucket.counters(), &[2, 1, 1, 0]);
    assert_eq!(bucket.query(0), 2);
    assert_eq!(bucket.query(3), 0);
}

#[test]
fn test_counting_bloom_never_underestimates() {
    let truth = random_truth(11, 5_000, 600);
    for tier in SizeTier::ALL {
        let bucket = replay(BucketKind::CountingBloom.create(tier), truth.domain(), &truth);
        for value in truth.domain().values() {
            assert_that!(bucket.query(value), ge(truth.count(value)));
        }
    }
}

#[test]
fn test_bloom_no_false_negatives() {
    let truth = random_truth(23, 400, 1_000);
    for tier in SizeTier::ALL {
        let bucket = replay(BucketKind::Bloom.create(tier), truth.domain(), &truth);
        for value in truth.domain().values() {
            if bucket.query(value) == 0 {
                assert_eq!(truth.count(value), 0, "false negative for {value}");
            }
        }
    }
}

#[test]
fn test_bloom_with_custom_geometry() {
    let mut bucket = BloomBucket::with_seeds(12, &[1, 2]);
    bucket.configure(ValueRange::new(0, 100));
    bucket.update(5);
    bucket.update(5);
    bucket.update(6);
    assert_eq!(bucket.num_hashes(), 2);
    assert_eq!(bucket.tier(), SizeTier::Large);
    assert_eq!(bucket.distinct_count(), 2);
    assert_eq!(bucket.query(5), 1);
    assert!(bucket.contains(6));
}

#[test]
fn test_fine_grained_conserves_occurrences() {
    let truth = random_truth(5, 3_000, 10_000);
    for tier in SizeTier::ALL {
        let bucket = replay(BucketKind::FineGrained.create(tier), truth.domain(), &truth);
        let Bucket::FineGrained(fine) = &bucket else {
            panic!("expected a fine-grained bucket");
        };
        assert_eq!(fine.sub_buckets().iter().sum::<u64>(), truth.total());
    }
}

#[test]
fn test_fine_grained_small_range_is_exact() {
    let truth = GroundTruth::from_counts(100, vec![3, 1, 4, 1, 5, 9, 2, 6]).unwrap();
    let mut fine = FineGrainedBucket::new(7);
    fine.configure(truth.domain());
    for value in truth.occurrences(truth.domain()) {
        fine.update(value);
    }
    assert_eq!(fine.shift(), 0);
    for value in truth.domain().values() {
        assert_eq!(fine.query(value), truth.count(value));
    }
}

#[test]
fn test_configure_is_one_shot() {
    for kind in BucketKind::ALL {
        let mut bucket = kind.create(SizeTier::Small);
        bucket.configure(ValueRange::new(0, 64));
        bucket.configure(ValueRange::new(1_000, 2_000));
        assert_eq!(bucket.range(), Some(ValueRange::new(0, 64)), "{kind}");
        bucket.update(1_500);
        assert_eq!(bucket.count(), 0, "{kind}");
    }
}

#[test]
fn test_unconfigured_bucket_ignores_updates() {
    for kind in BucketKind::ALL {
        let mut bucket = kind.create(SizeTier::Medium);
        bucket.update(3);
        assert!(!bucket.is_configured());
        assert_eq!(bucket.query(3), 0, "{kind}");
    }
}
