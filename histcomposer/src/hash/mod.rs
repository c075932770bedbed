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

//! MurmurHash3 primitives and the catalog hash seeds.

mod murmurhash;

pub use self::murmurhash::murmur3_32;

/// Seeds shared by every hash-addressed bucket.
///
/// Bloom and Counting-Bloom buckets use the first [`DEFAULT_NUM_HASHES`] of them. Changing any
/// seed changes which values collide, and with it every error figure derived from a replay, so
/// the values are fixed for the lifetime of the catalog.
pub const DEFAULT_SEEDS: [u32; 5] = [0x92d6a354, 0x8bf65351, 0x960b7a1f, 0x9d670b00, 0xb32d6bd1];

/// Number of hash functions the catalog configures on hash-addressed buckets.
pub const DEFAULT_NUM_HASHES: usize = 3;

/// Hashes a sample value with `seed` and reduces it to a slot of a `2^bits` sized table.
///
/// The value is truncated to its low 32 bits before hashing.
#[inline]
pub(crate) fn slot_index(value: i64, seed: u32, bits: u32) -> usize {
    let mask = (1u64 << bits) - 1;
    (murmur3_32(value as u32, seed) as u64 & mask) as usize
}
