// Flowdata
// Copyright (C) 2025 Flowdata Contributors

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Deterministic rollout bucketing via hashing
//!
//! Experiment participation is decided by hashing, never by randomness or a
//! coordination service: the same (job id, experiment) pair always lands in
//! the same bucket, so re-running a job reproduces the same decision.

/// Hash function used for rollout bucketing. Injectable so tests can force
/// specific buckets.
pub trait RolloutHasher: Send + Sync {
    fn hash64(&self, key: &str) -> u64;
}

/// Production hasher: blake3, first eight digest bytes little-endian
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Rollout;

impl RolloutHasher for Blake3Rollout {
    fn hash64(&self, key: &str) -> u64 {
        let digest = blake3::hash(key.as_bytes());
        let mut word = [0u8; 8];
        word.copy_from_slice(&digest.as_bytes()[..8]);
        u64::from_le_bytes(word)
    }
}

/// Rollout bucket (0..100) for a job/experiment pair
pub fn bucket(hasher: &dyn RolloutHasher, job_id: &str, experiment: &str) -> u64 {
    hasher.hash64(&format!("{job_id}/{experiment}")) % 100
}
