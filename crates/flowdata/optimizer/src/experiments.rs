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

//! Experiment registry: rollout percentages per optimization experiment

use crate::error::OptimizeError;
use std::collections::BTreeMap;

/// Registry of live experiments and the percentage of jobs each one is
/// rolled out to.
///
/// Built once at process startup, then shared read-only (typically behind
/// an `Arc`); there is no way to mutate it after construction. An ordered
/// map keeps rollout iteration order stable, so the relative order of
/// rolled-in experiments in the selected set is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperimentRegistry {
    rollouts: BTreeMap<String, u8>,
}

impl ExperimentRegistry {
    /// Registry with no live experiments
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a registry, rejecting any rollout percentage above 100
    pub fn new(rollouts: impl IntoIterator<Item = (String, u8)>) -> Result<Self, OptimizeError> {
        let mut validated = BTreeMap::new();
        for (experiment, percent) in rollouts {
            if percent > 100 {
                return Err(OptimizeError::InvalidRolloutPercent { experiment, percent });
            }
            validated.insert(experiment, percent);
        }
        Ok(Self { rollouts: validated })
    }

    /// Rollout percentage for an experiment, if it is live
    pub fn percent(&self, experiment: &str) -> Option<u8> {
        self.rollouts.get(experiment).copied()
    }

    /// All live experiments with their rollout percentages, in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.rollouts.iter().map(|(name, percent)| (name.as_str(), *percent))
    }

    /// Number of live experiments
    pub fn len(&self) -> usize {
        self.rollouts.len()
    }

    /// Whether any experiments are live
    pub fn is_empty(&self) -> bool {
        self.rollouts.is_empty()
    }
}
