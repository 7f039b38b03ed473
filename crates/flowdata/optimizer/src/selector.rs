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

//! Optimization selection policy

use crate::experiments::ExperimentRegistry;
use crate::rollout::{RolloutHasher, bucket};
use crate::telemetry::ExperimentSink;
use tracing::debug;

/// How the caller specifies which optimizations to run
///
/// Resolved once at the API boundary: the legacy entry point supplies the
/// final list directly, the current one supplies three lists that the
/// selection policy reconciles with the experiment registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    /// Legacy path: the active set is exactly this list. No experiment
    /// participation.
    Direct(Vec<String>),
    /// Policy path: start from `default`, roll experiments in by hash
    /// bucket, remove `disabled`, then add `enabled`.
    Policy {
        enabled: Vec<String>,
        disabled: Vec<String>,
        default: Vec<String>,
    },
}

/// Resolve the active optimization set for a job.
///
/// Deterministic: the same inputs always produce the same list, in the same
/// order. Precedence in policy mode is enable > disable > rollout >
/// default. An empty job id opts the job out of experiment rollout
/// entirely.
///
/// One `experiment_applied` notification is emitted per registry experiment
/// present in the final set, and only then; jobs with an empty id never
/// notify.
pub fn select(job_id: &str, registry: &ExperimentRegistry, mode: SelectionMode, hasher: &dyn RolloutHasher, sink: &dyn ExperimentSink) -> Vec<String> {
    let (enabled, disabled, default) = match mode {
        SelectionMode::Direct(list) => return dedup_first_seen(list),
        SelectionMode::Policy { enabled, disabled, default } => (enabled, disabled, default),
    };

    // Opt-in-by-default passes form the base set.
    let mut active = default;

    // Roll live experiments in by hash bucket. Explicitly listed names are
    // never rolled: the caller has already decided for them.
    if !job_id.is_empty() {
        for (experiment, percent) in registry.iter() {
            if enabled.iter().any(|name| name == experiment) || disabled.iter().any(|name| name == experiment) {
                continue;
            }
            let slot = bucket(hasher, job_id, experiment);
            if slot < u64::from(percent) {
                debug!(job_id, experiment, slot, percent, "experiment rolled in");
                active.push(experiment.to_string());
            }
        }
    }

    active.retain(|name| !disabled.contains(name));
    let mut selected = dedup_first_seen(active);

    // Explicit enable wins over disable, rollout, and default exclusion.
    for name in enabled {
        if !selected.contains(&name) {
            selected.push(name);
        }
    }

    if !job_id.is_empty() && !registry.is_empty() {
        for (experiment, _) in registry.iter() {
            if selected.iter().any(|name| name == experiment) {
                sink.experiment_applied(experiment);
            }
        }
    }

    selected
}

/// Collapse duplicates, keeping the first occurrence of each name
fn dedup_first_seen(names: Vec<String>) -> Vec<String> {
    let mut unique = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}
