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

//! Applied-experiment telemetry sink

use metrics::counter;
use tracing::debug;

/// Receives one notification per experiment applied to a job's pipeline
pub trait ExperimentSink: Send + Sync {
    fn experiment_applied(&self, experiment: &str);
}

/// Production sink: logs the applied experiment and bumps a counter
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSink;

impl ExperimentSink for MetricsSink {
    fn experiment_applied(&self, experiment: &str) {
        debug!(experiment, "pipeline experiment applied");
        counter!("flowdata_experiments_applied", 1, "experiment" => experiment.to_string());
    }
}

/// Sink for callers without telemetry
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ExperimentSink for NoopSink {
    fn experiment_applied(&self, _experiment: &str) {}
}
