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

//! Optimization selection and rewrite orchestration for flowdata pipelines
//!
//! Given a pipeline graph and the caller's enabled/disabled/default
//! optimization lists, this crate deterministically resolves the set of
//! passes to run (including hash-bucketed experiment rollouts), builds the
//! configuration for the external rewrite engine, and invokes it with a
//! best-effort fallback when the rewrite cannot finish in time.

pub mod config;
pub mod error;
pub mod experiments;
pub mod optimize;
pub mod rollout;
pub mod selector;
pub mod telemetry;

pub use config::build_rewrite_config;
pub use error::OptimizeError;
pub use experiments::ExperimentRegistry;
pub use optimize::{PipelineOptimizer, RewriteOutcome};
pub use selector::{SelectionMode, select};
pub use telemetry::{ExperimentSink, MetricsSink, NoopSink};
