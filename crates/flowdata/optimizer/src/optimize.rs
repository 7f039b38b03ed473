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

//! Rewrite invocation and fallback policy

use crate::config::build_rewrite_config;
use crate::error::OptimizeError;
use crate::experiments::ExperimentRegistry;
use crate::rollout::{Blake3Rollout, RolloutHasher};
use crate::selector::{SelectionMode, select};
use crate::telemetry::{ExperimentSink, MetricsSink};
use flowdata_core::{PipelineGraph, RewriteEngine};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of a pipeline optimization attempt
///
/// `Unchanged` is not an error: rewriting is best-effort, and a rewrite
/// that ran out of time resolves to the original graph.
#[derive(Debug, Clone)]
pub enum RewriteOutcome {
    /// The engine produced a transformed graph
    Rewritten(Arc<PipelineGraph>),
    /// The rewrite exceeded its deadline; the original graph is shared
    /// with the caller, not copied
    Unchanged(Arc<PipelineGraph>),
}

impl RewriteOutcome {
    /// The graph to continue with, whichever way the rewrite went
    pub fn graph(&self) -> &Arc<PipelineGraph> {
        match self {
            Self::Rewritten(graph) | Self::Unchanged(graph) => graph,
        }
    }

    /// Whether the rewrite was skipped in favor of the original graph
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged(_))
    }
}

/// Orchestrates optimization selection and graph rewriting for one
/// pipeline at a time.
///
/// Holds only read-only state, so one optimizer can serve concurrent
/// invocations for different graphs without locking.
pub struct PipelineOptimizer<E> {
    registry: Arc<ExperimentRegistry>,
    engine: E,
    hasher: Box<dyn RolloutHasher>,
    sink: Box<dyn ExperimentSink>,
    extra_configs: Vec<String>,
}

impl<E: RewriteEngine> PipelineOptimizer<E> {
    /// Create an optimizer with the production hasher and telemetry sink
    pub fn new(registry: Arc<ExperimentRegistry>, engine: E) -> Self {
        Self {
            registry,
            engine,
            hasher: Box::new(Blake3Rollout),
            sink: Box::new(MetricsSink),
            extra_configs: Vec::new(),
        }
    }

    /// Replace the rollout hasher
    pub fn with_hasher(mut self, hasher: impl RolloutHasher + 'static) -> Self {
        self.hasher = Box::new(hasher);
        self
    }

    /// Replace the telemetry sink
    pub fn with_sink(mut self, sink: impl ExperimentSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Set the free-form per-optimization config strings passed through to
    /// the rewrite engine verbatim
    pub fn with_extra_configs(mut self, extra_configs: Vec<String>) -> Self {
        self.extra_configs = extra_configs;
        self
    }

    /// Select the active optimizations for the job, then rewrite the graph.
    ///
    /// A rewrite that exceeds its deadline resolves to
    /// `Ok(RewriteOutcome::Unchanged)` with a warning; every other engine
    /// failure propagates unmodified. No error kind is retried.
    pub fn optimize(&self, job_id: &str, mode: SelectionMode, graph: Arc<PipelineGraph>) -> Result<RewriteOutcome, OptimizeError> {
        let active = select(job_id, &self.registry, mode, self.hasher.as_ref(), self.sink.as_ref());
        debug!(job_id, optimizations = ?active, "resolved optimization set");

        let config = build_rewrite_config(&active, &self.extra_configs);
        match self.engine.run(&graph, &config, true) {
            Ok(rewritten) => Ok(RewriteOutcome::Rewritten(Arc::new(rewritten))),
            Err(err) if err.is_deadline_exceeded() => {
                warn!(job_id, %err, "pipeline rewrite took too long, continuing with the unoptimized graph");
                Ok(RewriteOutcome::Unchanged(Arc::clone(&graph)))
            }
            Err(err) => Err(OptimizeError::Rewrite(err)),
        }
    }
}
