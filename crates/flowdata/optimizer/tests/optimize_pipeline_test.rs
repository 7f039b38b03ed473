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

//! End-to-end tests for optimization selection and rewrite invocation

use flowdata_core::{OpNode, PipelineGraph, RewriteConfiguration, RewriteEngine, RewriteError};
use flowdata_optimizer::config::OPTIMIZATIONS_KEY;
use flowdata_optimizer::{ExperimentRegistry, NoopSink, OptimizeError, PipelineOptimizer, SelectionMode};
use std::sync::Arc;

/// Engine double that appends one marker node per requested optimization
struct AppendingEngine;

impl RewriteEngine for AppendingEngine {
    fn run(&self, graph: &PipelineGraph, config: &RewriteConfiguration, _record_fingerprint: bool) -> Result<PipelineGraph, RewriteError> {
        let active = config
            .parameter(OPTIMIZATIONS_KEY)
            .ok_or_else(|| RewriteError::InvalidConfiguration("missing optimizations parameter".to_string()))?;
        let mut rewritten = graph.clone();
        for optimization in active {
            rewritten.add_node(OpNode::new(optimization.clone(), "rewritten"));
        }
        Ok(rewritten)
    }
}

/// Engine double that always runs out of time
struct TimeoutEngine;

impl RewriteEngine for TimeoutEngine {
    fn run(&self, _graph: &PipelineGraph, _config: &RewriteConfiguration, _record_fingerprint: bool) -> Result<PipelineGraph, RewriteError> {
        Err(RewriteError::DeadlineExceeded("rewrite exceeded its deadline".to_string()))
    }
}

fn input_graph() -> Arc<PipelineGraph> {
    let mut graph = PipelineGraph::new();
    graph.add_node(OpNode::new("source", "range"));
    graph.add_node(OpNode::new("mapped", "map").with_inputs(vec!["source".to_string()]));
    Arc::new(graph)
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| name.to_string()).collect()
}

#[test]
fn test_policy_selection_drives_the_rewrite() {
    let registry = Arc::new(ExperimentRegistry::empty());
    let optimizer = PipelineOptimizer::new(registry, AppendingEngine).with_sink(NoopSink);

    let mode = SelectionMode::Policy {
        enabled: names(&["fuse_maps"]),
        disabled: names(&["make_sloppy"]),
        default: names(&["shard_files", "make_sloppy"]),
    };
    let outcome = optimizer.optimize("trainer-7", mode, input_graph()).unwrap();

    let ops: Vec<&str> = outcome.graph().nodes().iter().map(|node| node.name.as_str()).collect();
    assert_eq!(ops, vec!["source", "mapped", "shard_files", "fuse_maps"]);
}

#[test]
fn test_rolled_out_experiment_is_stable_across_runs() {
    let registry = Arc::new(ExperimentRegistry::new([("exp_a".to_string(), 50)]).unwrap());
    let optimizer = PipelineOptimizer::new(Arc::clone(&registry), AppendingEngine).with_sink(NoopSink);

    let mode = || SelectionMode::Policy {
        enabled: Vec::new(),
        disabled: Vec::new(),
        default: Vec::new(),
    };
    let first = optimizer.optimize("job-42", mode(), input_graph()).unwrap();
    for _ in 0..20 {
        let again = optimizer.optimize("job-42", mode(), input_graph()).unwrap();
        assert_eq!(again.graph().nodes(), first.graph().nodes());
    }
}

#[test]
fn test_deadline_fallback_keeps_pipeline_usable() {
    let optimizer = PipelineOptimizer::new(Arc::new(ExperimentRegistry::empty()), TimeoutEngine).with_sink(NoopSink);
    let graph = input_graph();
    let fingerprint = graph.fingerprint();

    let outcome = optimizer.optimize("job-1", SelectionMode::Direct(names(&["fuse_maps"])), Arc::clone(&graph)).unwrap();
    assert!(outcome.is_unchanged());
    assert!(Arc::ptr_eq(outcome.graph(), &graph));
    assert_eq!(outcome.graph().fingerprint(), fingerprint);
}

#[test]
fn test_invalid_registry_is_rejected_up_front() {
    let err = ExperimentRegistry::new([("exp_a".to_string(), 130)]).unwrap_err();
    assert!(matches!(err, OptimizeError::InvalidRolloutPercent { percent: 130, .. }));
}

#[test]
fn test_concurrent_invocations_share_one_optimizer() {
    let optimizer = Arc::new(PipelineOptimizer::new(Arc::new(ExperimentRegistry::empty()), AppendingEngine).with_sink(NoopSink));

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let optimizer = Arc::clone(&optimizer);
            std::thread::spawn(move || {
                let job_id = format!("worker-{worker}");
                optimizer.optimize(&job_id, SelectionMode::Direct(names(&["fuse_maps"])), input_graph()).unwrap()
            })
        })
        .collect();

    for handle in handles {
        let outcome = handle.join().unwrap();
        assert!(!outcome.is_unchanged());
    }
}
