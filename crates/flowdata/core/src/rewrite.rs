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

//! Rewrite-engine contract: configuration shape, error taxonomy, and trait

use crate::graph::PipelineGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors reported by a rewrite engine
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("rewrite deadline exceeded: {0}")]
    DeadlineExceeded(String),

    #[error("invalid rewrite configuration: {0}")]
    InvalidConfiguration(String),

    #[error("rewrite pass \"{pass}\" failed: {details}")]
    PassFailed { pass: String, details: String },

    #[error("rewrite engine error: {0}")]
    Internal(String),
}

impl RewriteError {
    /// Whether this error means the rewrite ran out of time rather than
    /// failing outright. Callers treat this kind as recoverable.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::DeadlineExceeded(_))
    }
}

/// Immutable configuration handed to the rewrite engine
///
/// The shape is fixed: exactly one named meta-pass, run exactly once, with
/// pass errors treated as hard failures. Only the parameter map varies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteConfiguration {
    meta_pass: String,
    iterations: u32,
    fail_on_pass_error: bool,
    parameters: BTreeMap<String, Vec<String>>,
}

impl RewriteConfiguration {
    /// Create a configuration for the given meta-pass. Iteration count and
    /// the fail-on-pass-error flag are invariants of the shape and cannot
    /// be overridden.
    pub fn new(meta_pass: impl Into<String>, parameters: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            meta_pass: meta_pass.into(),
            iterations: 1,
            fail_on_pass_error: true,
            parameters,
        }
    }

    /// Name of the single meta-pass to run
    pub fn meta_pass(&self) -> &str {
        &self.meta_pass
    }

    /// Number of times the engine runs the meta-pass, always one
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Whether pass errors abort the rewrite, always true
    pub fn fail_on_pass_error(&self) -> bool {
        self.fail_on_pass_error
    }

    /// Look up a parameter list by key
    pub fn parameter(&self, key: &str) -> Option<&[String]> {
        self.parameters.get(key).map(Vec::as_slice)
    }

    /// The full parameter map
    pub fn parameters(&self) -> &BTreeMap<String, Vec<String>> {
        &self.parameters
    }
}

/// External graph-rewrite engine
///
/// `record_fingerprint` asks the engine to record a content fingerprint of
/// the resulting graph for downstream caching.
pub trait RewriteEngine: Send + Sync {
    fn run(&self, graph: &PipelineGraph, config: &RewriteConfiguration, record_fingerprint: bool) -> Result<PipelineGraph, RewriteError>;
}
