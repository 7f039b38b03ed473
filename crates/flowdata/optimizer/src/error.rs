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

//! Error types for the optimization engine

use flowdata_core::RewriteError;
use thiserror::Error;

/// Errors that can occur while selecting and applying optimizations
#[derive(Error, Debug)]
pub enum OptimizeError {
    /// Rollout percentages must stay within 0..=100. Out-of-range values
    /// are rejected at registry construction, never clamped.
    #[error("experiment \"{experiment}\" has rollout percentage {percent}, expected 0..=100")]
    InvalidRolloutPercent { experiment: String, percent: u8 },

    /// A rewrite failure other than deadline exceeded, surfaced verbatim
    #[error("pipeline rewrite failed: {0}")]
    Rewrite(#[from] RewriteError),
}
