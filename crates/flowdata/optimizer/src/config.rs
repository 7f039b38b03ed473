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

//! Rewrite-configuration construction

use flowdata_core::RewriteConfiguration;
use std::collections::BTreeMap;

/// Name of the meta-pass that dispatches to the selected optimizations
pub const META_PASS_NAME: &str = "flowdata_meta_rewrite";

/// Parameter-map key holding the resolved optimization names
pub const OPTIMIZATIONS_KEY: &str = "optimizations";

/// Parameter-map key holding the caller's free-form config strings
pub const OPTIMIZATION_CONFIGS_KEY: &str = "optimization_configs";

/// Build the rewrite configuration for a resolved optimization set.
///
/// The extra config strings are opaque to this crate and passed through
/// verbatim for the individual passes to interpret.
pub fn build_rewrite_config(active: &[String], extra_configs: &[String]) -> RewriteConfiguration {
    let mut parameters = BTreeMap::new();
    parameters.insert(OPTIMIZATIONS_KEY.to_string(), active.to_vec());
    parameters.insert(OPTIMIZATION_CONFIGS_KEY.to_string(), extra_configs.to_vec());
    RewriteConfiguration::new(META_PASS_NAME, parameters)
}
