//! Polygon extraction settings.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Default bound on the number of vertices a chain walk may collect.
pub const DEFAULT_MAX_WALK_STEPS: usize = 100_000;

/// Settings for graph-walk polygon assembly.
///
/// Missing fields take their defaults, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolygonConfig {
    /// Walks collecting more vertices than this fail with `CycleDetected`.
    pub max_walk_steps: usize,
}

impl Default for PolygonConfig {
    fn default() -> Self {
        Self { max_walk_steps: DEFAULT_MAX_WALK_STEPS }
    }
}

impl PolygonConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
