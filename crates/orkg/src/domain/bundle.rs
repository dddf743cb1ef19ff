use super::ids::ThingId;
use serde::{Deserialize, Serialize};

/// Filters applied when fetching the subgraph below a root.
///
/// Depth is counted in statements: the root's own statements are level 1.
/// Statements above `min_level` are traversed but not returned; nothing below
/// `max_level` is visited. An object with a blacklisted class is neither
/// returned nor traversed. A non-empty whitelist keeps only statements whose
/// object is a literal or carries a whitelisted class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleConfiguration {
    /// First level included in the result
    #[serde(default)]
    pub min_level: Option<usize>,
    /// Last level traversed
    #[serde(default)]
    pub max_level: Option<usize>,
    /// Classes that objects must have (empty means any)
    #[serde(default)]
    pub whitelist: Vec<ThingId>,
    /// Classes that cut off traversal
    #[serde(default)]
    pub blacklist: Vec<ThingId>,
}

impl BundleConfiguration {
    /// Unbounded configuration: the full transitive closure.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Whether statements at `level` are returned.
    #[must_use]
    pub fn includes_level(&self, level: usize) -> bool {
        self.min_level.is_none_or(|min| level >= min)
    }

    /// Whether traversal may continue from `level` to `level + 1`.
    #[must_use]
    pub fn descends_past(&self, level: usize) -> bool {
        self.max_level.is_none_or(|max| level < max)
    }
}
