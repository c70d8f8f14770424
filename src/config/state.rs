// Application state module
// Immutable state shared by every connection task

use super::types::Config;
use crate::http::RangePolicy;
use crate::resources::ResourceTable;

/// Application state, built once before serving begins
pub struct AppState {
    pub config: Config,
    pub resources: ResourceTable,
    // Cached config values for fast access
    pub access_log: bool,
    pub range_policy: RangePolicy,
}

impl AppState {
    /// Create `AppState` serving the fixture resources
    pub fn new(config: &Config) -> Self {
        Self::with_resources(config, ResourceTable::fixtures())
    }

    pub fn with_resources(config: &Config, resources: ResourceTable) -> Self {
        Self {
            config: config.clone(),
            resources,
            access_log: config.logging.access_log,
            range_policy: config.http.start_past_end,
        }
    }
}
