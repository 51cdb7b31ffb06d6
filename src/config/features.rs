//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FeatureFlags {
    /// Seed the in-memory store with the demo order set
    #[serde(default)]
    pub seed_demo_orders: bool,

    /// Show infrastructure error text in 500 responses (disable in production!)
    #[serde(default)]
    pub verbose_errors: bool,
}
