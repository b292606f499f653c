use crate::error::RegistryError;
use serde::{Deserialize, Serialize};

/// Default minimum time a basket must stay open before it can be closed
pub const DEFAULT_OPEN_COOLDOWN_SECS: u64 = 60;

/// Runtime configuration of a basket registry
///
/// The cooldown is the core tuning knob: it is the minimum number of seconds
/// between a basket being created or reopened and it being closable again,
/// which is what keeps open-mutate-close-transfer bundles from landing inside
/// a single scheduling window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Seconds that must elapse after creation or open before close succeeds
    #[serde(default = "default_cooldown")]
    pub open_cooldown_secs: u64,

    /// Prefix prepended to every basket's metadata reference to form its URI
    #[serde(default)]
    pub base_token_uri: String,

    /// URI describing the registry collection as a whole
    #[serde(default)]
    pub contract_uri: String,
}

fn default_cooldown() -> u64 {
    DEFAULT_OPEN_COOLDOWN_SECS
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            open_cooldown_secs: DEFAULT_OPEN_COOLDOWN_SECS,
            base_token_uri: String::new(),
            contract_uri: String::new(),
        }
    }
}

impl RegistryConfig {
    /// Parse a configuration from a JSON document
    ///
    /// Missing fields fall back to their defaults, so a partial document such
    /// as `{"open_cooldown_secs": 120}` is accepted.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        Ok(serde_json::from_str(json)?)
    }
}
