//! NL agent configuration.

use serde::Deserialize;

/// Identifies the hosted agent the job facade converses with.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Agent identifier.
    pub agent_id: String,
    /// Agent alias identifier.
    pub alias_id: String,
}
