//! Queue service configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Seconds between auto-call evaluations when no reset arrives.
    #[serde(default = "default_auto_call_interval_secs")]
    pub auto_call_interval_secs: u64,

    /// Minimum seconds between ticket issuances per counter; 0 disables
    /// the cooldown.
    #[serde(default = "default_issue_cooldown_secs")]
    pub issue_cooldown_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_call_interval_secs: default_auto_call_interval_secs(),
            issue_cooldown_secs: default_issue_cooldown_secs(),
        }
    }
}

fn default_auto_call_interval_secs() -> u64 {
    60
}

fn default_issue_cooldown_secs() -> u64 {
    2
}
