//! External intent classifier limits.

use serde::{Deserialize, Serialize};

const fn default_max_chars() -> usize {
    6000
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IntentConfig {
    /// Characters of conversation text sent to the external model.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
