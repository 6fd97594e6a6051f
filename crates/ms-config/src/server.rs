//! Health-check server configuration.

use serde::{Deserialize, Serialize};

const fn default_port() -> u16 {
    8000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}
