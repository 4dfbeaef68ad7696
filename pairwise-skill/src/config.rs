use crate::scheduler::SchedulerConfig;
use crate::systems::Glicko2;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] json5::Error),
}

/// Tunables for a voting session. Every field has a default, so `{}` is a valid config.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub glicko: Glicko2,
    pub scheduler: SchedulerConfig,
}

impl SessionConfig {
    pub fn from_file(source: impl AsRef<Path>) -> Result<Self, ConfigError> {
        // json5 allows comments and trailing commas in hand-written configs
        let params_json = std::fs::read_to_string(source)?;
        Self::from_json5(&params_json)
    }

    pub fn from_json5(params_json: &str) -> Result<Self, ConfigError> {
        let config = json5::from_str(params_json)?;
        tracing::info!("Loaded session configuration:\n{:?}", config);
        Ok(config)
    }
}
