use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/up_tagger.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the Up API, with or without a trailing slash.
    pub base_url: String,
    /// Where the personal access token is persisted between sessions.
    pub api_key_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.up.com.au/api/v1".to_string(),
            api_key_path: "config/api_key.json".to_string(),
        }
    }
}

pub fn load() -> Result<StoreConfig> {
    load_from(DEFAULT_CONFIG_PATH)
}

/// Reads an optional TOML file and `UP_TAGGER_*` environment overrides.
pub fn load_from(config_path: &str) -> Result<StoreConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(config_path).required(false))
        .add_source(config::Environment::with_prefix("UP_TAGGER"))
        .build()?
        .try_deserialize()?;
    Ok(settings)
}
