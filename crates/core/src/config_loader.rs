use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};

use crate::config::EngineConfig;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads engine configuration by merging defaults, `odte.toml`, and
    /// `ODTE_`-prefixed environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> Result<EngineConfig> {
        let config: EngineConfig = Figment::from(figment::providers::Serialized::defaults(
            EngineConfig::default(),
        ))
        .merge(Toml::file("odte.toml"))
        .merge(Env::prefixed("ODTE_").split("__"))
        .extract()?;

        Ok(config)
    }
}
