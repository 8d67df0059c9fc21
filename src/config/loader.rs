//! Configuration loader with environment variable support

use super::Config;
use crate::error::Result;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use std::path::Path;

/// Prefix for `SOLAR__SECTION__KEY` style overrides
const ENV_PREFIX: &str = "SOLAR";

/// Plain variable the provider documentation uses for the key
const API_KEY_VAR: &str = "UPSTAGE_API_KEY";

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let config = base_builder()?
        .add_source(File::from(path.as_ref()))
        .build()?;

    Ok(config.try_deserialize()?)
}

/// Load configuration from a TOML file with environment variable overrides
pub fn load_config_with_env<P: AsRef<Path>>(path: P) -> Result<Config> {
    let config = base_builder()?
        .add_source(File::from(path.as_ref()))
        .add_source(env_source())
        .build()?;

    Ok(config.try_deserialize()?)
}

/// Load configuration from defaults and environment variables only
pub fn load_config_from_env() -> Result<Config> {
    let config = base_builder()?.add_source(env_source()).build()?;

    Ok(config.try_deserialize()?)
}

/// Builder seeded with the API key from `UPSTAGE_API_KEY`, if present
fn base_builder() -> Result<ConfigBuilder<DefaultState>> {
    let api_key = std::env::var(API_KEY_VAR).unwrap_or_default();
    Ok(config::Config::builder().set_default("provider.api_key", api_key)?)
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
