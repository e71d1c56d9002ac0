//! Configuration loading for Rapport services.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`RAPPORT__` prefix, `__` as section separator)
//! 2. Config file (`rapport.toml` by default)
//! 3. Defaults of the section type

use serde::de::DeserializeOwned;

use crate::error::RapportError;

/// Prefix of environment overrides, e.g. `RAPPORT__RELAY__EVENT_PREFIX`.
pub const ENV_PREFIX: &str = "RAPPORT";

/// Deserialize one section of the layered configuration.
///
/// A missing file or a missing section yields `T::default()`; a section that
/// exists but does not deserialize is an error.
pub fn load_section<T>(file_prefix: &str, section: &str) -> Result<T, RapportError>
where
    T: DeserializeOwned + Default,
{
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    match cfg.get::<T>(section) {
        Ok(c) => Ok(c),
        Err(config::ConfigError::NotFound(_)) => {
            tracing::debug!(section, "Config section not found, using defaults");
            Ok(T::default())
        }
        Err(e) => Err(e.into()),
    }
}
