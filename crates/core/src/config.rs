// Runner configuration
// Replaces a process-wide debug switch with an explicit value handed to runners

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable prefix for configuration overrides (`CMDRUN_DEBUG`, ...)
pub const ENV_PREFIX: &str = "CMDRUN";

/// Runner behaviour knobs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Forward child output line by line to the sink
    pub debug: bool,
    /// Colourise stream labels in console output
    pub color: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            debug: false,
            color: true,
        }
    }
}

impl RunnerConfig {
    /// Load overrides from `CMDRUN_*` environment variables on top of defaults
    ///
    /// # Errors
    /// Returns `ConfigError::Load` if a variable is present but cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder().add_source(source).build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Same configuration with debug forwarding switched on or off
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Same configuration with colour switched on or off
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_source(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::default();
        assert!(!config.debug);
        assert!(config.color);
    }

    #[test]
    fn test_empty_environment_yields_defaults() {
        let config = RunnerConfig::from_source(env_source(&[])).unwrap();
        assert_eq!(config, RunnerConfig::default());
    }

    #[test]
    fn test_environment_overrides() {
        let config =
            RunnerConfig::from_source(env_source(&[("CMDRUN_DEBUG", "true"), ("CMDRUN_COLOR", "false")]))
                .unwrap();
        assert!(config.debug);
        assert!(!config.color);
    }

    #[test]
    fn test_unparseable_value_is_an_error() {
        let result = RunnerConfig::from_source(env_source(&[("CMDRUN_DEBUG", "loud")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_builders() {
        let config = RunnerConfig::default().with_debug(true).with_color(false);
        assert!(config.debug);
        assert!(!config.color);
    }
}
