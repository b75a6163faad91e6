// src/utils/config.rs
//! File and environment backed settings
//!
//! Rules are code and can only be supplied through [`ProxyOptions`]; the
//! scalar options can also come from configuration. Sources are layered:
//! defaults, then an optional file, then `RECURSIVE_PROXY_*` environment
//! variables.

use crate::interception::options::{ProxyOptions, ReadOnlyMode, DEFAULT_PATH_SEPARATOR};
use crate::utils::errors::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "RECURSIVE_PROXY";

/// Scalar wrap options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    /// `off`, `silent` or `error`; anything else means `off`
    #[serde(default = "default_read_only")]
    pub read_only: String,

    #[serde(default = "default_path_separator")]
    pub path_separator: String,

    #[serde(default = "default_true")]
    pub follow_function: bool,

    #[serde(default)]
    pub follow_array: bool,

    #[serde(default)]
    pub follow_non_plain_object: bool,
}

fn default_read_only() -> String {
    ReadOnlyMode::Off.as_str().to_string()
}

fn default_path_separator() -> String {
    DEFAULT_PATH_SEPARATOR.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            read_only: default_read_only(),
            path_separator: default_path_separator(),
            follow_function: true,
            follow_array: false,
            follow_non_plain_object: false,
        }
    }
}

impl ProxySettings {
    /// Load settings from defaults, an optional file and the environment
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&ProxySettings::default())?);

        if let Some(path) = path {
            debug!("Loading proxy settings from {}", path);
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn read_only_mode(&self) -> ReadOnlyMode {
        ReadOnlyMode::from_setting(&self.read_only)
    }

    /// Options carrying these settings and no rules
    pub fn into_options(self) -> ProxyOptions {
        ProxyOptions::from(self)
    }
}

impl From<ProxySettings> for ProxyOptions {
    fn from(settings: ProxySettings) -> Self {
        ProxyOptions::new()
            .read_only(settings.read_only_mode())
            .path_separator(settings.path_separator)
            .follow_function(settings.follow_function)
            .follow_array(settings.follow_array)
            .follow_non_plain_object(settings.follow_non_plain_object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ProxySettings::default();
        assert_eq!(settings.read_only, "off");
        assert_eq!(settings.path_separator, ".");
        assert!(settings.follow_function);
        assert!(!settings.follow_array);
    }

    #[test]
    fn test_into_options() {
        let settings = ProxySettings {
            read_only: "error".to_string(),
            follow_array: true,
            ..Default::default()
        };
        let options = settings.into_options();
        assert_eq!(options.read_only, Some(ReadOnlyMode::Error));
        assert_eq!(options.follow_array, Some(true));
        assert_eq!(options.path_separator.as_deref(), Some("."));
        assert!(options.value.is_none());
    }

    #[test]
    fn test_unknown_mode_falls_back_to_off() {
        let settings = ProxySettings {
            read_only: "sometimes".to_string(),
            ..Default::default()
        };
        assert_eq!(settings.read_only_mode(), ReadOnlyMode::Off);
    }
}
