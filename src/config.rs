//! Page wiring and loader knobs.

use std::str::FromStr;

use log::LevelFilter;

use crate::loader::FetchMode;

pub const DEFAULT_ERROR_ELEMENT_ID: &str = "errorreason";
pub const DEFAULT_STATUS_ELEMENT_ID: &str = "loadingcomponent";
pub const DEFAULT_CODE_PARAM: &str = "code";

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BootConfig {
    /// Element whose text receives fatal error messages.
    #[cfg_attr(feature = "serde", serde(default = "default_error_element_id"))]
    pub error_element_id: String,

    /// Element whose text shows the current loading stage.
    #[cfg_attr(feature = "serde", serde(default = "default_status_element_id"))]
    pub status_element_id: String,

    /// Query parameter captured at startup.
    #[cfg_attr(feature = "serde", serde(default = "default_code_param"))]
    pub code_param: String,

    #[cfg_attr(feature = "serde", serde(default))]
    pub fetch_mode: FetchMode,

    #[cfg_attr(feature = "serde", serde(default = "default_log_level"))]
    pub log_level: String,
}

fn default_error_element_id() -> String {
    DEFAULT_ERROR_ELEMENT_ID.to_string()
}

fn default_status_element_id() -> String {
    DEFAULT_STATUS_ELEMENT_ID.to_string()
}

fn default_code_param() -> String {
    DEFAULT_CODE_PARAM.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            error_element_id: default_error_element_id(),
            status_element_id: default_status_element_id(),
            code_param: default_code_param(),
            fetch_mode: FetchMode::default(),
            log_level: default_log_level(),
        }
    }
}

impl BootConfig {
    /// Parsed `log_level`, falling back to `Info` for anything unrecognised.
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(self.log_level.trim()).unwrap_or(LevelFilter::Info)
    }

    #[cfg(feature = "serde")]
    pub fn from_json(raw: &str) -> Result<Self, crate::error::ConfigError> {
        let config: BootConfig = serde_json::from_str(raw)?;
        if LevelFilter::from_str(config.log_level.trim()).is_err() {
            return Err(crate::error::ConfigError::LogLevel(config.log_level));
        }
        Ok(config)
    }
}
