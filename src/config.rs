//! Process configuration read from the environment

use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IvrConfig {
    pub port: u16,
    /// Host used in callback URLs handed to the telephony provider
    pub public_host: Option<String>,
    pub menu_path: Option<PathBuf>,
    /// Number dialled when a caller asks for an agent
    pub agent_number: Option<String>,
    pub gather_timeout_secs: u32,
    pub voice: String,
}

impl Default for IvrConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            public_host: None,
            menu_path: None,
            agent_number: None,
            gather_timeout_secs: 8,
            voice: "alice".to_string(),
        }
    }
}

impl IvrConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            port: parse_number(&get, "IVR_PORT")?.unwrap_or(defaults.port),
            public_host: get("IVR_PUBLIC_HOST"),
            menu_path: get("IVR_MENU_PATH").map(PathBuf::from),
            agent_number: get("IVR_AGENT_NUMBER"),
            gather_timeout_secs: parse_number(&get, "IVR_GATHER_TIMEOUT_SECS")?
                .unwrap_or(defaults.gather_timeout_secs),
            voice: get("IVR_VOICE").unwrap_or(defaults.voice),
        })
    }
}

fn parse_number<T, F>(get: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    get(var)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { var, value })
        })
        .transpose()
}
