//! Client configuration.
//!
//! Defaults target the `2023-01` Admin API over HTTPS. `from_env` lets a
//! binary or test override them without code changes.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// An Admin API version: `YYYY-MM` or `unstable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersion(String);

impl ApiVersion {
    pub const JANUARY_23: &'static str = "2023-01";

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self(Self::JANUARY_23.to_string())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s == "unstable"
            || matches!(s.split_once('-'), Some((year, month))
                if year.len() == 4
                    && year.bytes().all(|b| b.is_ascii_digit())
                    && matches!(month.parse::<u8>(), Ok(1..=12))
                    && month.len() == 2);
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(ConfigError::InvalidApiVersion(s.to_string()))
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_version: ApiVersion,
    /// `https`, or `http` for a local mock server.
    pub scheme: String,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_version: ApiVersion::default(),
            scheme: "https".to_string(),
            user_agent: format!("resource-core/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                 |
    /// |-----------------------|-------------------------|
    /// | `SHOPIFY_API_VERSION` | `2023-01`               |
    /// | `SHOPIFY_API_SCHEME`  | `https`                 |
    /// | `SHOPIFY_USER_AGENT`  | `resource-core/<version>` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_version = match lookup("SHOPIFY_API_VERSION") {
            Some(v) => v.parse()?,
            None => defaults.api_version,
        };

        let scheme = match lookup("SHOPIFY_API_SCHEME") {
            Some(s) if s == "http" || s == "https" => s,
            Some(s) => return Err(ConfigError::InvalidScheme(s)),
            None => defaults.scheme,
        };

        let user_agent = lookup("SHOPIFY_USER_AGENT").unwrap_or(defaults.user_agent);

        Ok(Self {
            api_version,
            scheme,
            user_agent,
        })
    }

    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }

    pub fn with_scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }
}
