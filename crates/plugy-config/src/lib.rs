//! Server configuration schema and environment loading.
//!
//! Defines the settings the Plugy Agent API reads at start-up: the listen
//! address, the cross-origin policy and the service metadata. Every value has
//! a default, so an empty environment yields a working (permissive) server.

use std::net::SocketAddr;

use serde::Serialize;

pub const ENV_BIND_ADDR: &str = "PLUGY_BIND_ADDR";
pub const ENV_CORS_ALLOW_ORIGINS: &str = "PLUGY_CORS_ALLOW_ORIGINS";
pub const ENV_CORS_ALLOW_CREDENTIALS: &str = "PLUGY_CORS_ALLOW_CREDENTIALS";
pub const ENV_CORS_ALLOW_METHODS: &str = "PLUGY_CORS_ALLOW_METHODS";
pub const ENV_CORS_ALLOW_HEADERS: &str = "PLUGY_CORS_ALLOW_HEADERS";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Configuration parsing errors.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid listen address for {key}: {value}")]
    InvalidAddr { key: &'static str, value: String },

    #[error("Invalid boolean for {key}: {value}")]
    InvalidBool { key: &'static str, value: String },

    #[error("Invalid CORS {kind}: {value}")]
    InvalidCorsValue { kind: &'static str, value: String },
}

/// Either every value is accepted, or only the listed ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AllowList {
    #[default]
    Any,
    List(Vec<String>),
}

impl AllowList {
    /// Parses `*` or a comma-separated list. A `*` anywhere in the list
    /// widens it to [`AllowList::Any`].
    pub fn parse(raw: &str) -> Self {
        let items: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if items.iter().any(|s| s == "*") {
            return AllowList::Any;
        }
        AllowList::List(items)
    }

    pub fn is_any(&self) -> bool {
        matches!(self, AllowList::Any)
    }
}

impl std::fmt::Display for AllowList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllowList::Any => f.write_str("*"),
            AllowList::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

/// Cross-origin policy. The four knobs are independent.
///
/// The default is fully permissive (any origin, credentials allowed, any
/// method, any header). Deployments narrow it through the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub allow_origins: AllowList,
    pub allow_credentials: bool,
    pub allow_methods: AllowList,
    pub allow_headers: AllowList,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: AllowList::Any,
            allow_credentials: true,
            allow_methods: AllowList::Any,
            allow_headers: AllowList::Any,
        }
    }
}

/// Service metadata published for documentation tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiInfo {
    pub title: String,
    pub description: String,
    pub version: String,
}

impl Default for ApiInfo {
    fn default() -> Self {
        Self {
            title: "Plugy Agent API".into(),
            description: "Backend API for Plugy Agent".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub cors: CorsConfig,
    pub info: ApiInfo,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            cors: CorsConfig::default(),
            info: ApiInfo::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Missing or blank keys fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_addr = get(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddr {
                key: ENV_BIND_ADDR,
                value: raw_addr.clone(),
            })?;

        let defaults = CorsConfig::default();
        let allow_credentials = match get(ENV_CORS_ALLOW_CREDENTIALS) {
            Some(v) => parse_bool(ENV_CORS_ALLOW_CREDENTIALS, &v)?,
            None => defaults.allow_credentials,
        };

        let cors = CorsConfig {
            allow_origins: get(ENV_CORS_ALLOW_ORIGINS)
                .map(|v| AllowList::parse(&v))
                .unwrap_or(defaults.allow_origins),
            allow_credentials,
            allow_methods: get(ENV_CORS_ALLOW_METHODS)
                .map(|v| AllowList::parse(&v))
                .unwrap_or(defaults.allow_methods),
            allow_headers: get(ENV_CORS_ALLOW_HEADERS)
                .map(|v| AllowList::parse(&v))
                .unwrap_or(defaults.allow_headers),
        };

        Ok(Self {
            bind_addr,
            cors,
            info: ApiInfo::default(),
        })
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: raw.to_string(),
        }),
    }
}
