//! Configuration file parser for ~/.config/suirss/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`,
//! which targets testnet with its published package. `Config::resolve`
//! merges the file with the network presets and validates every id.
use crate::network::Network;
use crate::schema::{Address, AddressParseError, ObjectId};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Environment variable overriding `rpc_url` (read by the CLI).
pub const RPC_URL_ENV: &str = "SUIRSS_RPC_URL";

pub const DEFAULT_GAS_BUDGET: u64 = 100_000_000;
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8787";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// A required id has no preset on the selected network.
    #[error("`{key}` must be set for {network}")]
    Missing { key: &'static str, network: Network },

    #[error("Invalid `{key}`: {source}")]
    InvalidId {
        key: &'static str,
        #[source]
        source: AddressParseError,
    },

    #[error("Invalid rpc_url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid listen address `{0}`")]
    InvalidListen(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Raw configuration as written in the file. Ids stay strings here so one
/// bad value is reported by key name from `resolve`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: Network,

    /// Fullnode JSON-RPC URL. `SUIRSS_RPC_URL` takes precedence.
    pub rpc_url: Option<String>,

    /// Feed package id (required on networks without a preset).
    pub package_id: Option<String>,

    /// Shared `RSSRegistry` id (required on networks without a preset).
    pub registry_id: Option<String>,

    /// Name table id; read from the registry when unset.
    pub feeds_table_id: Option<String>,

    pub suins_package_id: Option<String>,

    /// Sender used for dev-inspect. Defaults to `0x0`.
    pub sender: Option<String>,

    pub gas_budget: Option<u64>,

    /// Address `serve` binds to.
    pub listen: Option<String>,
}

/// Fully resolved settings shared by the CLI and the HTTP edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub network: Network,
    pub rpc_url: Url,
    pub package_id: ObjectId,
    pub registry_id: ObjectId,
    pub feeds_table_id: Option<ObjectId>,
    pub suins_package_id: ObjectId,
    pub sender: Address,
    pub gas_budget: u64,
    pub listen: SocketAddr,
}

const KNOWN_KEYS: [&str; 9] = [
    "network",
    "rpc_url",
    "package_id",
    "registry_id",
    "feeds_table_id",
    "suins_package_id",
    "sender",
    "gas_budget",
    "listen",
];

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), network = %config.network, "Loaded configuration");
        Ok(config)
    }

    /// Merges with the presets of `self.network` and validates everything.
    pub fn resolve(&self) -> Result<Settings, ConfigError> {
        let network = self.network;

        let rpc_url = self.rpc_url.as_deref().unwrap_or(network.rpc_url());
        let rpc_url = Url::parse(rpc_url.trim()).map_err(|e| ConfigError::InvalidUrl {
            url: rpc_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(rpc_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: rpc_url.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        let package_id = required_id("package_id", &self.package_id, network.rss_package(), network)?;
        let registry_id =
            required_id("registry_id", &self.registry_id, network.rss_registry(), network)?;
        let feeds_table_id = optional_id("feeds_table_id", &self.feeds_table_id)?;
        let suins_package_id = optional_id("suins_package_id", &self.suins_package_id)?
            .unwrap_or_else(|| network.suins_package());
        let sender = optional_id("sender", &self.sender)?.unwrap_or(Address::ZERO);

        let listen = self.listen.as_deref().unwrap_or(DEFAULT_LISTEN);
        let listen = listen
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidListen(listen.to_string()))?;

        Ok(Settings {
            network,
            rpc_url,
            package_id,
            registry_id,
            feeds_table_id,
            suins_package_id,
            sender,
            gas_budget: self.gas_budget.unwrap_or(DEFAULT_GAS_BUDGET),
            listen,
        })
    }
}

fn optional_id(key: &'static str, value: &Option<String>) -> Result<Option<ObjectId>, ConfigError> {
    value
        .as_deref()
        .map(|s| s.parse().map_err(|source| ConfigError::InvalidId { key, source }))
        .transpose()
}

fn required_id(
    key: &'static str,
    value: &Option<String>,
    preset: Option<ObjectId>,
    network: Network,
) -> Result<ObjectId, ConfigError> {
    optional_id(key, value)?
        .or(preset)
        .ok_or(ConfigError::Missing { key, network })
}

// ============================================================================
// Tests
// ============================================================================
