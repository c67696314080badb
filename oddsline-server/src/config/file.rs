//! TOML file configuration structures.
//!
//! These structs directly map to the `oddsline-config.toml` file format.

use oddsline_core::events::DEFAULT_ODDS_BUFFER;
use oddsline_sdk::objects::FixtureStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{Ipv4Addr, SocketAddr};
use time::OffsetDateTime;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub admin: AdminConfig,
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
    #[serde(default)]
    pub fixtures: Vec<FixtureConfig>,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
    /// Capacity of the odds change channel feeding live sockets.
    #[serde(default = "default_odds_buffer")]
    pub odds_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            odds_buffer: default_odds_buffer(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

fn default_odds_buffer() -> usize {
    DEFAULT_ODDS_BUFFER
}

/// Admin configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// The admin secret. If this is plaintext (doesn't start with `$argon2`),
    /// it will be hashed and the config file will be rewritten.
    pub secret: String,
}

/// A pre-provisioned account. The token is presented as a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub token: String,
    pub display_name: String,
    #[serde(default)]
    pub balance: Decimal,
}

/// A fixture seeded into the ledger at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureConfig {
    pub fixture_id: String,
    pub home: String,
    pub away: String,
    pub league: String,
    /// RFC 3339 timestamp, quoted (e.g. `"2026-10-17T14:00:00Z"`).
    #[serde(with = "time::serde::rfc3339")]
    pub kickoff: OffsetDateTime,
    #[serde(default = "default_fixture_status")]
    pub status: FixtureStatus,
    /// Market name (`home`, `draw`, `away`, `over`, `under`) to odds.
    #[serde(default)]
    pub odds: BTreeMap<String, Decimal>,
}

fn default_fixture_status() -> FixtureStatus {
    FixtureStatus::Scheduled
}

impl FileConfig {
    /// Check if the admin secret is already hashed (argon2 format).
    pub fn is_admin_secret_hashed(&self) -> bool {
        self.admin.secret.starts_with("$argon2")
    }
}
