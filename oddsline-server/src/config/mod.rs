//! Configuration module for oddsline-server.
//!
//! Handles loading configuration from the TOML file and CLI arguments,
//! hashing the admin secret, and seeding the ledger.

pub mod file;

use crate::config::file::{AccountConfig, FileConfig, FixtureConfig};
use oddsline_core::config::{AdminConfig, ServerConfig, SharedConfig};
use oddsline_core::entities::{AccountRecord, FixtureRecord, Ledger, LedgerError};
use oddsline_sdk::objects::{FixtureId, Market};
use std::collections::{BTreeMap, HashSet};
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("password hashing error: {0}")]
    HashError(String),

    #[error("failed to seed ledger: {0}")]
    SeedError(#[from] LedgerError),
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub admin: AdminConfig,
    pub accounts: Vec<AccountConfig>,
    pub fixtures: Vec<FixtureConfig>,
}

impl LoadedConfig {
    /// Split off the reloadable sections.
    pub fn into_shared(self) -> (SharedConfig, Seed) {
        (
            SharedConfig::new(self.server, self.admin),
            Seed {
                accounts: self.accounts,
                fixtures: self.fixtures,
            },
        )
    }
}

/// Initial ledger contents. Only read at startup; a reload does not
/// touch balances or odds.
pub struct Seed {
    pub accounts: Vec<AccountConfig>,
    pub fixtures: Vec<FixtureConfig>,
}

impl Seed {
    pub fn into_ledger(self) -> Result<Ledger, ConfigError> {
        let mut ledger = Ledger::new();
        for account in self.accounts {
            ledger.insert_account(AccountRecord::new(
                account.token,
                account.display_name,
                account.balance,
            ))?;
        }
        for fixture in self.fixtures {
            ledger.insert_fixture(convert_fixture(fixture)?)?;
        }
        Ok(ledger)
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI overrides
    /// 3. Validate the configuration
    /// 4. Hash the admin secret if it's plaintext (and rewrite the file)
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        self.validate(&file_config)?;

        let secret_hash = if file_config.is_admin_secret_hashed() {
            file_config.admin.secret.clone()
        } else {
            let hash = hash_secret(&file_config.admin.secret)?;
            file_config.admin.secret = hash.clone();
            self.rewrite_config(&file_config)?;
            tracing::info!("Admin secret hashed and config file updated");
            hash
        };

        // Applied after the rewrite so the override never lands in the file.
        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        Ok(LoadedConfig {
            server: ServerConfig {
                listen: file_config.server.listen,
                odds_buffer: file_config.server.odds_buffer,
            },
            admin: AdminConfig::new(secret_hash),
            accounts: file_config.accounts,
            fixtures: file_config.fixtures,
        })
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        if config.admin.secret.is_empty() {
            return Err(ConfigError::ValidationError(
                "admin secret must not be empty".into(),
            ));
        }
        if config.server.odds_buffer == 0 {
            return Err(ConfigError::ValidationError(
                "server.odds_buffer must be at least 1".into(),
            ));
        }

        let mut tokens = HashSet::new();
        for account in &config.accounts {
            if account.token.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "account {} has an empty token",
                    account.display_name
                )));
            }
            if !tokens.insert(account.token.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "account {} reuses another account's token",
                    account.display_name
                )));
            }
            if account.balance.is_sign_negative() {
                return Err(ConfigError::ValidationError(format!(
                    "account {} has a negative balance",
                    account.display_name
                )));
            }
        }

        for fixture in &config.fixtures {
            for market in fixture.odds.keys() {
                market.parse::<Market>().map_err(|e| {
                    ConfigError::ValidationError(format!("fixture {}: {e}", fixture.fixture_id))
                })?;
            }
        }
        Ok(())
    }

    fn rewrite_config(&self, config: &FileConfig) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(config)?;

        // Write atomically: write to temp file, then rename
        let temp_path = self.config_path.with_extension("toml.tmp");
        std::fs::write(&temp_path, toml_string)?;
        std::fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }
}

pub(crate) fn hash_secret(plaintext: &str) -> Result<String, ConfigError> {
    use argon2::{
        Argon2, PasswordHasher,
        password_hash::{SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ConfigError::HashError(e.to_string()))
}

fn convert_fixture(f: FixtureConfig) -> Result<FixtureRecord, ConfigError> {
    let odds = f
        .odds
        .into_iter()
        .map(|(market, odds)| {
            market
                .parse::<Market>()
                .map(|market| (market, odds))
                .map_err(|e| ConfigError::ValidationError(e.to_string()))
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    Ok(FixtureRecord {
        fixture_id: FixtureId::new(f.fixture_id),
        home: f.home,
        away: f.away,
        league: f.league,
        kickoff: f.kickoff,
        status: f.status,
        odds,
    })
}
