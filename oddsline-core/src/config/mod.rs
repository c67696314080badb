//! Runtime configuration types.
//!
//! These are the validated values the server runs with. Loading and
//! parsing the TOML file happens in the server crate.

mod admin;
mod server;

pub use admin::AdminConfig;
pub use server::ServerConfig;

use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};

/// Shared configuration state with separate locks for each section.
///
/// Sections reload independently on SIGHUP without blocking readers of
/// the other section.
#[derive(Clone)]
pub struct SharedConfig {
    pub server: Arc<RwLock<ServerConfig>>,
    pub admin: Arc<RwLock<AdminConfig>>,
}

impl SharedConfig {
    pub fn new(server: ServerConfig, admin: AdminConfig) -> Self {
        Self {
            server: Arc::new(RwLock::new(server)),
            admin: Arc::new(RwLock::new(admin)),
        }
    }

    pub async fn server(&self) -> RwLockReadGuard<'_, ServerConfig> {
        self.server.read().await
    }

    pub async fn admin(&self) -> RwLockReadGuard<'_, AdminConfig> {
        self.admin.read().await
    }

    pub async fn update_server(&self, config: ServerConfig) {
        *self.server.write().await = config;
    }

    pub async fn update_admin(&self, config: AdminConfig) {
        *self.admin.write().await = config;
    }

    /// Replace both sections, one lock at a time.
    pub async fn update_all(&self, server: ServerConfig, admin: AdminConfig) {
        self.update_server(server).await;
        self.update_admin(admin).await;
    }
}
