//! Persistence of room configurations.
//!
//! Configurations are kept in memory and written to a JSON file on every
//! change, keyed by room id.

use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use log::{error, info, warn};
use mockall::automock;
use tokio::{fs, sync::RwLock};

use crate::servers::ServerConfig;

/// Lookup and update of room configurations.
#[automock]
#[async_trait]
pub trait ServerConfigStore: Send + Sync {
    /// Returns the configuration of a room, if any.
    async fn get_server(&self, room_id: &str) -> anyhow::Result<Option<ServerConfig>>;
    /// Links a room to a group and persists the change.
    async fn set_group(&self, room_id: &str, group_id: i64) -> anyhow::Result<ServerConfig>;
}

/// JSON file backed [`ServerConfigStore`].
///
/// # Examples
///
/// ```no_run
/// use wombot::servers::ServerConfigs;
///
/// # async fn example() {
/// let servers = ServerConfigs::new("servers.json".to_string()).await;
/// # }
/// ```
pub struct ServerConfigs {
    /// Path to the JSON file
    path: String,
    /// Configurations by room id
    servers: RwLock<HashMap<String, ServerConfig>>,
}

impl ServerConfigs {
    /// Creates the store and loads existing configurations from `path`.
    ///
    /// A missing or unreadable file starts the store empty.
    pub async fn new(path: String) -> Self {
        let servers = RwLock::new(load(&path).await);
        ServerConfigs { path, servers }
    }

    async fn persist(&self, servers: &HashMap<String, ServerConfig>) -> anyhow::Result<()> {
        let serialized = serde_json::to_string(servers)?;

        fs::write(&self.path, &serialized)
            .await
            .with_context(|| format!("failed to persist servers to {}", &self.path))?;

        info!("persisted {} server configurations", servers.len());
        Ok(())
    }
}

async fn load(path: &str) -> HashMap<String, ServerConfig> {
    let Ok(serialized) = fs::read_to_string(path).await else {
        warn!("no persisted servers found, starting with an empty store");
        return HashMap::new();
    };

    match serde_json::from_str::<HashMap<String, ServerConfig>>(&serialized) {
        Ok(servers) => {
            info!("loaded {} server configurations", servers.len());
            servers
        }
        Err(e) => {
            error!("failed to deserialize persisted servers: {}", e);
            HashMap::new()
        }
    }
}

#[async_trait]
impl ServerConfigStore for ServerConfigs {
    async fn get_server(&self, room_id: &str) -> anyhow::Result<Option<ServerConfig>> {
        Ok(self.servers.read().await.get(room_id).cloned())
    }

    async fn set_group(&self, room_id: &str, group_id: i64) -> anyhow::Result<ServerConfig> {
        let mut servers = self.servers.write().await;
        let server = ServerConfig { group_id };

        // The store only changes once the new state is on disk
        let mut updated = servers.clone();
        updated.insert(room_id.to_string(), server.clone());
        self.persist(&updated).await?;
        *servers = updated;

        info!("room {} linked to group {}", room_id, group_id);
        Ok(server)
    }
}
