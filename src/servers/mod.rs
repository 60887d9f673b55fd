//! Per room configuration.
//!
//! Each Matrix room the bot serves can be linked to a player group. The
//! link is set by an administrator with `!setup` and read by the dispatcher
//! before running commands that need a group.
//!
//! - [`ServerConfig`]: The configuration of one room
//! - [`ServerConfigStore`]: Lookup and update, as used by commands
//! - [`ServerConfigs`]: JSON file backed implementation
//!
//! # Example Usage
//!
//! ```no_run
//! use wombot::servers::{ServerConfigStore, ServerConfigs};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let servers = ServerConfigs::new("servers.json".to_string()).await;
//! servers.set_group("!room:example.com", 42).await?;
//!
//! let server = servers.get_server("!room:example.com").await?;
//! assert!(server.is_some_and(|s| s.is_configured()));
//! # Ok(())
//! # }
//! ```

mod server_config;
mod server_store;

#[cfg(test)]
pub use crate::servers::server_store::MockServerConfigStore;
pub use crate::servers::{
    server_config::ServerConfig,
    server_store::{ServerConfigStore, ServerConfigs},
};
