//! Matrix protocol integration for the bot.
//!
//! This module is the chat platform adapter: it logs the bot in, turns room
//! messages into [`InboundMessage`](crate::commands::InboundMessage)s and
//! sends replies back.
//!
//! # Architecture
//!
//! The module is structured around the [`MatrixClient`] which coordinates:
//! - **Login**: Password login or restoration of a persisted session
//! - **Session**: Persistence of the session and sync token in the data directory
//! - **Sync**: Real-time event handling, room auto-join and member capabilities
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//! use wombot::matrix::{MatrixClient, UserCredentials};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let credentials = UserCredentials {
//!     user_id: "@wombot:example.com".to_string(),
//!     password: "password".to_string(),
//! };
//!
//! let client = MatrixClient::new(&credentials, Path::new("./data")).await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod login;
mod session;
mod sync;

pub use crate::matrix::client::MatrixClient;

/// User credentials for a Matrix account
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// User ID of the matrix account
    pub user_id: String,
    /// Password of the matrix account
    pub password: String,
}
