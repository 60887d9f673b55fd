//! Message dispatch and bot commands.
//!
//! This module holds the control core of the bot: every user visible action
//! goes through the [`Dispatcher`].
//!
//! # Architecture
//!
//! ```text
//! Matrix message
//!      │
//!      ▼
//! ┌───────────────┐
//! │ MessageParser │  ← is_valid() + parse()
//! └───────────────┘
//!      │ InvocationContext
//!      ▼
//! ┌───────────────┐      ┌─────────────────┐
//! │  Dispatcher   │ ───▶ │ CommandRegistry │  every command is evaluated
//! └───────────────┘      └─────────────────┘
//!      │ one task per activated command
//!      ▼
//! ┌──────────────────────┐
//! │ gates → execute()    │ ── CommandError ──▶ ErrorReporter
//! └──────────────────────┘
//! ```
//!
//! # Commands
//!
//! | Command | Arguments | Requirements |
//! |---------|-----------|--------------|
//! | `help` | None | |
//! | `player` | `<username>` | |
//! | `update` | `<username>` | |
//! | `gains` | `<username> [period]` | |
//! | `records` | `<username> [metric]` | bot manages messages |
//! | `achievements` | `<username>` | |
//! | `delete-player` | `<username>` | admin |
//! | `set-country` | `<country> <username>` | admin |
//! | `setup` | `<group_id>` | admin |
//! | `group` | None | configured group |
//!
//! # Error Handling
//!
//! Failures meant for the user are [`CommandError`](error::CommandError)s and end up as a single
//! red notice in the room. Everything else is an infrastructure failure,
//! returned from the command task for the bot to log.

use std::sync::Arc;

mod actions;
mod command;
mod context;
mod dispatcher;
mod error;
mod markdown_response;
mod notice;
mod parser;
mod permissions;
mod registry;
mod reporter;

#[cfg(test)]
pub use crate::commands::notice::MockReplier;
pub use crate::commands::{
    actions::default_registry,
    command::CommandSpec,
    context::{InboundMessage, Member, PermissionCapability},
    dispatcher::Dispatcher,
    notice::{Notice, Replier},
    parser::{EligibilityPolicy, MessageParser},
    registry::CommandRegistry,
};
use crate::{servers::ServerConfigStore, wom::PlayerApi};

/// Collaborators available to commands while they execute.
pub struct Services {
    /// Sends messages into rooms
    pub replier: Arc<dyn Replier>,
    /// Player tracking API
    pub api: Arc<dyn PlayerApi>,
    /// Room configurations
    pub servers: Arc<dyn ServerConfigStore>,
    /// Base URL of the player tracking website, used to build links
    pub site_url: String,
    /// Maximum number of achievements listed by the achievements command
    pub achievements_limit: usize,
}
