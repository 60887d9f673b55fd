//! Inbound message and invocation context structures.
//!
//! An [`InboundMessage`] is what the chat platform hands to the dispatcher.
//! Once it passes validation, the parser turns it into an [`InvocationContext`]
//! which is shared, read-only, with every command activated by the message.

use std::collections::HashSet;

use crate::servers::ServerConfig;

/// Capabilities a room member may hold.
///
/// The platform adapter decides which capabilities a member holds when the
/// message is received; they are never cached across messages.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum PermissionCapability {
    /// The member administers the room
    IsAdministrator,
    /// The member can remove messages sent by others
    CanManageMessages,
}

/// Snapshot of a room member at the time a message was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Matrix user ID of the member
    pub user_id: String,
    /// Capabilities held by the member in the room
    pub capabilities: HashSet<PermissionCapability>,
}

impl Member {
    pub fn new(user_id: &str, capabilities: &[PermissionCapability]) -> Self {
        Member {
            user_id: user_id.to_string(),
            capabilities: capabilities.iter().copied().collect(),
        }
    }
}

/// A message received from the chat platform.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// The message text
    pub body: String,
    /// Matrix user ID of the sender
    pub sender_id: String,
    /// Room where the message was sent
    pub room_id: String,
    /// Event ID of the message
    pub event_id: String,
    /// The sender as a room member, if the platform could resolve it
    pub sender: Option<Member>,
    /// The bot as a room member, if it has a presence in the room
    pub bot_member: Option<Member>,
}

/// Structured representation of one valid inbound message.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    /// The original message text
    pub raw: String,
    /// Command prefix, e.g. `!`
    pub prefix: char,
    /// Lower-cased command name without the prefix
    pub command: String,
    /// Arguments following the command name
    pub args: Vec<String>,
    /// Matrix user ID of the sender
    pub sender_id: String,
    /// The sender as a room member
    pub sender: Option<Member>,
    /// The bot as a room member
    pub bot_member: Option<Member>,
    /// Room where the message was sent
    pub room_id: String,
    /// Event ID of the message
    pub event_id: String,
    /// Configuration of the room, when it was resolved for this message
    pub server: Option<ServerConfig>,
}

impl InvocationContext {
    /// Returns true if the message invokes `name`.
    pub fn is_command(&self, name: &str) -> bool {
        self.command == name
    }

    /// Joins every argument into a single string.
    ///
    /// Player names may contain spaces, so commands taking a username as
    /// their last argument read it with this method.
    pub fn joined_args(&self) -> String {
        self.args.join(" ")
    }

    /// Returns a copy of this context with the room configuration attached.
    pub fn with_server(self, server: Option<ServerConfig>) -> Self {
        InvocationContext { server, ..self }
    }
}
