//! Capability checks for command gating.
//!
//! These checks are re-evaluated on every dispatch. A missing member (the
//! sender could not be resolved, or the bot has no presence in the room) never
//! holds any capability.

use crate::commands::context::{Member, PermissionCapability};

/// Returns true if `member` exists and holds `capability`.
pub fn holds(member: Option<&Member>, capability: PermissionCapability) -> bool {
    member.is_some_and(|m| m.capabilities.contains(&capability))
}

/// Returns true if the actor administers the room.
pub fn is_admin(actor: Option<&Member>) -> bool {
    holds(actor, PermissionCapability::IsAdministrator)
}

/// Returns true if the bot can remove messages sent by others in the room.
pub fn can_manage_messages(bot_member: Option<&Member>) -> bool {
    holds(bot_member, PermissionCapability::CanManageMessages)
}
