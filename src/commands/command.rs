//! Command descriptors.
//!
//! A [`CommandSpec`] is plain data: a name, an activation predicate, the
//! preconditions the dispatcher checks before running it, and the routine
//! executing it. Commands differ by the values they carry, not by type.

use std::{fmt, sync::Arc};

use futures::future::BoxFuture;

use crate::commands::{Services, context::InvocationContext};

/// Predicate deciding whether a message triggers a command.
pub type ActivationFn = Box<dyn Fn(&InvocationContext) -> bool + Send + Sync>;

/// Routine running a command.
///
/// Returning a [`CommandError`](crate::commands::error::CommandError) reports it to
/// the user; any other error is an infrastructure failure.
pub type ExecuteFn = Box<
    dyn Fn(Arc<InvocationContext>, Arc<Services>) -> BoxFuture<'static, anyhow::Result<()>>
        + Send
        + Sync,
>;

pub struct CommandSpec {
    /// Command name, used in logs and help output
    pub name: &'static str,
    /// Usage line shown in the help output
    pub usage: &'static str,
    /// The sender must administer the room
    pub requires_admin: bool,
    /// The bot must be able to manage messages in the room
    pub requires_pagination: bool,
    /// The room must have a configured group
    pub requires_group_config: bool,
    activated: ActivationFn,
    execute: ExecuteFn,
}

impl CommandSpec {
    pub fn new<A, E>(name: &'static str, usage: &'static str, activated: A, execute: E) -> Self
    where
        A: Fn(&InvocationContext) -> bool + Send + Sync + 'static,
        E: Fn(Arc<InvocationContext>, Arc<Services>) -> BoxFuture<'static, anyhow::Result<()>>
            + Send
            + Sync
            + 'static,
    {
        CommandSpec {
            name,
            usage,
            requires_admin: false,
            requires_pagination: false,
            requires_group_config: false,
            activated: Box::new(activated),
            execute: Box::new(execute),
        }
    }

    pub fn admin(mut self) -> Self {
        self.requires_admin = true;
        self
    }

    pub fn paginated(mut self) -> Self {
        self.requires_pagination = true;
        self
    }

    pub fn group_config(mut self) -> Self {
        self.requires_group_config = true;
        self
    }

    pub fn activated(&self, ctx: &InvocationContext) -> bool {
        (self.activated)(ctx)
    }

    pub fn execute(
        &self,
        ctx: Arc<InvocationContext>,
        services: Arc<Services>,
    ) -> BoxFuture<'static, anyhow::Result<()>> {
        (self.execute)(ctx, services)
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("requires_admin", &self.requires_admin)
            .field("requires_pagination", &self.requires_pagination)
            .field("requires_group_config", &self.requires_group_config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::test_utils::context;
    use futures::FutureExt;

    fn noop(_: Arc<InvocationContext>, _: Arc<Services>) -> BoxFuture<'static, anyhow::Result<()>> {
        async { Ok(()) }.boxed()
    }

    #[test]
    fn test_new_has_no_requirements() {
        let spec = CommandSpec::new("ping", "ping", |ctx| ctx.is_command("ping"), noop);
        assert!(!spec.requires_admin);
        assert!(!spec.requires_pagination);
        assert!(!spec.requires_group_config);
    }

    #[test]
    fn test_builder_flags() {
        let spec = CommandSpec::new("ping", "ping", |_| true, noop)
            .admin()
            .paginated()
            .group_config();
        assert!(spec.requires_admin);
        assert!(spec.requires_pagination);
        assert!(spec.requires_group_config);
    }

    #[test]
    fn test_activated_uses_predicate() {
        let spec = CommandSpec::new("ping", "ping", |ctx| ctx.is_command("ping"), noop);
        assert!(spec.activated(&context("ping", &[])));
        assert!(!spec.activated(&context("pong", &[])));
    }

    #[test]
    fn test_debug_lists_flags() {
        let spec = CommandSpec::new("ping", "ping", |_| true, noop).admin();
        let debug = format!("{:?}", spec);
        assert!(debug.contains("name: \"ping\""));
        assert!(debug.contains("requires_admin: true"));
    }
}
