//! Ordered collection of commands.

use std::sync::Arc;

use crate::commands::command::CommandSpec;

/// Commands known to the bot, iterated in registration order.
///
/// Every command is evaluated against every message, so registration order
/// only decides the order commands are started in. Overlapping activation
/// predicates will trigger several commands for the same message.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<Arc<CommandSpec>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        CommandRegistry {
            commands: Vec::new(),
        }
    }

    pub fn register(&mut self, command: CommandSpec) -> &mut Self {
        self.commands.push(Arc::new(command));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CommandSpec>> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Services, context::InvocationContext};
    use futures::{FutureExt, future::BoxFuture};

    fn noop(_: Arc<InvocationContext>, _: Arc<Services>) -> BoxFuture<'static, anyhow::Result<()>> {
        async { Ok(()) }.boxed()
    }

    #[test]
    fn test_new_is_empty() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_iterates_in_registration_order() {
        let mut registry = CommandRegistry::new();
        registry
            .register(CommandSpec::new("first", "first", |_| true, noop))
            .register(CommandSpec::new("second", "second", |_| true, noop))
            .register(CommandSpec::new("third", "third", |_| true, noop));

        let names: Vec<&str> = registry.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }
}
