//! Help command.
//!
//! Lists the usage of every registered command. This is a stateless command
//! that always returns the same message.

use std::sync::Arc;

use futures::FutureExt;
use log::debug;

use crate::commands::{
    Services, command::CommandSpec, context::InvocationContext,
    markdown_response::format_help,
};

pub const USAGE: &str = "help";

/// Builds the help command listing `usages`.
pub fn command(usages: Vec<&'static str>) -> CommandSpec {
    let usages = Arc::new(usages);

    CommandSpec::new(
        "help",
        USAGE,
        |ctx| ctx.is_command("help"),
        move |ctx, services| execute(ctx, services, Arc::clone(&usages)).boxed(),
    )
}

async fn execute(
    ctx: Arc<InvocationContext>,
    services: Arc<Services>,
    usages: Arc<Vec<&'static str>>,
) -> anyhow::Result<()> {
    debug!("handling help command");

    services
        .replier
        .send_markdown(&ctx.room_id, &format_help(ctx.prefix, &usages))
        .await
}
