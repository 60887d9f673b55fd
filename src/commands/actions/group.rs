//! Group details command.
//!
//! Shows the group linked to the room. The dispatcher attaches the room
//! configuration when group gating is enabled; otherwise it is looked up here.

use std::sync::Arc;

use futures::FutureExt;
use log::debug;

use crate::commands::{
    Services, command::CommandSpec, context::InvocationContext, error::CommandError,
    markdown_response::format_group,
};

const USAGE: &str = "group";

pub fn command() -> CommandSpec {
    CommandSpec::new(
        "group",
        USAGE,
        |ctx| ctx.is_command("group"),
        |ctx, services| execute(ctx, services).boxed(),
    )
    .group_config()
}

async fn execute(ctx: Arc<InvocationContext>, services: Arc<Services>) -> anyhow::Result<()> {
    debug!("handling group command in {}", ctx.room_id);

    let server = match &ctx.server {
        Some(server) => Some(server.clone()),
        None => services.servers.get_server(&ctx.room_id).await?,
    };

    let Some(server) = server.filter(|server| server.is_configured()) else {
        return Err(CommandError::new("This room has no group configured.")
            .with_tip(&format!("Start the setup process with {}setup", ctx.prefix))
            .into());
    };

    services
        .replier
        .send_markdown(&ctx.room_id, &format_group(&services.site_url, server.group_id))
        .await
}
