//! Player achievements command.

use std::sync::Arc;

use futures::FutureExt;
use log::debug;

use crate::commands::{
    Services,
    actions::{api_error, username_arg},
    command::CommandSpec,
    context::InvocationContext,
    markdown_response::format_achievements,
};

const USAGE: &str = "achievements <username>";

pub fn command() -> CommandSpec {
    CommandSpec::new(
        "achievements",
        USAGE,
        |ctx| ctx.is_command("achievements"),
        |ctx, services| execute(ctx, services).boxed(),
    )
}

async fn execute(ctx: Arc<InvocationContext>, services: Arc<Services>) -> anyhow::Result<()> {
    let username = username_arg(&ctx, 0, USAGE)?;
    debug!("handling achievements command for {}", username);

    let achievements = services
        .api
        .fetch_player_achievements(&username, services.achievements_limit)
        .await
        .map_err(|e| api_error(e, &username))?;

    services
        .replier
        .send_markdown(&ctx.room_id, &format_achievements(&username, &achievements))
        .await
}
