//! Player update command.
//!
//! Asks the API to track the player again, creating it when it is unknown.

use std::sync::Arc;

use futures::FutureExt;
use log::{debug, info};

use crate::commands::{
    Services,
    actions::{api_error, username_arg},
    command::CommandSpec,
    context::InvocationContext,
    markdown_response::format_player_updated,
};

const USAGE: &str = "update <username>";

pub fn command() -> CommandSpec {
    CommandSpec::new(
        "update",
        USAGE,
        |ctx| ctx.is_command("update"),
        |ctx, services| execute(ctx, services).boxed(),
    )
}

async fn execute(ctx: Arc<InvocationContext>, services: Arc<Services>) -> anyhow::Result<()> {
    let username = username_arg(&ctx, 0, USAGE)?;
    debug!("handling update command for {}", username);

    let player = services
        .api
        .track_player(&username)
        .await
        .map_err(|e| api_error(e, &username))?;

    info!("{} updated by {}", player, ctx.sender_id);

    services
        .replier
        .send_markdown(&ctx.room_id, &format_player_updated(&player))
        .await
}
