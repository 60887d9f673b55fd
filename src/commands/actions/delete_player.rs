//! Player deletion command, restricted to room administrators.

use std::sync::Arc;

use futures::FutureExt;
use log::{debug, info};

use crate::commands::{
    Services,
    actions::{api_error, username_arg},
    command::CommandSpec,
    context::InvocationContext,
    notice::Notice,
};

const USAGE: &str = "delete-player <username>";

pub fn command() -> CommandSpec {
    CommandSpec::new(
        "delete-player",
        USAGE,
        |ctx| ctx.is_command("delete-player"),
        |ctx, services| execute(ctx, services).boxed(),
    )
    .admin()
}

async fn execute(ctx: Arc<InvocationContext>, services: Arc<Services>) -> anyhow::Result<()> {
    let username = username_arg(&ctx, 0, USAGE)?;
    debug!("handling delete-player command for {}", username);

    let response = services
        .api
        .delete_player(&username)
        .await
        .map_err(|e| api_error(e, &username))?;

    info!("player {} deleted by {}", username, ctx.sender_id);

    services
        .replier
        .send_notice(&ctx.room_id, &Notice::success(&response.message))
        .await
}
