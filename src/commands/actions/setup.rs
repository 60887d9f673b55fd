//! Room setup command, restricted to room administrators.
//!
//! Links the room to a player group so group commands can be used.

use std::sync::Arc;

use futures::FutureExt;
use log::{debug, info};

use crate::commands::{
    Services, actions::invalid_usage, command::CommandSpec, context::InvocationContext,
    notice::Notice,
};

const USAGE: &str = "setup <group_id>";

pub fn command() -> CommandSpec {
    CommandSpec::new(
        "setup",
        USAGE,
        |ctx| ctx.is_command("setup"),
        |ctx, services| execute(ctx, services).boxed(),
    )
    .admin()
}

async fn execute(ctx: Arc<InvocationContext>, services: Arc<Services>) -> anyhow::Result<()> {
    let group_id = match ctx.args.first().map(|arg| arg.parse::<i64>()) {
        Some(Ok(group_id)) if group_id > 0 => group_id,
        _ => return Err(invalid_usage("Invalid group id.", ctx.prefix, USAGE).into()),
    };
    debug!("handling setup command for group {}", group_id);

    services.servers.set_group(&ctx.room_id, group_id).await?;
    info!("{} linked {} to group {}", ctx.sender_id, ctx.room_id, group_id);

    services
        .replier
        .send_notice(
            &ctx.room_id,
            &Notice::success(&format!("This room is now linked to group {}.", group_id)),
        )
        .await
}
