//! Player country command, restricted to room administrators.

use std::sync::Arc;

use futures::FutureExt;
use log::{debug, info};

use crate::commands::{
    Services,
    actions::{api_error, invalid_usage, username_arg},
    command::CommandSpec,
    context::InvocationContext,
    notice::Notice,
};

const USAGE: &str = "set-country <country> <username>";

pub fn command() -> CommandSpec {
    CommandSpec::new(
        "set-country",
        USAGE,
        |ctx| ctx.is_command("set-country"),
        |ctx, services| execute(ctx, services).boxed(),
    )
    .admin()
}

async fn execute(ctx: Arc<InvocationContext>, services: Arc<Services>) -> anyhow::Result<()> {
    let Some(country) = ctx.args.first().map(|c| c.to_uppercase()) else {
        return Err(invalid_usage("Invalid country.", ctx.prefix, USAGE).into());
    };
    let username = username_arg(&ctx, 1, USAGE)?;
    debug!("handling set-country command for {} to {}", username, country);

    let response = services
        .api
        .update_country(&username, &country)
        .await
        .map_err(|e| api_error(e, &username))?;

    info!("country of {} set to {} by {}", username, country, ctx.sender_id);

    services
        .replier
        .send_notice(&ctx.room_id, &Notice::success(&response.message))
        .await
}
