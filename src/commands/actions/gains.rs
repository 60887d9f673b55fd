//! Player gains command.

use std::sync::Arc;

use futures::FutureExt;
use log::debug;

use crate::{
    commands::{
        Services,
        actions::{api_error, username_and_option},
        command::CommandSpec,
        context::InvocationContext,
        markdown_response::format_gains,
    },
    wom::metrics::is_period,
};

const USAGE: &str = "gains <username> [period]";
const DEFAULT_PERIOD: &str = "week";

pub fn command() -> CommandSpec {
    CommandSpec::new(
        "gains",
        USAGE,
        |ctx| ctx.is_command("gains"),
        |ctx, services| execute(ctx, services).boxed(),
    )
}

async fn execute(ctx: Arc<InvocationContext>, services: Arc<Services>) -> anyhow::Result<()> {
    let (username, period) = username_and_option(&ctx, USAGE, is_period, DEFAULT_PERIOD)?;
    debug!("handling gains command for {} over {}", username, period);

    let gains = services
        .api
        .fetch_player_gains(&username, &period)
        .await
        .map_err(|e| api_error(e, &username))?;

    services
        .replier
        .send_markdown(&ctx.room_id, &format_gains(&username, &period, &gains))
        .await
}
