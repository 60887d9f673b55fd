//! Player details command.

use std::sync::Arc;

use futures::FutureExt;
use log::debug;

use crate::commands::{
    Services,
    actions::{api_error, username_arg},
    command::CommandSpec,
    context::InvocationContext,
    markdown_response::format_player,
};

const USAGE: &str = "player <username>";

pub fn command() -> CommandSpec {
    CommandSpec::new(
        "player",
        USAGE,
        |ctx| ctx.is_command("player"),
        |ctx, services| execute(ctx, services).boxed(),
    )
}

async fn execute(ctx: Arc<InvocationContext>, services: Arc<Services>) -> anyhow::Result<()> {
    let username = username_arg(&ctx, 0, USAGE)?;
    debug!("handling player command for {}", username);

    let player = services
        .api
        .fetch_player(&username)
        .await
        .map_err(|e| api_error(e, &username))?;

    services
        .replier
        .send_markdown(&ctx.room_id, &format_player(&player))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        commands::{
            actions::test_utils::{expect_markdown, services},
            context::test_utils::context,
            error::CommandError,
            markdown_response::test_utils::player,
            notice::MockReplier,
        },
        servers::MockServerConfigStore,
        wom::{MockPlayerApi, WomError},
    };
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_player_replies_summary() {
        let mut api = MockPlayerApi::new();
        api.expect_fetch_player()
            .with(eq("Lynx Titan"))
            .times(1)
            .returning(|_| Ok(player("Lynx Titan")));
        let mut replier = MockReplier::new();
        expect_markdown(&mut replier, |body| body.starts_with("**Lynx Titan**"));

        command()
            .execute(
                Arc::new(context("player", &["Lynx", "Titan"])),
                services(replier, api, MockServerConfigStore::new()),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_player_without_username() {
        let mut api = MockPlayerApi::new();
        api.expect_fetch_player().times(0);

        let error = command()
            .execute(
                Arc::new(context("player", &[])),
                services(MockReplier::new(), api, MockServerConfigStore::new()),
            )
            .await
            .unwrap_err();

        assert_eq!(
            error.downcast_ref::<CommandError>().unwrap().message,
            "Invalid username."
        );
    }

    #[tokio::test]
    async fn test_player_not_found() {
        let mut api = MockPlayerApi::new();
        api.expect_fetch_player().returning(|_| {
            Err(WomError::Status {
                status: 404,
                message: "Player not found.".to_string(),
            })
        });

        let error = command()
            .execute(
                Arc::new(context("player", &["nobody"])),
                services(MockReplier::new(), api, MockServerConfigStore::new()),
            )
            .await
            .unwrap_err();

        assert_eq!(
            error.downcast_ref::<CommandError>().unwrap().message,
            "Player not found."
        );
    }
}
