//! Player records command.
//!
//! Records are sent in pages. Paging needs the bot to manage messages in the
//! room, which the dispatcher checks before running the command.

use std::sync::Arc;

use futures::FutureExt;
use log::debug;

use crate::{
    commands::{
        Services,
        actions::{api_error, username_and_option},
        command::CommandSpec,
        context::InvocationContext,
        error::CommandError,
        markdown_response::format_records_page,
    },
    wom::metrics::is_metric,
};

const USAGE: &str = "records <username> [metric]";
const DEFAULT_METRIC: &str = "overall";
const RECORDS_PER_PAGE: usize = 5;

pub fn command() -> CommandSpec {
    CommandSpec::new(
        "records",
        USAGE,
        |ctx| ctx.is_command("records"),
        |ctx, services| execute(ctx, services).boxed(),
    )
    .paginated()
}

async fn execute(ctx: Arc<InvocationContext>, services: Arc<Services>) -> anyhow::Result<()> {
    let (username, metric) = username_and_option(&ctx, USAGE, is_metric, DEFAULT_METRIC)?;
    debug!("handling records command for {} in {}", username, metric);

    let records = services
        .api
        .fetch_player_records(&username, &metric)
        .await
        .map_err(|e| api_error(e, &username))?;

    if records.is_empty() {
        return Err(CommandError::new(&format!(
            "{} has no {} records.",
            username, metric
        ))
        .into());
    }

    let pages = records.len().div_ceil(RECORDS_PER_PAGE);
    for (index, page) in records.chunks(RECORDS_PER_PAGE).enumerate() {
        let body = format_records_page(&username, &metric, page, index + 1, pages);
        services.replier.send_markdown(&ctx.room_id, &body).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        commands::{
            actions::test_utils::services, context::test_utils::context,
            markdown_response::test_utils::record, notice::MockReplier,
        },
        servers::MockServerConfigStore,
        wom::MockPlayerApi,
    };
    use mockall::{Sequence, predicate::eq};

    #[test]
    fn test_records_requires_pagination() {
        assert!(command().requires_pagination);
    }

    #[tokio::test]
    async fn test_records_sent_in_pages() {
        let mut api = MockPlayerApi::new();
        api.expect_fetch_player_records()
            .with(eq("zezima"), eq("zulrah"))
            .times(1)
            .returning(|_, _| {
                Ok(["five_min", "day", "week", "month", "year", "day"]
                    .iter()
                    .map(|period| record(period, 10.0))
                    .collect())
            });

        let mut replier = MockReplier::new();
        let mut sequence = Sequence::new();
        replier
            .expect_send_markdown()
            .withf(|_, body| body.ends_with("*Page 1/2*"))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(()));
        replier
            .expect_send_markdown()
            .withf(|_, body| body.ends_with("*Page 2/2*"))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(()));

        command()
            .execute(
                Arc::new(context("records", &["zezima", "zulrah"])),
                services(replier, api, MockServerConfigStore::new()),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_records_default_metric() {
        let mut api = MockPlayerApi::new();
        api.expect_fetch_player_records()
            .with(eq("Lynx Titan"), eq("overall"))
            .times(1)
            .returning(|_, _| Ok(vec![record("day", 10.0)]));
        let mut replier = MockReplier::new();
        replier
            .expect_send_markdown()
            .times(1)
            .returning(|_, _| Ok(()));

        command()
            .execute(
                Arc::new(context("records", &["Lynx", "Titan"])),
                services(replier, api, MockServerConfigStore::new()),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_records_empty_is_reported() {
        let mut api = MockPlayerApi::new();
        api.expect_fetch_player_records()
            .returning(|_, _| Ok(Vec::new()));

        let error = command()
            .execute(
                Arc::new(context("records", &["zezima"])),
                services(MockReplier::new(), api, MockServerConfigStore::new()),
            )
            .await
            .unwrap_err();

        assert_eq!(
            error.downcast_ref::<CommandError>().unwrap().message,
            "zezima has no overall records."
        );
    }
}
