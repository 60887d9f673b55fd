//! Command actions.
//!
//! Each submodule builds one [`CommandSpec`](crate::commands::command::CommandSpec)
//! and holds the routine executing it. Actions never check permissions
//! themselves: the dispatcher applies the gates declared on the spec before
//! calling them.
//!
//! # Action Pattern
//!
//! Actions follow a consistent pattern:
//! 1. Read and validate arguments from the [`InvocationContext`]
//! 2. Call the player tracking API or the room configuration store
//! 3. Reply in the room through the [`Replier`](crate::commands::Replier)
//!
//! Invalid input and API rejections become [`CommandError`]s; anything else
//! is returned as is for the bot to log.

use log::debug;

use crate::{
    commands::{context::InvocationContext, error::CommandError, registry::CommandRegistry},
    wom::WomError,
};

mod achievements;
mod delete_player;
mod gains;
mod group;
mod help;
mod player;
mod records;
mod set_country;
mod setup;
mod update;

/// Builds the registry of every command the bot answers to.
pub fn default_registry() -> CommandRegistry {
    let commands = vec![
        player::command(),
        update::command(),
        gains::command(),
        records::command(),
        achievements::command(),
        delete_player::command(),
        set_country::command(),
        setup::command(),
        group::command(),
    ];

    let mut usages = vec![help::USAGE];
    usages.extend(commands.iter().map(|command| command.usage));

    let mut registry = CommandRegistry::new();
    registry.register(help::command(usages));
    for command in commands {
        registry.register(command);
    }

    registry
}

/// Reads a username spanning every argument from `skip` onwards.
fn username_arg(ctx: &InvocationContext, skip: usize, usage: &str) -> Result<String, CommandError> {
    let username = ctx
        .args
        .iter()
        .skip(skip)
        .map(String::as_str)
        .collect::<Vec<&str>>()
        .join(" ");

    if username.is_empty() {
        debug!("missing username in {:?}", ctx.raw);
        return Err(invalid_usage("Invalid username.", ctx.prefix, usage));
    }

    Ok(username)
}

/// Reads a username followed by an optional lower-case option.
///
/// The last argument is taken as the option only when `is_option` accepts it
/// and a username remains before it.
fn username_and_option(
    ctx: &InvocationContext,
    usage: &str,
    is_option: fn(&str) -> bool,
    default: &str,
) -> Result<(String, String), CommandError> {
    let mut args: Vec<&str> = ctx.args.iter().map(String::as_str).collect();

    let has_option =
        args.len() > 1 && args.last().is_some_and(|last| is_option(&last.to_lowercase()));
    let option = match has_option {
        true => args.pop().map(str::to_lowercase).unwrap_or_default(),
        false => default.to_string(),
    };

    let username = args.join(" ");
    if username.is_empty() {
        debug!("missing username in {:?}", ctx.raw);
        return Err(invalid_usage("Invalid username.", ctx.prefix, usage));
    }

    Ok((username, option))
}

fn invalid_usage(message: &str, prefix: char, usage: &str) -> CommandError {
    CommandError::new(message).with_tip(&format!("Usage: {}{}", prefix, usage))
}

/// Converts an API failure into the error returned by an action.
///
/// Rejections the user can act on are reported in the room, the rest is an
/// infrastructure failure.
fn api_error(error: WomError, username: &str) -> anyhow::Error {
    if error.is_not_found() {
        return CommandError::new("Player not found.")
            .with_tip(&format!("Check the spelling of \"{}\".", username))
            .into();
    }

    match error {
        WomError::Status { status, message } if (400..500).contains(&status) => {
            CommandError::new(&message).into()
        }
        WomError::MissingAdminPassword => {
            CommandError::new("That command is disabled on this bot.")
                .with_tip("The admin password is not configured.")
                .into()
        }
        e => anyhow::Error::new(e),
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::sync::Arc;

    use mockall::predicate;

    use crate::{
        commands::{
            Services,
            notice::{MockReplier, Notice},
        },
        servers::MockServerConfigStore,
        wom::MockPlayerApi,
    };

    pub fn services(
        replier: MockReplier,
        api: MockPlayerApi,
        servers: MockServerConfigStore,
    ) -> Arc<Services> {
        Arc::new(Services {
            replier: Arc::new(replier),
            api: Arc::new(api),
            servers: Arc::new(servers),
            site_url: "https://example.com".to_string(),
            achievements_limit: 5,
        })
    }

    pub fn expect_markdown(replier: &mut MockReplier, check: fn(&str) -> bool) {
        replier
            .expect_send_markdown()
            .withf(move |room_id, body| room_id == "!room:example.com" && check(body))
            .times(1)
            .returning(|_, _| Ok(()));
    }

    pub fn expect_notice(replier: &mut MockReplier, notice: Notice) {
        replier
            .expect_send_notice()
            .with(predicate::eq("!room:example.com"), predicate::eq(notice))
            .times(1)
            .returning(|_, _| Ok(()));
    }
}
