//! Message dispatch.
//!
//! The [`Dispatcher`] is the entry point for every inbound message. It
//! validates and parses the message once, then evaluates every registered
//! command against it. Each activated command is gated and executed in its
//! own task, so commands triggered by the same message never affect each
//! other.
//!
//! # Flow
//!
//! ```text
//! InboundMessage → is_valid() → parse() → InvocationContext
//!                                              │
//!              ┌───────────────────────────────┼──────────────────┐
//!              ▼                               ▼                  ▼
//!        activated(ctx)?                 activated(ctx)?    activated(ctx)?
//!              │                               │
//!        admin / pagination / group gate      ...
//!              │
//!        execute(ctx) ── CommandError ──▶ ErrorReporter
//!              │
//!              └── other error ──▶ returned to the hosting process
//! ```

use std::sync::Arc;

use anyhow::Context;
use log::{debug, error, warn};
use tokio::task::JoinHandle;

use crate::{
    commands::{
        Services,
        command::CommandSpec,
        context::{InboundMessage, InvocationContext},
        error::CommandError,
        parser::MessageParser,
        permissions::{can_manage_messages, is_admin},
        registry::CommandRegistry,
        reporter::ErrorReporter,
    },
    servers::ServerConfig,
};

const ADMIN_REQUIRED: &str = "That command requires Admin permissions.";
const MANAGE_MESSAGES_REQUIRED: &str =
    "That command requires the bot to have \"Manage Messages\" permissions.";
const CONTACT_ADMIN_TIP: &str = "Contact your server administrator for help.";
const GROUP_REQUIRED: &str = "That command requires a group to be configured.";

const EASTER_EGG_COMMAND: &str = "ehp";
const EASTER_EGG_REPLY: &str = "Pls come back @dkvl";

/// Handle on one running command.
///
/// Resolves to the infrastructure error of the command, if any. User-facing
/// errors are already reported when the task completes.
pub type CommandTask = JoinHandle<anyhow::Result<()>>;

pub struct Dispatcher {
    parser: MessageParser,
    registry: CommandRegistry,
    services: Arc<Services>,
    reporter: ErrorReporter,
    /// Whether commands requiring a group are gated on the room configuration
    require_group_config: bool,
}

impl Dispatcher {
    pub fn new(
        parser: MessageParser,
        registry: CommandRegistry,
        services: Arc<Services>,
        require_group_config: bool,
    ) -> Self {
        let reporter = ErrorReporter::new(Arc::clone(&services.replier));
        Dispatcher {
            parser,
            registry,
            services,
            reporter,
            require_group_config,
        }
    }

    /// Dispatches a message to every command it activates.
    ///
    /// Commands are started in their own tasks and are not awaited: the
    /// returned handles let the caller observe their outcome without delaying
    /// the processing of the next message.
    pub async fn dispatch(&self, message: &InboundMessage) -> Vec<CommandTask> {
        if !self.parser.is_valid(message) {
            return Vec::new();
        }

        let ctx = self.parser.parse(message);

        let easter_egg = format!("{}{}", ctx.prefix, EASTER_EGG_COMMAND);
        if ctx.raw.trim_start().starts_with(&easter_egg)
            && let Err(e) = self
                .services
                .replier
                .send_markdown(&ctx.room_id, EASTER_EGG_REPLY)
                .await
        {
            warn!("failed to send easter egg: {:?}", e);
        }

        let activated: Vec<Arc<CommandSpec>> = self
            .registry
            .iter()
            .filter(|command| command.activated(&ctx))
            .cloned()
            .collect();

        if activated.is_empty() {
            return Vec::new();
        }

        debug!(
            "message {} activated {:?}",
            ctx.event_id,
            activated.iter().map(|c| c.name).collect::<Vec<_>>()
        );

        let ctx = if self.require_group_config && activated.iter().any(|c| c.requires_group_config)
        {
            let server = self.resolve_server(&ctx.room_id).await;
            ctx.with_server(server)
        } else {
            ctx
        };
        let ctx = Arc::new(ctx);

        activated
            .into_iter()
            .map(|command| {
                tokio::spawn(run_command(
                    command,
                    Arc::clone(&ctx),
                    Arc::clone(&self.services),
                    self.reporter.clone(),
                    self.require_group_config,
                ))
            })
            .collect()
    }

    async fn resolve_server(&self, room_id: &str) -> Option<ServerConfig> {
        match self.services.servers.get_server(room_id).await {
            Ok(server) => server,
            Err(e) => {
                error!("failed to load configuration of room {}: {:?}", room_id, e);
                None
            }
        }
    }
}

async fn run_command(
    command: Arc<CommandSpec>,
    ctx: Arc<InvocationContext>,
    services: Arc<Services>,
    reporter: ErrorReporter,
    require_group_config: bool,
) -> anyhow::Result<()> {
    if command.requires_admin && !is_admin(ctx.sender.as_ref()) {
        debug!("{} denied to {}", command.name, ctx.sender_id);
        reporter
            .on_error(&ctx.room_id, ADMIN_REQUIRED, Some(CONTACT_ADMIN_TIP))
            .await;
        return Ok(());
    }

    if command.requires_pagination && !can_manage_messages(ctx.bot_member.as_ref()) {
        debug!("{} needs to manage messages in {}", command.name, ctx.room_id);
        reporter
            .on_error(&ctx.room_id, MANAGE_MESSAGES_REQUIRED, Some(CONTACT_ADMIN_TIP))
            .await;
        return Ok(());
    }

    if require_group_config
        && command.requires_group_config
        && !ctx.server.as_ref().is_some_and(ServerConfig::is_configured)
    {
        debug!("{} needs a group in {}", command.name, ctx.room_id);
        let tip = format!("Start the setup process with {}setup", ctx.prefix);
        reporter
            .on_error(&ctx.room_id, GROUP_REQUIRED, Some(&tip))
            .await;
        return Ok(());
    }

    debug!("executing {} for {}", command.name, ctx.event_id);

    let Err(e) = command.execute(Arc::clone(&ctx), services).await else {
        return Ok(());
    };

    match e.downcast_ref::<CommandError>() {
        Some(command_error) => {
            debug!("{} failed: {}", command.name, command_error);
            reporter
                .on_error(
                    &ctx.room_id,
                    &command_error.message,
                    command_error.tip.as_deref(),
                )
                .await;
            Ok(())
        }
        None => Err(e).with_context(|| format!("command {} failed", command.name)),
    }
}
