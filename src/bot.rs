//! Bot wiring.
//!
//! The [`Bot`] connects the Matrix client to the command [`Dispatcher`]. Every
//! message received during sync is dispatched in its own task, so a slow
//! command never holds up the sync loop.
//!
//! # Message Flow
//!
//! ```text
//! Matrix sync → InboundMessage → Dispatcher → command tasks → replies
//!                                                   │
//!                                                   └─ failures logged here
//! ```
//!
//! # Example
//!
//! ```no_run
//! # use wombot::bot::Bot;
//! # use wombot::config::Config;
//! # async fn run() -> Result<(), anyhow::Error> {
//! let config = Config::load("config.yaml")?;
//!
//! let bot = Bot::new(config, "./data").await?;
//! bot.start().await; // Runs indefinitely
//! # Ok(())
//! # }
//! ```

use std::{path::Path, sync::Arc};

use log::{error, info};
use tokio::fs;

use crate::{
    commands::{
        Dispatcher, EligibilityPolicy, InboundMessage, MessageParser, Replier, Services,
        default_registry,
    },
    config::Config,
    matrix::{MatrixClient, UserCredentials},
    servers::ServerConfigs,
    wom::WomRequester,
};

/// File of the data directory holding room configurations.
const SERVERS_FILE: &str = "servers.json";

pub struct Bot {
    matrix_client: Arc<MatrixClient>,
    dispatcher: Arc<Dispatcher>,
}

impl Bot {
    /// Creates the bot: logs into Matrix and builds the dispatcher.
    ///
    /// # Arguments
    ///
    /// * `config` - Loaded configuration
    /// * `data_path` - Directory holding the Matrix session and room configurations
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or if the
    /// Matrix login fails.
    pub async fn new(config: Config, data_path: &str) -> Result<Self, anyhow::Error> {
        let data_path = Path::new(data_path);
        fs::create_dir_all(data_path).await?;

        let requester = WomRequester::new(
            &config.wom.url,
            config.wom.api_key.as_deref(),
            config.wom.admin_password.as_deref(),
        );

        let servers =
            ServerConfigs::new(data_path.join(SERVERS_FILE).to_string_lossy().to_string()).await;

        let matrix_client = Arc::new(
            MatrixClient::new(
                &UserCredentials {
                    user_id: config.matrix.user_id.clone(),
                    password: config.matrix.password,
                },
                data_path,
            )
            .await?,
        );

        let replier: Arc<dyn Replier> = matrix_client.clone();
        let services = Arc::new(Services {
            replier,
            api: Arc::new(requester),
            servers: Arc::new(servers),
            site_url: config.wom.site_url,
            achievements_limit: config.wom.achievements_limit,
        });

        let parser = MessageParser::new(EligibilityPolicy {
            prefix: config.dispatch.prefix,
            bot_user_id: matrix_client.user_id().unwrap_or(config.matrix.user_id),
            allowed_rooms: config.dispatch.allowed_rooms.into_iter().collect(),
        });

        let dispatcher = Arc::new(Dispatcher::new(
            parser,
            default_registry(),
            services,
            config.dispatch.require_group_config,
        ));

        Ok(Bot {
            matrix_client,
            dispatcher,
        })
    }

    /// Starts the Matrix sync loop and dispatches every received message.
    ///
    /// Runs until the sync loop stops.
    pub async fn start(self) {
        info!("bot started");

        let dispatcher = Arc::clone(&self.dispatcher);
        let on_message = move |message: InboundMessage| {
            tokio::spawn(handle_message(Arc::clone(&dispatcher), message));
        };

        self.matrix_client.sync(on_message).await;
    }
}

/// Dispatches a message and logs the failures of the commands it started.
async fn handle_message(dispatcher: Arc<Dispatcher>, message: InboundMessage) {
    for task in dispatcher.dispatch(&message).await {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("{:#}", e),
            Err(e) => error!("command task did not complete: {}", e),
        }
    }
}
