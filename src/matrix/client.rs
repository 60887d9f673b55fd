//! Matrix client wrapper for bot messaging and synchronization.
//!
//! [`MatrixClient`] wraps the Matrix SDK client, runs the sync loop and sends
//! replies. It implements [`Replier`] so commands can answer without knowing
//! about Matrix.

use std::path::Path;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use log::{debug, error, info};
use matrix_sdk::{
    Client,
    ruma::{RoomId, events::room::message::RoomMessageEventContent},
};

use crate::{
    commands::{InboundMessage, Notice, Replier},
    matrix::{UserCredentials, login::setup_client, session::MatrixSession, sync::MatrixSync},
};

/// Display name of the bot account.
const DISPLAY_NAME: &str = "wombot";

pub struct MatrixClient {
    /// Synchronization service for handling real-time events
    matrix_sync: MatrixSync,
    /// Underlying Matrix SDK client
    client: Client,
}

impl MatrixClient {
    /// Logs in, or restores the session persisted in `data_path`, and prepares
    /// the sync service.
    ///
    /// # Errors
    ///
    /// Returns an error if the user id is invalid or if login fails.
    pub async fn new(
        user_credentials: &UserCredentials,
        data_path: &Path,
    ) -> Result<Self, anyhow::Error> {
        let matrix_session = MatrixSession::new(data_path).await;

        let client = setup_client(user_credentials, &matrix_session)
            .await
            .context("failed to setup matrix client")?;

        client.account().set_display_name(Some(DISPLAY_NAME)).await?;

        let matrix_sync = MatrixSync::new(&client, &matrix_session);

        Ok(MatrixClient {
            matrix_sync,
            client,
        })
    }

    /// Matrix user id of the bot.
    pub fn user_id(&self) -> Option<String> {
        self.client.user_id().map(|user_id| user_id.to_string())
    }

    /// Runs the sync loop, invoking `on_message` for each text message.
    ///
    /// Only returns when the sync loop stops.
    pub async fn sync<F>(&self, on_message: F)
    where
        F: Fn(InboundMessage) + Send + Sync + 'static,
    {
        match self.matrix_sync.sync(on_message).await {
            Ok(_) => info!("matrix sync ended successfully"),
            Err(e) => error!("matrix sync ended with error: {:?}", e),
        }
    }

    async fn send(&self, room_id: &str, content: RoomMessageEventContent) -> anyhow::Result<()> {
        let room_id = RoomId::parse(room_id)?;

        let room = self
            .client
            .get_room(&room_id)
            .ok_or_else(|| anyhow!("room {} is not known", room_id))?;
        room.send(content).await?;

        debug!("message sent to {}", room_id);
        Ok(())
    }
}

#[async_trait]
impl Replier for MatrixClient {
    async fn send_notice(&self, room_id: &str, notice: &Notice) -> anyhow::Result<()> {
        let content = RoomMessageEventContent::notice_html(notice.plain(), notice.html());
        self.send(room_id, content).await
    }

    async fn send_markdown(&self, room_id: &str, body: &str) -> anyhow::Result<()> {
        let content = RoomMessageEventContent::notice_markdown(body);
        self.send(room_id, content).await
    }
}
