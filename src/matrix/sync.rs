//! Matrix client synchronization and event handling.
//!
//! The [`MatrixSync::sync`] method:
//! 1. Performs an initial sync to catch up on offline events (especially invites)
//! 2. Sets up event handlers for auto-joining rooms and message processing
//! 3. Enters a continuous sync loop with automatic token persistence
//!
//! Each text message is handed over as an [`InboundMessage`], with the
//! capabilities of the sender and of the bot read from the room power levels
//! at that moment.

use std::sync::Arc;

use anyhow::Result;
use log::{error, info, warn};
use matrix_sdk::{
    Client, LoopCtrl, Room, RoomState,
    config::SyncSettings,
    ruma::{
        UserId,
        api::client::filter::FilterDefinition,
        events::{
            StateEventType,
            room::{
                member::StrippedRoomMemberEvent,
                message::{MessageType, OriginalSyncRoomMessageEvent},
                power_levels::RoomPowerLevels,
            },
        },
    },
};
use tokio::time::{Duration, sleep};

use crate::{
    commands::{InboundMessage, Member, PermissionCapability},
    matrix::session::MatrixSession,
};

/// Delay before retrying a failed initial sync.
const INITIAL_SYNC_RETRY_SECS: u64 = 5;

pub struct MatrixSync {
    client: Client,
    session: MatrixSession,
}

impl MatrixSync {
    pub fn new(client: &Client, session: &MatrixSession) -> Self {
        MatrixSync {
            client: client.to_owned(),
            session: session.to_owned(),
        }
    }

    /// Starts the synchronization process and enters an infinite loop.
    ///
    /// Messages sent while the bot was offline are skipped: the message
    /// handler is only registered once the initial sync is done.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync loop encounters a fatal error. Sync token
    /// persistence errors are logged and do not stop the loop.
    pub async fn sync<F>(&self, on_message: F) -> Result<()>
    where
        F: Fn(InboundMessage) + Send + Sync + 'static,
    {
        info!("start syncing");

        self.client.add_event_handler(auto_join_rooms);

        // See <https://spec.matrix.org/v1.6/client-server-api/#lazy-loading-room-members>.
        let filter = FilterDefinition::with_lazy_loading();
        let mut sync_settings = SyncSettings::default().filter(filter.into());

        if let Some(sync_token) = self.session.get_sync_token() {
            sync_settings = sync_settings.token(sync_token);
        }

        let response = loop {
            match self.client.sync_once(sync_settings.clone()).await {
                Ok(response) => break response,
                Err(e) => {
                    error!("initial sync failed ({e}), retrying in {INITIAL_SYNC_RETRY_SECS}s");
                    sleep(Duration::from_secs(INITIAL_SYNC_RETRY_SECS)).await;
                }
            }
        };

        if let Err(e) = self
            .session
            .persist_sync_token(response.next_batch.clone())
            .await
        {
            error!("failed to persist sync token: {:?}", e);
        }

        let on_message = Arc::new(on_message);
        self.client.add_event_handler({
            let on_message = Arc::clone(&on_message);
            move |event: OriginalSyncRoomMessageEvent, room: Room, client: Client| async move {
                on_room_message(event, room, client, &on_message).await
            }
        });

        sync_settings = sync_settings.token(response.next_batch);

        self.client
            .sync_with_result_callback(sync_settings, |sync_result| async move {
                let response = sync_result?;

                if let Err(e) = self.session.persist_sync_token(response.next_batch).await {
                    error!("failed to persist sync token: {:?}", e);
                }

                Ok(LoopCtrl::Continue)
            })
            .await?;

        Ok(())
    }
}

/// Automatically joins rooms when the bot receives an invitation.
///
/// Joining is retried with an increasing delay, see
/// <https://github.com/matrix-org/synapse/issues/4345>.
async fn auto_join_rooms(room_member: StrippedRoomMemberEvent, client: Client, room: Room) {
    let Some(user_id) = client.user_id() else {
        warn!("could not get user id from client");
        return;
    };

    if room_member.state_key != user_id {
        return;
    }

    tokio::spawn(async move {
        info!("auto joining room {}", room.room_id());
        let mut delay = 2;

        while let Err(err) = room.join().await {
            error!(
                "failed to join room {} ({err:?}), retrying in {delay}s",
                room.room_id()
            );

            sleep(Duration::from_secs(delay)).await;
            delay *= 2;

            if delay > 3600 {
                error!("can't join room {} ({err:?})", room.room_id());
                return;
            }
        }
        info!("successfully joined room {}", room.room_id());
    });
}

async fn on_room_message<F>(
    event: OriginalSyncRoomMessageEvent,
    room: Room,
    client: Client,
    on_message: &Arc<F>,
) where
    F: Fn(InboundMessage) + Send + Sync + 'static,
{
    if room.state() != RoomState::Joined {
        return;
    }

    let MessageType::Text(text_content) = event.content.msgtype else {
        return;
    };

    let power_levels = match room.power_levels().await {
        Ok(power_levels) => Some(power_levels),
        Err(e) => {
            warn!("failed to read power levels of {}: {:?}", room.room_id(), e);
            None
        }
    };

    let sender = power_levels
        .as_ref()
        .map(|power_levels| member(power_levels, &event.sender));
    let bot_member = match (power_levels.as_ref(), client.user_id()) {
        (Some(power_levels), Some(bot_id)) => Some(member(power_levels, bot_id)),
        _ => None,
    };

    on_message(InboundMessage {
        body: text_content.body,
        sender_id: event.sender.to_string(),
        room_id: room.room_id().to_string(),
        event_id: event.event_id.to_string(),
        sender,
        bot_member,
    });
}

/// Snapshot of a member's capabilities from the room power levels.
///
/// Administrators are members allowed to change the power levels themselves.
fn member(power_levels: &RoomPowerLevels, user_id: &UserId) -> Member {
    let mut capabilities = Vec::new();

    if power_levels.user_can_send_state(user_id, StateEventType::RoomPowerLevels) {
        capabilities.push(PermissionCapability::IsAdministrator);
    }
    if power_levels.user_can_redact_event_of_other(user_id) {
        capabilities.push(PermissionCapability::CanManageMessages);
    }

    Member::new(user_id.as_str(), &capabilities)
}
