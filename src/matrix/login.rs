//! Matrix client creation.
//!
//! Logs in with the account password on the first start and restores the
//! persisted session on the following ones, so the bot keeps a single device.

use anyhow::Context;
use log::{debug, info};
use matrix_sdk::{Client, ruma::OwnedUserId};

use crate::matrix::{UserCredentials, session::MatrixSession};

/// Device name shown in the account sessions list.
const DEVICE_DISPLAY_NAME: &str = "wombot";

/// Returns a logged in client, restoring the persisted session when there is one.
pub async fn setup_client(
    user_credentials: &UserCredentials,
    matrix_session: &MatrixSession,
) -> anyhow::Result<Client> {
    match matrix_session.get_user_session() {
        Some(user_session) => {
            info!("restoring matrix session from disk");

            let client = build_client(user_credentials, matrix_session).await?;
            client.restore_session(user_session.clone()).await?;

            info!("matrix session restored");
            Ok(client)
        }
        None => create_session(user_credentials, matrix_session).await,
    }
}

async fn build_client(
    user_credentials: &UserCredentials,
    matrix_session: &MatrixSession,
) -> anyhow::Result<Client> {
    let user_id: OwnedUserId = user_credentials.user_id.clone().try_into()?;

    let client = Client::builder()
        .server_name(user_id.server_name())
        .sqlite_store(matrix_session.get_sqlite_path(), None)
        .build()
        .await?;

    debug!("matrix client created for {}", user_id);
    Ok(client)
}

async fn create_session(
    user_credentials: &UserCredentials,
    matrix_session: &MatrixSession,
) -> anyhow::Result<Client> {
    info!("logging in as {}", user_credentials.user_id);

    let client = build_client(user_credentials, matrix_session).await?;
    let user_id: OwnedUserId = user_credentials.user_id.clone().try_into()?;

    client
        .matrix_auth()
        .login_username(user_id, &user_credentials.password)
        .initial_device_display_name(DEVICE_DISPLAY_NAME)
        .send()
        .await?;

    let user_session = client
        .matrix_auth()
        .session()
        .context("no session after login")?;
    matrix_session
        .persist_user_session(&user_session)
        .await
        .context("error persisting user session")?;

    info!("matrix login complete");
    Ok(client)
}
