//! Matrix session persistence.
//!
//! The data directory holds:
//! - `session`: JSON file with the login session and the last sync token
//! - `sqlite`: SQLite store used by the Matrix SDK

use std::path::{Path, PathBuf};

use log::{debug, trace};
use matrix_sdk::authentication::matrix;
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Session {
    user_session: matrix::MatrixSession,
    #[serde(skip_serializing_if = "Option::is_none")]
    sync_token: Option<String>,
}

/// Matrix session stored in the data directory.
#[derive(Clone)]
pub struct MatrixSession {
    /// Session loaded at startup, if any
    session: Option<Session>,
    sqlite_path: PathBuf,
    session_path: PathBuf,
}

impl MatrixSession {
    /// Reads the session stored in `dir_path`.
    ///
    /// A missing or invalid session file is not an error: the bot then logs
    /// in again and overwrites it.
    pub async fn new(dir_path: &Path) -> Self {
        let sqlite_path = dir_path.join("sqlite");
        let session_path = dir_path.join("session");

        let session = match read_session(&session_path).await {
            Ok(session) => Some(session),
            Err(e) => {
                debug!("no usable session at {}: {}", session_path.display(), e);
                None
            }
        };

        MatrixSession {
            session,
            sqlite_path,
            session_path,
        }
    }

    pub fn get_sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    pub fn get_user_session(&self) -> Option<&matrix::MatrixSession> {
        self.session.as_ref().map(|s| &s.user_session)
    }

    pub fn get_sync_token(&self) -> Option<String> {
        self.session.as_ref().and_then(|s| s.sync_token.clone())
    }

    /// Stores the sync token next to the persisted user session.
    pub async fn persist_sync_token(&self, sync_token: String) -> anyhow::Result<()> {
        trace!("persist sync token {}", sync_token);

        let mut session = read_session(&self.session_path).await?;
        session.sync_token = Some(sync_token);
        fs::write(&self.session_path, serde_json::to_string(&session)?).await?;

        Ok(())
    }

    /// Stores a new user session, dropping any previous sync token.
    pub async fn persist_user_session(
        &self,
        user_session: &matrix::MatrixSession,
    ) -> anyhow::Result<()> {
        trace!("persist user session");

        let session = Session {
            user_session: user_session.clone(),
            sync_token: None,
        };
        fs::write(&self.session_path, serde_json::to_string(&session)?).await?;

        Ok(())
    }
}

async fn read_session(session_path: &Path) -> anyhow::Result<Session> {
    let serialized = fs::read_to_string(session_path).await?;
    Ok(serde_json::from_str(&serialized)?)
}
