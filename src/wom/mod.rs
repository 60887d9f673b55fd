//! Player tracking API client.
//!
//! A stateless HTTP wrapper around the Wise Old Man API. Every call returns
//! typed responses with timestamps already parsed.
//!
//! # Modules
//!
//! - `metrics` - Periods and metrics accepted by the API
//! - `requester` - HTTP client and the [`PlayerApi`] trait commands depend on
//! - `response_structs` - Deserialized API responses
//!
//! # Examples
//!
//! ```no_run
//! use wombot::wom::{PlayerApi, WomRequester};
//!
//! # async fn example() -> Result<(), wombot::wom::WomError> {
//! let requester = WomRequester::new("https://api.wiseoldman.net/v2", None, None);
//! let player = requester.fetch_player("zezima").await?;
//! println!("{}", player);
//! # Ok(())
//! # }
//! ```

use std::fmt;

pub mod metrics;
mod requester;
mod response_structs;

#[cfg(test)]
pub use crate::wom::requester::MockPlayerApi;
pub use crate::wom::{
    requester::{PlayerApi, WomRequester},
    response_structs::{
        MessageResponse, Player, PlayerAchievement, PlayerGains, PlayerRecord,
    },
};

/// Errors returned by the player tracking API client.
#[derive(Debug)]
pub enum WomError {
    /// The request could not be sent or its body could not be read
    Http(reqwest::Error),
    /// The API answered with a non success status
    Status { status: u16, message: String },
    /// The response body did not have the expected shape
    Decode(serde_json::Error),
    /// An administrative call was made without a configured admin password
    MissingAdminPassword,
}

impl WomError {
    /// Returns true if the API reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WomError::Status { status: 404, .. })
    }
}

impl fmt::Display for WomError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WomError::Http(e) => write!(f, "request failed: {}", e),
            WomError::Status { status, message } => {
                write!(f, "api responded {}: {}", status, message)
            }
            WomError::Decode(e) => write!(f, "unexpected response: {}", e),
            WomError::MissingAdminPassword => write!(f, "admin password is not configured"),
        }
    }
}

impl std::error::Error for WomError {}

impl From<reqwest::Error> for WomError {
    fn from(e: reqwest::Error) -> Self {
        WomError::Http(e)
    }
}
