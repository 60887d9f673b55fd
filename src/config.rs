//! Configuration file structures for the wombot.
//!
//! The configuration is read from a YAML file and can be overridden with
//! environment variables prefixed by `WOMBOT_`, using `__` to separate
//! sections.
//!
//! # Configuration File Format
//!
//! ```yaml
//! wom:
//!   url: "https://api.wiseoldman.net/v2"
//!   site_url: "https://wiseoldman.net"
//!   admin_password: "secret"
//!   achievements_limit: 5
//!
//! matrix:
//!   user_id: "@wombot:matrix.org"
//!   password: "your-password"
//!
//! dispatch:
//!   prefix: "!"
//!   allowed_rooms: []
//!   require_group_config: false
//! ```
//!
//! # Environment Variable Overrides
//!
//! ```bash
//! export WOMBOT_WOM__ADMIN_PASSWORD="secret-from-env"
//! export WOMBOT_MATRIX__PASSWORD="password-from-env"
//! ```

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Default website linked from bot replies.
pub const DEFAULT_SITE_URL: &str = "https://wiseoldman.net";

/// Default number of achievements shown by the `achievements` command.
pub const DEFAULT_ACHIEVEMENTS_LIMIT: usize = 5;

/// Root configuration structure.
#[derive(Deserialize, Debug)]
pub struct Config {
    /// Player tracking API configuration
    pub wom: Wom,
    /// Matrix account configuration
    pub matrix: Matrix,
    /// Message dispatch configuration
    #[serde(default)]
    pub dispatch: Dispatch,
}

/// Player tracking API configuration.
#[derive(Deserialize, Debug)]
pub struct Wom {
    /// Base URL of the API, without trailing slash.
    pub url: String,

    /// Base URL of the website, used for links shown to users.
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Optional API key sent as `x-api-key` on every request.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Administrative password required to delete players or change their country.
    ///
    /// Kept out of the message flow: it is handed to the requester at startup
    /// and never derived from chat content.
    #[serde(default)]
    pub admin_password: Option<String>,

    /// Maximum number of achievements returned by the achievements command.
    #[serde(default = "default_achievements_limit")]
    pub achievements_limit: usize,
}

/// Matrix account configuration.
#[derive(Deserialize, Debug)]
pub struct Matrix {
    /// Fully qualified Matrix user ID, e.g. `@wombot:matrix.org`.
    pub user_id: String,

    /// Matrix account password.
    ///
    /// Only used for the first login; the session is persisted afterwards.
    pub password: String,
}

/// Message dispatch configuration.
#[derive(Deserialize, Debug)]
pub struct Dispatch {
    /// Character every command starts with.
    #[serde(default = "default_prefix")]
    pub prefix: char,

    /// Rooms the bot answers in. An empty list means every joined room.
    #[serde(default)]
    pub allowed_rooms: Vec<String>,

    /// Whether commands that need a configured group are gated on it.
    #[serde(default)]
    pub require_group_config: bool,
}

impl Default for Dispatch {
    fn default() -> Self {
        Dispatch {
            prefix: default_prefix(),
            allowed_rooms: Vec::new(),
            require_group_config: false,
        }
    }
}

fn default_prefix() -> char {
    '!'
}

fn default_site_url() -> String {
    DEFAULT_SITE_URL.to_string()
}

fn default_achievements_limit() -> usize {
    DEFAULT_ACHIEVEMENTS_LIMIT
}

impl Config {
    /// Loads the configuration from a YAML file, then applies `WOMBOT_`
    /// environment variable overrides.
    ///
    /// The API and site URLs are normalized by removing trailing slashes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a required value is missing.
    pub fn load(path: &str) -> Result<Self, anyhow::Error> {
        let mut config: Config = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("WOMBOT_").split("__"))
            .extract()?;

        while config.wom.url.ends_with('/') {
            config.wom.url.pop();
        }
        while config.wom.site_url.ends_with('/') {
            config.wom.site_url.pop();
        }

        Ok(config)
    }
}
