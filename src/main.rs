//! wombot - A Matrix bot for the Wise Old Man player tracker.
//!
//! This is the main entry point of the bot. It answers commands sent in Matrix
//! rooms by querying the Wise Old Man API for Old School RuneScape players.
//!
//! # Features
//!
//! - **Player lookups**: Details, gains, records and achievements of a player
//! - **Player updates**: Ask the tracker to refresh a player
//! - **Administration**: Room administrators can delete players, change their
//!   country and link the room to a group
//! - **Permission checks**: Based on the room power levels at the time of the message
//! - **Session Persistence**: Maintains the Matrix login across restarts
//! - **YAML Configuration**: Simple configuration file with environment variable overrides
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! wom:
//!   url: "https://api.wiseoldman.net/v2"
//!   admin_password: "your-admin-password"
//!
//! matrix:
//!   user_id: "@wombot:matrix.org"
//!   password: "your-password"
//! ```
//!
//! Any value can be overridden with a `WOMBOT_` environment variable, e.g.
//! `WOMBOT_MATRIX__PASSWORD`.
//!
//! # Usage
//!
//! ```bash
//! wombot --config config.yaml --data ./data
//! ```
//!
//! # Architecture
//!
//! - [`bot`] - Wiring of the Matrix client and the dispatcher
//! - [`commands`] - Message parsing, dispatch, permission gates and commands
//! - [`config`] - Configuration loading
//! - [`matrix`] - Matrix client integration and session management
//! - [`servers`] - Per room configuration store
//! - [`wom`] - Player tracking API client
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod matrix;
mod servers;
mod wom;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long)]
    config: String,

    /// Directory holding the Matrix session and room configurations
    #[arg(short, long)]
    data: String,
}

#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting wombot {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    let bot = match Bot::new(config, &args.data).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {:#}", e);
            return;
        }
    };
    bot.start().await;
}
