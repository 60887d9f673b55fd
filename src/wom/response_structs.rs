//! Response structures for the player tracking API.
//!
//! Timestamps are sent as ISO 8601 strings and are deserialized straight into
//! [`DateTime<Utc>`], so commands never see the wire representation.

use std::{collections::HashMap, fmt};

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A tracked player, from `/players/username/{username}` and `/players/track`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    /// Account type: regular, ironman, hardcore, ultimate...
    #[serde(rename = "type", default)]
    pub player_type: String,
    /// Account build: main, f2p, lvl3, zerker, def1, hp10...
    #[serde(default)]
    pub build: String,
    pub country: Option<String>,
    #[serde(default)]
    pub exp: i64,
    /// Efficient hours played
    #[serde(default)]
    pub ehp: f64,
    /// Efficient hours bossed
    #[serde(default)]
    pub ehb: f64,
    pub registered_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_imported_at: Option<DateTime<Utc>>,
    pub latest_snapshot: Option<Snapshot>,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "id={}, username={}, type={}, exp={}, ehp={}",
            self.id, self.username, self.player_type, self.exp, self.ehp
        )
    }
}

/// The most recent hiscores snapshot of a player.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub imported_at: Option<DateTime<Utc>>,
}

/// Gains of a player over a period, from `/players/username/{username}/gained`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGains {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub data: GainsData,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct GainsData {
    #[serde(default)]
    pub skills: HashMap<String, SkillGains>,
    #[serde(default)]
    pub bosses: HashMap<String, BossGains>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SkillGains {
    pub metric: String,
    pub experience: Gain,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BossGains {
    pub metric: String,
    pub kills: Gain,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Gain {
    pub gained: f64,
}

/// A personal record, from `/players/username/{username}/records`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub value: f64,
    pub period: String,
    pub metric: String,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for PlayerRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "metric={}, period={}, value={}",
            self.metric, self.period, self.value
        )
    }
}

/// An achievement, from `/players/username/{username}/achievements`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAchievement {
    pub name: String,
    pub metric: String,
    pub threshold: f64,
    pub created_at: DateTime<Utc>,
}

/// Plain `{ "message": ... }` body returned by mutations and errors.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}
