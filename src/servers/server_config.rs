use serde::{Deserialize, Serialize};

/// Configuration of a room.
///
/// A room is considered configured once it is linked to a positive group id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Player group linked to the room, `-1` when unset
    #[serde(default = "unset_group")]
    pub group_id: i64,
}

fn unset_group() -> i64 {
    -1
}

impl ServerConfig {
    pub fn is_configured(&self) -> bool {
        self.group_id > 0
    }
}
