use serde::{Deserialize, Serialize};
use std::fmt;

use super::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceRoom {
    pub id: String,
    pub name: String,
    pub participants: Vec<User>,
    pub is_live: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
}

impl VoiceRoom {
    /// First listed participant hosts the room.
    pub fn host(&self) -> Option<&User> {
        self.participants.first()
    }
}

/// Role of a participant while inside a voice room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Listener,
    Speaker,
    Admin,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Listener => "listener",
            Self::Speaker => "speaker",
            Self::Admin => "admin",
        }
    }

    /// Listeners never hold an open mic.
    pub fn can_unmute(&self) -> bool {
        !matches!(self, Self::Listener)
    }
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
