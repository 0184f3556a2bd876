use serde::{Deserialize, Serialize};

use super::{GroupMember, GroupRole, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GroupPrivacy {
    Public,
    #[default]
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Voice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sent,
    Delivered,
    Read,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// `m:ss`, voice messages only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_duration: Option<String>,
    /// Display label ("14:20", "Yesterday")
    pub timestamp: String,
    pub status: MessageStatus,
}

impl Message {
    pub const SYSTEM_SENDER: &'static str = "sys";

    pub fn system(id: String, text: &str, timestamp: &str) -> Self {
        Self {
            id,
            sender_id: Self::SYSTEM_SENDER.to_string(),
            kind: MessageKind::Text,
            text: Some(text.to_string()),
            voice_duration: None,
            timestamp: timestamp.to_string(),
            status: MessageStatus::Read,
        }
    }

    pub fn format_voice_duration(seconds: u32) -> String {
        format!("{}:{:02}", seconds / 60, seconds % 60)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub is_group: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<GroupPrivacy>,
    pub participants: Vec<User>,
    /// Present only on groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_members: Option<Vec<GroupMember>>,
    pub last_message: Message,
    pub unread_count: u32,
    /// Local message log for the chat view; not part of the stored chat
    #[serde(skip)]
    pub messages: Vec<Message>,
}

impl Chat {
    pub fn members(&self) -> &[GroupMember] {
        self.group_members.as_deref().unwrap_or_default()
    }

    pub fn member(&self, user_id: &str) -> Option<&GroupMember> {
        self.members().iter().find(|m| m.id() == user_id)
    }

    pub fn member_mut(&mut self, user_id: &str) -> Option<&mut GroupMember> {
        self.group_members
            .as_mut()
            .and_then(|members| members.iter_mut().find(|m| m.id() == user_id))
    }

    /// Role of `user_id` in this group; non-members are treated as members.
    pub fn role_of(&self, user_id: &str) -> GroupRole {
        self.member(user_id)
            .map(|m| m.group_role)
            .unwrap_or(GroupRole::Member)
    }

    pub fn moderator_count(&self) -> usize {
        self.members()
            .iter()
            .filter(|m| m.group_role == GroupRole::Moderator)
            .count()
    }

    pub fn moderator_ids(&self) -> Vec<&str> {
        self.members()
            .iter()
            .filter(|m| m.group_role == GroupRole::Moderator)
            .map(|m| m.id())
            .collect()
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p.id == user_id)
    }

    pub fn is_muted_member(&self, user_id: &str) -> bool {
        self.member(user_id).is_some_and(|m| m.is_muted)
    }

    pub fn display_name(&self) -> &str {
        match (&self.group_name, self.participants.first()) {
            (Some(name), _) => name.as_str(),
            (None, Some(p)) => p.display_name.as_str(),
            (None, None) => "",
        }
    }
}
