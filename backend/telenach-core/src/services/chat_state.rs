//! In-memory conversation list and group membership management.
//!
//! Every mutation addresses one chat by id and leaves the others untouched.
//! Member-management entry points resolve the caller through
//! [`GroupActor`] before touching the member list.

use chrono::Local;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::guards::GroupActor;
use crate::models::{
    Chat, GroupMember, GroupPrivacy, GroupRole, Message, MessageKind, MessageStatus, User,
};

pub const GROUP_CREATED_TEXT: &str = "Group created successfully";

/// Partial update applied to one group member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberUpdate {
    pub group_role: Option<GroupRole>,
    pub is_muted: Option<bool>,
}

impl MemberUpdate {
    pub fn role(role: GroupRole) -> Self {
        Self {
            group_role: Some(role),
            ..Self::default()
        }
    }

    pub fn muted(is_muted: bool) -> Self {
        Self {
            is_muted: Some(is_muted),
            ..Self::default()
        }
    }
}

/// Proof that the admin asked to delete a group. Consumed by
/// [`ChatState::confirm_delete_group`].
#[derive(Debug, PartialEq, Eq)]
pub struct DeleteGroupConfirmation {
    chat_id: String,
    actor_id: String,
}

impl DeleteGroupConfirmation {
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }
}

pub struct ChatState {
    chats: Vec<Chat>,
    directory: Vec<Chat>,
    max_moderators: usize,
}

fn now_label() -> String {
    Local::now().format("%H:%M").to_string()
}

impl ChatState {
    pub fn new(chats: Vec<Chat>, directory: Vec<Chat>, max_moderators: usize) -> Self {
        Self {
            chats,
            directory,
            max_moderators,
        }
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn chat(&self, chat_id: &str) -> Option<&Chat> {
        self.chats.iter().find(|c| c.id == chat_id)
    }

    fn chat_mut(&mut self, chat_id: &str) -> AppResult<&mut Chat> {
        self.chats
            .iter_mut()
            .find(|c| c.id == chat_id)
            .ok_or_else(|| AppError::ChatNotFound(chat_id.to_string()))
    }

    fn require_chat(&self, chat_id: &str) -> AppResult<&Chat> {
        self.chat(chat_id)
            .ok_or_else(|| AppError::ChatNotFound(chat_id.to_string()))
    }

    /// Create a group with `creator` as its only admin. The new group goes to
    /// the top of the list.
    pub fn create_group(
        &mut self,
        creator: &User,
        name: &str,
        privacy: GroupPrivacy,
    ) -> AppResult<&Chat> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Group name is required".to_string()));
        }

        let id = format!("g_{}", Uuid::new_v4().simple());
        let group = Chat {
            id: id.clone(),
            is_group: true,
            group_name: Some(name.to_string()),
            privacy: Some(privacy),
            participants: vec![creator.public_profile()],
            group_members: Some(vec![GroupMember::new(creator.clone(), GroupRole::Admin)]),
            last_message: Message::system(
                format!("m_{}", Uuid::new_v4().simple()),
                GROUP_CREATED_TEXT,
                "Just now",
            ),
            unread_count: 0,
            messages: Vec::new(),
        };

        tracing::info!(chat_id = %id, creator = %creator.username, ?privacy, "group created");
        self.chats.insert(0, group);
        Ok(&self.chats[0])
    }

    /// Apply a partial update to one member. Missing member ids are a no-op.
    ///
    /// Role changes are admin-only and respect the moderator limit; mute
    /// changes need the usual manage permission.
    pub fn update_member(
        &mut self,
        actor_id: &str,
        chat_id: &str,
        member_id: &str,
        update: MemberUpdate,
    ) -> AppResult<()> {
        let max_moderators = self.max_moderators;
        let chat = self.require_chat(chat_id)?;
        let actor = GroupActor::verify(chat, actor_id)?;

        let Some(target) = chat.member(member_id) else {
            tracing::debug!(chat_id, member_id, "update for absent member ignored");
            return Ok(());
        };
        actor.require_can_manage(target)?;

        if let Some(role) = update.group_role {
            if role != target.group_role {
                actor.require_admin()?;
                if role == GroupRole::Admin {
                    return Err(AppError::Forbidden(
                        "a group has exactly one admin".to_string(),
                    ));
                }
                if role == GroupRole::Moderator && chat.moderator_count() >= max_moderators {
                    tracing::info!(chat_id, member_id, "moderator limit reached");
                    return Err(AppError::ModeratorLimit { max: max_moderators });
                }
            }
        }

        let chat = self.chat_mut(chat_id)?;
        if let Some(member) = chat.member_mut(member_id) {
            if let Some(role) = update.group_role {
                member.group_role = role;
            }
            if let Some(muted) = update.is_muted {
                member.is_muted = muted;
            }
            tracing::info!(
                chat_id,
                member_id,
                role = %member.group_role,
                muted = member.is_muted,
                "member updated"
            );
        }
        Ok(())
    }

    pub fn promote_to_moderator(
        &mut self,
        actor_id: &str,
        chat_id: &str,
        member_id: &str,
    ) -> AppResult<()> {
        self.update_member(
            actor_id,
            chat_id,
            member_id,
            MemberUpdate::role(GroupRole::Moderator),
        )
    }

    pub fn demote_moderator(
        &mut self,
        actor_id: &str,
        chat_id: &str,
        member_id: &str,
    ) -> AppResult<()> {
        self.update_member(actor_id, chat_id, member_id, MemberUpdate::role(GroupRole::Member))
    }

    /// Flip a member's mute flag. Returns the new value, or `None` when the
    /// member does not exist.
    pub fn toggle_mute(
        &mut self,
        actor_id: &str,
        chat_id: &str,
        member_id: &str,
    ) -> AppResult<Option<bool>> {
        let Some(current) = self.require_chat(chat_id)?.member(member_id).map(|m| m.is_muted)
        else {
            return Ok(None);
        };
        self.update_member(actor_id, chat_id, member_id, MemberUpdate::muted(!current))?;
        Ok(Some(!current))
    }

    /// Remove a member from a group. Missing member ids are a no-op.
    pub fn remove_member(&mut self, actor_id: &str, chat_id: &str, member_id: &str) -> AppResult<()> {
        let chat = self.require_chat(chat_id)?;
        let actor = GroupActor::verify(chat, actor_id)?;

        let Some(target) = chat.member(member_id) else {
            tracing::debug!(chat_id, member_id, "removal of absent member ignored");
            return Ok(());
        };
        actor.require_can_manage(target)?;

        let chat = self.chat_mut(chat_id)?;
        if let Some(members) = chat.group_members.as_mut() {
            members.retain(|m| m.id() != member_id);
        }
        chat.participants.retain(|p| p.id != member_id);
        tracing::info!(chat_id, member_id, "member removed");
        Ok(())
    }

    /// First step of group deletion: only the admin gets a confirmation.
    pub fn request_delete_group(
        &self,
        actor_id: &str,
        chat_id: &str,
    ) -> AppResult<DeleteGroupConfirmation> {
        let chat = self.require_chat(chat_id)?;
        GroupActor::verify(chat, actor_id)?.require_admin()?;

        Ok(DeleteGroupConfirmation {
            chat_id: chat_id.to_string(),
            actor_id: actor_id.to_string(),
        })
    }

    pub fn confirm_delete_group(&mut self, confirmation: DeleteGroupConfirmation) -> AppResult<Chat> {
        // re-check: roles may have changed since the prompt was shown
        let chat = self.require_chat(&confirmation.chat_id)?;
        GroupActor::verify(chat, &confirmation.actor_id)?.require_admin()?;

        let index = self
            .chats
            .iter()
            .position(|c| c.id == confirmation.chat_id)
            .ok_or_else(|| AppError::ChatNotFound(confirmation.chat_id.clone()))?;
        let removed = self.chats.remove(index);
        tracing::info!(chat_id = %removed.id, "group deleted");
        Ok(removed)
    }

    /// Existing direct chat with `user`, or a fresh one at the top of the list.
    pub fn open_direct_chat(&mut self, user: &User) -> &Chat {
        if let Some(index) = self
            .chats
            .iter()
            .position(|c| !c.is_group && c.has_participant(&user.id))
        {
            return &self.chats[index];
        }

        let chat = Chat {
            id: format!("temp_{}", Uuid::new_v4().simple()),
            is_group: false,
            group_name: None,
            privacy: None,
            participants: vec![user.public_profile()],
            group_members: None,
            last_message: Message {
                id: "temp".to_string(),
                sender_id: user.id.clone(),
                kind: MessageKind::Text,
                text: Some("New conversation".to_string()),
                voice_duration: None,
                timestamp: "Now".to_string(),
                status: MessageStatus::Read,
            },
            unread_count: 0,
            messages: Vec::new(),
        };
        tracing::debug!(chat_id = %chat.id, with = %user.username, "direct chat opened");
        self.chats.insert(0, chat);
        &self.chats[0]
    }

    /// Resolve `chat_id` for opening: a joined chat as-is, or a public group
    /// from the directory, which moves to the top of the chat list.
    pub fn open_directory_group(&mut self, chat_id: &str) -> AppResult<&Chat> {
        if let Some(index) = self.chats.iter().position(|c| c.id == chat_id) {
            return Ok(&self.chats[index]);
        }

        let index = self
            .directory
            .iter()
            .position(|c| c.id == chat_id)
            .ok_or_else(|| AppError::ChatNotFound(chat_id.to_string()))?;
        let group = self.directory.remove(index);
        tracing::info!(chat_id, name = %group.display_name(), "directory group opened");
        self.chats.insert(0, group);
        Ok(&self.chats[0])
    }

    /// Groups whose name contains `query`, ignoring case. Joined groups come
    /// first, then the public directory.
    pub fn search_groups(&self, query: &str) -> Vec<&Chat> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.chats
            .iter()
            .chain(self.directory.iter())
            .filter(|c| c.is_group)
            .filter(|c| {
                c.group_name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn send_text(&mut self, chat_id: &str, sender: &User, text: &str) -> AppResult<Message> {
        if text.trim().is_empty() {
            return Err(AppError::Validation("Message is empty".to_string()));
        }
        self.push_message(chat_id, sender, MessageKind::Text, Some(text.to_string()), None)
    }

    pub fn send_voice(&mut self, chat_id: &str, sender: &User, seconds: u32) -> AppResult<Message> {
        if seconds == 0 {
            return Err(AppError::Validation("Recording is empty".to_string()));
        }
        let duration = Message::format_voice_duration(seconds);
        self.push_message(chat_id, sender, MessageKind::Voice, None, Some(duration))
    }

    fn push_message(
        &mut self,
        chat_id: &str,
        sender: &User,
        kind: MessageKind,
        text: Option<String>,
        voice_duration: Option<String>,
    ) -> AppResult<Message> {
        let chat = self.chat_mut(chat_id)?;
        if chat.is_muted_member(&sender.id) {
            return Err(AppError::Forbidden("you are muted in this group".to_string()));
        }

        let message = Message {
            id: Uuid::new_v4().simple().to_string(),
            sender_id: sender.id.clone(),
            kind,
            text,
            voice_duration,
            timestamp: now_label(),
            status: MessageStatus::Sent,
        };
        chat.messages.push(message.clone());
        chat.last_message = message.clone();
        tracing::debug!(chat_id, kind = ?message.kind, "message sent");
        Ok(message)
    }

    pub fn mark_read(&mut self, chat_id: &str) -> AppResult<()> {
        self.chat_mut(chat_id)?.unread_count = 0;
        Ok(())
    }

    pub fn total_unread(&self) -> u32 {
        self.chats.iter().map(|c| c.unread_count).sum()
    }
}
