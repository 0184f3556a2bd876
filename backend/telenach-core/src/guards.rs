//! Permission guards for group actions.
//!
//! Every member-management path goes through [`GroupActor::verify`] first, so
//! there is no way to mutate a group without a resolved role for the caller.

use crate::error::{AppError, AppResult};
use crate::models::{can_manage, Chat, GroupMember, GroupRole};

/// A verified member of a group, acting on it.
#[derive(Debug, Clone)]
pub struct GroupActor {
    pub chat_id: String,
    pub member: GroupMember,
}

impl GroupActor {
    pub fn verify(chat: &Chat, user_id: &str) -> AppResult<Self> {
        if !chat.is_group {
            return Err(AppError::Forbidden(
                "member management is only available in groups".to_string(),
            ));
        }

        let member = chat
            .member(user_id)
            .cloned()
            .ok_or_else(|| AppError::Forbidden("you are not a member of this group".to_string()))?;

        Ok(Self {
            chat_id: chat.id.clone(),
            member,
        })
    }

    pub fn user_id(&self) -> &str {
        self.member.id()
    }

    pub fn role(&self) -> GroupRole {
        self.member.group_role
    }

    pub fn is_admin(&self) -> bool {
        self.role() == GroupRole::Admin
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if !self.is_admin() {
            return Err(AppError::Forbidden(
                "only the group admin can do that".to_string(),
            ));
        }
        Ok(())
    }

    pub fn can_manage(&self, target: &GroupMember) -> bool {
        can_manage(&self.member, target)
    }

    pub fn require_can_manage(&self, target: &GroupMember) -> AppResult<()> {
        if !self.can_manage(target) {
            return Err(AppError::Forbidden(format!(
                "a {} cannot manage a {}",
                self.role(),
                target.group_role
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_verify_group_member() {
        let chats = seed::chats();
        let group = chats.iter().find(|c| c.id == "g1").unwrap();

        let admin = GroupActor::verify(group, "me").unwrap();
        assert!(admin.is_admin());
        assert!(admin.require_admin().is_ok());

        let moderator = GroupActor::verify(group, "1").unwrap();
        assert_eq!(moderator.role(), GroupRole::Moderator);
        assert!(moderator.require_admin().is_err());
    }

    #[test]
    fn test_verify_rejects_outsiders_and_direct_chats() {
        let chats = seed::chats();
        let group = chats.iter().find(|c| c.id == "g1").unwrap();
        let direct = chats.iter().find(|c| c.id == "c1").unwrap();

        assert!(matches!(
            GroupActor::verify(group, "4"),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            GroupActor::verify(direct, "1"),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_moderator_manages_members_only() {
        let chats = seed::chats();
        let group = chats.iter().find(|c| c.id == "g1").unwrap();
        let moderator = GroupActor::verify(group, "1").unwrap();

        assert!(moderator.require_can_manage(group.member("2").unwrap()).is_ok());
        assert!(moderator.require_can_manage(group.member("me").unwrap()).is_err());
        assert!(moderator.require_can_manage(group.member("1").unwrap()).is_err());
    }
}
