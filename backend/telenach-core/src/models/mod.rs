pub mod chat;
pub mod member;
pub mod user;
pub mod voice_room;

pub use chat::{Chat, GroupPrivacy, Message, MessageKind, MessageStatus};
pub use member::{can_manage, GroupMember, GroupRole};
pub use user::{Story, User};
pub use voice_room::{ParticipantRole, VoiceRoom};
