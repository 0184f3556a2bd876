//! Demo directory data loaded at startup when `seed_demo` is on.

use crate::models::{
    Chat, GroupMember, GroupPrivacy, GroupRole, Message, MessageKind, MessageStatus, Story, User,
    VoiceRoom,
};

fn stories() -> [Story; 2] {
    [
        Story {
            id: "s1".into(),
            image_url: "https://images.unsplash.com/photo-1550684848-fac1c5b4e853?q=80&w=800"
                .into(),
            text: Some("Midnight thoughts.".into()),
            viewed: false,
            timestamp: "2h ago".into(),
        },
        Story {
            id: "s2".into(),
            image_url: "https://images.unsplash.com/photo-1518005020480-10f44bc397b2?q=80&w=800"
                .into(),
            text: Some("Elegance in shadows.".into()),
            viewed: true,
            timestamp: "5h ago".into(),
        },
    ]
}

fn user(id: &str, display_name: &str, username: &str, birth_year: &str, seed: &str) -> User {
    User {
        id: id.into(),
        display_name: display_name.into(),
        username: username.into(),
        birth_year: birth_year.into(),
        avatar: format!("https://picsum.photos/seed/{}/200", seed),
        bio: None,
        password_hash: None,
        stories: None,
    }
}

/// Demo account used by the seeded group (`id = "me"`).
pub fn current_user() -> User {
    let [first, _] = stories();
    User {
        stories: Some(vec![first]),
        ..user("me", "Alex Smith", "@alex", "1995", "me")
    }
}

pub fn users() -> Vec<User> {
    let [_, second] = stories();
    vec![
        User {
            stories: Some(vec![second]),
            ..user("1", "Ayoub", "@ayoub", "1998", "ayoub")
        },
        user("2", "Elena", "@elena_v", "2000", "elena"),
        User {
            stories: Some(vec![Story {
                id: "s3".into(),
                image_url:
                    "https://images.unsplash.com/photo-1478760329108-5c3ed9d495a0?q=80&w=800"
                        .into(),
                text: None,
                viewed: false,
                timestamp: "1h ago".into(),
            }]),
            ..user("3", "Marcus", "@marcus_k", "1992", "marcus")
        },
        user("4", "Sarah", "@sarah", "1997", "sarah"),
    ]
}

fn text(id: &str, sender_id: &str, body: &str, timestamp: &str) -> Message {
    Message {
        id: id.into(),
        sender_id: sender_id.into(),
        kind: MessageKind::Text,
        text: Some(body.into()),
        voice_duration: None,
        timestamp: timestamp.into(),
        status: MessageStatus::Read,
    }
}

pub fn chats() -> Vec<Chat> {
    let users = users();
    let member = |u: &User, role, muted| GroupMember {
        is_muted: muted,
        ..GroupMember::new(u.clone(), role)
    };

    vec![
        Chat {
            id: "g1".into(),
            is_group: true,
            group_name: Some("Design Ethos Crew".into()),
            privacy: Some(GroupPrivacy::Private),
            participants: users[..3].to_vec(),
            group_members: Some(vec![
                member(&current_user(), GroupRole::Admin, false),
                member(&users[0], GroupRole::Moderator, false),
                member(&users[1], GroupRole::Member, false),
                member(&users[2], GroupRole::Member, true),
            ]),
            last_message: text("gm1", "1", "Marcus is muted for spamming lol", "10:05"),
            unread_count: 0,
            messages: Vec::new(),
        },
        Chat {
            id: "c1".into(),
            is_group: false,
            group_name: None,
            privacy: None,
            participants: vec![users[0].clone()],
            group_members: None,
            last_message: text("m1", "1", "Hey, are you joining the session tonight?", "14:20"),
            unread_count: 2,
            messages: Vec::new(),
        },
        Chat {
            id: "c2".into(),
            is_group: false,
            group_name: None,
            privacy: None,
            participants: vec![users[1].clone()],
            group_members: None,
            last_message: text("m2", "me", "Sounds good to me!", "Yesterday"),
            unread_count: 0,
            messages: Vec::new(),
        },
    ]
}

/// Public groups the user has not joined; only reachable through search.
pub fn discoverable_groups() -> Vec<Chat> {
    let group = |id: &str, name: &str, msg_id: &str, blurb: &str, ts: &str| Chat {
        id: id.into(),
        is_group: true,
        group_name: Some(name.into()),
        privacy: Some(GroupPrivacy::Public),
        participants: Vec::new(),
        group_members: None,
        last_message: Message::system(msg_id.into(), blurb, ts),
        unread_count: 0,
        messages: Vec::new(),
    };

    vec![
        group("search1", "Night Owls", "sm1", "Public group for night thinking.", "Today"),
        group("search2", "Creative Lounge", "sm2", "Where art meets conversation.", "Yesterday"),
    ]
}

pub fn voice_rooms() -> Vec<VoiceRoom> {
    let users = users();
    vec![
        VoiceRoom {
            id: "v1".into(),
            name: "Design Ethos".into(),
            participants: vec![users[0].clone(), users[1].clone(), users[2].clone()],
            is_live: true,
            is_private: None,
        },
        VoiceRoom {
            id: "v2".into(),
            name: "Tech Talk 2025".into(),
            participants: vec![users[3].clone()],
            is_live: true,
            is_private: None,
        },
        VoiceRoom {
            id: "v3".into(),
            name: "Ambient Chillout".into(),
            participants: vec![users[0].clone(), users[3].clone()],
            is_live: false,
            is_private: None,
        },
    ]
}
