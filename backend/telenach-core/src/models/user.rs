use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub viewed: bool,
    /// Display label ("2h ago")
    pub timestamp: String,
}

/// User record as persisted in local storage.
///
/// Field names follow the stored JSON (`displayName`, `birthYear`). The
/// password is only ever present in its encoded form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
    /// Always `@`-prefixed; unique ignoring case
    pub username: String,
    pub birth_year: String,
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(
        rename = "password",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub password_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stories: Option<Vec<Story>>,
}

impl User {
    pub fn has_stories(&self) -> bool {
        self.stories.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Story ring is dimmed once every story has been seen.
    pub fn has_unseen_stories(&self) -> bool {
        self.stories
            .as_ref()
            .is_some_and(|s| s.iter().any(|story| !story.viewed))
    }

    pub fn mark_stories_viewed(&mut self) {
        if let Some(stories) = self.stories.as_mut() {
            for story in stories.iter_mut() {
                story.viewed = true;
            }
        }
    }

    /// Copy safe to hand to views and to the session key: no password.
    pub fn public_profile(&self) -> User {
        User {
            password_hash: None,
            ..self.clone()
        }
    }

    pub fn matches_username(&self, normalized: &str) -> bool {
        self.username.to_lowercase() == normalized.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_stories(viewed: &[bool]) -> User {
        User {
            id: "1".into(),
            display_name: "Ayoub".into(),
            username: "@ayoub".into(),
            birth_year: "1998".into(),
            avatar: "https://picsum.photos/seed/ayoub/200".into(),
            bio: None,
            password_hash: Some("abc".into()),
            stories: Some(
                viewed
                    .iter()
                    .enumerate()
                    .map(|(i, v)| Story {
                        id: format!("s{i}"),
                        image_url: "https://example.com/s.jpg".into(),
                        text: None,
                        viewed: *v,
                        timestamp: "2h ago".into(),
                    })
                    .collect(),
            ),
        }
    }

    #[test]
    fn test_json_shape_matches_local_storage() {
        let user = user_with_stories(&[]);
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["displayName"], "Ayoub");
        assert_eq!(json["birthYear"], "1998");
        assert_eq!(json["password"], "abc");
        assert!(json.get("bio").is_none());
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let raw = r#"{"id":"me","displayName":"Alex","username":"@alex","birthYear":"1995","avatar":"a"}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert!(user.password_hash.is_none());
        assert!(!user.has_stories());
    }

    #[test]
    fn test_story_viewing() {
        let mut user = user_with_stories(&[true, false]);
        assert!(user.has_stories());
        assert!(user.has_unseen_stories());

        user.mark_stories_viewed();
        assert!(!user.has_unseen_stories());
    }

    #[test]
    fn test_public_profile_drops_password() {
        let user = user_with_stories(&[]);
        assert!(user.public_profile().password_hash.is_none());
    }

    #[test]
    fn test_username_match_ignores_case() {
        let user = user_with_stories(&[]);
        assert!(user.matches_username("@AYOUB"));
        assert!(!user.matches_username("@ayoub2"));
    }
}
