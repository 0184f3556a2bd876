// App Flow Tests
//
// End-to-end flows through AppState:
// 1. Onboarding -> messages after signup, back to onboarding on logout
// 2. Session restore on relaunch picks the right screen
// 3. Entering and leaving voice rooms, messaging a participant
// 4. Inline errors carry the shared error taxonomy

#[cfg(test)]
mod app_flow_tests {
    use std::sync::Arc;
    use telenach_core::app::inline_error;
    use telenach_core::models::{GroupPrivacy, ParticipantRole};
    use telenach_core::router::Screen;
    use telenach_core::services::{SpeakDecision, SpeakRequestStatus};
    use telenach_core::storage::{FileStore, MemoryStore, SharedStore};
    use telenach_core::validators::SignupInput;
    use telenach_core::{AppError, AppState, Config};

    fn jane<'a>() -> SignupInput<'a> {
        SignupInput {
            display_name: "Jane",
            username: "@jane",
            password: "password1",
            confirm_password: "password1",
            birth_year: "1990",
        }
    }

    fn fresh_state() -> AppState {
        let store: SharedStore = Arc::new(MemoryStore::new());
        AppState::bootstrap(Config::default(), store).unwrap()
    }

    #[test]
    fn test_signup_moves_past_onboarding() {
        let mut state = fresh_state();
        assert_eq!(state.screen(), Screen::Onboarding);
        assert!(!state.router().show_top_bar(false));

        state.signup(&jane()).unwrap();
        assert_eq!(state.screen(), Screen::Messages);
        assert!(state.router().show_bottom_nav(true));

        state.logout().unwrap();
        assert_eq!(state.screen(), Screen::Onboarding);
        assert!(state.current_user().is_none());
    }

    #[test]
    fn test_signup_errors_render_inline() {
        let mut state = fresh_state();
        state.signup(&jane()).unwrap();
        state.logout().unwrap();

        let taken = inline_error(state.signup(&jane()).unwrap_err());
        assert_eq!(taken.error_type, "conflict_error");

        let bad_login = inline_error(state.login("@jane", "nope-nope").unwrap_err());
        assert_eq!(bad_login.error_type, "authentication_error");
        assert_eq!(bad_login.message, "Invalid username or password");
        assert_eq!(state.screen(), Screen::Onboarding);
    }

    #[test]
    fn test_relaunch_restores_session_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            store_path: Some(dir.path().join("storage.json")),
            ..Config::default()
        };

        {
            let mut state = AppState::from_config(config.clone()).unwrap();
            state.signup(&jane()).unwrap();
        }

        let state = AppState::from_config(config.clone()).unwrap();
        assert_eq!(state.screen(), Screen::Messages);
        assert_eq!(
            state.current_user().map(|u| u.display_name.as_str()),
            Some("Jane")
        );

        let store: SharedStore = Arc::new(FileStore::open(dir.path().join("storage.json")).unwrap());
        let mut relaunched = AppState::bootstrap(config, store).unwrap();
        relaunched.logout().unwrap();
        assert_eq!(relaunched.screen(), Screen::Onboarding);
    }

    #[test]
    fn test_new_user_creates_and_manages_a_group() {
        let mut state = fresh_state();
        state.signup(&jane()).unwrap();

        let group_id = state
            .create_group("Book Club", GroupPrivacy::Public)
            .unwrap();
        assert_eq!(state.chats().chats()[0].id, group_id);
        assert_eq!(state.screen(), Screen::Chat);

        state.open_group_info().unwrap();
        assert_eq!(state.screen(), Screen::GroupInfo);

        // only member is the creator: nothing to manage
        assert!(matches!(
            state.toggle_member_mute("someone-else"),
            Ok(None)
        ));

        let message = state.send_text("welcome").unwrap();
        assert_eq!(state.active_chat().unwrap().last_message, message);
    }

    #[test]
    fn test_swipe_respects_screen() {
        let mut state = fresh_state();
        state.swipe(200.0);
        assert!(!state.router().overlays().profile_panel);

        state.signup(&jane()).unwrap();
        state.swipe(200.0);
        assert!(state.router().overlays().profile_panel);
        state.swipe(-200.0);
        assert!(!state.router().overlays().profile_panel);

        state.enter_room("v1").unwrap();
        state.swipe(200.0);
        assert!(!state.router().overlays().profile_panel);
    }

    #[tokio::test]
    async fn test_room_visit_and_exit() {
        let mut state = fresh_state();
        state.signup(&jane()).unwrap();

        let room = state.enter_room("v1").unwrap();
        assert_eq!(room.local().unwrap().role, ParticipantRole::Listener);
        assert_eq!(state.screen(), Screen::InsideRoom);

        let handle = state.request_to_speak().unwrap().unwrap();
        assert_eq!(
            state.room_session().unwrap().local().unwrap().request,
            SpeakRequestStatus::Pending
        );
        // jane is not the room admin
        assert!(matches!(
            state.review_speak_request(true),
            Err(AppError::Forbidden(_))
        ));

        state.exit_room();
        assert_eq!(handle.await, SpeakDecision::Cancelled);
        assert!(state.room_session().is_none());
        assert_eq!(state.screen(), Screen::VoiceRooms);
    }

    #[test]
    fn test_unknown_room() {
        let mut state = fresh_state();
        state.signup(&jane()).unwrap();
        assert!(matches!(
            state.enter_room("v404"),
            Err(AppError::RoomNotFound(_))
        ));
        assert!(state.request_to_speak().is_err());
    }

    #[test]
    fn test_message_participant_from_room() {
        let mut state = fresh_state();
        state.signup(&jane()).unwrap();
        state.enter_room("v2").unwrap();

        let chat_id = state.message_participant("4").unwrap();
        assert!(chat_id.starts_with("temp_"));
        assert_eq!(state.screen(), Screen::Chat);
        assert!(state.room_session().is_none());
        assert_eq!(
            state.active_chat().map(|c| c.display_name().to_string()),
            Some("Sarah".to_string())
        );
    }

    #[test]
    fn test_search_result_opens_as_active_chat() {
        let mut state = fresh_state();
        state.signup(&jane()).unwrap();
        state.router_mut().navigate(Screen::GroupSearch);

        let id = state.search_groups("night")[0].id.clone();
        state.open_chat(&id).unwrap();

        assert_eq!(state.screen(), Screen::Chat);
        assert_eq!(
            state.active_chat().and_then(|c| c.group_name.as_deref()),
            Some("Night Owls")
        );
        assert_eq!(state.chats().chats()[0].id, id);
        assert!(matches!(
            state.open_chat("search404"),
            Err(AppError::ChatNotFound(_))
        ));
    }

    #[test]
    fn test_cannot_message_yourself_from_room() {
        let mut state = fresh_state();
        let me = state.signup(&jane()).unwrap();
        state.enter_room("v2").unwrap();
        let chats_before = state.chats().chats().len();

        let err = state.message_participant(&me.id).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(inline_error(err).error_type, "validation_error");

        assert_eq!(state.chats().chats().len(), chats_before);
        assert!(state.room_session().is_some());
        assert_eq!(state.screen(), Screen::InsideRoom);
    }

    #[test]
    fn test_config_is_read_only_through_accessor() {
        let config = Config {
            max_moderators: 3,
            ..Config::default()
        };
        let store: SharedStore = Arc::new(MemoryStore::new());
        let state = AppState::bootstrap(config, store).unwrap();
        assert_eq!(state.config().max_moderators, 3);
        assert_eq!(state.config().session_key(), "telenach_user");
    }

    #[test]
    fn test_logout_leaves_room() {
        let mut state = fresh_state();
        state.signup(&jane()).unwrap();
        state.enter_room("v3").unwrap();

        state.logout().unwrap();
        assert!(state.room_session().is_none());
        assert!(state.router().active_room_id().is_none());
    }
}
