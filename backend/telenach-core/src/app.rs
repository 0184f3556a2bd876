//! Application state: the one place every screen reads from and writes to.
//!
//! `AppState` owns the session, the chat list, the voice room directory, the
//! current room session and the router. Handlers take `&mut self`; there is
//! no shared mutable state outside of it.

use error_types::{ErrorResponse, ServiceError};
use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{Chat, GroupPrivacy, Message, User, VoiceRoom};
use crate::router::{Router, Screen};
use crate::seed;
use crate::services::{
    ChatState, DeleteGroupConfirmation, MemberUpdate, RoomSession, SessionManager, SpeakDecision,
    SpeakRequestHandle,
};
use crate::services::chat_state::GROUP_CREATED_TEXT;
use crate::storage::{FileStore, MemoryStore, SharedStore};
use crate::validators::SignupInput;

/// Render an error as the inline message shown next to a form.
pub fn inline_error(err: AppError) -> ErrorResponse {
    ServiceError::from(err).to_response()
}

pub struct AppState {
    config: Arc<Config>,
    session: SessionManager,
    chats: ChatState,
    /// Known users other than the signed-in one
    people: Vec<User>,
    rooms: Vec<VoiceRoom>,
    room: Option<RoomSession>,
    router: Router,
}

impl AppState {
    /// Build state on top of `store` and restore any persisted session.
    pub fn bootstrap(config: Config, store: SharedStore) -> AppResult<Self> {
        let config = Arc::new(config);
        let mut session = SessionManager::new(store, &config);
        let restored = session.restore()?.is_some();

        let (chats, directory, people, rooms) = if config.seed_demo {
            (
                seed::chats(),
                seed::discoverable_groups(),
                seed::users(),
                seed::voice_rooms(),
            )
        } else {
            Default::default()
        };

        let mut router = Router::new(config.toast_duration);
        if restored {
            router.on_signed_in();
        }

        tracing::info!(
            signed_in = restored,
            chats = chats.len(),
            rooms = rooms.len(),
            "app state ready"
        );

        Ok(Self {
            chats: ChatState::new(chats, directory, config.max_moderators),
            config,
            session,
            people,
            rooms,
            room: None,
            router,
        })
    }

    /// Pick the store backend from config and bootstrap on it.
    pub fn from_config(config: Config) -> AppResult<Self> {
        let store: SharedStore = match &config.store_path {
            Some(path) => Arc::new(FileStore::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };
        Self::bootstrap(config, store)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn chats(&self) -> &ChatState {
        &self.chats
    }

    pub fn voice_rooms(&self) -> &[VoiceRoom] {
        &self.rooms
    }

    pub fn room_session(&self) -> Option<&RoomSession> {
        self.room.as_ref()
    }

    pub fn room_session_mut(&mut self) -> Option<&mut RoomSession> {
        self.room.as_mut()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.current_user()
    }

    pub fn screen(&self) -> Screen {
        self.router.visible_screen(self.session.is_signed_in())
    }

    fn require_user(&self) -> AppResult<User> {
        self.session.current_user().cloned().ok_or(AppError::NotSignedIn)
    }

    fn require_active_chat(&self) -> AppResult<String> {
        self.router
            .active_chat_id()
            .map(str::to_string)
            .ok_or_else(|| AppError::ChatNotFound("no active chat".to_string()))
    }

    // ---- session ----

    pub fn signup(&mut self, input: &SignupInput<'_>) -> AppResult<User> {
        let user = self.session.signup(input)?;
        self.router.on_signed_in();
        Ok(user)
    }

    pub fn login(&mut self, username: &str, password: &str) -> AppResult<User> {
        let user = self.session.login(username, password)?;
        self.router.on_signed_in();
        Ok(user)
    }

    /// Sign out, leaving any voice room, and return to onboarding.
    pub fn logout(&mut self) -> AppResult<()> {
        self.session.logout()?;
        self.room = None;
        self.router.on_signed_out();
        Ok(())
    }

    // ---- chats and groups ----

    pub fn active_chat(&self) -> Option<&Chat> {
        self.router.active_chat_id().and_then(|id| self.chats.chat(id))
    }

    /// Open a conversation and clear its unread badge. Public groups picked
    /// from search are pulled into the chat list first.
    pub fn open_chat(&mut self, chat_id: &str) -> AppResult<()> {
        self.chats.open_directory_group(chat_id)?;
        self.chats.mark_read(chat_id)?;
        self.router.open_chat(chat_id);
        Ok(())
    }

    pub fn open_group_info(&mut self) -> AppResult<()> {
        let chat = self
            .active_chat()
            .ok_or_else(|| AppError::ChatNotFound("no active chat".to_string()))?;
        if !chat.is_group {
            return Err(AppError::Forbidden(format!(
                "{} is not a group",
                chat.display_name()
            )));
        }
        self.router.go_to(Screen::GroupInfo);
        Ok(())
    }

    /// Create a group owned by the signed-in user and open it.
    pub fn create_group(&mut self, name: &str, privacy: GroupPrivacy) -> AppResult<String> {
        let me = self.require_user()?;
        let chat_id = self.chats.create_group(&me, name, privacy)?.id.clone();

        self.router.set_create_modal(false);
        self.router.open_chat(&chat_id);
        self.router.show_toast(GROUP_CREATED_TEXT);
        Ok(chat_id)
    }

    pub fn update_member(&mut self, member_id: &str, update: MemberUpdate) -> AppResult<()> {
        let me = self.require_user()?;
        let chat_id = self.require_active_chat()?;
        self.chats.update_member(&me.id, &chat_id, member_id, update)
    }

    pub fn toggle_member_mute(&mut self, member_id: &str) -> AppResult<Option<bool>> {
        let me = self.require_user()?;
        let chat_id = self.require_active_chat()?;
        self.chats.toggle_mute(&me.id, &chat_id, member_id)
    }

    pub fn remove_member(&mut self, member_id: &str) -> AppResult<()> {
        let me = self.require_user()?;
        let chat_id = self.require_active_chat()?;
        self.chats.remove_member(&me.id, &chat_id, member_id)
    }

    /// First step of deleting the active group. The caller shows a prompt and
    /// hands the confirmation back to [`AppState::confirm_delete_group`].
    pub fn request_delete_group(&self) -> AppResult<DeleteGroupConfirmation> {
        let me = self.require_user()?;
        let chat_id = self.require_active_chat()?;
        self.chats.request_delete_group(&me.id, &chat_id)
    }

    pub fn confirm_delete_group(&mut self, confirmation: DeleteGroupConfirmation) -> AppResult<()> {
        let removed = self.chats.confirm_delete_group(confirmation)?;
        if self.router.active_chat_id() == Some(removed.id.as_str()) {
            self.router.navigate(Screen::Messages);
        }
        self.router.show_toast(format!("{} deleted", removed.display_name()));
        Ok(())
    }

    pub fn search_groups(&self, query: &str) -> Vec<&Chat> {
        self.chats.search_groups(query)
    }

    pub fn send_text(&mut self, text: &str) -> AppResult<Message> {
        let me = self.require_user()?;
        let chat_id = self.require_active_chat()?;
        self.chats.send_text(&chat_id, &me, text)
    }

    pub fn send_voice(&mut self, seconds: u32) -> AppResult<Message> {
        let me = self.require_user()?;
        let chat_id = self.require_active_chat()?;
        self.chats.send_voice(&chat_id, &me, seconds)
    }

    // ---- voice rooms ----

    /// Enter a room from the directory. The signed-in user owns the room when
    /// they are its host.
    pub fn enter_room(&mut self, room_id: &str) -> AppResult<&RoomSession> {
        let me = self.require_user()?;
        let room = self
            .rooms
            .iter()
            .find(|r| r.id == room_id)
            .cloned()
            .ok_or_else(|| AppError::RoomNotFound(room_id.to_string()))?;

        let is_owner = room.host().is_some_and(|host| host.id == me.id);
        self.router.open_room(room_id);
        Ok(&*self.room.insert(RoomSession::enter(room, &me, is_owner)))
    }

    /// Raise the local user's hand in the current room.
    pub fn request_to_speak(&mut self) -> AppResult<Option<SpeakRequestHandle>> {
        let room = self
            .room
            .as_mut()
            .ok_or_else(|| AppError::RoomNotFound("not in a room".to_string()))?;
        let me = room.local_user_id().to_string();
        room.request_to_speak(&me)
    }

    /// Answer the oldest speak request as the local user.
    pub fn review_speak_request(
        &mut self,
        approve: bool,
    ) -> AppResult<Option<(String, SpeakDecision)>> {
        let room = self
            .room
            .as_mut()
            .ok_or_else(|| AppError::RoomNotFound("not in a room".to_string()))?;
        let me = room.local_user_id().to_string();
        room.respond(&me, approve)
    }

    /// Leave the current room. Open speak requests resolve as cancelled.
    pub fn exit_room(&mut self) {
        if let Some(mut room) = self.room.take() {
            let me = room.local_user_id().to_string();
            room.exit(&me);
        }
        self.router.exit_room();
    }

    /// Leave the room and open a direct chat with one of its participants.
    pub fn message_participant(&mut self, user_id: &str) -> AppResult<String> {
        if self.room.as_ref().is_some_and(|r| r.local_user_id() == user_id) {
            return Err(AppError::Validation(
                "You cannot message yourself".to_string(),
            ));
        }

        let user = self
            .room
            .as_ref()
            .and_then(|r| r.participant(user_id))
            .map(|p| p.user.clone())
            .ok_or_else(|| AppError::Forbidden(format!("{user_id} is not in this room")))?;

        let chat_id = self.chats.open_direct_chat(&user).id.clone();
        self.room = None;
        self.router.open_chat(&chat_id);
        Ok(chat_id)
    }

    // ---- stories ----

    /// Show a user's stories and mark them viewed. Returns `false` when the
    /// user has none, in which case nothing opens.
    pub fn open_story(&mut self, user_id: &str) -> AppResult<bool> {
        if let Some(mut me) = self.current_user().filter(|u| u.id == user_id).cloned() {
            if !me.has_stories() {
                return Ok(false);
            }
            me.mark_stories_viewed();
            self.session.update_current(me)?;
        } else {
            let Some(user) = self.people.iter_mut().find(|u| u.id == user_id) else {
                return Ok(false);
            };
            if !user.has_stories() {
                return Ok(false);
            }
            user.mark_stories_viewed();
        }

        self.router.open_story(user_id);
        Ok(true)
    }

    pub fn people(&self) -> &[User] {
        &self.people
    }

    /// Horizontal swipe on the main surface.
    pub fn swipe(&mut self, delta_x: f32) {
        let signed_in = self.session.is_signed_in();
        self.router.on_swipe(delta_x, signed_in);
    }
}
