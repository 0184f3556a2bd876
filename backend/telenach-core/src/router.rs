//! View router: which screen is active and which overlays are open.
//!
//! The router holds no domain data, only ids into the chat list and room
//! directory. Whether someone is signed in is passed in by the caller, since
//! the session lives in [`crate::services::SessionManager`].

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Horizontal travel (px) that counts as a swipe.
pub const SWIPE_THRESHOLD: f32 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Screen {
    Onboarding,
    Messages,
    Chat,
    VoiceRooms,
    InsideRoom,
    Profile,
    Settings,
    GroupInfo,
    GroupSearch,
}

impl Screen {
    pub fn shows_top_bar(self) -> bool {
        !matches!(
            self,
            Screen::Onboarding
                | Screen::InsideRoom
                | Screen::Settings
                | Screen::GroupInfo
                | Screen::GroupSearch
        )
    }

    pub fn shows_bottom_nav(self) -> bool {
        self.shows_top_bar() && self != Screen::Chat
    }

    /// Screens where a left swipe must not open the profile panel.
    fn blocks_profile_swipe(self) -> bool {
        matches!(
            self,
            Screen::InsideRoom | Screen::Chat | Screen::GroupInfo | Screen::GroupSearch
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
}

/// Dismiss timer for the current toast. Aborted on drop.
#[derive(Debug)]
struct ToastTimer {
    handle: JoinHandle<()>,
}

impl Drop for ToastTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Overlays {
    pub create_modal: bool,
    pub profile_panel: bool,
    /// User whose stories are being shown
    pub story_user_id: Option<String>,
}

#[derive(Debug)]
pub struct Router {
    splashing: bool,
    screen: Screen,
    active_chat_id: Option<String>,
    active_room_id: Option<String>,
    overlays: Overlays,
    toast: Option<Toast>,
    toast_seq: u64,
    toast_duration: Duration,
    toast_timer: Option<ToastTimer>,
    expired_tx: mpsc::UnboundedSender<u64>,
    expired_rx: mpsc::UnboundedReceiver<u64>,
}

impl Router {
    pub fn new(toast_duration: Duration) -> Self {
        let (expired_tx, expired_rx) = mpsc::unbounded_channel();
        Self {
            splashing: true,
            screen: Screen::Onboarding,
            active_chat_id: None,
            active_room_id: None,
            overlays: Overlays::default(),
            toast: None,
            toast_seq: 0,
            toast_duration,
            toast_timer: None,
            expired_tx,
            expired_rx,
        }
    }

    pub fn is_splashing(&self) -> bool {
        self.splashing
    }

    pub fn finish_splash(&mut self) {
        self.splashing = false;
    }

    /// Screen to render. Without a session only onboarding is reachable, and
    /// detail screens fall back when their subject is gone.
    pub fn visible_screen(&self, signed_in: bool) -> Screen {
        if !signed_in {
            return Screen::Onboarding;
        }
        match self.screen {
            Screen::Chat | Screen::GroupInfo if self.active_chat_id.is_none() => Screen::Messages,
            Screen::InsideRoom if self.active_room_id.is_none() => Screen::VoiceRooms,
            Screen::Onboarding => Screen::Messages,
            screen => screen,
        }
    }

    pub fn show_top_bar(&self, signed_in: bool) -> bool {
        signed_in && self.visible_screen(signed_in).shows_top_bar()
    }

    pub fn show_bottom_nav(&self, signed_in: bool) -> bool {
        signed_in && self.visible_screen(signed_in).shows_bottom_nav()
    }

    pub fn active_chat_id(&self) -> Option<&str> {
        self.active_chat_id.as_deref()
    }

    pub fn active_room_id(&self) -> Option<&str> {
        self.active_room_id.as_deref()
    }

    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    /// Top-level navigation: drops the active chat/room and closes the panel.
    pub fn navigate(&mut self, screen: Screen) {
        self.screen = screen;
        self.active_chat_id = None;
        self.active_room_id = None;
        self.overlays.profile_panel = false;
    }

    /// Move between screens that keep the active chat (chat <-> group info).
    pub fn go_to(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn open_chat(&mut self, chat_id: &str) {
        self.active_chat_id = Some(chat_id.to_string());
        self.screen = Screen::Chat;
    }

    pub fn open_room(&mut self, room_id: &str) {
        self.active_room_id = Some(room_id.to_string());
        self.screen = Screen::InsideRoom;
    }

    pub fn exit_room(&mut self) {
        self.active_room_id = None;
        self.screen = Screen::VoiceRooms;
    }

    pub fn on_signed_in(&mut self) {
        self.navigate(Screen::Messages);
    }

    pub fn on_signed_out(&mut self) {
        self.navigate(Screen::Onboarding);
        self.overlays = Overlays::default();
    }

    pub fn set_create_modal(&mut self, open: bool) {
        self.overlays.create_modal = open;
    }

    pub fn set_profile_panel(&mut self, open: bool) {
        self.overlays.profile_panel = open;
    }

    pub fn open_story(&mut self, user_id: &str) {
        self.overlays.story_user_id = Some(user_id.to_string());
        self.overlays.profile_panel = false;
    }

    pub fn close_story(&mut self) {
        self.overlays.story_user_id = None;
    }

    /// `delta_x` is start minus end, so positive means a leftward swipe.
    pub fn on_swipe(&mut self, delta_x: f32, signed_in: bool) {
        let panel_open = self.overlays.profile_panel;
        if delta_x > SWIPE_THRESHOLD
            && !panel_open
            && signed_in
            && !self.visible_screen(signed_in).blocks_profile_swipe()
        {
            self.overlays.profile_panel = true;
        }
        if delta_x < -SWIPE_THRESHOLD && panel_open {
            self.overlays.profile_panel = false;
        }
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    /// Show `message`, replacing any current toast. Auto-dismiss needs a tokio
    /// runtime; without one the toast stays until [`Router::dismiss_toast`].
    pub fn show_toast(&mut self, message: impl Into<String>) -> u64 {
        self.toast_seq += 1;
        let id = self.toast_seq;
        self.toast = Some(Toast {
            id,
            message: message.into(),
        });

        // replacing the timer aborts the previous one
        self.toast_timer = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let tx = self.expired_tx.clone();
                let duration = self.toast_duration;
                Some(ToastTimer {
                    handle: runtime.spawn(async move {
                        tokio::time::sleep(duration).await;
                        let _ = tx.send(id);
                    }),
                })
            }
            Err(_) => None,
        };
        id
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
        self.toast_timer = None;
    }

    /// Clear the toast if `id` is still the one on screen.
    pub fn on_toast_expired(&mut self, id: u64) {
        if self.toast.as_ref().is_some_and(|t| t.id == id) {
            self.toast = None;
            self.toast_timer = None;
        }
    }

    /// Apply any timer expirations that fired since the last call.
    pub fn poll_toast_expiry(&mut self) {
        while let Ok(id) = self.expired_rx.try_recv() {
            self.on_toast_expired(id);
        }
    }

    /// Wait for the current toast's timer and clear it. Returns immediately
    /// when there is nothing on screen.
    pub async fn wait_toast_expiry(&mut self) {
        while self.toast.is_some() && self.toast_timer.is_some() {
            match self.expired_rx.recv().await {
                Some(id) => self.on_toast_expired(id),
                None => break,
            }
        }
    }
}
