//! Voice room participation and the speak-request queue.
//!
//! A [`RoomSession`] exists only while the local user is inside a room.
//! Listeners raise their hand with [`RoomSession::request_to_speak`]; the room
//! admin reviews requests strictly in arrival order. Each request hands back a
//! [`SpeakRequestHandle`] future that resolves with the admin's decision, or
//! with [`SpeakDecision::Cancelled`] once the requester leaves or the session
//! is dropped.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

use crate::error::{AppError, AppResult};
use crate::models::{ParticipantRole, User, VoiceRoom};

/// Hand-raise state of a participant. Acceptance is not a resting state: it
/// is reported through [`SpeakDecision::Accepted`] and the status drops back
/// to `None` as the participant becomes a speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakRequestStatus {
    None,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakDecision {
    Accepted,
    Rejected,
    Cancelled,
}

/// Resolves once the admin has answered a speak request.
#[derive(Debug)]
pub struct SpeakRequestHandle {
    rx: oneshot::Receiver<SpeakDecision>,
}

impl SpeakRequestHandle {
    /// Non-blocking check, for render loops that poll instead of awaiting.
    pub fn try_decision(&mut self) -> Option<SpeakDecision> {
        match self.rx.try_recv() {
            Ok(decision) => Some(decision),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(SpeakDecision::Cancelled),
        }
    }
}

impl Future for SpeakRequestHandle {
    type Output = SpeakDecision;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(decision)) => Poll::Ready(decision),
            Poll::Ready(Err(_)) => Poll::Ready(SpeakDecision::Cancelled),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Participant {
    pub user: User,
    pub role: ParticipantRole,
    pub request: SpeakRequestStatus,
    pub muted: bool,
}

impl Participant {
    fn new(user: User, role: ParticipantRole) -> Self {
        Self {
            user: user.public_profile(),
            role,
            request: SpeakRequestStatus::None,
            muted: true,
        }
    }
}

#[derive(Debug)]
struct PendingRequest {
    user_id: String,
    reply: oneshot::Sender<SpeakDecision>,
}

#[derive(Debug)]
pub struct RoomSession {
    room: VoiceRoom,
    local_user_id: String,
    participants: Vec<Participant>,
    requests: VecDeque<PendingRequest>,
}

impl RoomSession {
    /// Enter `room` as `me`. The owner enters as admin; otherwise the room host
    /// holds admin and everyone else, `me` included, starts as a listener.
    pub fn enter(room: VoiceRoom, me: &User, is_owner: bool) -> Self {
        let mut participants: Vec<Participant> = room
            .participants
            .iter()
            .filter(|p| p.id != me.id)
            .enumerate()
            .map(|(i, p)| {
                let role = if i == 0 && !is_owner {
                    ParticipantRole::Admin
                } else {
                    ParticipantRole::Listener
                };
                Participant::new(p.clone(), role)
            })
            .collect();

        let my_role = if is_owner {
            ParticipantRole::Admin
        } else {
            ParticipantRole::Listener
        };
        participants.push(Participant::new(me.clone(), my_role));

        tracing::info!(room_id = %room.id, user = %me.username, role = %my_role, "entered voice room");
        Self {
            room,
            local_user_id: me.id.clone(),
            participants,
            requests: VecDeque::new(),
        }
    }

    pub fn room(&self) -> &VoiceRoom {
        &self.room
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, user_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user.id == user_id)
    }

    fn participant_mut(&mut self, user_id: &str) -> AppResult<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|p| p.user.id == user_id)
            .ok_or_else(|| AppError::Forbidden(format!("{user_id} is not in this room")))
    }

    pub fn local(&self) -> Option<&Participant> {
        self.participant(&self.local_user_id)
    }

    pub fn local_user_id(&self) -> &str {
        &self.local_user_id
    }

    /// Another user walks in as a listener. Re-joining is a no-op.
    pub fn join(&mut self, user: &User) {
        if self.participant(&user.id).is_none() {
            self.participants
                .push(Participant::new(user.clone(), ParticipantRole::Listener));
            tracing::debug!(room_id = %self.room.id, user = %user.username, "participant joined");
        }
    }

    /// Raise a hand. Only listeners without an open request get a handle;
    /// everything else is a silent no-op.
    pub fn request_to_speak(&mut self, user_id: &str) -> AppResult<Option<SpeakRequestHandle>> {
        let room_id = self.room.id.clone();
        let participant = self.participant_mut(user_id)?;

        if participant.role != ParticipantRole::Listener
            || participant.request != SpeakRequestStatus::None
        {
            return Ok(None);
        }
        participant.request = SpeakRequestStatus::Pending;

        let (reply, rx) = oneshot::channel();
        self.requests.push_back(PendingRequest {
            user_id: user_id.to_string(),
            reply,
        });
        tracing::info!(room_id = %room_id, user_id, queued = self.requests.len(), "speak request raised");
        Ok(Some(SpeakRequestHandle { rx }))
    }

    /// Requesters waiting for review, oldest first.
    pub fn pending_requests(&self) -> Vec<&User> {
        self.requests
            .iter()
            .filter_map(|r| self.participant(&r.user_id).map(|p| &p.user))
            .collect()
    }

    /// The request the admin is shown now.
    pub fn next_request(&self) -> Option<&User> {
        self.requests
            .front()
            .and_then(|r| self.participant(&r.user_id))
            .map(|p| &p.user)
    }

    /// Answer the oldest request. Returns who was answered and how, or `None`
    /// when the queue is empty.
    pub fn respond(
        &mut self,
        actor_id: &str,
        approve: bool,
    ) -> AppResult<Option<(String, SpeakDecision)>> {
        let is_admin = self
            .participant(actor_id)
            .is_some_and(|p| p.role == ParticipantRole::Admin);
        if !is_admin {
            return Err(AppError::Forbidden(
                "only the room admin can review speak requests".to_string(),
            ));
        }

        let Some(request) = self.requests.pop_front() else {
            return Ok(None);
        };

        let decision = if approve {
            SpeakDecision::Accepted
        } else {
            SpeakDecision::Rejected
        };

        if let Ok(participant) = self.participant_mut(&request.user_id) {
            match decision {
                SpeakDecision::Accepted => {
                    participant.role = ParticipantRole::Speaker;
                    participant.muted = true;
                }
                _ => participant.role = ParticipantRole::Listener,
            }
            // accepted is reported through the decision; the request itself is consumed
            participant.request = SpeakRequestStatus::None;
        }

        tracing::info!(
            room_id = %self.room.id,
            user_id = %request.user_id,
            ?decision,
            "speak request answered"
        );
        // requester may have stopped waiting; the state change above still holds
        let _ = request.reply.send(decision);
        Ok(Some((request.user_id, decision)))
    }

    /// Flip the mic for speakers and admins. Listeners stay muted. Returns the
    /// resulting mute state.
    pub fn toggle_mute(&mut self, user_id: &str) -> AppResult<bool> {
        let participant = self.participant_mut(user_id)?;
        if participant.role.can_unmute() {
            participant.muted = !participant.muted;
        }
        Ok(participant.muted)
    }

    /// Leave the room. Always allowed; any open request is withdrawn and its
    /// handle resolves as cancelled. Returns `true` when the local user left.
    pub fn exit(&mut self, user_id: &str) -> bool {
        self.participants.retain(|p| p.user.id != user_id);
        // dropping the sender cancels the waiting handle
        self.requests.retain(|r| r.user_id != user_id);
        tracing::info!(room_id = %self.room.id, user_id, "left voice room");
        user_id == self.local_user_id
    }
}
