pub mod chat_state;
pub mod credentials;
pub mod session;
pub mod voice_room;

pub use chat_state::{ChatState, DeleteGroupConfirmation, MemberUpdate};
pub use credentials::CredentialStore;
pub use session::SessionManager;
pub use voice_room::{RoomSession, SpeakDecision, SpeakRequestHandle, SpeakRequestStatus};
