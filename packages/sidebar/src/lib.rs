//! Matryx room sidebar
//!
//! Session state and operations behind a Matrix room sidebar: create, list,
//! switch, invite and join, each a short request chain against the homeserver.

pub mod config;
pub mod controller;
pub mod error;
pub mod follow_up;
pub mod logging;
pub mod notifier;
pub mod state;

pub use config::SidebarConfig;
pub use controller::{ControllerSettings, RoomSessionController};
pub use error::OperationError;
pub use follow_up::FollowUp;
pub use notifier::{ConsoleNotifier, Notifier};
pub use state::{RoomEntry, RoomMember, RoomMessage, SessionState};
