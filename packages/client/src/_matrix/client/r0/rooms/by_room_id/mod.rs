//! Endpoints below `/rooms/{roomId}`

pub mod invite;
pub mod joined_members;
pub mod messages;
pub mod state;

/// Percent-encoded `/rooms/{roomId}` path prefix
pub(crate) fn room_path(room_id: &str) -> String {
    format!("/rooms/{}", urlencoding::encode(room_id))
}
