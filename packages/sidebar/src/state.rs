//! Session state observed by the sidebar UI

/// A joined room and the name shown for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomEntry {
    pub room_id: String,
    /// `m.room.name`, or the room ID when the room has no name
    pub name: String,
}

impl RoomEntry {
    pub fn new(room_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { room_id: room_id.into(), name: name.into() }
    }

    /// Entry for a room without a usable name
    pub fn unnamed(room_id: impl Into<String>) -> Self {
        let room_id = room_id.into();
        Self { name: room_id.clone(), room_id }
    }
}

/// Timeline message row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMessage {
    pub event_id: Option<String>,
    pub sender: String,
    pub body: String,
    pub origin_server_ts: Option<u64>,
}

/// Joined member row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMember {
    pub user_id: String,
    pub display_name: Option<String>,
}

/// Everything the sidebar shows, plus the pending input fields.
///
/// Created empty at session start and only changed by the controller once a
/// request has settled.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub access_token: Option<String>,
    /// Currently selected room
    pub room_id: Option<String>,
    /// Room most recently created in this session
    pub new_room_id: Option<String>,
    /// Joined rooms, sorted and unique by room ID
    pub rooms: Vec<RoomEntry>,
    pub messages: Vec<RoomMessage>,
    pub members: Vec<RoomMember>,
    /// Timeline cursor for the current room; `None` until the first fetch
    pub sync_token: Option<String>,

    pub new_room_name: String,
    pub invite_user: String,
    pub join_room_id: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_access_token(access_token: impl Into<String>) -> Self {
        Self { access_token: Some(access_token.into()), ..Self::default() }
    }

    /// Whether a non-empty access token is available
    pub fn has_access_token(&self) -> bool {
        self.access_token.as_deref().is_some_and(|token| !token.is_empty())
    }

    /// Display name of `room_id`, falling back to the ID itself
    pub fn room_name<'a>(&'a self, room_id: &'a str) -> &'a str {
        self.rooms
            .iter()
            .find(|room| room.room_id == room_id)
            .map(|room| room.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(room_id)
    }

    /// Clear the timeline of the current room so the next fetch starts over
    pub fn reset_timeline(&mut self) {
        self.messages.clear();
        self.sync_token = None;
    }

    /// Replace the room list, keeping it sorted and unique by room ID
    pub fn set_rooms(&mut self, mut rooms: Vec<RoomEntry>) {
        rooms.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        rooms.dedup_by(|a, b| a.room_id == b.room_id);
        self.rooms = rooms;
    }

    pub fn is_current_room(&self, room_id: &str) -> bool {
        self.room_id.as_deref() == Some(room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_room_name_falls_back_to_id() {
        let mut state = SessionState::new();
        state.set_rooms(vec![RoomEntry::new("!a:x", "Alpha")]);

        assert_eq!(state.room_name("!a:x"), "Alpha");
        assert_eq!(state.room_name("!zzz:x"), "!zzz:x");
    }

    #[test]
    fn test_set_rooms_sorts_and_dedups() {
        let mut state = SessionState::new();
        state.set_rooms(vec![
            RoomEntry::unnamed("!c:x"),
            RoomEntry::new("!a:x", "Alpha"),
            RoomEntry::unnamed("!b:x"),
            RoomEntry::new("!a:x", "Alpha again"),
        ]);

        let ids: Vec<&str> = state.rooms.iter().map(|r| r.room_id.as_str()).collect();
        assert_eq!(ids, vec!["!a:x", "!b:x", "!c:x"]);
    }

    #[test]
    fn test_reset_timeline_keeps_rooms_and_selection() {
        let mut state = SessionState::with_access_token("token");
        state.room_id = Some("!a:x".to_string());
        state.set_rooms(vec![RoomEntry::unnamed("!a:x")]);
        state.sync_token = Some("s72594_4483_1934".to_string());
        state.messages.push(RoomMessage {
            event_id: Some("$1".to_string()),
            sender: "@alice:x".to_string(),
            body: "hi".to_string(),
            origin_server_ts: None,
        });

        state.reset_timeline();

        assert!(state.messages.is_empty());
        assert_eq!(state.sync_token, None);
        assert_eq!(state.room_id.as_deref(), Some("!a:x"));
        assert_eq!(state.rooms.len(), 1);
    }

    #[test]
    fn test_empty_access_token_is_absent() {
        assert!(!SessionState::new().has_access_token());
        assert!(!SessionState::with_access_token("").has_access_token());
        assert!(SessionState::with_access_token("token").has_access_token());
    }
}
