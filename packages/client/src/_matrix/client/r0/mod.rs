//! Client-server API endpoints below `/_matrix/client/r0`

pub mod create_room;
pub mod join;
pub mod joined_rooms;
pub mod rooms;
