//! Matryx Matrix Client Library
//!
//! Typed bindings for the subset of the Matrix client-server API used to manage
//! the room sidebar: room creation, joined rooms, room names, invites, joins,
//! and the message/member fetches that follow a room change.

pub mod _matrix;
pub mod http_client;

use url::Url;

pub use _matrix::client::r0::{
    create_room::{CreateRoomRequest, CreateRoomResponse, PRIVATE_CHAT_PRESET},
    join::JoinRoomResponse,
    joined_rooms::JoinedRoomsResponse,
    rooms::by_room_id::{
        invite::{InviteRequest, InviteResponse},
        joined_members::{JoinedMember, JoinedMembersResponse},
        messages::{MessagesQuery, MessagesResponse, RoomEvent},
        state::RoomNameContent,
    },
};
pub use http_client::{HttpClientError, MatrixHttpClient};

/// Default API prefix, the legacy r0 client-server API
pub const DEFAULT_API_PREFIX: &str = "/_matrix/client/r0";

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Matryx-Sidebar/0.1.0";

/// Matrix client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The homeserver URL
    pub homeserver_url: Url,
    /// Path prefix of the client-server API on the homeserver
    pub api_prefix: String,
    /// HTTP client timeout in seconds
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
}

impl ClientConfig {
    /// Configuration for `homeserver_url` with default prefix, timeout and user agent
    pub fn new(homeserver_url: Url) -> Self {
        Self {
            homeserver_url,
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
