//! POST /_matrix/client/r0/createRoom
//!
//! Create a new room. The caller becomes the room's creator and first member.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::http_client::{HttpClientError, MatrixHttpClient};

/// Preset for invite-only rooms where every invitee gets equal power
pub const PRIVATE_CHAT_PRESET: &str = "private_chat";

/// Room creation request
#[derive(Debug, Clone, Serialize)]
pub struct CreateRoomRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
}

impl CreateRoomRequest {
    /// A named private-chat room
    pub fn private_chat(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            preset: Some(PRIVATE_CHAT_PRESET.to_string()),
        }
    }
}

/// Room creation response
///
/// A 2xx answer without `room_id` is still a failed creation; `error` then
/// carries whatever the server said.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomResponse {
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub errcode: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// POST /_matrix/client/r0/createRoom - Create a new room
pub async fn create_room(
    http: &MatrixHttpClient,
    request: &CreateRoomRequest,
) -> Result<CreateRoomResponse, HttpClientError> {
    debug!("Creating room with request: {:?}", request);

    match http.post::<_, CreateRoomResponse>("/createRoom", request).await {
        Ok(response) => {
            match &response.room_id {
                Some(room_id) => info!("Successfully created room: {}", room_id),
                None => error!("Room creation answered without a room ID: {:?}", response),
            }
            Ok(response)
        },
        Err(e) => {
            error!("Room creation request failed: {}", e);
            Err(e)
        },
    }
}
