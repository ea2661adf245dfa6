//! POST /_matrix/client/r0/join/{roomIdOrAlias}
//!
//! Join a room by room ID or room alias.

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

use crate::http_client::{HttpClientError, MatrixHttpClient};

/// Response when joining a room
#[derive(Debug, Clone, Deserialize)]
pub struct JoinRoomResponse {
    /// The room ID that was joined; absent when the join did not happen
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub errcode: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// POST /_matrix/client/r0/join/{roomIdOrAlias}
///
/// The room identifier can be either:
/// - A room ID (e.g., "!example:matrix.org")
/// - A room alias (e.g., "#general:matrix.org")
pub async fn join_room(
    http: &MatrixHttpClient,
    room_id_or_alias: &str,
) -> Result<JoinRoomResponse, HttpClientError> {
    let path = format!("/join/{}", urlencoding::encode(room_id_or_alias));

    debug!("Joining room: {}", room_id_or_alias);

    match http.post::<_, JoinRoomResponse>(&path, &json!({})).await {
        Ok(response) => {
            if let Some(room_id) = &response.room_id {
                info!("Successfully joined room {} (actual room ID: {})", room_id_or_alias, room_id);
            }
            Ok(response)
        },
        Err(e) => {
            error!("Error joining room {}: {}", room_id_or_alias, e);
            Err(e)
        },
    }
}
