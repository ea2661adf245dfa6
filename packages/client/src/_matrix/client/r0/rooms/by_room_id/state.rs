//! GET /_matrix/client/r0/rooms/{roomId}/state/m.room.name

use serde::Deserialize;
use tracing::debug;

use super::room_path;
use crate::http_client::{HttpClientError, MatrixHttpClient};

/// Content of the `m.room.name` state event
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomNameContent {
    #[serde(default)]
    pub name: Option<String>,
}

/// GET /_matrix/client/r0/rooms/{roomId}/state/m.room.name
///
/// Rooms that were never named answer with `M_NOT_FOUND`, which surfaces as
/// `HttpClientError::Matrix`.
pub async fn get_room_name(
    http: &MatrixHttpClient,
    room_id: &str,
) -> Result<RoomNameContent, HttpClientError> {
    let path = format!("{}/state/m.room.name", room_path(room_id));
    let content = http.get::<RoomNameContent>(&path).await?;
    debug!("Room {} name: {:?}", room_id, content.name);
    Ok(content)
}
