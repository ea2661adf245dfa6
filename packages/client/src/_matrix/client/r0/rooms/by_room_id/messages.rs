//! GET /_matrix/client/r0/rooms/{roomId}/messages
//!
//! Page forward through a room's timeline starting from a pagination token.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::room_path;
use crate::http_client::{HttpClientError, MatrixHttpClient};

/// Query parameters for a forward timeline page
#[derive(Debug, Clone)]
pub struct MessagesQuery<'a> {
    /// Token to start from; `None` starts at the edge of the timeline
    pub from: Option<&'a str>,
    pub limit: u32,
}

/// A timeline event as returned in `chunk`
#[derive(Debug, Clone, Deserialize)]
pub struct RoomEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub origin_server_ts: Option<u64>,
    #[serde(default)]
    pub content: Value,
}

impl RoomEvent {
    /// The `body` of an `m.room.message` event
    pub fn message_body(&self) -> Option<&str> {
        if self.event_type != "m.room.message" {
            return None;
        }
        self.content.get("body").and_then(Value::as_str)
    }
}

/// One page of timeline events
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub chunk: Vec<RoomEvent>,
    /// Token to continue from; absent at the end of the timeline
    #[serde(default)]
    pub end: Option<String>,
}

/// GET /_matrix/client/r0/rooms/{roomId}/messages
pub async fn get_messages(
    http: &MatrixHttpClient,
    room_id: &str,
    query: &MessagesQuery<'_>,
) -> Result<MessagesResponse, HttpClientError> {
    let path = format!("{}/messages", room_path(room_id));
    let limit = query.limit.to_string();

    let mut params = vec![("dir", "f"), ("limit", limit.as_str())];
    if let Some(from) = query.from {
        params.push(("from", from));
    }

    let response = http.get_with_query::<MessagesResponse>(&path, &params).await?;
    debug!("Fetched {} events for {} (end: {:?})", response.chunk.len(), room_id, response.end);
    Ok(response)
}
