//! GET /_matrix/client/r0/joined_rooms

use serde::Deserialize;
use tracing::{debug, error};

use crate::http_client::{HttpClientError, MatrixHttpClient};

/// Rooms the authenticated user is joined to
#[derive(Debug, Clone, Deserialize)]
pub struct JoinedRoomsResponse {
    #[serde(default)]
    pub joined_rooms: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// GET /_matrix/client/r0/joined_rooms
pub async fn get_joined_rooms(http: &MatrixHttpClient) -> Result<JoinedRoomsResponse, HttpClientError> {
    let response = http.get::<JoinedRoomsResponse>("/joined_rooms").await.inspect_err(|e| {
        error!("Failed to list joined rooms: {}", e);
    })?;

    debug!(
        "Joined rooms: {}",
        response.joined_rooms.as_ref().map_or(0, |rooms| rooms.len())
    );
    Ok(response)
}
