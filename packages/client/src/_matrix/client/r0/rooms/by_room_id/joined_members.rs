//! GET /_matrix/client/r0/rooms/{roomId}/joined_members

use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::room_path;
use crate::http_client::{HttpClientError, MatrixHttpClient};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JoinedMember {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Joined members keyed by user ID
#[derive(Debug, Clone, Deserialize)]
pub struct JoinedMembersResponse {
    #[serde(default)]
    pub joined: BTreeMap<String, JoinedMember>,
}

/// GET /_matrix/client/r0/rooms/{roomId}/joined_members
pub async fn get_joined_members(
    http: &MatrixHttpClient,
    room_id: &str,
) -> Result<JoinedMembersResponse, HttpClientError> {
    let path = format!("{}/joined_members", room_path(room_id));
    let response = http.get::<JoinedMembersResponse>(&path).await?;
    debug!("Room {} has {} joined members", room_id, response.joined.len());
    Ok(response)
}
