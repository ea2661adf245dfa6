//! POST /_matrix/client/r0/rooms/{roomId}/invite
//!
//! Invite a user to a room the caller is joined to.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::room_path;
use crate::http_client::{HttpClientError, MatrixHttpClient};

/// Invite request body
#[derive(Debug, Clone, Serialize)]
pub struct InviteRequest {
    pub user_id: String,
}

/// Invite response; empty on success
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InviteResponse {
    #[serde(default)]
    pub errcode: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// POST /_matrix/client/r0/rooms/{roomId}/invite
///
/// An `errcode` in the body is treated as a failure whatever the HTTP status.
pub async fn invite_user(
    http: &MatrixHttpClient,
    room_id: &str,
    user_id: &str,
) -> Result<(), HttpClientError> {
    let path = format!("{}/invite", room_path(room_id));
    let request = InviteRequest { user_id: user_id.to_string() };

    debug!("Inviting {} to {}", user_id, room_id);

    let response = http.post::<_, InviteResponse>(&path, &request).await.inspect_err(|e| {
        error!("Invite of {} to {} failed: {}", user_id, room_id, e);
    })?;

    if let Some(errcode) = response.errcode {
        error!("Invite of {} to {} failed: {} {:?}", user_id, room_id, errcode, response.error);
        return Err(HttpClientError::Matrix { status: 200, errcode, error: response.error });
    }

    info!("Invited {} to {}", user_id, room_id);
    Ok(())
}
