//! Room session controller
//!
//! Every operation is one short chain of requests against the homeserver. State
//! is only touched once a request has settled, and each failure ends at the
//! operation that hit it: it is logged, reported through the [`Notifier`] and
//! returned to the caller.

use std::sync::Arc;

use futures::future::join_all;
use matryx_client::_matrix::client::r0::{
    create_room,
    join,
    joined_rooms,
    rooms::by_room_id::{invite, joined_members, messages, state as room_state},
};
use matryx_client::{CreateRoomRequest, HttpClientError, MatrixHttpClient, MessagesQuery};
use tracing::{debug, error, info, warn};

use crate::config::SidebarConfig;
use crate::error::{OperationError, Result};
use crate::follow_up::{FollowUp, FollowUpQueue};
use crate::notifier::Notifier;
use crate::state::{RoomEntry, RoomMember, RoomMessage, SessionState};

/// Name used for new rooms when the input field is empty
pub const DEFAULT_ROOM_NAME: &str = "New Room";

/// Timeline page size for message follow-ups
pub const DEFAULT_MESSAGE_LIMIT: u32 = 50;

/// Tunables that do not belong to the HTTP layer
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub default_room_name: String,
    pub message_limit: u32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            default_room_name: DEFAULT_ROOM_NAME.to_string(),
            message_limit: DEFAULT_MESSAGE_LIMIT,
        }
    }
}

/// Owns the session state and runs the sidebar operations against it
pub struct RoomSessionController {
    http: MatrixHttpClient,
    state: SessionState,
    follow_ups: FollowUpQueue,
    notifier: Arc<dyn Notifier>,
    settings: ControllerSettings,
}

impl RoomSessionController {
    /// Controller with an empty session
    pub fn new(http: MatrixHttpClient, notifier: Arc<dyn Notifier>, settings: ControllerSettings) -> Self {
        Self {
            http,
            state: SessionState::new(),
            follow_ups: FollowUpQueue::new(),
            notifier,
            settings,
        }
    }

    /// Build the HTTP client from `config` and start a session with its token
    pub async fn from_config(
        config: &SidebarConfig,
        notifier: Arc<dyn Notifier>,
    ) -> std::result::Result<Self, HttpClientError> {
        let http = MatrixHttpClient::new(&config.client_config()?)?;
        let mut controller = Self::new(http, notifier, config.controller_settings());
        if let Some(token) = &config.access_token {
            controller.set_access_token(token.clone()).await;
        }
        Ok(controller)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub async fn set_access_token(&mut self, token: String) {
        self.http.set_access_token(token.clone()).await;
        self.state.access_token = Some(token);
    }

    pub fn set_new_room_name(&mut self, name: impl Into<String>) {
        self.state.new_room_name = name.into();
    }

    pub fn set_invite_user(&mut self, user_id: impl Into<String>) {
        self.state.invite_user = user_id.into();
    }

    pub fn set_join_room_id(&mut self, room_id_or_alias: impl Into<String>) {
        self.state.join_room_id = room_id_or_alias.into();
    }

    /// Create a private-chat room named after the input field and select it.
    pub async fn create_room(&mut self) -> Result<String> {
        let result = self.try_create_room().await;
        if let Err(e) = &result {
            error!("Error creating room: {}", e);
            self.report(e, "Failed to create room", "Error creating room");
        }
        result
    }

    async fn try_create_room(&mut self) -> Result<String> {
        let name = match self.state.new_room_name.trim() {
            "" => self.settings.default_room_name.clone(),
            name => name.to_string(),
        };
        info!("Creating room {:?}", name);

        let response = create_room::create_room(&self.http, &CreateRoomRequest::private_chat(name)).await?;
        let room_id = response
            .room_id
            .filter(|room_id| !room_id.is_empty())
            .ok_or_else(|| OperationError::api(response.errcode, response.error))?;

        self.state.new_room_id = Some(room_id.clone());
        self.state.room_id = Some(room_id.clone());
        self.state.new_room_name.clear();
        self.state.reset_timeline();
        self.notifier.notify(&format!("Room created: {room_id}"));

        self.refresh_rooms_after_change().await;
        self.follow_ups.refresh_room(&room_id);
        Ok(room_id)
    }

    /// Reload the joined rooms and their display names.
    ///
    /// Name lookups run concurrently and never fail the batch: a room whose
    /// name cannot be read is listed under its ID. Failures of the joined-rooms
    /// call are logged and leave the current list untouched.
    pub async fn fetch_rooms_with_names(&mut self) -> Result<()> {
        if !self.state.has_access_token() {
            debug!("No access token, not fetching rooms");
            return Ok(());
        }

        let response = joined_rooms::get_joined_rooms(&self.http).await.inspect_err(|e| {
            error!("Fetch rooms error: {}", e);
        })?;
        let Some(room_ids) = response.joined_rooms else {
            error!("Fetch rooms error: response has no joined_rooms");
            return Err(OperationError::api(None, response.error));
        };

        let http = &self.http;
        let lookups = room_ids.into_iter().map(move |room_id| async move {
            match room_state::get_room_name(http, &room_id).await {
                Ok(content) => match content.name.filter(|name| !name.is_empty()) {
                    Some(name) => RoomEntry::new(room_id, name),
                    None => RoomEntry::unnamed(room_id),
                },
                Err(e) => {
                    warn!("Could not fetch name for room {}: {}", room_id, e);
                    RoomEntry::unnamed(room_id)
                },
            }
        });
        let rooms = join_all(lookups).await;

        self.state.set_rooms(rooms);
        info!("Loaded {} joined rooms", self.state.rooms.len());

        if self.state.room_id.is_none()
            && let Some(first) = self.state.rooms.first()
        {
            let room_id = first.room_id.clone();
            debug!("Selecting first room {}", room_id);
            self.state.room_id = Some(room_id.clone());
            self.follow_ups.refresh_room(&room_id);
        }

        Ok(())
    }

    /// Room refresh after a create or join; its failures are already logged
    /// and must not fail the operation that changed rooms.
    async fn refresh_rooms_after_change(&mut self) {
        if let Err(e) = self.fetch_rooms_with_names().await {
            debug!("Room list left as is after refresh failure: {}", e);
        }
    }

    /// Display name of `room_id`, or the ID itself when it is not listed
    pub fn get_room_name<'a>(&'a self, room_id: &'a str) -> &'a str {
        self.state.room_name(room_id)
    }

    /// Select `room_id` and reload its timeline.
    ///
    /// An empty ID keeps the current selection but still reloads it.
    pub fn switch_room(&mut self, room_id: &str) {
        if !room_id.is_empty() {
            self.state.room_id = Some(room_id.to_string());
        }
        self.state.reset_timeline();

        if let Some(current) = self.state.room_id.clone() {
            debug!("Switched to room {}", current);
            self.follow_ups.refresh_room(&current);
        }
    }

    /// Invite the user from the invite field to the current room.
    pub async fn invite_user_to_room(&mut self) -> Result<()> {
        let user_id = self.state.invite_user.trim().to_string();
        let Some(room_id) = self.state.room_id.clone().filter(|_| !user_id.is_empty()) else {
            warn!("No invite user or room selected, not inviting");
            return Ok(());
        };

        match invite::invite_user(&self.http, &room_id, &user_id).await {
            Ok(()) => {
                let entered = std::mem::take(&mut self.state.invite_user);
                self.notifier.notify(&format!("User {entered} invited to room successfully!"));
                Ok(())
            },
            Err(e) => {
                let e = OperationError::from(e);
                error!("Invite failed: {}", e);
                self.report(&e, "Invite failed", "Invite error");
                Err(e)
            },
        }
    }

    /// Join the room ID or alias from the join field and select it.
    pub async fn join_room(&mut self) -> Result<Option<String>> {
        let target = self.state.join_room_id.trim().to_string();
        if target.is_empty() {
            debug!("Empty join input, not joining");
            return Ok(None);
        }

        match self.try_join_room(&target).await {
            Ok(room_id) => Ok(Some(room_id)),
            Err(e) => {
                error!("Join room error for {}: {}", target, e);
                self.report(&e, "Join failed", "Join room error");
                Err(e)
            },
        }
    }

    async fn try_join_room(&mut self, target: &str) -> Result<String> {
        let response = join::join_room(&self.http, target).await?;
        let room_id = response
            .room_id
            .filter(|room_id| !room_id.is_empty())
            .ok_or_else(|| OperationError::api(response.errcode, response.error))?;

        self.state.room_id = Some(room_id.clone());
        self.state.join_room_id.clear();
        self.state.reset_timeline();

        self.refresh_rooms_after_change().await;
        self.follow_ups.refresh_room(&room_id);
        self.notifier.notify("Successfully joined the room!");
        Ok(room_id)
    }

    /// Hand the queued follow-ups to a host that runs them itself
    pub fn take_follow_ups(&mut self) -> Vec<FollowUp> {
        self.follow_ups.drain()
    }

    pub fn pending_follow_ups(&self) -> usize {
        self.follow_ups.len()
    }

    /// Run queued follow-ups in order, including any they queue themselves.
    ///
    /// Failures are logged only.
    pub async fn run_follow_ups(&mut self) {
        while let Some(follow_up) = self.follow_ups.pop() {
            debug!("Running follow-up: {}", follow_up);
            let result = match &follow_up {
                FollowUp::FetchMessages { room_id } => self.fetch_messages(room_id).await,
                FollowUp::FetchMembers { room_id } => self.fetch_room_members(room_id).await,
            };
            if let Err(e) = result {
                warn!("Follow-up failed ({}): {}", follow_up, e);
            }
        }
    }

    /// Append the next timeline page of `room_id` and advance the sync token
    pub async fn fetch_messages(&mut self, room_id: &str) -> Result<()> {
        let from = self.state.sync_token.clone().filter(|_| self.state.is_current_room(room_id));
        let query = MessagesQuery {
            from: from.as_deref(),
            limit: self.settings.message_limit,
        };
        let page = messages::get_messages(&self.http, room_id, &query).await?;

        if !self.state.is_current_room(room_id) {
            debug!("Dropping messages of {}, no longer the current room", room_id);
            return Ok(());
        }

        self.state.messages.extend(page.chunk.iter().filter_map(|event| {
            event.message_body().map(|body| RoomMessage {
                event_id: event.event_id.clone(),
                sender: event.sender.clone().unwrap_or_default(),
                body: body.to_string(),
                origin_server_ts: event.origin_server_ts,
            })
        }));
        if let Some(end) = page.end {
            self.state.sync_token = Some(end);
        }
        Ok(())
    }

    /// Replace the member list with the joined members of `room_id`
    pub async fn fetch_room_members(&mut self, room_id: &str) -> Result<()> {
        let response = joined_members::get_joined_members(&self.http, room_id).await?;

        if !self.state.is_current_room(room_id) {
            debug!("Dropping members of {}, no longer the current room", room_id);
            return Ok(());
        }

        self.state.members = response
            .joined
            .into_iter()
            .map(|(user_id, member)| RoomMember { user_id, display_name: member.display_name })
            .collect();
        Ok(())
    }

    fn report(&self, error: &OperationError, failed_label: &str, error_label: &str) {
        self.notifier.notify(&error.user_message(failed_label, error_label));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matryx_client::ClientConfig;
    use std::sync::Mutex;
    use url::Url;

    fn offline_controller() -> (RoomSessionController, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let notifier = Arc::new(move |message: &str| sink.lock().unwrap().push(message.to_string()));
        let http = MatrixHttpClient::new(&ClientConfig::new(Url::parse("http://127.0.0.1:9").unwrap())).unwrap();
        (RoomSessionController::new(http, notifier, ControllerSettings::default()), seen)
    }

    #[test]
    fn test_switch_room_selects_and_queues_refresh() {
        let (mut controller, _) = offline_controller();
        controller.state.sync_token = Some("t1".to_string());

        controller.switch_room("!a:x");

        assert_eq!(controller.state().room_id.as_deref(), Some("!a:x"));
        assert_eq!(controller.state().sync_token, None);
        assert_eq!(
            controller.take_follow_ups(),
            vec![
                FollowUp::FetchMessages { room_id: "!a:x".to_string() },
                FollowUp::FetchMembers { room_id: "!a:x".to_string() },
            ]
        );
    }

    #[test]
    fn test_switch_room_empty_keeps_selection_and_clears_timeline() {
        let (mut controller, _) = offline_controller();
        controller.switch_room("!a:x");
        controller.take_follow_ups();
        controller.state.messages.push(RoomMessage {
            event_id: None,
            sender: "@alice:x".to_string(),
            body: "hi".to_string(),
            origin_server_ts: None,
        });
        controller.state.sync_token = Some("t2".to_string());

        controller.switch_room("");

        assert_eq!(controller.state().room_id.as_deref(), Some("!a:x"));
        assert!(controller.state().messages.is_empty());
        assert_eq!(controller.state().sync_token, None);
        assert_eq!(controller.pending_follow_ups(), 2);
    }

    #[test]
    fn test_switch_room_empty_without_selection_queues_nothing() {
        let (mut controller, _) = offline_controller();
        controller.switch_room("");
        assert_eq!(controller.state().room_id, None);
        assert_eq!(controller.pending_follow_ups(), 0);
    }

    #[test]
    fn test_get_room_name_unknown_room() {
        let (controller, _) = offline_controller();
        assert_eq!(controller.get_room_name("!nope:x"), "!nope:x");
    }

    #[tokio::test]
    async fn test_fetch_rooms_without_token_is_noop() {
        let (mut controller, seen) = offline_controller();
        controller.fetch_rooms_with_names().await.unwrap();
        assert!(controller.state().rooms.is_empty());
        assert!(seen.lock().unwrap().is_empty());
    }
}
