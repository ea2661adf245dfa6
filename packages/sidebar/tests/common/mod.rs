#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use matryx_client::{ClientConfig, MatrixHttpClient};
use matryx_sidebar::{ControllerSettings, Notifier, RoomSessionController};
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "syt_test_token";
pub const PREFIX: &str = "/_matrix/client/r0";

/// Keeps every notification for assertions
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

pub struct TestSession {
    pub server: MockServer,
    pub notifier: Arc<RecordingNotifier>,
    pub controller: RoomSessionController,
}

impl TestSession {
    /// Controller pointed at a fresh mock homeserver, with an access token
    pub async fn start() -> Self {
        let mut session = Self::start_without_token().await;
        session.controller.set_access_token(TOKEN.to_string()).await;
        session
    }

    pub async fn start_without_token() -> Self {
        let server = MockServer::start().await;
        let config = ClientConfig::new(Url::parse(&server.uri()).unwrap());
        let http = MatrixHttpClient::new(&config).unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let controller = RoomSessionController::new(http, notifier.clone(), ControllerSettings::default());
        Self { server, notifier, controller }
    }

    pub fn notifications(&self) -> Vec<String> {
        self.notifier.messages()
    }

    pub async fn request_count(&self) -> usize {
        self.server.received_requests().await.map_or(0, |requests| requests.len())
    }

    pub async fn mount_joined_rooms(&self, rooms: &[&str]) {
        Mock::given(method("GET"))
            .and(path(format!("{PREFIX}/joined_rooms")))
            .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "joined_rooms": rooms })))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_room_name(&self, room_id: &str, name: &str) {
        Mock::given(method("GET"))
            .and(path(format!("{}/state/m.room.name", room_path(room_id))))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": name })))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_room_name_missing(&self, room_id: &str) {
        Mock::given(method("GET"))
            .and(path(format!("{}/state/m.room.name", room_path(room_id))))
            .respond_with(ResponseTemplate::new(404).set_body_json(matrix_error(
                "M_NOT_FOUND",
                "Event not found.",
            )))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_json(&self, http_method: &str, api_path: &str, status: u16, body: Value) {
        Mock::given(method(http_method))
            .and(path(format!("{PREFIX}{api_path}")))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }
}

/// Full, percent-encoded `/rooms/{roomId}` path
pub fn room_path(room_id: &str) -> String {
    format!("{PREFIX}/rooms/{}", encode_id(room_id))
}

/// Percent-encoding of the identifier sigils used in these tests
fn encode_id(id: &str) -> String {
    id.replace('!', "%21").replace(':', "%3A").replace('#', "%23").replace('@', "%40")
}

pub fn matrix_error(errcode: &str, error: &str) -> Value {
    json!({ "errcode": errcode, "error": error })
}
