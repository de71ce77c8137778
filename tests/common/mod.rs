#![allow(dead_code)]

use axum_test::TestServer;
use meetup_server::core::{AppState, database, encode_jwt};
use meetup_server::dtos::CreateUserDTO;
use meetup_server::entities::User;
use meetup_server::repositories::Create;
use serde_json::{Value, json};
use std::sync::Arc;

pub const JWT_SECRET: &str = "integration-test-secret";

/// Server over a fresh in-memory database, with the state kept around so
/// tests can seed users directly.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
}

pub async fn spawn_app() -> TestApp {
    let pool = database::connect_in_memory()
        .await
        .expect("Failed to open test database");
    let state = Arc::new(AppState::new(pool, JWT_SECRET.to_string()));
    let app = meetup_server::create_router(state.clone());
    let server = TestServer::new(app).expect("Failed to create test server");
    TestApp { server, state }
}

/// A user known to the service, with a valid token
pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    pub fn id(&self) -> i32 {
        self.user.user_id
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

pub async fn seed_user(app: &TestApp, nickname: &str) -> TestUser {
    let user = app
        .state
        .user
        .create(&CreateUserDTO {
            nickname: nickname.to_string(),
            profile_image: None,
        })
        .await
        .expect("Failed to seed user");
    let token = encode_jwt(user.nickname.clone(), user.user_id, JWT_SECRET)
        .expect("Failed to create JWT token");
    TestUser { user, token }
}

pub fn meetup_payload() -> Value {
    json!({
        "name": "Rust study",
        "description": "Weekly reading group",
        "place": "Seoul",
        "place_description": "Cafe near the station",
        "image": null,
        "started_at": "2030-01-10",
        "ended_at": null,
        "ad_title": "Rustaceans wanted",
        "ad_ended_at": "2030-01-01",
        "is_public": true,
        "category": "study"
    })
}

/// Creates a meetup organized by `organizer` through the API and returns its id
pub async fn seed_meetup(app: &TestApp, organizer: &TestUser) -> i32 {
    use axum_test::http::HeaderName;

    let response = app
        .server
        .post("/meetup")
        .add_header(HeaderName::from_static("authorization"), organizer.bearer())
        .json(&meetup_payload())
        .await;
    response.assert_status(axum_test::http::StatusCode::CREATED);
    response.json::<Value>()["meetup_id"]
        .as_i64()
        .expect("meetup_id in response") as i32
}

/// Submits a proposal through the API and returns its id
pub async fn seed_proposal(app: &TestApp, meetup_id: i32, proposer: &TestUser, text: &str) -> i32 {
    use axum_test::http::HeaderName;

    let response = app
        .server
        .post(&format!("/meetup/{}/proposal", meetup_id))
        .add_header(HeaderName::from_static("authorization"), proposer.bearer())
        .json(&json!({ "text": text }))
        .await;
    response.assert_status(axum_test::http::StatusCode::CREATED);
    response.json::<Value>()["proposal_id"]
        .as_i64()
        .expect("proposal_id in response") as i32
}
