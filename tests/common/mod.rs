// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use hireboard::core::{
    ApiClient, HttpRequest, HttpResponse, HttpTransport, MemoryStorage, RedirectGuard, Session,
    SessionStorage,
};
use hireboard::error::TransportError;
use hireboard::types::{StatusSet, User};
use hireboard::AppContext;
use jsonwebtoken::{encode, EncodingKey, Header};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::oneshot;

pub const BASE_URL: &str = "http://api.test/api";

struct Scripted {
    response: Result<HttpResponse, TransportError>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
}

fn response(status: u16, body: &Value) -> HttpResponse {
    HttpResponse {
        status,
        status_text: reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string(),
        body: if body.is_null() {
            String::new()
        } else {
            body.to_string()
        },
    }
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: Value) {
        self.script.lock().push_back(Scripted {
            response: Ok(response(status, &body)),
            gate: None,
        });
    }

    /// Queue a response that is held back until the returned sender fires.
    pub fn respond_gated(&self, status: u16, body: Value) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().push_back(Scripted {
            response: Ok(response(status, &body)),
            gate: Some(rx),
        });
        tx
    }

    pub fn fail(&self, error: TransportError) {
        self.script.lock().push_back(Scripted {
            response: Err(error),
            gate: None,
        });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request);
        let next = self.script.lock().pop_front();
        let Some(scripted) = next else {
            return Ok(response(500, &json!({ "message": "no scripted response" })));
        };
        if let Some(gate) = scripted.gate {
            let _ = gate.await;
        }
        scripted.response
    }
}

// ===== Tokens and records =====

fn sign(payload: Value) -> String {
    encode(
        &Header::default(),
        &payload,
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .unwrap()
}

pub fn valid_token(user_id: i64, role_id: i64) -> String {
    sign(json!({ "id": user_id, "roleId": role_id, "exp": Utc::now().timestamp() + 3600 }))
}

pub fn expired_token(user_id: i64) -> String {
    sign(json!({ "id": user_id, "roleId": 2, "exp": Utc::now().timestamp() - 60 }))
}

pub fn user_json(id: i64, role_id: i64) -> Value {
    json!({
        "id": id,
        "name": format!("User {}", id),
        "email": format!("user{}@example.com", id),
        "roleId": role_id
    })
}

pub fn user(id: i64, role_id: i64) -> User {
    serde_json::from_value(user_json(id, role_id)).unwrap()
}

pub fn job_json(id: i64, title: &str) -> Value {
    json!({ "id": id, "title": title, "company": "Acme", "location": "Remote" })
}

pub fn application_json(id: i64, job_id: i64, user_id: i64, status: &str) -> Value {
    json!({ "id": id, "jobId": job_id, "userId": user_id, "status": status })
}

// ===== Wiring =====

pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub storage: Arc<MemoryStorage>,
    pub session: Arc<Session>,
    pub ctx: AppContext,
}

pub fn harness() -> Harness {
    harness_with(StatusSet::standard())
}

pub fn harness_with(statuses: StatusSet) -> Harness {
    let transport = MockTransport::new();
    let storage = Arc::new(MemoryStorage::new());
    let session = Arc::new(Session::new(
        storage.clone() as Arc<dyn SessionStorage>,
        RedirectGuard::default(),
    ));
    let client = Arc::new(ApiClient::with_transport(
        BASE_URL,
        transport.clone() as Arc<dyn HttpTransport>,
        Arc::clone(&session),
    ));
    Harness {
        transport,
        storage,
        session,
        ctx: AppContext::with_client(client, statuses),
    }
}

/// A harness whose session already holds a valid token for `user_id`.
pub async fn logged_in(user_id: i64, role_id: i64) -> Harness {
    let h = harness();
    h.session
        .establish(&valid_token(user_id, role_id), &user(user_id, role_id))
        .await
        .unwrap();
    h
}
