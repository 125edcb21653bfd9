// src/services/auth.rs
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::{ApiClient, ApiRequest};
use crate::error::ApiResult;
use crate::types::{Role, User};

const REGISTER_ENDPOINT: &str = "/auth/register";
const LOGIN_ENDPOINT: &str = "/auth/login";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignupRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    role_id: i64,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub message: String,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: String,
    pub user: User,
    pub token: String,
}

/// Registration and login. Both go out as public requests: no stored token
/// is attached and a 401 here is a bad password, not an expired session.
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Register a client-role account.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> ApiResult<SignupResponse> {
        let payload = SignupRequest {
            name,
            email,
            password,
            role_id: Role::Client.id(),
        };
        self.client
            .send_as(ApiRequest::post(REGISTER_ENDPOINT).json(&payload)?.public())
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let payload = LoginRequest { email, password };
        self.client
            .send_as(ApiRequest::post(LOGIN_ENDPOINT).json(&payload)?.public())
            .await
    }
}
