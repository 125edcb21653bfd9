// src/core/service_client.rs
//! HTTP client wrapper for the hiring REST API
//!
//! Every call goes through [`ApiClient::send`], which gates on local token
//! expiry, attaches the bearer token, and turns 401 responses into a forced
//! logout.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

use super::session::Session;
use super::transport::{HttpRequest, HttpTransport, ReqwestTransport};
use crate::auth;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};

/// A request relative to the API base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    public: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
            public: false,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a query parameter; `None` values are left out entirely.
    pub fn param<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> ApiResult<Self> {
        self.body = Some(serde_json::to_value(body).map_err(|e| ApiError::Request {
            message: format!("Failed to encode request body: {}", e),
        })?);
        Ok(self)
    }

    /// Skip the expiry gate and the 401 logout hook (login/register).
    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }
}

pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    session: Arc<Session>,
    base_url: String,
}

impl ApiClient {
    /// Client over the real network.
    pub fn new(config: &ClientConfig, session: Arc<Session>) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::new(config.timeout_seconds)?;
        Ok(Self::with_transport(
            &config.api_base_url,
            Arc::new(transport),
            session,
        ))
    }

    pub fn with_transport(
        base_url: &str,
        transport: Arc<dyn HttpTransport>,
        session: Arc<Session>,
    ) -> Self {
        Self {
            transport,
            session,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Send a request and return the JSON body (`Null` for an empty body).
    pub async fn send(&self, request: ApiRequest) -> ApiResult<serde_json::Value> {
        let bearer = if request.public {
            None
        } else {
            match self.session.persisted_token().await {
                Some(token) if auth::is_token_expired(&token) => {
                    self.session
                        .force_logout("token expired; request cancelled")
                        .await;
                    return Err(ApiError::SessionExpired);
                }
                token => token,
            }
        };

        let method = request.method.clone();
        debug!("[API Request] {} {}", method, request.path);

        let response = self
            .transport
            .execute(HttpRequest {
                method: request.method,
                url: self.url_for(&request.path),
                query: request.query,
                bearer,
                body: request.body,
            })
            .await
            .map_err(|e| {
                error!("[API Error] {} {}: {}", method, request.path, e);
                ApiError::from(e)
            })?;

        debug!(
            "[API Response] {} {} - Status: {}",
            method, request.path, response.status
        );

        if !response.is_success() {
            let err = ApiError::from_response(response.status, &response.status_text, &response.body);
            match response.status {
                401 if !request.public => {
                    error!("[API Error] 401: {}", err);
                    self.session
                        .force_logout("server rejected credentials")
                        .await;
                }
                403 => error!("[API Error] 403 Forbidden access: {}", err),
                404 => error!("[API Error] 404 Resource not found: {}", err),
                500 => error!("[API Error] 500 Internal server error: {}", err),
                status => error!("[API Error] {}: {}", status, err),
            }
            return Err(err);
        }

        if response.body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| {
            error!("Failed to parse response for {} {}: {}", method, request.path, e);
            ApiError::from(e)
        })
    }

    /// Send and decode into `R`.
    pub async fn send_as<R: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<R> {
        let body = self.send(request).await?;
        serde_json::from_value(body).map_err(ApiError::from)
    }

    /// Generic GET request
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.send_as(ApiRequest::get(path)).await
    }

    /// Generic POST request with JSON
    pub async fn post_json<T, R>(&self, path: &str, payload: &T) -> ApiResult<R>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        self.send_as(ApiRequest::post(path).json(payload)?).await
    }
}
