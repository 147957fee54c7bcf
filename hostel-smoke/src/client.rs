use std::time::Duration;

use hostel_api_types::{ApiErrorBody, LoginRequest};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;
use tracing::debug;

use crate::error::SmokeError;
use crate::session::SessionToken;

pub const LOGIN_PATH: &str = "/api/login";
pub const COMPLAINTS_PATH: &str = "/api/complaints";

/// Status and body of a response, captured before any expectation is checked
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed body, `None` when the body is empty or not JSON
    pub body: Option<Value>,
    pub raw: String,
}

impl ApiResponse {
    async fn read(response: reqwest::Response) -> Result<Self, SmokeError> {
        let status = response.status().as_u16();
        let raw = response.text().await?;
        let body = serde_json::from_str(&raw).ok();
        Ok(Self { status, body, raw })
    }

    pub fn error_body(&self) -> Option<ApiErrorBody> {
        self.body.as_ref().and_then(ApiErrorBody::from_value)
    }

    /// Status code plus the server's error message when it sent one
    pub fn describe_status(&self) -> String {
        match self.error_body() {
            Some(error) => format!("status {} ({})", self.status, error),
            None => format!("status {}", self.status),
        }
    }
}

/// Thin HTTP client over the hostel API endpoints the smoke runner exercises
pub struct ApiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl ApiClient {
    /// Create a client. Without a timeout, requests use the reqwest default.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, SmokeError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(SmokeError::config("Base URL cannot be empty"));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /api/login` with the credentials as JSON
    pub async fn login(&self, credentials: &LoginRequest) -> Result<ApiResponse, SmokeError> {
        let url = self.endpoint(LOGIN_PATH);
        debug!("POST {} as {}", url, credentials.email);

        let response = self
            .http_client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(credentials)
            .send()
            .await?;

        let response = ApiResponse::read(response).await?;
        debug!("POST {} -> {}", url, response.status);
        Ok(response)
    }

    /// `GET /api/complaints` with a bearer token
    pub async fn list_complaints(&self, token: &SessionToken) -> Result<ApiResponse, SmokeError> {
        self.get(COMPLAINTS_PATH, Some(token)).await
    }

    /// `GET /api/complaints` with no Authorization header at all
    pub async fn list_complaints_anonymous(&self) -> Result<ApiResponse, SmokeError> {
        self.get(COMPLAINTS_PATH, None).await
    }

    async fn get(
        &self,
        path: &str,
        token: Option<&SessionToken>,
    ) -> Result<ApiResponse, SmokeError> {
        let url = self.endpoint(path);
        debug!("GET {} (token: {:?})", url, token);

        let mut request = self.http_client.get(&url);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token.expose()));
        }
        let response = request.send().await?;

        let response = ApiResponse::read(response).await?;
        debug!("GET {} -> {}", url, response.status);
        Ok(response)
    }
}
