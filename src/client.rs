//! HTTP client for the external leasing backend
//!
//! Thin wrapper over `reqwest` that attaches the caller's bearer token, joins
//! paths onto the configured base URL and turns non-2xx answers into
//! [`AppError`] with the backend's own message kept verbatim.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::utils::errors::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("building HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("🌐 {} {}", method, url);
        let builder = self
            .client
            .request(method, url)
            .header("Accept", "application/json, text/plain, */*");
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and fail on any non-2xx status.
    async fn send(&self, builder: RequestBuilder) -> AppResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(backend_error(status, &body))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> AppResult<T> {
        let response = self.send(self.request(Method::GET, path, token)).await?;
        Ok(response.json().await?)
    }

    pub async fn get_text_with_query<Q>(&self, path: &str, query: &Q, token: Option<&str>) -> AppResult<String>
    where
        Q: Serialize + ?Sized,
    {
        let response = self
            .send(self.request(Method::GET, path, token).query(query))
            .await?;
        Ok(response.text().await?)
    }

    pub async fn get_bytes(&self, path: &str, token: Option<&str>) -> AppResult<Vec<u8>> {
        let response = self.send(self.request(Method::GET, path, token)).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B, token: Option<&str>) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::POST, path, token).json(body))
            .await?;
        Ok(response.json().await?)
    }

    /// POST a JSON body to an endpoint that answers with plain text.
    pub async fn post_text<B>(&self, path: &str, body: &B, token: Option<&str>) -> AppResult<String>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .send(self.request(Method::POST, path, token).json(body))
            .await?;
        Ok(response.text().await?)
    }

    /// PUT with an optional JSON body, returning the raw text answer.
    pub async fn put_text<B>(&self, path: &str, body: Option<&B>, token: Option<&str>) -> AppResult<String>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(Method::PUT, path, token);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = self.send(builder).await?;
        Ok(response.text().await?)
    }
}

/// Decode a text body that should hold JSON.
pub fn parse_json_text<T: DeserializeOwned>(text: &str) -> AppResult<T> {
    serde_json::from_str(text)
        .map_err(|e| AppError::ExternalApi(format!("Unexpected backend response: {}", e)))
}

/// Map a failed backend answer onto the error taxonomy.
///
/// The message is taken from a JSON `message` or `error` field when present,
/// otherwise from the raw body. 401 and 403 keep their meaning so the
/// authorization interceptor can react to them.
pub fn backend_error(status: StatusCode, body: &str) -> AppError {
    let message = extract_message(body);
    warn!("⚠️ Backend answered {}: {}", status, message);

    match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(if message.is_empty() {
            "Your session has expired. Please log in again.".to_string()
        } else {
            message
        }),
        StatusCode::FORBIDDEN => AppError::Forbidden(if message.is_empty() {
            "You do not have permission to perform this action.".to_string()
        } else {
            message
        }),
        _ => AppError::Backend { status, message },
    }
}

fn extract_message(body: &str) -> String {
    let trimmed = body.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => ["message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        Ok(Value::String(s)) => s.trim().to_string(),
        _ => trimmed.to_string(),
    }
}
