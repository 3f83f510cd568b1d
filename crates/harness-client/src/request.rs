//! Authenticated request helper
//!
//! Issues exactly one HTTP call per invocation. Non-2xx answers are logged
//! with the server's error payload and returned as [`ClientError::Http`].

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, SET_COOKIE};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::dto::LoginResponse;
use crate::error::{ClientError, ClientResult};

/// Header carrying the realtime session identifier
pub const SESSION_HEADER: HeaderName = HeaderName::from_static("session");

/// One authenticated call
#[derive(Debug, Clone)]
pub struct AuthedRequest<'a> {
    pub token: &'a str,
    pub session: Option<&'a str>,
    pub url: String,
    pub method: Method,
    pub body: Option<Value>,
}

/// Thin wrapper over a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct RequestHelper {
    client: Client,
}

impl RequestHelper {
    /// Create a helper whose calls are bounded by `timeout`
    pub fn new(timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Perform an authenticated call and decode its JSON body
    pub async fn send<T: DeserializeOwned>(&self, request: AuthedRequest<'_>) -> ClientResult<T> {
        let headers = build_headers(Some(request.token), request.session, &request.method)?;
        let (_, text) = self
            .execute(request.method, &request.url, headers, request.body)
            .await?;

        decode(&text)
    }

    /// Exchange credentials and a session identifier for an access token
    ///
    /// Returns the login body and every `Set-Cookie` value joined with `"; "`.
    pub async fn login(
        &self,
        url: &str,
        email: &str,
        password: &str,
        session: &str,
    ) -> ClientResult<(LoginResponse, Option<String>)> {
        let headers = build_headers(None, Some(session), &Method::POST)?;
        let body = json!({ "email": email, "password": password });
        let (response_headers, text) = self
            .execute(Method::POST, url, headers, Some(body))
            .await?;

        Ok((decode(&text)?, join_cookies(&response_headers)))
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<Value>,
    ) -> ClientResult<(HeaderMap, String)> {
        let mut builder = self.client.request(method.clone(), url).headers(headers);

        if let Some(body) = body.filter(|_| carries_body(&method)) {
            builder = builder.body(body.to_string());
        }

        debug!(%method, url, "Sending request");

        let response = builder.send().await.map_err(|e| {
            error!(%method, url, error = %e, "Error in request");
            ClientError::Transport(e)
        })?;

        read_response(&method, url, response).await
    }
}

async fn read_response(
    method: &Method,
    url: &str,
    response: Response,
) -> ClientResult<(HeaderMap, String)> {
    let status = response.status();
    let headers = response.headers().clone();
    let text = response.text().await.map_err(|e| {
        error!(%method, url, error = %e, "Error reading response body");
        ClientError::Transport(e)
    })?;

    if !status.is_success() {
        let err = ClientError::http(status, &text);
        match err.server_body() {
            Some(payload) => error!(%method, url, %status, %payload, "Error in request"),
            None => error!(%method, url, %status, error = %err, "Error in request"),
        }
        return Err(err);
    }

    Ok((headers, text))
}

fn decode<T: DeserializeOwned>(text: &str) -> ClientResult<T> {
    serde_json::from_str(text).map_err(ClientError::Decode)
}

/// POST and PATCH are the only methods that carry a JSON body
fn carries_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PATCH
}

fn build_headers(
    token: Option<&str>,
    session: Option<&str>,
    method: &Method,
) -> ClientResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    if let Some(token) = token {
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {token}"))?);
    }

    if let Some(session) = session.filter(|s| !s.is_empty()) {
        headers.insert(SESSION_HEADER, header_value(session)?);
    }

    if carries_body(method) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    Ok(headers)
}

fn header_value(value: &str) -> ClientResult<HeaderValue> {
    Ok(HeaderValue::from_str(value)?)
}

fn join_cookies(headers: &HeaderMap) -> Option<String> {
    let cookies: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();

    if cookies.is_empty() {
        None
    } else {
        Some(cookies.join("; "))
    }
}
