//! HTTP client implementations for the placetrack SDK

use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use placetrack_protocol::{RefreshRequest, RefreshResponse};

use crate::config::Config;
use crate::error::{Result, TrackError};
use crate::store::{SharedTokenStore, ACCESS_TOKEN, REFRESH_TOKEN};

/// List endpoints answer either with a bare array or with the collection
/// wrapped under a `results` key. Both normalize through here.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Wrapped { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListPayload<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListPayload::Wrapped { results } => results,
            ListPayload::Bare(items) => items,
        }
    }
}

/// Client abstraction the resource services are generic over, so tests can
/// substitute a canned implementation.
#[allow(async_fn_in_trait)]
pub trait ApiClient {
    fn config(&self) -> &Config;

    /// Whether a persisted access token is currently available.
    fn is_authenticated(&self) -> bool;

    /// Issue a request and deserialize the JSON response body.
    async fn request<T, R>(&self, method: Method, endpoint: &str, payload: Option<&T>) -> Result<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned;

    /// Issue a request and discard the response body (deletes answer 204).
    async fn execute<T>(&self, method: Method, endpoint: &str, payload: Option<&T>) -> Result<()>
    where
        T: Serialize + Sync;

    /// Multipart file upload.
    async fn upload<R>(
        &self,
        endpoint: &str,
        field: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<R>
    where
        R: DeserializeOwned;
}

/// Fetch a collection endpoint, normalizing both list response shapes.
pub async fn fetch_list<C, R>(client: &C, endpoint: &str) -> Result<Vec<R>>
where
    C: ApiClient,
    R: DeserializeOwned,
{
    let payload: ListPayload<R> = client.request(Method::GET, endpoint, None::<&()>).await?;
    Ok(payload.into_items())
}

/// Production HTTP client.
///
/// The bearer token is re-read from the token store on every request rather
/// than cached, so a refresh performed anywhere in the process is picked up
/// by the next call. A request that comes back 401 triggers exactly one
/// silent refresh-and-replay; a 401 on the replay propagates without a
/// second refresh attempt.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    config: Config,
    store: SharedTokenStore,
}

impl HttpClient {
    pub fn new(config: Config, store: SharedTokenStore) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            http,
            config,
            store,
        })
    }

    pub fn store(&self) -> &SharedTokenStore {
        &self.store
    }

    fn bearer(&self) -> Option<String> {
        self.store.lock().unwrap().get(ACCESS_TOKEN)
    }

    /// Exchange the refresh token for a new access token and persist it.
    ///
    /// Any failure here is irrecoverable for the session: both tokens are
    /// cleared and the caller gets a session-expired error, which the CLI
    /// renders as "please log in again".
    pub async fn refresh_access_token(&self) -> Result<String> {
        match self.try_refresh().await {
            Ok(access) => {
                self.store.lock().unwrap().set(ACCESS_TOKEN, &access)?;
                Ok(access)
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed, tearing down session");
                self.store.lock().unwrap().clear_all()?;
                Err(TrackError::session_expired())
            }
        }
    }

    async fn try_refresh(&self) -> Result<String> {
        let refresh = self
            .store
            .lock()
            .unwrap()
            .get(REFRESH_TOKEN)
            .ok_or_else(|| TrackError::authentication("no refresh token available"))?;

        let request = RefreshRequest { refresh };
        let (status, body) = self
            .send(Method::POST, "/auth/token/refresh/", Some(&request), None)
            .await?;

        let response: RefreshResponse = parse_response(status, body)?;
        Ok(response.access)
    }

    /// Request outside the authenticated path: no bearer header and no
    /// 401 interceptor. Login and registration go through here so a bad
    /// credential response is surfaced instead of triggering a refresh.
    pub async fn request_plain<T, R>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&T>,
    ) -> Result<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let (status, body) = self.send(method, endpoint, payload, None).await?;
        parse_response(status, body)
    }

    async fn send<T>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&T>,
        bearer: Option<&str>,
    ) -> Result<(StatusCode, String)>
    where
        T: Serialize + Sync,
    {
        let url = self.config.endpoint_url(endpoint);

        let mut builder = self
            .http
            .request(method, &url)
            .header("Content-Type", "application/json");

        if let Some(token) = bearer {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        if let Some(data) = payload {
            builder = builder.json(data);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// First attempt with the stored bearer; on a 401 perform the single
    /// refresh and replay once. The replay's status is returned as-is, so a
    /// second 401 can never loop back into another refresh.
    async fn send_with_refresh<T>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&T>,
    ) -> Result<(StatusCode, String)>
    where
        T: Serialize + Sync,
    {
        let token = self.bearer();
        let (status, body) = self
            .send(method.clone(), endpoint, payload, token.as_deref())
            .await?;

        if !should_refresh(status) {
            return Ok((status, body));
        }

        let access = self.refresh_access_token().await?;
        self.send(method, endpoint, payload, Some(access.as_str()))
            .await
    }
}

impl ApiClient for HttpClient {
    fn config(&self) -> &Config {
        &self.config
    }

    fn is_authenticated(&self) -> bool {
        self.bearer().is_some()
    }

    async fn request<T, R>(&self, method: Method, endpoint: &str, payload: Option<&T>) -> Result<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let (status, body) = self.send_with_refresh(method, endpoint, payload).await?;
        parse_response(status, body)
    }

    async fn execute<T>(&self, method: Method, endpoint: &str, payload: Option<&T>) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let (status, body) = self.send_with_refresh(method, endpoint, payload).await?;
        if status.is_success() {
            Ok(())
        } else {
            Err(error_from(status, &body))
        }
    }

    async fn upload<R>(
        &self,
        endpoint: &str,
        field: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<R>
    where
        R: DeserializeOwned,
    {
        // A multipart body is consumed on send, so the form is rebuilt for
        // the single post-refresh replay.
        let (status, body) = self
            .send_multipart(endpoint, field, file_name, bytes.clone(), self.bearer())
            .await?;

        if !should_refresh(status) {
            return parse_response(status, body);
        }

        let access = self.refresh_access_token().await?;
        let (status, body) = self
            .send_multipart(endpoint, field, file_name, bytes, Some(access))
            .await?;
        parse_response(status, body)
    }
}

impl HttpClient {
    async fn send_multipart(
        &self,
        endpoint: &str,
        field: &str,
        file_name: &str,
        bytes: Vec<u8>,
        bearer: Option<String>,
    ) -> Result<(StatusCode, String)> {
        let url = self.config.endpoint_url(endpoint);

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| TrackError::invalid_input(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part(field.to_string(), part);

        let mut builder = self.http.post(&url).multipart(form);
        if let Some(token) = bearer {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

/// Only a 401 on a request that has not been replayed yet triggers the
/// silent refresh.
fn should_refresh(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED
}

fn parse_response<R: DeserializeOwned>(status: StatusCode, body: String) -> Result<R> {
    if !status.is_success() {
        return Err(error_from(status, &body));
    }

    serde_json::from_str(&body).map_err(|_| {
        TrackError::invalid_response(format!(
            "unexpected response body: {}",
            truncate(&body, 200)
        ))
    })
}

/// Map a non-success status onto the error taxonomy, carrying the backend's
/// own message where one can be extracted.
fn error_from(status: StatusCode, body: &str) -> TrackError {
    let message = extract_error_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });

    match status.as_u16() {
        401 => TrackError::authentication(message),
        403 => TrackError::authorization(message),
        404 => TrackError::not_found(message),
        400 => TrackError::validation(message),
        code => TrackError::api(code, message),
    }
}

/// Pull a human-readable message out of a backend error body.
///
/// Handles the flat `{"detail": ...}` / `{"error": ...}` shapes and the
/// field-keyed validation shape `{"field": ["msg", ...]}`, joining the
/// latter into one block with field prefixes kept verbatim.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let map = value.as_object()?;

    for key in ["detail", "error", "message"] {
        if let Some(text) = map.get(key).and_then(|v| v.as_str()) {
            return Some(text.to_string());
        }
    }

    let mut lines = Vec::new();
    for (field, errors) in map {
        match errors {
            serde_json::Value::String(msg) => lines.push(format!("{}: {}", field, msg)),
            serde_json::Value::Array(items) => {
                let msgs: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
                if !msgs.is_empty() {
                    lines.push(format!("{}: {}", field, msgs.join("; ")));
                }
            }
            _ => {}
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_payload_accepts_both_shapes() {
        let bare: ListPayload<i32> = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(bare.into_items(), vec![1, 2, 3]);

        let wrapped: ListPayload<i32> =
            serde_json::from_str(r#"{"results": [4, 5]}"#).unwrap();
        assert_eq!(wrapped.into_items(), vec![4, 5]);
    }

    #[test]
    fn only_first_401_triggers_refresh() {
        assert!(should_refresh(StatusCode::UNAUTHORIZED));
        assert!(!should_refresh(StatusCode::FORBIDDEN));
        assert!(!should_refresh(StatusCode::OK));
        // The replay path returns its status directly instead of routing
        // back through `send_with_refresh`, so a second 401 cannot recurse.
    }

    #[test]
    fn error_mapping_by_status() {
        let err = error_from(StatusCode::FORBIDDEN, r#"{"detail": "nope"}"#);
        assert!(matches!(err, TrackError::Authorization { .. }));

        let err = error_from(StatusCode::NOT_FOUND, "{}");
        assert!(matches!(err, TrackError::NotFound { .. }));

        let err = error_from(StatusCode::BAD_REQUEST, r#"{"name": ["required"]}"#);
        assert!(matches!(err, TrackError::Validation { .. }));

        let err = error_from(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(err, TrackError::Api { status: 500, .. }));
    }

    #[test]
    fn extracts_flat_detail() {
        assert_eq!(
            extract_error_message(r#"{"detail": "No active account"}"#).as_deref(),
            Some("No active account")
        );
        assert_eq!(
            extract_error_message(r#"{"error": "Refresh token is required"}"#).as_deref(),
            Some("Refresh token is required")
        );
    }

    #[test]
    fn joins_field_keyed_errors() {
        let body = r#"{"email": ["A user with this email already exists."], "password": ["Too short.", "Too common."]}"#;
        let message = extract_error_message(body).unwrap();
        assert!(message.contains("email: A user with this email already exists."));
        assert!(message.contains("password: Too short.; Too common."));
    }

    #[test]
    fn non_json_bodies_fall_back_to_status_reason() {
        let err = error_from(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(err.to_string().contains("Bad Gateway"));
    }
}
