//! # HTTP Source
//!
//! [`HttpSource`] binds one resource to its REST endpoint through a shared
//! [`ApiClient`]. Transport failures become [`ApiError::Network`]; any
//! non-2xx answer becomes [`ApiError::Validation`] carrying the server's own
//! message when it sent one.

use crate::settings::Settings;
use async_trait::async_trait;
use list_controller::{ApiError, Resource, ResourceSource};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::{json, Value};
use std::marker::PhantomData;
use std::time::Duration;
use tracing::{debug, instrument};

/// Base URL plus a pooled reqwest client; cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self::with_client(http, &settings.api_base_url))
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// Send and map every failure onto [`ApiError`].
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), %body, "Request rejected");
        Err(ApiError::Validation {
            status: status.as_u16(),
            message: server_message(&body),
        })
    }

    /// Send a request whose answer body is irrelevant.
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let mut request = self.request(method, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request).await.map(drop)
    }

    pub async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let response = self
            .execute(self.request(Method::GET, path).query(query))
            .await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"message": ..}`, `{"error": ..}`, `{"detail": ..}`, a
/// structured `{"errors": {"field": "text"}}` (or a list of texts), a bare
/// JSON string, and short plain-text bodies.
pub fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        // Plain text is shown as is; HTML error pages are not.
        return (!body.starts_with('<') && body.len() <= 300).then(|| body.to_owned());
    };
    message_in(&value)
}

fn message_in(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Object(map) => {
            for key in ["message", "error", "detail"] {
                match map.get(key) {
                    Some(Value::String(s)) if !s.trim().is_empty() => {
                        return Some(s.trim().to_owned())
                    }
                    Some(nested @ Value::Object(_)) => {
                        if let Some(msg) = message_in(nested) {
                            return Some(msg);
                        }
                    }
                    _ => {}
                }
            }
            map.get("errors").and_then(field_errors)
        }
        _ => None,
    }
}

fn field_errors(errors: &Value) -> Option<String> {
    let parts: Vec<String> = match errors {
        Value::Object(fields) => fields
            .iter()
            .filter_map(|(field, text)| {
                let text = match text {
                    Value::String(s) => s.clone(),
                    Value::Array(items) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join(", "),
                    _ => return None,
                };
                Some(format!("{field}: {text}"))
            })
            .collect(),
        Value::Array(items) => items.iter().filter_map(message_in).collect(),
        _ => Vec::new(),
    };
    (!parts.is_empty()).then(|| parts.join("; "))
}

/// Query parameters of a list call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Server-side status filter (`active`, `inactive`, `PENDING`, ...).
    pub status: Option<String>,
    /// Parent filter, e.g. `("facultyId", 3)`.
    pub parent: Option<(&'static str, u64)>,
}

impl ListQuery {
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_parent(mut self, key: &'static str, id: u64) -> Self {
        self.parent = Some((key, id));
        self
    }

    pub fn pairs(&self) -> Vec<(&str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        if let Some((key, id)) = self.parent {
            pairs.push((key, id.to_string()));
        }
        pairs
    }
}

/// REST binding of one resource type:
///
/// | Call | Request |
/// |------|---------|
/// | fetch | `GET {path}?status=..&{parent}=..` |
/// | create | `POST {path}` |
/// | update | `PUT {path}/{id}` |
/// | delete | `DELETE {path}/{id}` |
/// | set_active | `PATCH {path}/{id}/status` with `{"active": bool}` |
pub struct HttpSource<T> {
    client: ApiClient,
    path: &'static str,
    _resource: PhantomData<fn() -> T>,
}

impl<T> Clone for HttpSource<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path,
            _resource: PhantomData,
        }
    }
}

impl<T> HttpSource<T> {
    pub fn new(client: ApiClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            _resource: PhantomData,
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl<T: Resource> ResourceSource<T> for HttpSource<T> {
    type Params = ListQuery;

    #[instrument(skip(self), fields(path = self.path))]
    async fn fetch(&self, params: &ListQuery) -> Result<Value, ApiError> {
        debug!("Sending request");
        self.client.get_json(self.path, &params.pairs()).await
    }

    #[instrument(skip_all, fields(path = self.path))]
    async fn create(&self, draft: &T::Draft) -> Result<(), ApiError> {
        debug!(?draft, "Sending request");
        self.client
            .send_json(Method::POST, self.path, Some(draft))
            .await
    }

    #[instrument(skip(self, draft), fields(path = self.path))]
    async fn update(&self, id: &T::Id, draft: &T::Draft) -> Result<(), ApiError> {
        debug!(?draft, "Sending request");
        self.client
            .send_json(Method::PUT, &format!("{}/{id}", self.path), Some(draft))
            .await
    }

    #[instrument(skip(self), fields(path = self.path))]
    async fn delete(&self, id: &T::Id) -> Result<(), ApiError> {
        debug!("Sending request");
        self.client
            .send_json::<Value>(Method::DELETE, &format!("{}/{id}", self.path), None)
            .await
    }

    #[instrument(skip(self), fields(path = self.path))]
    async fn set_active(&self, id: &T::Id, active: bool) -> Result<(), ApiError> {
        debug!("Sending request");
        self.client
            .send_json(
                Method::PATCH,
                &format!("{}/{id}/status", self.path),
                Some(&json!({ "active": active })),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_from_common_error_bodies() {
        assert_eq!(
            server_message(r#"{"status":400,"error":"Bad Request","message":"Name is required"}"#),
            Some("Name is required".into())
        );
        assert_eq!(
            server_message(r#"{"error":{"message":"Duplicated code"}}"#),
            Some("Duplicated code".into())
        );
        assert_eq!(
            server_message(r#"{"errors":{"name":"must not be blank","code":["too long","invalid"]}}"#),
            Some("code: too long, invalid; name: must not be blank".into())
        );
        assert_eq!(server_message(r#""Faculty has programs""#), Some("Faculty has programs".into()));
        assert_eq!(server_message("Forbidden"), Some("Forbidden".into()));
    }

    #[test]
    fn no_message_when_body_says_nothing() {
        assert_eq!(server_message(""), None);
        assert_eq!(server_message(r#"{"status":500}"#), None);
        assert_eq!(server_message("<html><body>502</body></html>"), None);
    }

    #[test]
    fn query_pairs() {
        let query = ListQuery::default()
            .with_status("active")
            .with_parent("facultyId", 3);
        assert_eq!(
            query.pairs(),
            vec![("status", "active".to_string()), ("facultyId", "3".to_string())]
        );
        assert!(ListQuery::default().pairs().is_empty());
    }

    #[test]
    fn urls_join_cleanly() {
        let client = ApiClient::with_client(Client::new(), "http://localhost:8080/api/");
        assert_eq!(client.url("/faculties"), "http://localhost:8080/api/faculties");
        assert_eq!(client.url("programs/4"), "http://localhost:8080/api/programs/4");
    }
}
