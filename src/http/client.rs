//! HTTP transport with failure classification and a single retry.

use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;

use super::error::{ApiError, TransportFailure, parse_body};
use super::retry::with_single_retry;
use crate::config::join_url;

/// HTTP client bound to one service base URL.
///
/// Every failure leaves this type as an [`ApiError`]; callers never see
/// reqwest errors.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the base URL.
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// POSTs `body` as JSON and returns the parsed success body, if any.
    #[tracing::instrument(skip(self, body))]
    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<Option<Value>, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.execute(path, |url| self.client.post(url).json(body))
            .await
    }

    /// GETs `path` and returns the parsed success body, if any.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Option<Value>, ApiError> {
        self.execute(path, |url| self.client.get(url)).await
    }

    async fn execute<F>(&self, path: &str, build: F) -> Result<Option<Value>, ApiError>
    where
        F: Fn(&str) -> RequestBuilder,
    {
        let url = self.url(path);

        with_single_retry(&url, |attempt| {
            let request = build(&url);
            let url = &url;
            async move {
                debug!("Sending request to {} (attempt {})...", url, attempt.number());
                send_once(request).await
            }
        })
        .await
        .map_err(|failure| ApiError::normalize(&failure, &self.base_url))
    }
}

/// One attempt: send, read the body, and classify the outcome.
async fn send_once(request: RequestBuilder) -> Result<Option<Value>, TransportFailure> {
    let response = request
        .send()
        .await
        .map_err(|e| TransportFailure::from_reqwest(&e))?;

    let status = response.status();
    if !status.is_success() {
        // The status is what matters here; a truncated error body is treated as absent.
        let body = response.bytes().await.unwrap_or_default();
        return Err(TransportFailure::server_responded(status.as_u16(), &body));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| TransportFailure::from_reqwest(&e))?;

    Ok(parse_body(&body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{closed_port_url, hang_up_server, stalling_server};
    use mockito::Matcher;
    use serde_json::json;
    use std::time::Duration;

    fn client_with_timeout(base_url: &str, timeout: Duration) -> HttpClient {
        let client = Client::builder().timeout(timeout).build().unwrap();
        HttpClient::new(client, base_url)
    }

    #[tokio::test]
    async fn test_post_json_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/echo")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"question": "hi"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let http = HttpClient::new(Client::new(), server.url());
        let body = http
            .post_json("/api/echo", &json!({"question": "hi"}))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(body, Some(json!({"ok": true})));
    }

    #[tokio::test]
    async fn test_get_empty_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/health")
            .with_status(204)
            .create_async()
            .await;

        let http = HttpClient::new(Client::new(), format!("{}/", server.url()));
        let body = http.get("/api/health").await.unwrap();

        mock.assert_async().await;
        assert_eq!(body, None);
    }

    #[tokio::test]
    async fn test_server_error_single_attempt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/health")
            .with_status(500)
            .with_body(r#"{"message":"db down"}"#)
            .expect(1)
            .create_async()
            .await;

        let http = HttpClient::new(Client::new(), server.url());
        let err = http.get("/api/health").await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.message, "db down");
        assert_eq!(err.status, Some(500));
    }

    #[tokio::test]
    async fn test_text_error_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/health")
            .with_status(502)
            .with_header("content-type", "text/plain")
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let http = HttpClient::new(Client::new(), server.url());
        let err = http.get("/api/health").await.unwrap_err();

        assert_eq!(err.message, "upstream unavailable");
        assert_eq!(err.status, Some(502));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let base = closed_port_url().await;
        let http = HttpClient::new(Client::new(), base.clone());

        let err = http.get("/api/health").await.unwrap_err();

        assert_eq!(err.message, "Network error");
        assert_eq!(err.status, None);
        assert!(err.hint.unwrap().contains(&base));
        assert!(err.detail.is_some());
    }

    #[tokio::test]
    async fn test_dropped_connection_is_retried_once() {
        let (base, connections) = hang_up_server().await;
        let http = HttpClient::new(Client::new(), base.clone());

        let err = http.get("/api/health").await.unwrap_err();

        assert_eq!(err.message, "Network error");
        assert_eq!(err.status, None);
        assert!(err.hint.unwrap().contains(&base));
        assert_eq!(connections.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_timeout_is_retried_once() {
        let (base, connections) = stalling_server(usize::MAX, "").await;
        let http = client_with_timeout(&base, Duration::from_millis(200));

        let err = http.get("/api/health").await.unwrap_err();

        assert_eq!(err.message, "Request timed out");
        assert_eq!(err.status, None);
        assert_eq!(connections.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalid_url_is_unexpected_error() {
        let http = HttpClient::new(Client::new(), "not a url");

        let err = http.get("/api/health").await.unwrap_err();

        assert_eq!(err.message, "Unexpected error");
        assert_eq!(err.status, None);
        assert!(err.detail.is_some());
    }
}
