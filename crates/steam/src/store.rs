//! Steam Store API client.
//!
//! Only the `appdetails` endpoint is used, to turn appids into titles.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://store.steampowered.com/api";

/// Errors from the Store client.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct AppDetails {
    #[serde(default)]
    success: bool,
    data: Option<AppData>,
}

#[derive(Debug, Deserialize)]
struct AppData {
    name: String,
}

/// Steam Store API client.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl StoreClient {
    /// Creates a new client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Sets a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Returns the store name of a title.
    ///
    /// `Ok(None)` means the store answered but has no details for the
    /// appid (delisted, region-locked, or not an app).
    pub async fn app_name(&self, appid: &str) -> Result<Option<String>, StoreError> {
        let url = format!("{}/appdetails/", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("appids", appid)])
            .send()
            .await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await?;
        parse_app_name(&body, appid)
    }
}

fn parse_app_name(body: &[u8], appid: &str) -> Result<Option<String>, StoreError> {
    let mut details: HashMap<String, AppDetails> = serde_json::from_slice(body)?;
    Ok(details
        .remove(appid)
        .filter(|d| d.success)
        .and_then(|d| d.data)
        .map(|d| d.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Starts a mock HTTP server that answers one request.
    async fn mock_server(status: u16, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let mut request = String::new();
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                let n = stream.read(&mut buf).await.unwrap_or(0);
                request = String::from_utf8_lossy(&buf[..n]).into_owned();

                let resp = format!(
                    "HTTP/1.1 {status} OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
            request
        });

        (url, handle)
    }

    fn client(url: String) -> StoreClient {
        StoreClient::new(Duration::from_secs(5))
            .unwrap()
            .with_base_url(url)
    }

    #[tokio::test]
    async fn app_name_found() {
        let json = r#"{"620":{"success":true,"data":{"type":"game","name":"Portal 2","steam_appid":620}}}"#;
        let (url, handle) = mock_server(200, json).await;

        let name = client(url).app_name("620").await.unwrap();
        assert_eq!(name.as_deref(), Some("Portal 2"));

        let request = handle.await.unwrap();
        assert!(request.starts_with("GET /appdetails/?appids=620 "));
    }

    #[tokio::test]
    async fn app_name_unsuccessful() {
        let (url, handle) = mock_server(200, r#"{"999":{"success":false}}"#).await;
        assert_eq!(client(url).app_name("999").await.unwrap(), None);
        handle.abort();
    }

    #[tokio::test]
    async fn app_name_api_error() {
        let (url, handle) = mock_server(429, "Too Many Requests").await;
        let err = client(url).app_name("620").await.unwrap_err();
        assert!(err.to_string().contains("429"), "unexpected error: {err}");
        handle.abort();
    }

    #[test]
    fn parse_missing_appid() {
        let body = br#"{"1":{"success":true,"data":{"name":"Other"}}}"#;
        assert_eq!(parse_app_name(body, "2").unwrap(), None);
    }

    #[test]
    fn parse_invalid_json() {
        assert!(matches!(
            parse_app_name(b"<html>", "1"),
            Err(StoreError::Json(_))
        ));
    }
}
