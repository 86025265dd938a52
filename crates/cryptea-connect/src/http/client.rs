/*
[INPUT]:  HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client ready for backend calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::http::{CrypteaError, Result};

/// Base URL for the Cryptea verification backend
const DEFAULT_BASE_URL: &str = "https://api.cryptea.info";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the verification backend
#[derive(Debug, Clone)]
pub struct CrypteaClient {
    http_client: Client,
    base_url: Url,
}

impl CrypteaClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a new client against an explicit base URL (used by tests)
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Build a request builder for a backend endpoint
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Send a request and decode the JSON body.
    ///
    /// Non-2xx statuses become `Api` errors; a 2xx body that does not
    /// match `T` becomes `MalformedResponse`.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CrypteaError::api_error(status, body));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| CrypteaError::MalformedResponse(format!("invalid JSON body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde::Deserialize;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Pong {
        ok: bool,
    }

    async fn client_for(server: &MockServer) -> CrypteaClient {
        CrypteaClient::with_config_and_base_url(ClientConfig::default(), &server.uri()).unwrap()
    }

    #[tokio::test]
    async fn test_send_json_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let builder = client.request(Method::GET, "/ping").unwrap();
        let pong: Pong = client.send_json(builder).await.unwrap();
        assert!(pong.ok);
    }

    #[tokio::test]
    async fn test_send_json_maps_non_2xx_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let builder = client.request(Method::GET, "/ping").unwrap();
        let err = client.send_json::<Pong>(builder).await.unwrap_err();
        match err {
            CrypteaError::Api { code, message } => {
                assert_eq!(code, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_json_maps_garbage_body_to_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let builder = client.request(Method::GET, "/ping").unwrap();
        let err = client.send_json::<Pong>(builder).await.unwrap_err();
        assert!(matches!(err, CrypteaError::MalformedResponse(_)));
    }
}
