//! Local JSON data source
//!
//! Plain GET-and-parse access to the JSON files shipped with the
//! application (`posts.json`, `postCategories.json`, `postConditions.json`)
//! and to the REST object listing.

use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::Value;

/// Anything that can GET a URL and parse the body as JSON.
#[async_trait]
pub trait JsonSource: Send + Sync {
    /// Fetch `url` and parse the body.
    ///
    /// # Errors
    /// * `StoreError::Network` / `StoreError::Status` if no successful
    ///   response arrives
    /// * `StoreError::DataFormat` if the body is not JSON
    async fn get_json(&self, url: &str) -> Result<Value, StoreError>;
}

/// [`JsonSource`] over a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct HttpJsonSource {
    client: reqwest::Client,
}

impl HttpJsonSource {
    /// Share an existing client and its connection pool.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JsonSource for HttpJsonSource {
    async fn get_json(&self, url: &str) -> Result<Value, StoreError> {
        tracing::debug!(url = %url, "Fetching JSON");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| StoreError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| StoreError::Network {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_str(&body).map_err(|e| StoreError::data_format(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use mockito::Server;
    use serde_json::json;

    #[tokio::test]
    async fn parses_json_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/data/postConditions.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"name": "New"}, {"name": "Used"}]"#)
            .create_async()
            .await;

        let url = format!("{}/data/postConditions.json", server.url());
        let value = HttpJsonSource::default().get_json(&url).await.unwrap();

        mock.assert_async().await;
        assert_eq!(value, json!([{"name": "New"}, {"name": "Used"}]));
    }

    #[tokio::test]
    async fn non_success_status_is_network_failure() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/data/posts.json")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/data/posts.json", server.url());
        let error = HttpJsonSource::default().get_json(&url).await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(error.kind(), ErrorKind::Network);
        assert!(error.to_string().contains("404"));
    }

    #[tokio::test]
    async fn invalid_body_is_data_format_failure() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/data/posts.json")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let url = format!("{}/data/posts.json", server.url());
        let error = HttpJsonSource::default().get_json(&url).await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(error.kind(), ErrorKind::DataFormat);
    }
}
