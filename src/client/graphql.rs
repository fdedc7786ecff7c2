//! GraphQL access to the listing backend
//!
//! Two named queries are used: `Posts`, scoped by bucket and object type,
//! and `SearchPosts`, a free-text search returning the full post shape.

use crate::error::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Listing query scoped by bucket and object type.
pub const POSTS_QUERY: &str = r#"query Posts($bucket: String, $type: String!) {
    objectsByType(bucket_slug: $bucket, type_slug: $type) {
        _id
        title
        slug
        metadata
    }
}"#;

/// Free-text search returning nested location, user and category objects.
pub const SEARCH_POSTS_QUERY: &str = r#"query SearchPosts($term: String!) {
    searchPosts(term: $term) {
        _id
        title
        description
        condition
        price
        isFree
        categories { name }
        location {
            city
            state
            postalCode
        }
        images
        mainImage
        isSold
        dateAdded
        user {
            email
            firstName
            lastName
        }
    }
}"#;

/// A named query with its variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    pub operation_name: String,
    pub query: String,
    pub variables: Value,
}

impl GraphQlRequest {
    /// `Posts` for one bucket and object type.
    pub fn posts(bucket: &str, type_slug: &str) -> Self {
        Self {
            operation_name: "Posts".to_string(),
            query: POSTS_QUERY.to_string(),
            variables: json!({ "bucket": bucket, "type": type_slug }),
        }
    }

    /// `SearchPosts` for a search term.
    pub fn search_posts(term: &str) -> Self {
        Self {
            operation_name: "SearchPosts".to_string(),
            query: SEARCH_POSTS_QUERY.to_string(),
            variables: json!({ "term": term }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    errors: Option<Vec<GraphQlErrorMessage>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

/// Anything that can run a named GraphQL query.
#[async_trait]
pub trait GraphQlClient: Send + Sync {
    /// Run `request` and return the response's `data` object.
    ///
    /// # Errors
    /// * `StoreError::Network` / `StoreError::Status` on transport failure
    /// * `StoreError::GraphQl` if the response carries any `errors`
    /// * `StoreError::DataFormat` if the body is not a GraphQL response or
    ///   has no `data`
    async fn query(&self, request: &GraphQlRequest) -> Result<Value, StoreError>;
}

/// [`GraphQlClient`] posting JSON to a single endpoint.
#[derive(Debug, Clone)]
pub struct HttpGraphQlClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGraphQlClient {
    /// Post queries to `endpoint` through `client`.
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// The URL queries are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GraphQlClient for HttpGraphQlClient {
    async fn query(&self, request: &GraphQlRequest) -> Result<Value, StoreError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            operation = %request.operation_name,
            "Sending GraphQL query"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|source| StoreError::Network {
                url: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| StoreError::Network {
                url: self.endpoint.clone(),
                source,
            })?;

        let parsed: GraphQlResponse = serde_json::from_str(&body)
            .map_err(|e| StoreError::data_format(request.operation_name.as_str(), e))?;

        if let Some(errors) = parsed.errors.filter(|errors| !errors.is_empty()) {
            return Err(StoreError::GraphQl(
                errors.into_iter().map(|error| error.message).collect(),
            ));
        }

        match parsed.data {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(StoreError::data_format(
                request.operation_name.as_str(),
                "response has no data",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use mockito::{Matcher, Server};

    #[test]
    fn request_serializes_operation_name() {
        let request = GraphQlRequest::posts("garage-sale", "posts");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["operationName"], "Posts");
        assert_eq!(body["variables"], json!({"bucket": "garage-sale", "type": "posts"}));
        assert!(body["query"].as_str().unwrap().contains("objectsByType"));
    }

    #[tokio::test]
    async fn returns_data_object() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "operationName": "SearchPosts",
                "variables": {"term": "chair"}
            })))
            .with_status(200)
            .with_body(r#"{"data": {"searchPosts": [{"_id": "a1", "title": "Chair"}]}}"#)
            .create_async()
            .await;

        let client = HttpGraphQlClient::new(reqwest::Client::new(), format!("{}/v1", server.url()));
        let data = client
            .query(&GraphQlRequest::search_posts("chair"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(data["searchPosts"][0]["title"], "Chair");
    }

    #[tokio::test]
    async fn errors_array_fails_even_with_data() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1")
            .with_status(200)
            .with_body(
                r#"{"data": {"objectsByType": null}, "errors": [{"message": "Bucket not found"}]}"#,
            )
            .create_async()
            .await;

        let client = HttpGraphQlClient::new(reqwest::Client::new(), format!("{}/v1", server.url()));
        let error = client
            .query(&GraphQlRequest::posts("missing", "posts"))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(error.kind(), ErrorKind::DataFormat);
        assert!(error.to_string().contains("Bucket not found"));
    }

    #[tokio::test]
    async fn server_error_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1")
            .with_status(502)
            .create_async()
            .await;

        let client = HttpGraphQlClient::new(reqwest::Client::new(), format!("{}/v1", server.url()));
        let error = client
            .query(&GraphQlRequest::posts("garage-sale", "posts"))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(error, StoreError::Status { status: 502, .. }));
    }

    #[tokio::test]
    async fn missing_data_is_data_format_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1")
            .with_status(200)
            .with_body(r#"{"data": null}"#)
            .create_async()
            .await;

        let client = HttpGraphQlClient::new(reqwest::Client::new(), format!("{}/v1", server.url()));
        let error = client
            .query(&GraphQlRequest::posts("garage-sale", "posts"))
            .await
            .unwrap_err();

        assert!(error.to_string().contains("response has no data"));
    }
}
