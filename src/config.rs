//! Store configuration
//!
//! Endpoints and content identifiers, read from environment variables with
//! defaults for local development.

use std::env;

const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://graphql.cosmicjs.com/v1";
const DEFAULT_REST_ENDPOINT: &str = "https://api.cosmicjs.com/v1";
const DEFAULT_BUCKET_SLUG: &str = "garage-sale";
const DEFAULT_TYPE_SLUG: &str = "posts";

/// Configuration for a [`MarketStore`](crate::MarketStore)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Deployment base path; always ends with `/`
    pub base_url: String,
    /// GraphQL endpoint used by the listing queries
    pub graphql_endpoint: String,
    /// REST API root used to count listed objects
    pub rest_endpoint: String,
    /// Bucket the listing query is scoped to
    pub bucket_slug: String,
    /// Object type the listing query is scoped to
    pub type_slug: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            graphql_endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            rest_endpoint: DEFAULT_REST_ENDPOINT.to_string(),
            bucket_slug: DEFAULT_BUCKET_SLUG.to_string(),
            type_slug: DEFAULT_TYPE_SLUG.to_string(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            base_url: with_trailing_slash(
                env::var("BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            ),
            graphql_endpoint: env::var("GRAPHQL_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_GRAPHQL_ENDPOINT.to_string()),
            rest_endpoint: env::var("COSMIC_REST_ENDPOINT")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_REST_ENDPOINT.to_string()),
            bucket_slug: env::var("COSMIC_BUCKET")
                .unwrap_or_else(|_| DEFAULT_BUCKET_SLUG.to_string()),
            type_slug: env::var("COSMIC_TYPE").unwrap_or_else(|_| DEFAULT_TYPE_SLUG.to_string()),
        }
    }

    /// Replace the base path, keeping the trailing `/` invariant
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = with_trailing_slash(base_url.into());
        self
    }

    /// Replace the GraphQL endpoint
    pub fn with_graphql_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.graphql_endpoint = endpoint.into();
        self
    }

    /// Replace the REST API root
    pub fn with_rest_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.rest_endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Base path for local JSON data files
    pub fn local_data_url(&self) -> String {
        format!("{}data/", self.base_url)
    }

    /// Base path for post images
    pub fn post_images_path(&self) -> String {
        format!("{}img/posts/", self.base_url)
    }

    /// Base path for responsive post images
    pub fn post_responsive_images_path(&self) -> String {
        format!("{}img/responsive/posts/", self.base_url)
    }

    /// REST listing of every object of the configured type
    pub fn object_type_url(&self) -> String {
        format!(
            "{}/{}/object-type/{}",
            self.rest_endpoint, self.bucket_slug, self.type_slug
        )
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
