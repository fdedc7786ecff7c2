use crate::client::{GraphQlClient, GraphQlRequest, HttpGraphQlClient, HttpJsonSource, JsonSource};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::market::initial_load::InitialLoad;
use crate::state::{
    is_truthy, Category, Condition, Location, MarketState, Post, PostQuery, User,
};
use crate::store::{Store, Subscription};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

const POSTS_RESOURCE: &str = "posts";
const POST_CATEGORIES_RESOURCE: &str = "postCategories";
const POST_CONDITIONS_RESOURCE: &str = "postConditions";

/// Location assigned by [`MarketStore::load_initial_data`].
pub fn default_user_location() -> Location {
    Location::new("Orlando", "FL", "32821")
}

/// The marketplace state store.
///
/// Reads go through the accessors, writes only through the `set_*`
/// mutations, and the async actions fetch data and finish by calling a
/// mutation. Clones share the same state, so one store can be handed to
/// every view and every spawned action.
#[derive(Clone)]
pub struct MarketStore {
    store: Store<MarketState>,
    config: Arc<StoreConfig>,
    json: Arc<dyn JsonSource>,
    graphql: Arc<dyn GraphQlClient>,
}

impl MarketStore {
    /// Create a store with startup defaults and the given collaborators.
    pub fn new(
        config: StoreConfig,
        json: Arc<dyn JsonSource>,
        graphql: Arc<dyn GraphQlClient>,
    ) -> Self {
        Self {
            store: Store::new(MarketState::new(&config)),
            config: Arc::new(config),
            json,
            graphql,
        }
    }

    /// Create a store backed by `reqwest` for both collaborators.
    pub fn with_http(config: StoreConfig) -> Self {
        let client = reqwest::Client::new();
        let json = Arc::new(HttpJsonSource::new(client.clone()));
        let graphql = Arc::new(HttpGraphQlClient::new(
            client,
            config.graphql_endpoint.clone(),
        ));
        Self::new(config, json, graphql)
    }

    /// Endpoints and paths this store was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ---- accessors ----

    /// Clone of the whole state.
    pub fn snapshot(&self) -> MarketState {
        self.store.get()
    }

    /// Observe every mutation.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&MarketState) + Send + Sync + 'static,
    {
        self.store.subscribe(callback)
    }

    /// Observe one field; see [`Store::watch`].
    pub fn watch<U, S, F>(&self, selector: S, callback: F) -> Subscription
    where
        U: Clone + PartialEq + Send + 'static,
        S: Fn(&MarketState) -> U + Send + Sync + 'static,
        F: Fn(U) + Send + Sync + 'static,
    {
        self.store.watch(selector, callback)
    }

    /// Whether the listing has been fetched since the last refresh began.
    pub fn is_data_ready(&self) -> bool {
        self.store.read(|state| state.is_data_ready)
    }

    /// Base URL of the bundled JSON data.
    pub fn local_data_url(&self) -> String {
        self.store.read(|state| state.local_data_url.clone())
    }

    /// Directory holding full-size post images.
    pub fn post_images_path(&self) -> String {
        self.store.read(|state| state.post_images_path.clone())
    }

    /// Directory holding resized post images.
    pub fn post_responsive_images_path(&self) -> String {
        self.store
            .read(|state| state.post_responsive_images_path.clone())
    }

    /// The current listing.
    pub fn posts(&self) -> Vec<Post> {
        self.store.read(|state| state.posts.clone())
    }

    /// Where the user is browsing from, if known.
    pub fn user_location(&self) -> Option<Location> {
        self.store.read(|state| state.user_location.clone())
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.store.read(|state| state.current_user.clone())
    }

    /// Whether a user is signed in.
    pub fn is_user_authenticated(&self) -> bool {
        self.store.read(|state| state.is_user_authenticated)
    }

    /// Category taxonomy loaded from local data.
    pub fn post_categories(&self) -> Vec<Category> {
        self.store.read(|state| state.post_categories.clone())
    }

    /// Condition taxonomy loaded from local data.
    pub fn post_conditions(&self) -> Vec<Condition> {
        self.store.read(|state| state.post_conditions.clone())
    }

    /// The current search text.
    pub fn search_term(&self) -> String {
        self.store.read(|state| state.search_term.clone())
    }

    // ---- mutations ----

    /// Set the authentication flag.
    pub fn set_is_user_authenticated(&self, value: bool) {
        self.store.update(|state| state.is_user_authenticated = value);
    }

    /// Replace the signed-in user.
    pub fn set_current_user(&self, value: Option<User>) {
        self.store.update(|state| state.current_user = value);
    }

    /// Replace the browsing location.
    pub fn set_user_location(&self, value: Option<Location>) {
        self.store.update(|state| state.user_location = value);
    }

    /// Replace the whole listing.
    pub fn set_posts(&self, value: Vec<Post>) {
        self.store.update(|state| state.posts = value);
    }

    /// Replace the category taxonomy.
    pub fn set_post_categories(&self, value: Vec<Category>) {
        self.store.update(|state| state.post_categories = value);
    }

    /// Replace the condition taxonomy.
    pub fn set_post_conditions(&self, value: Vec<Condition>) {
        self.store.update(|state| state.post_conditions = value);
    }

    /// Replace the search text.
    pub fn set_search_term(&self, value: impl Into<String>) {
        let value = value.into();
        self.store.update(|state| state.search_term = value);
    }

    /// Set the listing readiness flag.
    pub fn set_is_data_ready(&self, value: bool) {
        self.store.update(|state| state.is_data_ready = value);
    }

    // ---- actions ----

    /// Commit through [`MarketStore::set_is_user_authenticated`].
    pub fn update_user_authentication(&self, value: bool) {
        self.set_is_user_authenticated(value);
    }

    /// Commit through [`MarketStore::set_current_user`].
    pub fn update_current_user(&self, value: Option<User>) {
        self.set_current_user(value);
    }

    /// Commit through [`MarketStore::set_user_location`].
    pub fn update_user_location(&self, value: Option<Location>) {
        self.set_user_location(value);
    }

    /// Commit through [`MarketStore::set_search_term`]. No fetch is started.
    pub fn update_search_term(&self, value: impl Into<String>) {
        self.set_search_term(value);
    }

    /// Load `posts.json` from the local data path into `posts`.
    ///
    /// # Errors
    /// Any fetch, parse or empty-body failure. It is logged, returned, and
    /// leaves state unchanged.
    pub async fn update_posts(&self) -> Result<(), StoreError> {
        let posts = self.fetch_local::<Post>(POSTS_RESOURCE).await?;
        self.set_posts(posts);
        Ok(())
    }

    /// Load `postCategories.json` into `post_categories`.
    ///
    /// # Errors
    /// Same as [`MarketStore::update_posts`].
    pub async fn update_post_categories(&self) -> Result<(), StoreError> {
        let categories = self
            .fetch_local::<Category>(POST_CATEGORIES_RESOURCE)
            .await?;
        self.set_post_categories(categories);
        Ok(())
    }

    /// Load `postConditions.json` into `post_conditions`.
    ///
    /// # Errors
    /// Same as [`MarketStore::update_posts`].
    pub async fn update_post_conditions(&self) -> Result<(), StoreError> {
        let conditions = self
            .fetch_local::<Condition>(POST_CONDITIONS_RESOURCE)
            .await?;
        self.set_post_conditions(conditions);
        Ok(())
    }

    /// Start the initial data load.
    ///
    /// Spawns the condition, category and listing fetches as independent
    /// tasks on the current tokio runtime, then sets the default user
    /// location before returning. Nothing fetched is guaranteed to be in the
    /// store yet; await [`InitialLoad::join`] for that.
    ///
    /// # Errors
    /// [`StoreError::NoRuntime`] when called outside a tokio runtime. Nothing
    /// is spawned and state is unchanged.
    pub fn load_initial_data(&self, query: &PostQuery) -> Result<InitialLoad, StoreError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|error| {
            tracing::error!(error = %error, "Initial load requires a tokio runtime");
            StoreError::NoRuntime(error.to_string())
        })?;

        let conditions = runtime.spawn({
            let store = self.clone();
            async move { store.update_post_conditions().await }
        });
        let categories = runtime.spawn({
            let store = self.clone();
            async move { store.update_post_categories().await }
        });
        let posts = runtime.spawn(self.fetch_posts(query));

        self.set_user_location(Some(default_user_location()));

        Ok(InitialLoad::new(self.clone(), conditions, categories, posts))
    }

    /// Refresh the listing from the `Posts` query.
    ///
    /// A ready store is marked not ready as soon as this is called, before
    /// the returned future is polled. The query always uses the configured
    /// bucket and type; `_query` does not narrow it. On success `posts` is
    /// replaced and the store becomes ready. On failure the error is logged
    /// and `posts` keeps its previous value.
    pub fn fetch_posts(&self, _query: &PostQuery) -> impl Future<Output = ()> + Send + 'static {
        if self.is_data_ready() {
            self.set_is_data_ready(false);
        }

        let store = self.clone();
        async move {
            let request =
                GraphQlRequest::posts(&store.config.bucket_slug, &store.config.type_slug);
            let started = Instant::now();

            match store.query_posts(&request, "objectsByType").await {
                Ok(posts) => {
                    tracing::debug!(
                        count = posts.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Fetched posts"
                    );
                    store.set_posts(posts);
                    store.set_is_data_ready(true);
                }
                Err(error) => {
                    tracing::error!(
                        error = %error,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Failed to fetch posts"
                    );
                }
            }
        }
    }

    /// Replace the listing with the `SearchPosts` results for `query.term`.
    ///
    /// Failures are logged only. The readiness flag is never touched.
    pub async fn fetch_posts_from_mongo(&self, query: &PostQuery) {
        let term = query.term.as_deref().unwrap_or_default();
        let request = GraphQlRequest::search_posts(term);

        match self.query_posts(&request, "searchPosts").await {
            Ok(posts) => {
                tracing::debug!(count = posts.len(), term = %term, "Searched posts");
                self.set_posts(posts);
            }
            Err(error) => {
                tracing::error!(error = %error, term = %term, "Failed to search posts");
            }
        }
    }

    /// Count the objects listed by the REST API for the configured type.
    ///
    /// Diagnostic only; state is not touched.
    ///
    /// # Errors
    /// Fetch failures, or a body without an `objects` array.
    pub async fn count_listed_objects(&self) -> Result<usize, StoreError> {
        let url = self.config.object_type_url();
        let started = Instant::now();

        let count = self.json.get_json(&url).await.and_then(|body| {
            body.get("objects")
                .and_then(Value::as_array)
                .map(Vec::len)
                .ok_or_else(|| StoreError::data_format("objects", "missing objects array"))
        });

        match &count {
            Ok(count) => tracing::info!(
                url = %url,
                count = *count,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Counted listed objects"
            ),
            Err(error) => tracing::error!(url = %url, error = %error, "Failed to count listed objects"),
        }
        count
    }

    async fn query_posts(
        &self,
        request: &GraphQlRequest,
        field: &str,
    ) -> Result<Vec<Post>, StoreError> {
        let mut data = self.graphql.query(request).await?;
        match data.get_mut(field).map(Value::take) {
            Some(Value::Array(items)) => Ok(items.into_iter().map(Post::new).collect()),
            Some(other) => Err(StoreError::data_format(
                field,
                format!("expected a list, got {}", json_type(&other)),
            )),
            None => Err(StoreError::data_format(field, "field missing from response")),
        }
    }

    async fn fetch_local<T: DeserializeOwned>(&self, resource: &str) -> Result<Vec<T>, StoreError> {
        let url = format!("{}{}.json", self.local_data_url(), resource);
        let result = self.load_local(&url, resource).await;

        match &result {
            Ok(items) => tracing::debug!(resource, url = %url, count = items.len(), "Loaded local data"),
            Err(error) => tracing::error!(resource, url = %url, error = %error, "Failed to load local data"),
        }
        result
    }

    async fn load_local<T: DeserializeOwned>(
        &self,
        url: &str,
        resource: &str,
    ) -> Result<Vec<T>, StoreError> {
        let body = self.json.get_json(url).await?;
        if !is_truthy(&body) {
            return Err(StoreError::EmptyPayload {
                resource: resource.to_string(),
            });
        }
        serde_json::from_value(body).map_err(|e| StoreError::data_format(resource, e))
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
