use crate::error::StoreError;
use crate::market::market_store::MarketStore;
use tokio::task::{JoinError, JoinHandle};

/// Handle to the tasks spawned by [`MarketStore::load_initial_data`].
///
/// Dropping it leaves the tasks running.
pub struct InitialLoad {
    store: MarketStore,
    conditions: JoinHandle<Result<(), StoreError>>,
    categories: JoinHandle<Result<(), StoreError>>,
    posts: JoinHandle<()>,
}

/// Outcome of a joined [`InitialLoad`].
#[derive(Debug)]
pub struct InitialLoadReport {
    pub post_conditions: Result<(), StoreError>,
    pub post_categories: Result<(), StoreError>,
    /// Readiness observed once the listing fetch finished
    pub is_data_ready: bool,
}

impl InitialLoadReport {
    /// All three loads succeeded.
    pub fn is_complete(&self) -> bool {
        self.post_conditions.is_ok() && self.post_categories.is_ok() && self.is_data_ready
    }
}

impl InitialLoad {
    pub(crate) fn new(
        store: MarketStore,
        conditions: JoinHandle<Result<(), StoreError>>,
        categories: JoinHandle<Result<(), StoreError>>,
        posts: JoinHandle<()>,
    ) -> Self {
        Self {
            store,
            conditions,
            categories,
            posts,
        }
    }

    /// Whether every spawned task has finished.
    pub fn is_finished(&self) -> bool {
        self.conditions.is_finished() && self.categories.is_finished() && self.posts.is_finished()
    }

    /// Wait for all three tasks.
    pub async fn join(self) -> InitialLoadReport {
        let (conditions, categories, posts) =
            tokio::join!(self.conditions, self.categories, self.posts);

        if let Err(error) = posts {
            tracing::error!(error = %error, "Listing fetch task failed");
        }

        InitialLoadReport {
            post_conditions: flatten(conditions),
            post_categories: flatten(categories),
            is_data_ready: self.store.is_data_ready(),
        }
    }
}

fn flatten(joined: Result<Result<(), StoreError>, JoinError>) -> Result<(), StoreError> {
    joined.unwrap_or_else(|error| Err(StoreError::TaskFailed(error.to_string())))
}
