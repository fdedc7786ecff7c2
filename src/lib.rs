//! # Garage Store
//!
//! Reactive client-side state for a garage-sale marketplace.
//!
//! ## Store (reactive container)
//!
//! - `Store<T>` - Thread-safe state container that notifies subscribers
//! - `Subscription` - RAII guard; dropping it unsubscribes
//!
//! ## MarketStore (application state)
//!
//! - Accessors for every field of `MarketState`
//! - `set_*` mutations, the only write path
//! - Async actions that fetch listings over GraphQL and taxonomy data from
//!   local JSON files, then commit them through the mutations

pub mod client;
pub mod config;
pub mod error;
pub mod market;
pub mod state;
pub mod store;

// Re-export main types for convenience
pub use config::StoreConfig;
pub use error::{ErrorKind, StoreError};
pub use market::{InitialLoad, InitialLoadReport, MarketStore};
pub use state::{Category, Condition, Location, MarketState, Post, PostQuery, User};
pub use store::{Store, Subscription};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        // Basic smoke test
        let store = MarketStore::with_http(StoreConfig::default());
        assert!(!store.is_data_ready());
        store.update_search_term("bike");
        assert_eq!(store.search_term(), "bike");
    }
}
