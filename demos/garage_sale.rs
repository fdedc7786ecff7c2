//! Load the marketplace and print what a listing view would render.
//!
//! Endpoints come from the environment (`BASE_URL`, `GRAPHQL_ENDPOINT`,
//! ...); logging follows `RUST_LOG`.

use garage_store::{MarketStore, PostQuery, StoreConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let store = MarketStore::with_http(StoreConfig::from_env());

    println!("=== Garage Sale ===\n");

    let _ready = store.watch(
        |state| state.is_data_ready(),
        |ready| println!("   [Store Update] data ready: {}", ready),
    );
    let _listing = store.watch(
        |state| state.posts().len(),
        |count| println!("   [Store Update] {} posts", count),
    );

    println!("1. Loading initial data");
    let load = match store.load_initial_data(&PostQuery::default()) {
        Ok(load) => load,
        Err(error) => {
            println!("   initial load failed to start: {}", error);
            return;
        }
    };
    if let Some(location) = store.user_location() {
        println!(
            "   Browsing from {}, {} {}",
            location.city, location.state, location.postal_code
        );
    }

    let report = load.join().await;
    if let Err(error) = &report.post_categories {
        println!("   categories unavailable: {}", error);
    }
    if let Err(error) = &report.post_conditions {
        println!("   conditions unavailable: {}", error);
    }

    println!("\n2. Current listing:");
    for post in store.posts() {
        println!(
            "   - {} ({})",
            post.title().unwrap_or("untitled"),
            post.slug().unwrap_or("-")
        );
    }

    println!("\n3. Searching for \"chair\"");
    store.update_search_term("chair");
    store
        .fetch_posts_from_mongo(&PostQuery::term(store.search_term()))
        .await;
    println!("   {} results", store.posts().len());

    match store.count_listed_objects().await {
        Ok(count) => println!("\n4. REST listing has {} objects", count),
        Err(error) => println!("\n4. REST listing failed: {}", error),
    }
}
