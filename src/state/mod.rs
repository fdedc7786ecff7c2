//! Marketplace state and the records it holds.

mod market_state;
mod models;

pub use market_state::MarketState;
pub(crate) use models::is_truthy;
pub use models::{Category, Condition, Location, Post, PostQuery, User};
