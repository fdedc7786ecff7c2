//! The marketplace store: accessors, mutations and actions over
//! [`MarketState`](crate::state::MarketState).

mod initial_load;
mod market_store;

pub use initial_load::{InitialLoad, InitialLoadReport};
pub use market_store::{default_user_location, MarketStore};
