//! Reactive state container.
//!
//! A [`Store`] holds one value, hands out snapshots, and tells its
//! subscribers about every write. [`Subscription`] guards keep observers
//! alive only as long as the view that owns them.

mod store;

pub use store::{Store, Subscription};
