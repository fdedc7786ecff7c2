//! Network collaborators.
//!
//! The store only talks to the two traits here; the `Http*` types are the
//! default `reqwest` implementations.

mod graphql;
mod json;

pub use graphql::{
    GraphQlClient, GraphQlRequest, HttpGraphQlClient, POSTS_QUERY, SEARCH_POSTS_QUERY,
};
pub use json::{HttpJsonSource, JsonSource};
