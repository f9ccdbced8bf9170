//! Remote data layer.
//!
//! A thin GraphQL-over-HTTP client with an in-memory response cache, the
//! operation documents the storefront sends, and the error taxonomy every
//! higher layer propagates.

mod cache;
mod client;
mod error;
pub mod operations;

pub use cache::{FetchPolicy, ResponseCache};
pub use client::GraphqlClient;
pub use error::GraphqlError;
pub use operations::Operation;
