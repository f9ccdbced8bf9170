//! Client state stores.
//!
//! Pure reducers for the cart and wishlist built on the MVI primitives,
//! plus the file-backed store that persists them across restarts.

pub mod cart;
pub mod line_items;
pub mod mvi;
pub mod persist;
pub mod wishlist;

pub use line_items::{LineItem, LineKey};
pub use persist::{LocalStore, PersistedSlices, StoreError};
