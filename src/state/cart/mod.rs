//! Cart store.
//!
//! - `state.rs` - Items plus derived totals
//! - `intent.rs` - Add, Remove, SetQuantity, Increment, Decrement, Clear
//! - `reducer.rs` - Pure transitions; totals recomputed after every one

mod intent;
mod reducer;
mod state;

pub use intent::CartIntent;
pub use reducer::CartReducer;
pub use state::{CartItem, CartState};
