//! Wishlist store.
//!
//! Mirrors the cart store; `move_to_cart` transfers one variant across.

mod intent;
mod reducer;
mod state;

pub use intent::WishlistIntent;
pub use reducer::WishlistReducer;
pub use state::{WishlistItem, WishlistState};

use crate::state::cart::{CartIntent, CartReducer, CartState};
use crate::state::line_items::LineKey;
use crate::state::mvi::Reducer;

/// Move one wishlist line into the cart.
///
/// The cart merge rules apply (quantities summed up to stock). Unknown
/// keys leave both stores unchanged.
pub fn move_to_cart(
    cart: CartState,
    wishlist: WishlistState,
    key: &LineKey,
) -> (CartState, WishlistState) {
    let Some(item) = wishlist.get(key).cloned() else {
        return (cart, wishlist);
    };
    let cart = CartReducer::reduce(cart, CartIntent::Add(item));
    let wishlist = WishlistReducer::reduce(wishlist, WishlistIntent::Remove(*key));
    (cart, wishlist)
}
