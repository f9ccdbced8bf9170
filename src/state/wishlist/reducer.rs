use crate::state::line_items::{self, LineOp};
use crate::state::mvi::Reducer;

use super::intent::WishlistIntent;
use super::state::WishlistState;

pub struct WishlistReducer;

impl Reducer for WishlistReducer {
    type State = WishlistState;
    type Intent = WishlistIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        let op = match intent {
            WishlistIntent::Add(item) => LineOp::Add(item),
            WishlistIntent::Remove(key) => LineOp::Remove(key),
            WishlistIntent::SetQuantity { key, quantity } => LineOp::SetQuantity { key, quantity },
            WishlistIntent::Increment(key) => LineOp::Increment(key),
            WishlistIntent::Decrement(key) => LineOp::Decrement(key),
            WishlistIntent::Clear => LineOp::Clear,
        };
        WishlistState::with_totals(line_items::apply(state.items, op))
    }
}
