use crate::state::line_items::{self, LineOp};
use crate::state::mvi::Reducer;

use super::intent::CartIntent;
use super::state::CartState;

pub struct CartReducer;

impl Reducer for CartReducer {
    type State = CartState;
    type Intent = CartIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        let op = match intent {
            CartIntent::Add(item) => LineOp::Add(item),
            CartIntent::Remove(key) => LineOp::Remove(key),
            CartIntent::SetQuantity { key, quantity } => LineOp::SetQuantity { key, quantity },
            CartIntent::Increment(key) => LineOp::Increment(key),
            CartIntent::Decrement(key) => LineOp::Decrement(key),
            CartIntent::Clear => LineOp::Clear,
        };
        CartState::with_totals(line_items::apply(state.items, op))
    }
}
