use crate::state::line_items::LineKey;
use crate::state::mvi::Intent;

use super::state::CartItem;

#[derive(Debug, Clone)]
pub enum CartIntent {
    /// Add an item, merging with an existing variant up to stock.
    Add(CartItem),
    Remove(LineKey),
    /// Set an exact quantity, clamped to `[1, max_quantity]`.
    SetQuantity { key: LineKey, quantity: u32 },
    Increment(LineKey),
    Decrement(LineKey),
    Clear,
}

impl Intent for CartIntent {}
