use crate::state::line_items::LineKey;
use crate::state::mvi::Intent;

use super::state::WishlistItem;

#[derive(Debug, Clone)]
pub enum WishlistIntent {
    Add(WishlistItem),
    Remove(LineKey),
    SetQuantity { key: LineKey, quantity: u32 },
    Increment(LineKey),
    Decrement(LineKey),
    Clear,
}

impl Intent for WishlistIntent {}
