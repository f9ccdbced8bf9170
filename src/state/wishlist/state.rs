use serde::{Deserialize, Serialize};

use crate::state::line_items::{self, LineItem, LineKey};
use crate::state::mvi::StoreState;

pub type WishlistItem = LineItem;

/// Saved-for-later items. Same line shape and bounds as the cart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistState {
    pub items: Vec<WishlistItem>,
    pub total_items: u32,
    pub total_price: f64,
}

impl StoreState for WishlistState {}

impl WishlistState {
    pub fn from_items(items: Vec<WishlistItem>) -> Self {
        Self::with_totals(line_items::normalize(items))
    }

    pub(crate) fn with_totals(items: Vec<WishlistItem>) -> Self {
        let (total_items, total_price) = line_items::totals(&items);
        Self {
            items,
            total_items,
            total_price,
        }
    }

    pub fn get(&self, key: &LineKey) -> Option<&WishlistItem> {
        self.items.iter().find(|item| item.key() == *key)
    }

    pub fn contains(&self, key: &LineKey) -> bool {
        self.get(key).is_some()
    }
}
