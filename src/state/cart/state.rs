use serde::{Deserialize, Serialize};

use crate::state::line_items::{self, LineItem, LineKey};
use crate::state::mvi::StoreState;

pub type CartItem = LineItem;

/// Shopping cart contents with derived totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_price: f64,
}

impl StoreState for CartState {}

impl CartState {
    /// Build a state from raw items, repairing quantities and totals.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self::with_totals(line_items::normalize(items))
    }

    pub(crate) fn with_totals(items: Vec<CartItem>) -> Self {
        let (total_items, total_price) = line_items::totals(&items);
        Self {
            items,
            total_items,
            total_price,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity of a variant in the cart, 0 when absent.
    pub fn quantity_of(&self, key: &LineKey) -> u32 {
        self.items
            .iter()
            .find(|item| item.key() == *key)
            .map(|item| item.quantity)
            .unwrap_or(0)
    }

    pub fn contains(&self, key: &LineKey) -> bool {
        self.items.iter().any(|item| item.key() == *key)
    }
}
