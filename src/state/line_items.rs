//! Line item collection shared by the cart and the wishlist.
//!
//! Items are identified by `(product id, selected color, selected size)`
//! and every quantity stays within `[1, max_quantity]`.

use serde::{Deserialize, Serialize};

/// Identity of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: i64,
    pub color: Option<i64>,
    pub size: Option<i64>,
}

impl LineKey {
    pub fn new(product_id: i64, color: Option<i64>, size: Option<i64>) -> Self {
        Self {
            product_id,
            color,
            size,
        }
    }
}

/// A product variant with a quantity, as stored in the cart or wishlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<i64>,
    /// Units available in stock.
    pub max_quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_color_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size_name: Option<String>,
}

impl LineItem {
    pub fn key(&self) -> LineKey {
        LineKey::new(self.id, self.selected_color, self.selected_size)
    }

    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum LineOp {
    Add(LineItem),
    Remove(LineKey),
    SetQuantity { key: LineKey, quantity: u32 },
    Increment(LineKey),
    Decrement(LineKey),
    Clear,
}

fn clamp_quantity(quantity: u32, max_quantity: u32) -> u32 {
    quantity.clamp(1, max_quantity.max(1))
}

pub(crate) fn apply(mut items: Vec<LineItem>, op: LineOp) -> Vec<LineItem> {
    match op {
        LineOp::Add(mut item) => {
            if item.max_quantity == 0 {
                tracing::warn!(product_id = item.id, "Ignoring add of out-of-stock item");
                return items;
            }
            let key = item.key();
            match items.iter_mut().find(|existing| existing.key() == key) {
                Some(existing) => {
                    existing.quantity = existing
                        .quantity
                        .saturating_add(item.quantity)
                        .min(existing.max_quantity);
                }
                None => {
                    item.quantity = clamp_quantity(item.quantity, item.max_quantity);
                    items.push(item);
                }
            }
        }
        LineOp::Remove(key) => items.retain(|item| item.key() != key),
        LineOp::SetQuantity { key, quantity } => {
            if let Some(item) = items.iter_mut().find(|item| item.key() == key) {
                item.quantity = clamp_quantity(quantity, item.max_quantity);
            }
        }
        LineOp::Increment(key) => {
            if let Some(item) = items.iter_mut().find(|item| item.key() == key) {
                if item.quantity < item.max_quantity {
                    item.quantity += 1;
                }
            }
        }
        LineOp::Decrement(key) => {
            if let Some(item) = items.iter_mut().find(|item| item.key() == key) {
                if item.quantity > 1 {
                    item.quantity -= 1;
                }
            }
        }
        LineOp::Clear => items.clear(),
    }
    items
}

/// Total units and total price, folded over the collection.
pub fn totals(items: &[LineItem]) -> (u32, f64) {
    items.iter().fold((0u32, 0.0f64), |(count, price), item| {
        (count + item.quantity, price + item.subtotal())
    })
}

/// Repair items loaded from storage: drop out-of-stock entries, clamp
/// quantities, merge duplicate keys.
pub(crate) fn normalize(items: Vec<LineItem>) -> Vec<LineItem> {
    items
        .into_iter()
        .fold(Vec::new(), |acc, item| apply(acc, LineOp::Add(item)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, quantity: u32, max_quantity: u32) -> LineItem {
        LineItem {
            id,
            name: format!("Product {}", id),
            slug: format!("product-{}", id),
            price: 10.0,
            description: None,
            quantity,
            selected_color: Some(1),
            selected_size: None,
            max_quantity,
            image: None,
            selected_color_name: None,
            selected_size_name: None,
        }
    }

    #[test]
    fn add_new_item_clamps_quantity() {
        let items = apply(Vec::new(), LineOp::Add(item(1, 9, 3)));
        assert_eq!(items[0].quantity, 3);

        let items = apply(Vec::new(), LineOp::Add(item(2, 0, 3)));
        assert_eq!(items[0].quantity, 1);
    }

    #[test]
    fn add_out_of_stock_is_ignored() {
        let items = apply(Vec::new(), LineOp::Add(item(1, 1, 0)));
        assert!(items.is_empty());
    }

    #[test]
    fn normalize_merges_duplicates() {
        let items = normalize(vec![item(1, 2, 5), item(1, 2, 5), item(2, 7, 4)]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quantity, 4);
        assert_eq!(items[1].quantity, 4);
    }

    #[test]
    fn totals_fold_quantity_and_price() {
        let items = vec![item(1, 2, 5), item(2, 3, 5)];
        assert_eq!(totals(&items), (5, 50.0));
    }
}
