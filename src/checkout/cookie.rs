use serde::{Deserialize, Serialize};

use crate::state::cart::{CartItem, CartState};

/// The `cart` cookie mirrored from the cart store for request-time checks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CartCookie {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl CartCookie {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_cookie_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&CartState> for CartCookie {
    fn from(cart: &CartState) -> Self {
        Self {
            items: cart.items.clone(),
        }
    }
}
