//! Order details kept across the gateway redirect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::cart::{CartItem, CartState};
use crate::state::{LocalStore, StoreError};

use super::form::CheckoutForm;

pub const PENDING_ORDER_KEY: &str = "pendingOrder";
pub const CUSTOMER_INFO_KEY: &str = "customerInfo";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl From<&CheckoutForm> for CustomerInfo {
    fn from(form: &CheckoutForm) -> Self {
        Self {
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            address: form.address.clone(),
        }
    }
}

/// Snapshot of an order sent to the gateway, read back by the return pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrder {
    pub items: Vec<CartItem>,
    pub total: f64,
    pub customer_info: CustomerInfo,
    pub external_reference: String,
    /// Unix millis.
    pub timestamp: i64,
}

impl PendingOrder {
    pub fn new(
        cart: &CartState,
        form: &CheckoutForm,
        external_reference: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            items: cart.items.clone(),
            total: cart.total_price,
            customer_info: CustomerInfo::from(form),
            external_reference: external_reference.into(),
            timestamp: now.timestamp_millis(),
        }
    }

    pub fn save(&self, store: &LocalStore) -> Result<(), StoreError> {
        store.set(PENDING_ORDER_KEY, self)
    }

    /// Read and remove the pending order.
    pub fn consume(store: &LocalStore) -> Result<Option<Self>, StoreError> {
        store.take(PENDING_ORDER_KEY)
    }
}

/// Store the form for prefill when the customer asked to save it.
pub fn remember_customer(store: &LocalStore, form: &CheckoutForm) -> Result<bool, StoreError> {
    if !form.save_info {
        return Ok(false);
    }
    store.set(CUSTOMER_INFO_KEY, form)?;
    Ok(true)
}

/// Previously saved checkout details, if any.
pub fn saved_customer(store: &LocalStore) -> Option<CheckoutForm> {
    store.get(CUSTOMER_INFO_KEY)
}
