use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checkout::CustomerInfo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    #[serde(default)]
    pub opt_address: String,
    pub city: String,
    pub zip_code: String,
    pub phone: String,
}

/// Address fields without the id, for add and update.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub opt_address: String,
    pub city: String,
    pub zip_code: String,
    pub phone: String,
}

impl AddressInput {
    /// First blank field other than the optional second address line.
    pub fn first_missing(&self) -> Option<&'static str> {
        [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("address", &self.address),
            ("city", &self.city),
            ("zipCode", &self.zip_code),
            ("phone", &self.phone),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// Payload of the `updateUser` mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub auth_type: String,
    pub rol: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedUser {
    pub id: serde_json::Value,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: i64,
    #[serde(default)]
    pub external_reference: Option<String>,
    pub status: String,
    pub total: f64,
    /// Unix millis as a string.
    pub created_at: String,
    /// Only filled by the store-wide order listing.
    #[serde(default)]
    pub order_items: Vec<OrderLine>,
}

/// Line of an order in the store-wide listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

impl OrderSummary {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(&self.created_at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_orders: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderPage {
    pub orders: Vec<OrderSummary>,
    pub pagination: OrderPagination,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    #[serde(default)]
    pub selected_color: Option<String>,
    #[serde(default)]
    pub selected_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    #[serde(flatten)]
    pub contact: CustomerInfo,
    #[serde(default)]
    pub apartment: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub zip_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentMethod {
    pub id: serde_json::Value,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: i64,
    pub external_reference: String,
    pub status: String,
    pub total: f64,
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default)]
    pub items_count: Option<u32>,
    pub created_at: String,
    #[serde(default)]
    pub paid_at: Option<String>,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
    pub customer_info: OrderCustomer,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub mercado_pago_payment_id: Option<String>,
}

impl OrderDetail {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(&self.created_at)
    }
}

fn millis_to_datetime(raw: &str) -> Option<DateTime<Utc>> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
}
