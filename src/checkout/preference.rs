//! Payment gateway preference construction.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CheckoutConfig;
use crate::state::cart::{CartItem, CartState};

use super::form::CheckoutForm;

const CATEGORY_ID: &str = "retail";
const AUTO_RETURN: &str = "approved";
const EXPIRATION_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub currency_id: String,
    pub category_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayerPhone {
    pub area_code: String,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayerAddress {
    pub street_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_number: Option<i64>,
    pub zip_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payer {
    pub email: String,
    pub name: String,
    pub surname: String,
    pub phone: PayerPhone,
    pub address: PayerAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentMethods {
    pub installments: u32,
}

/// Input of the create-preference mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceInput {
    pub items: Vec<PreferenceItem>,
    pub payer: Payer,
    pub back_urls: BackUrls,
    pub auto_return: String,
    pub external_reference: String,
    pub statement_descriptor: String,
    pub binary_mode: bool,
    pub payment_methods: PaymentMethods,
    pub expires: bool,
    pub expiration_date_from: String,
    pub expiration_date_to: String,
}

/// Preference created by the gateway.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPreference {
    pub id: String,
    #[serde(default)]
    pub init_point: Option<String>,
    #[serde(default)]
    pub sandbox_init_point: Option<String>,
    #[serde(default)]
    pub auto_return: Option<String>,
    #[serde(default)]
    pub back_urls: Option<BackUrls>,
}

/// `ORDER-<unix millis>`.
pub fn external_reference(now: DateTime<Utc>) -> String {
    format!("ORDER-{}", now.timestamp_millis())
}

/// "Color: X Talle: Y", omitting absent parts.
pub fn item_description(color: Option<&str>, size: Option<&str>) -> String {
    let color = color.map(|c| format!("Color: {}", c)).unwrap_or_default();
    let size = size.map(|s| format!("Talle: {}", s)).unwrap_or_default();
    format!("{} {}", color, size).trim().to_string()
}

/// Area code is the first three characters with non-digits removed; the
/// number is every digit after the third.
pub fn phone_parts(phone: &str) -> PayerPhone {
    let area_code = phone.chars().take(3).filter(char::is_ascii_digit).collect();
    let number = phone.chars().filter(char::is_ascii_digit).skip(3).collect();
    PayerPhone { area_code, number }
}

fn leading_number(s: &str) -> Option<i64> {
    let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

fn back_urls(base_url: &str) -> BackUrls {
    let base = base_url.trim_end_matches('/');
    BackUrls {
        success: format!("{}/checkout/success", base),
        failure: format!("{}/checkout/failure", base),
        pending: format!("{}/checkout/pending", base),
    }
}

fn preference_item(item: &CartItem, currency_id: &str) -> PreferenceItem {
    PreferenceItem {
        id: item.id.to_string(),
        title: item.name.clone(),
        description: item_description(
            item.selected_color_name.as_deref(),
            item.selected_size_name.as_deref(),
        ),
        quantity: item.quantity,
        unit_price: item.price,
        currency_id: currency_id.to_string(),
        category_id: CATEGORY_ID.to_string(),
    }
}

/// Build the preference for `cart` as of `now`.
pub fn build_preference(
    cart: &CartState,
    form: &CheckoutForm,
    config: &CheckoutConfig,
    reference: &str,
    now: DateTime<Utc>,
) -> PreferenceInput {
    PreferenceInput {
        items: cart
            .items
            .iter()
            .map(|item| preference_item(item, &config.currency_id))
            .collect(),
        payer: Payer {
            email: form.email.clone(),
            name: form.first_name.clone(),
            surname: form.last_name.clone(),
            phone: phone_parts(&form.phone),
            address: PayerAddress {
                street_name: form.address.clone(),
                street_number: leading_number(&form.apartment),
                zip_code: form.zip_code.clone(),
            },
        },
        back_urls: back_urls(&config.frontend_url),
        auto_return: AUTO_RETURN.to_string(),
        external_reference: reference.to_string(),
        statement_descriptor: config.statement_descriptor.clone(),
        binary_mode: false,
        payment_methods: PaymentMethods {
            installments: config.installments,
        },
        expires: true,
        expiration_date_from: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        expiration_date_to: (now + Duration::hours(EXPIRATION_HOURS))
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}
