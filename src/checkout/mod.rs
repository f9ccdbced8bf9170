//! Checkout: form validation, payment preference creation and the
//! gateway return flow.

mod cookie;
mod form;
mod pending;
mod preference;
mod result;

use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::CheckoutConfig;
use crate::graphql::operations::CREATE_PAYMENT_PREFERENCE;
use crate::graphql::{GraphqlClient, GraphqlError};
use crate::state::cart::CartState;
use crate::state::{LocalStore, StoreError};

pub use cookie::CartCookie;
pub use form::{CheckoutForm, FieldError, FormField};
pub use pending::{
    remember_customer, saved_customer, CustomerInfo, PendingOrder, CUSTOMER_INFO_KEY,
    PENDING_ORDER_KEY,
};
pub use preference::{
    build_preference, external_reference, item_description, phone_parts, BackUrls, Payer,
    PayerAddress, PayerPhone, PaymentMethods, PaymentPreference, PreferenceInput, PreferenceItem,
};
pub use result::{complete_payment, CompletedPayment, PaymentOutcome, PaymentReturn};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Checkout form is incomplete: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Validation(Vec<FieldError>),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Payment preference failed: {0}")]
    Graphql(#[from] GraphqlError),

    #[error("Payment preference has no checkout link")]
    MissingInitPoint,

    #[error("Failed to save pending order: {0}")]
    Store(#[from] StoreError),
}

impl CheckoutError {
    pub fn error_type(&self) -> &'static str {
        match self {
            CheckoutError::Validation(_) => "validation_error",
            CheckoutError::EmptyCart => "empty_cart",
            CheckoutError::Graphql(_) => "graphql_error",
            CheckoutError::MissingInitPoint => "missing_init_point",
            CheckoutError::Store(_) => "store_error",
        }
    }
}

/// Starts gateway checkouts for the current cart.
#[derive(Clone)]
pub struct CheckoutService {
    client: GraphqlClient,
    config: CheckoutConfig,
    store: LocalStore,
}

impl CheckoutService {
    pub fn new(client: GraphqlClient, config: CheckoutConfig, store: LocalStore) -> Self {
        Self {
            client,
            config,
            store,
        }
    }

    pub async fn create_preference(
        &self,
        input: &PreferenceInput,
    ) -> Result<PaymentPreference, CheckoutError> {
        let preference = self
            .client
            .mutate(
                &CREATE_PAYMENT_PREFERENCE,
                "crearPreferenciaPago",
                &json!({ "input": input }),
            )
            .await?;
        Ok(preference)
    }

    /// Validate, create the preference and record the pending order.
    /// Returns the gateway URL to redirect to.
    pub async fn begin(
        &self,
        cart: &CartState,
        form: &CheckoutForm,
        now: DateTime<Utc>,
    ) -> Result<String, CheckoutError> {
        form.validate().map_err(CheckoutError::Validation)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let reference = external_reference(now);
        let input = build_preference(cart, form, &self.config, &reference, now);
        let preference = self.create_preference(&input).await?;
        let Some(init_point) = preference.init_point.filter(|url| !url.is_empty()) else {
            warn!(preference_id = %preference.id, "Preference without init point");
            return Err(CheckoutError::MissingInitPoint);
        };

        remember_customer(&self.store, form)?;
        PendingOrder::new(cart, form, reference.as_str(), now).save(&self.store)?;

        info!(
            preference_id = %preference.id,
            external_reference = %reference,
            items = cart.items.len(),
            "Checkout started"
        );
        Ok(init_point)
    }
}
