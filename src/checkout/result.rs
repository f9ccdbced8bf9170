//! Handling of the gateway's return redirect.

use tracing::info;
use url::Url;

use crate::state::cart::{CartIntent, CartReducer};
use crate::state::mvi::Reducer;
use crate::state::{LocalStore, PersistedSlices, StoreError};

use super::pending::PendingOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success,
    Failure,
    Pending,
}

impl PaymentOutcome {
    /// Outcome implied by a return page path.
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "/checkout/success" => Some(PaymentOutcome::Success),
            "/checkout/failure" => Some(PaymentOutcome::Failure),
            "/checkout/pending" => Some(PaymentOutcome::Pending),
            _ => None,
        }
    }
}

/// Query parameters the gateway appends to its return URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentReturn {
    pub outcome: Option<PaymentOutcome>,
    pub payment_id: Option<String>,
    pub status: Option<String>,
    pub external_reference: Option<String>,
}

impl PaymentReturn {
    pub fn from_url(input: &str) -> Result<Self, url::ParseError> {
        let url = match Url::parse(input) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Url::parse("http://storefront.local/")?.join(input)?
            }
            Err(e) => return Err(e),
        };

        let mut parsed = Self {
            outcome: PaymentOutcome::from_path(url.path()),
            ..Self::default()
        };
        for (key, value) in url.query_pairs() {
            let slot = match key.as_ref() {
                "payment_id" => &mut parsed.payment_id,
                "status" => &mut parsed.status,
                "external_reference" => &mut parsed.external_reference,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }
        Ok(parsed)
    }
}

/// State after a return page was handled.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedPayment {
    pub slices: PersistedSlices,
    /// The order snapshot, when one was still pending.
    pub order: Option<PendingOrder>,
}

/// Apply a payment outcome. Success and pending clear the cart and
/// consume the pending order; failure leaves both untouched so the
/// customer can retry.
pub fn complete_payment(
    outcome: PaymentOutcome,
    slices: PersistedSlices,
    store: &LocalStore,
) -> Result<CompletedPayment, StoreError> {
    match outcome {
        PaymentOutcome::Failure => {
            info!("Payment failed, keeping cart");
            Ok(CompletedPayment {
                slices,
                order: None,
            })
        }
        PaymentOutcome::Success | PaymentOutcome::Pending => {
            let order = PendingOrder::consume(store)?;
            let slices = PersistedSlices {
                cart: CartReducer::reduce(slices.cart, CartIntent::Clear),
                wishlist: slices.wishlist,
            };
            store.persist(&slices.cart, &slices.wishlist)?;
            info!(
                ?outcome,
                external_reference = order.as_ref().map(|o| o.external_reference.as_str()),
                "Payment returned, cart cleared"
            );
            Ok(CompletedPayment { slices, order })
        }
    }
}
