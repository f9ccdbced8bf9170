//! Route protection for account, login and checkout pages.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::{Position, Url};

const GUARD_BASE: &str = "http://storefront.local/";

/// The gate only counts cookie items, so their shape is not checked.
#[derive(Deserialize)]
struct CookieItems {
    #[serde(default)]
    items: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Decide whether a request for `request_url` may proceed.
///
/// `request_url` is the full URL or a root-relative path with query.
/// `cart_cookie` is the raw value of the `cart` cookie, if present.
pub fn guard(request_url: &str, has_token: bool, cart_cookie: Option<&str>) -> GuardDecision {
    let Some(url) = Url::parse(request_url)
        .ok()
        .or_else(|| Url::parse(GUARD_BASE).ok()?.join(request_url).ok())
    else {
        return GuardDecision::Allow;
    };
    let path = url.path();

    let is_auth_callback = path.contains("/api/auth/callback") || path.contains("/api/auth/session");
    let is_payment_callback = ["/checkout/success", "/checkout/failure", "/checkout/pending"]
        .iter()
        .any(|prefix| path.starts_with(prefix));
    if is_auth_callback || is_payment_callback {
        return GuardDecision::Allow;
    }

    if !has_token {
        if path.starts_with("/account") || path.starts_with("/checkout") {
            debug!(path, "Unauthenticated access, redirecting to login");
            return GuardDecision::Redirect(login_redirect(request_url));
        }
        return GuardDecision::Allow;
    }

    if ["/login", "/registration", "/fallbackUser"]
        .iter()
        .any(|prefix| path.starts_with(prefix))
    {
        return GuardDecision::Redirect("/account".to_string());
    }

    if path.starts_with("/checkout") {
        let Some(raw) = cart_cookie else {
            return GuardDecision::Redirect("/shop".to_string());
        };
        return match serde_json::from_str::<CookieItems>(raw) {
            Ok(CookieItems { items: Some(items) }) if !items.is_empty() => GuardDecision::Allow,
            Ok(_) => GuardDecision::Redirect("/cart".to_string()),
            Err(e) => {
                debug!(error = %e, "Unreadable cart cookie");
                GuardDecision::Redirect("/shop".to_string())
            }
        };
    }

    GuardDecision::Allow
}

fn login_redirect(callback: &str) -> String {
    let Ok(mut url) = Url::parse(GUARD_BASE).and_then(|base| base.join("login")) else {
        return "/login".to_string();
    };
    url.query_pairs_mut().append_pair("callbackUrl", callback);
    url[Position::BeforePath..].to_string()
}
