//! Stripe integration via REST API (no SDK dependency)

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid Stripe-Signature header")]
    MalformedHeader,
    #[error("invalid timestamp")]
    InvalidTimestamp,
    #[error("webhook signature mismatch")]
    Mismatch,
    #[error("webhook timestamp outside tolerance")]
    Expired,
}

/// Verify a Stripe webhook signature (HMAC-SHA256)
///
/// Header format: `t=<unix secs>,v1=<hex>[,v1=<hex>…]`. Any `v1` entry may
/// match (Stripe sends several during secret rotation). The timestamp must be
/// within `tolerance_secs` of `now_secs` to prevent replays.
pub fn verify_webhook_signature(
    payload: &[u8],
    sig_header: &str,
    secret: &str,
    tolerance_secs: i64,
    now_secs: i64,
) -> Result<(), SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in sig_header.split(',') {
        let part = part.trim();
        if let Some(t) = part.strip_prefix("t=") {
            timestamp = Some(t);
        } else if let Some(v) = part.strip_prefix("v1=") {
            signatures.push(v);
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(SignatureError::MalformedHeader);
    }
    let ts: i64 = timestamp
        .parse()
        .map_err(|_| SignatureError::InvalidTimestamp)?;

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::Mismatch)?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);

    // Constant-time comparison via verify_slice
    let matched = signatures.iter().any(|sig| {
        hex::decode(sig).is_ok_and(|bytes| mac.clone().verify_slice(&bytes).is_ok())
    });
    if !matched {
        return Err(SignatureError::Mismatch);
    }

    if (now_secs - ts).abs() > tolerance_secs {
        return Err(SignatureError::Expired);
    }
    Ok(())
}

/// Build a `Stripe-Signature` header value for a payload
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mut mac = match Hmac::<Sha256>::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        // HMAC accepts keys of any length
        Err(_) => return format!("t={timestamp}"),
    };
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let sig = hex::encode(mac.finalize().into_bytes());
    format!("t={timestamp},v1={sig}")
}

#[derive(Debug, Error)]
pub enum StripeError {
    #[error("stripe request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("stripe API error: {0}")]
    Api(String),
}

/// Subscription checkout request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub restaurant_id: String,
    pub price_id: String,
    pub trial_days: u32,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutRequest {
    /// Redirects back to the restaurant's dashboard
    pub fn for_restaurant(
        base_url: &str,
        restaurant_id: &str,
        price_id: &str,
        trial_days: u32,
    ) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            restaurant_id: restaurant_id.to_string(),
            price_id: price_id.to_string(),
            trial_days,
            success_url: format!("{base}/dashboard/{restaurant_id}?success=true&trial=true"),
            cancel_url: format!("{base}/dashboard/{restaurant_id}?canceled=true"),
        }
    }

    /// Form fields for `POST /v1/checkout/sessions`
    ///
    /// The restaurant id is attached to both the session and the subscription
    /// so that every later subscription event can be correlated.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("mode", "subscription".into()),
            ("payment_method_types[0]", "card".into()),
            ("line_items[0][price]", self.price_id.clone()),
            ("line_items[0][quantity]", "1".into()),
            (
                "subscription_data[trial_period_days]",
                self.trial_days.to_string(),
            ),
            (
                "subscription_data[metadata][restaurantId]",
                self.restaurant_id.clone(),
            ),
            ("metadata[restaurantId]", self.restaurant_id.clone()),
            ("success_url", self.success_url.clone()),
            ("cancel_url", self.cancel_url.clone()),
        ]
    }
}

/// Hosted checkout, as seen by the API layer
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create a session, returning its id
    async fn create_checkout_session(&self, req: &CheckoutRequest) -> Result<String, StripeError>;

    /// Hosted URL for a session, if it still has one
    async fn checkout_session_url(&self, session_id: &str) -> Result<Option<String>, StripeError>;
}

/// Checkout session ids are `[A-Za-z0-9_]+`; anything else is never sent
/// into an API path
pub fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[derive(Debug, Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeClient {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key: secret_key.into(),
            api_base: STRIPE_API_BASE.to_string(),
        }
    }
}

#[async_trait]
impl CheckoutProvider for StripeClient {
    async fn create_checkout_session(&self, req: &CheckoutRequest) -> Result<String, StripeError> {
        let resp: serde_json::Value = self
            .http
            .post(format!("{}/checkout/sessions", self.api_base))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&req.form_fields())
            .send()
            .await?
            .json()
            .await?;

        resp["id"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| StripeError::Api(format!("create_checkout_session failed: {resp}")))
    }

    async fn checkout_session_url(&self, session_id: &str) -> Result<Option<String>, StripeError> {
        if !is_valid_session_id(session_id) {
            return Ok(None);
        }
        let resp: serde_json::Value = self
            .http
            .get(format!("{}/checkout/sessions/{session_id}", self.api_base))
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await?
            .json()
            .await?;

        if resp.get("error").is_some() {
            return Err(StripeError::Api(format!(
                "retrieve checkout session failed: {resp}"
            )));
        }
        Ok(resp["url"].as_str().map(String::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";
    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_session_id_shape() {
        assert!(is_valid_session_id("cs_test_a1B2c3"));
        assert!(!is_valid_session_id(""));
        assert!(!is_valid_session_id("../customers"));
        assert!(!is_valid_session_id("cs_1?expand=customer"));
        assert!(!is_valid_session_id("cs 1"));
    }

    #[tokio::test]
    async fn test_malformed_session_id_skips_request() {
        // Unroutable base: any request would fail with StripeError::Http
        let client = StripeClient {
            api_base: "http://127.0.0.1:9".into(),
            ..StripeClient::new("sk_test")
        };
        assert!(matches!(
            client.checkout_session_url("../customers").await,
            Ok(None)
        ));
    }

    #[test]
    fn test_signature_roundtrip() {
        let body = br#"{"id":"evt_1"}"#;
        let header = sign_payload(body, SECRET, NOW);
        assert_eq!(
            verify_webhook_signature(body, &header, SECRET, 300, NOW + 10),
            Ok(())
        );
    }

    #[test]
    fn test_signature_rejections() {
        let body = br#"{"id":"evt_1"}"#;
        let header = sign_payload(body, SECRET, NOW);

        assert_eq!(
            verify_webhook_signature(br#"{"id":"evt_2"}"#, &header, SECRET, 300, NOW),
            Err(SignatureError::Mismatch)
        );
        assert_eq!(
            verify_webhook_signature(body, &header, "whsec_other", 300, NOW),
            Err(SignatureError::Mismatch)
        );
        assert_eq!(
            verify_webhook_signature(body, &header, SECRET, 300, NOW + 301),
            Err(SignatureError::Expired)
        );
        assert_eq!(
            verify_webhook_signature(body, "garbage", SECRET, 300, NOW),
            Err(SignatureError::MalformedHeader)
        );
        assert_eq!(
            verify_webhook_signature(body, "t=abc,v1=00", SECRET, 300, NOW),
            Err(SignatureError::InvalidTimestamp)
        );
    }

    #[test]
    fn test_any_v1_may_match() {
        let body = b"{}";
        let good = sign_payload(body, SECRET, NOW);
        let sig = good.split("v1=").nth(1).unwrap();
        let header = format!("t={NOW},v1=deadbeef,v1={sig}");
        assert!(verify_webhook_signature(body, &header, SECRET, 300, NOW).is_ok());
    }

    #[test]
    fn test_checkout_form_fields() {
        let req = CheckoutRequest::for_restaurant("https://menu.example.com/", "r1", "price_1", 7);
        assert_eq!(
            req.success_url,
            "https://menu.example.com/dashboard/r1?success=true&trial=true"
        );
        assert_eq!(req.cancel_url, "https://menu.example.com/dashboard/r1?canceled=true");

        let fields = req.form_fields();
        let get = |k: &str| {
            fields
                .iter()
                .find(|(name, _)| *name == k)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("mode"), Some("subscription"));
        assert_eq!(get("subscription_data[trial_period_days]"), Some("7"));
        assert_eq!(get("subscription_data[metadata][restaurantId]"), Some("r1"));
        assert_eq!(get("metadata[restaurantId]"), Some("r1"));
    }
}
