//! Typed view of the Stripe events the reconciler consumes
//!
//! Only the fields the reconciler reads are decoded; every other event type
//! becomes [`SubscriptionEvent::Ignored`] without looking at its payload.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";
pub const TRIAL_WILL_END: &str = "customer.subscription.trial_will_end";
pub const SUBSCRIPTION_DELETED: &str = "customer.subscription.deleted";

/// Metadata key carrying the restaurant id on sessions and subscriptions
pub const RESTAURANT_ID_KEY: &str = "restaurantId";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeEvent {
    pub id: String,
    pub event_type: String,
    pub kind: SubscriptionEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionEvent {
    CheckoutCompleted {
        restaurant_id: Option<String>,
        customer_id: Option<String>,
        subscription_id: Option<String>,
    },
    TrialWillEnd {
        restaurant_id: Option<String>,
        subscription_id: Option<String>,
    },
    SubscriptionDeleted {
        restaurant_id: Option<String>,
        subscription_id: Option<String>,
    },
    Ignored,
}

#[derive(Deserialize)]
struct RawEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: RawData,
}

#[derive(Deserialize)]
struct RawData {
    object: Value,
}

#[derive(Deserialize)]
struct RawObject {
    id: Option<String>,
    #[serde(default)]
    metadata: Option<HashMap<String, String>>,
    #[serde(default)]
    customer: Option<Expandable>,
    #[serde(default)]
    subscription: Option<Expandable>,
}

impl RawObject {
    fn restaurant_id(&self) -> Option<String> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get(RESTAURANT_ID_KEY))
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(String::from)
    }
}

/// An id field Stripe may return either bare or expanded into an object
#[derive(Deserialize)]
#[serde(untagged)]
enum Expandable {
    Id(String),
    Object { id: String },
}

impl Expandable {
    fn into_id(self) -> String {
        match self {
            Expandable::Id(id) | Expandable::Object { id } => id,
        }
    }
}

impl StripeEvent {
    pub fn parse(payload: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: RawEvent = serde_json::from_slice(payload)?;

        let kind = match raw.event_type.as_str() {
            CHECKOUT_COMPLETED => {
                let obj: RawObject = serde_json::from_value(raw.data.object)?;
                SubscriptionEvent::CheckoutCompleted {
                    restaurant_id: obj.restaurant_id(),
                    customer_id: obj.customer.map(Expandable::into_id),
                    subscription_id: obj.subscription.map(Expandable::into_id),
                }
            }
            TRIAL_WILL_END => {
                let obj: RawObject = serde_json::from_value(raw.data.object)?;
                SubscriptionEvent::TrialWillEnd {
                    restaurant_id: obj.restaurant_id(),
                    subscription_id: obj.id,
                }
            }
            SUBSCRIPTION_DELETED => {
                let obj: RawObject = serde_json::from_value(raw.data.object)?;
                SubscriptionEvent::SubscriptionDeleted {
                    restaurant_id: obj.restaurant_id(),
                    subscription_id: obj.id,
                }
            }
            _ => SubscriptionEvent::Ignored,
        };

        Ok(StripeEvent {
            id: raw.id,
            event_type: raw.event_type,
            kind,
        })
    }
}
