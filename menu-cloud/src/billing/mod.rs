//! Subscription state reconciler
//!
//! Turns verified Stripe webhook events into `isPremium` transitions on the
//! restaurant document:
//!
//! | Event                                  | Effect                                   |
//! |----------------------------------------|------------------------------------------|
//! | `checkout.session.completed`           | premium on, trial start recorded         |
//! | `customer.subscription.trial_will_end` | none (logged)                            |
//! | `customer.subscription.deleted`        | premium off                              |
//!
//! A deletion naming a subscription other than the restaurant's current one
//! is dropped, so a late event for a replaced subscription keeps premium on.
//!
//! Delivery is at-most-once: each event id is recorded before its effect is
//! applied, and failures are logged rather than retried.

pub mod events;

use shared::models::Restaurant;
use thiserror::Error;

use crate::db;
use crate::store::{DocumentStore, StoreError};
use crate::stripe::{self, SignatureError};

pub use events::{StripeEvent, SubscriptionEvent};

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("invalid signature: {0}")]
    InvalidSignature(#[from] SignatureError),

    #[error("malformed event: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What happened to one delivered event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Restaurant state changed
    Applied { restaurant_id: String },
    /// Recognized, but no state change by definition
    Informational { restaurant_id: String },
    /// Already processed under this event id
    Duplicate,
    /// Not correlatable to a known restaurant
    Dropped { reason: &'static str },
    /// Event type we do not consume
    Ignored,
}

pub struct SubscriptionReconciler<'a> {
    store: &'a dyn DocumentStore,
    webhook_secret: &'a str,
    tolerance_secs: i64,
}

impl<'a> SubscriptionReconciler<'a> {
    pub fn new(store: &'a dyn DocumentStore, webhook_secret: &'a str, tolerance_secs: i64) -> Self {
        Self {
            store,
            webhook_secret,
            tolerance_secs,
        }
    }

    /// Verify, decode, deduplicate and apply one webhook delivery
    ///
    /// Nothing is read or written before the signature checks out.
    pub async fn handle(
        &self,
        payload: &[u8],
        sig_header: Option<&str>,
        now_secs: i64,
    ) -> Result<Outcome, WebhookError> {
        let sig_header = sig_header.ok_or(SignatureError::MalformedHeader)?;
        stripe::verify_webhook_signature(
            payload,
            sig_header,
            self.webhook_secret,
            self.tolerance_secs,
            now_secs,
        )?;

        let event = StripeEvent::parse(payload)?;
        tracing::info!(event_id = %event.id, event_type = %event.event_type, "Received Stripe webhook");

        if matches!(event.kind, SubscriptionEvent::Ignored) {
            tracing::debug!(event_type = %event.event_type, "Unhandled webhook event type");
            return Ok(Outcome::Ignored);
        }

        if !db::webhook_events::record(self.store, &event.id, &event.event_type).await? {
            tracing::info!(event_id = %event.id, "Duplicate webhook event, skipping");
            return Ok(Outcome::Duplicate);
        }

        Ok(self.apply(&event).await?)
    }

    /// Apply an already verified event
    pub async fn apply(&self, event: &StripeEvent) -> Result<Outcome, StoreError> {
        match &event.kind {
            SubscriptionEvent::CheckoutCompleted {
                restaurant_id,
                customer_id,
                subscription_id,
            } => {
                let Some(restaurant) = self.known(restaurant_id.as_deref(), None).await? else {
                    return Ok(self.dropped(event, "no restaurant correlation"));
                };
                let restaurant_id = restaurant.id;
                db::restaurants::activate_premium(
                    self.store,
                    &restaurant_id,
                    customer_id.as_deref(),
                    subscription_id.as_deref(),
                )
                .await?;
                tracing::info!(restaurant_id = %restaurant_id, "Premium activated (checkout completed)");
                Ok(Outcome::Applied { restaurant_id })
            }
            SubscriptionEvent::TrialWillEnd {
                restaurant_id,
                subscription_id,
            } => {
                let Some(restaurant) = self
                    .known(restaurant_id.as_deref(), subscription_id.as_deref())
                    .await?
                else {
                    return Ok(self.dropped(event, "no restaurant correlation"));
                };
                tracing::info!(restaurant_id = %restaurant.id, "Subscription trial ending soon");
                Ok(Outcome::Informational {
                    restaurant_id: restaurant.id,
                })
            }
            SubscriptionEvent::SubscriptionDeleted {
                restaurant_id,
                subscription_id,
            } => {
                let Some(restaurant) = self
                    .known(restaurant_id.as_deref(), subscription_id.as_deref())
                    .await?
                else {
                    return Ok(self.dropped(event, "no restaurant correlation"));
                };
                // A late delete for a replaced subscription must not revoke the current one
                let stale = matches!(
                    (subscription_id.as_deref(), restaurant.stripe_subscription_id.as_deref()),
                    (Some(ended), Some(current)) if ended != current
                );
                if stale {
                    return Ok(self.dropped(event, "subscription is not the current one"));
                }
                let restaurant_id = restaurant.id;
                db::restaurants::deactivate_premium(self.store, &restaurant_id).await?;
                tracing::info!(restaurant_id = %restaurant_id, "Premium deactivated (subscription deleted)");
                Ok(Outcome::Applied { restaurant_id })
            }
            SubscriptionEvent::Ignored => Ok(Outcome::Ignored),
        }
    }

    /// Resolve the event's restaurant: metadata tag first, then the stored
    /// subscription reference. Unknown ids resolve to `None`.
    async fn known(
        &self,
        restaurant_id: Option<&str>,
        subscription_id: Option<&str>,
    ) -> Result<Option<Restaurant>, StoreError> {
        if let Some(id) = restaurant_id {
            return db::restaurants::find_by_id(self.store, id).await;
        }
        match subscription_id {
            Some(sub_id) => db::restaurants::find_by_subscription(self.store, sub_id).await,
            None => Ok(None),
        }
    }

    fn dropped(&self, event: &StripeEvent, reason: &'static str) -> Outcome {
        tracing::warn!(
            event_id = %event.id,
            event_type = %event.event_type,
            reason,
            "Dropping webhook event"
        );
        Outcome::Dropped { reason }
    }
}
