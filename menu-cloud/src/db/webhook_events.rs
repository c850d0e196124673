//! Processed payment-provider events (idempotency ledger)

use serde_json::json;
use shared::util::now_millis;

use crate::store::{DocumentStore, PROCESSED_WEBHOOK_EVENTS, StoreError};

/// Record an event id; `false` if it was already processed
///
/// Insert-first, so two deliveries racing each other cannot both proceed.
pub async fn record(
    store: &dyn DocumentStore,
    event_id: &str,
    event_type: &str,
) -> Result<bool, StoreError> {
    store
        .insert(
            PROCESSED_WEBHOOK_EVENTS,
            event_id,
            json!({ "eventType": event_type, "processedAt": now_millis() }),
        )
        .await
}
