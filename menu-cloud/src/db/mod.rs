//! Persistence adapter
//!
//! Typed reads and writes over the generic [`DocumentStore`]. Every menu write
//! replaces whole top-level fields (`sections`, display flags) and is guarded
//! by the menu's `version` token.

pub mod menus;
pub mod restaurants;
pub mod webhook_events;

use serde_json::Value;
use shared::models::{Menu, Restaurant};
use shared::util::now_millis;

use crate::store::{DocumentStore, Fields, StoreError};

/// Build update fields from `(name, value)` pairs, stamping `updatedAt`
pub(crate) fn touched<const N: usize>(pairs: [(&str, Value); N]) -> Fields {
    let mut fields: Fields = pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    fields.insert("updatedAt".into(), Value::from(now_millis()));
    fields
}

/// Restaurant by id plus its menu, which may not exist yet
pub async fn load_restaurant_and_menu(
    store: &dyn DocumentStore,
    restaurant_id: &str,
) -> Result<(Restaurant, Option<Menu>), StoreError> {
    let restaurant = restaurants::get(store, restaurant_id).await?;
    let menu = menus::find_by_restaurant(store, restaurant_id).await?;
    Ok((restaurant, menu))
}
