//! Restaurant documents

use serde_json::{Value, json};
use shared::models::{DEFAULT_THEME_COLOR, Restaurant, RestaurantCreate};
use shared::util::{new_id, now_millis};

use super::touched;
use crate::store::{DocumentStore, Fields, RESTAURANTS, SLUGS, StoreError};

/// Insert a new, non-premium restaurant with zero views
pub async fn create(
    store: &dyn DocumentStore,
    data: &RestaurantCreate,
    slug: &str,
) -> Result<Restaurant, StoreError> {
    insert(store, &new_id(), data, slug).await
}

/// [`create`] under an id chosen by the caller, e.g. one that already holds a
/// slug reservation
pub async fn insert(
    store: &dyn DocumentStore,
    id: &str,
    data: &RestaurantCreate,
    slug: &str,
) -> Result<Restaurant, StoreError> {
    let now = now_millis();
    let restaurant = Restaurant {
        id: id.to_string(),
        name: data.name.clone(),
        email: data.email.clone(),
        location: data.location.clone(),
        slug: slug.to_string(),
        theme_color: data
            .theme_color
            .clone()
            .unwrap_or_else(|| DEFAULT_THEME_COLOR.to_string()),
        logo_url: data.logo_url.clone(),
        is_premium: false,
        menu_views: 0,
        trial_started_at: None,
        stripe_customer_id: None,
        stripe_subscription_id: None,
        created_at: now,
        updated_at: now,
    };
    if !store
        .insert(RESTAURANTS, id, serde_json::to_value(&restaurant)?)
        .await?
    {
        return Err(StoreError::Backend(format!("restaurant id {id} already in use")));
    }
    Ok(restaurant)
}

/// Claim `slug` for `restaurant_id`; `false` if another restaurant holds it
pub async fn reserve_slug(
    store: &dyn DocumentStore,
    slug: &str,
    restaurant_id: &str,
) -> Result<bool, StoreError> {
    store
        .insert(SLUGS, slug, json!({ "restaurantId": restaurant_id }))
        .await
}

pub async fn find_by_id(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<Restaurant>, StoreError> {
    store
        .get(RESTAURANTS, id)
        .await?
        .map(|doc| doc.into_model())
        .transpose()
}

/// Like [`find_by_id`] but absent is `NotFound`
pub async fn get(store: &dyn DocumentStore, id: &str) -> Result<Restaurant, StoreError> {
    find_by_id(store, id)
        .await?
        .ok_or_else(|| StoreError::not_found(RESTAURANTS, id))
}

/// First restaurant registered under this slug
pub async fn find_by_slug(
    store: &dyn DocumentStore,
    slug: &str,
) -> Result<Option<Restaurant>, StoreError> {
    first(store, "slug", json!(slug)).await
}

pub async fn find_by_subscription(
    store: &dyn DocumentStore,
    subscription_id: &str,
) -> Result<Option<Restaurant>, StoreError> {
    first(store, "stripeSubscriptionId", json!(subscription_id)).await
}

async fn first(
    store: &dyn DocumentStore,
    field: &str,
    value: Value,
) -> Result<Option<Restaurant>, StoreError> {
    store
        .query(RESTAURANTS, field, &value)
        .await?
        .into_iter()
        .next()
        .map(|doc| doc.into_model())
        .transpose()
}

/// Partial update; stamps `updatedAt`
pub async fn update_fields(
    store: &dyn DocumentStore,
    id: &str,
    mut fields: Fields,
) -> Result<(), StoreError> {
    fields.insert("updatedAt".into(), Value::from(now_millis()));
    store.update(RESTAURANTS, id, fields).await
}

pub async fn increment_views(store: &dyn DocumentStore, id: &str) -> Result<(), StoreError> {
    store.increment(RESTAURANTS, id, "menuViews", 1).await
}

/// Checkout completed: premium on, trial clock started
pub async fn activate_premium(
    store: &dyn DocumentStore,
    id: &str,
    customer_id: Option<&str>,
    subscription_id: Option<&str>,
) -> Result<(), StoreError> {
    let mut fields = touched([
        ("isPremium", Value::Bool(true)),
        ("trialStartedAt", Value::from(now_millis())),
    ]);
    if let Some(customer_id) = customer_id {
        fields.insert("stripeCustomerId".into(), json!(customer_id));
    }
    if let Some(subscription_id) = subscription_id {
        fields.insert("stripeSubscriptionId".into(), json!(subscription_id));
    }
    store.update(RESTAURANTS, id, fields).await
}

/// Subscription ended: premium off, subscription reference cleared
pub async fn deactivate_premium(store: &dyn DocumentStore, id: &str) -> Result<(), StoreError> {
    let fields = touched([
        ("isPremium", Value::Bool(false)),
        ("stripeSubscriptionId", Value::Null),
    ]);
    store.update(RESTAURANTS, id, fields).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn payload(name: &str) -> RestaurantCreate {
        RestaurantCreate {
            name: name.into(),
            email: "owner@example.com".into(),
            location: "Naples".into(),
            theme_color: None,
            logo_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let store = MemoryStore::new();
        let r = create(&store, &payload("Mario's Pizza"), "mario-s-pizza")
            .await
            .unwrap();
        assert!(!r.id.is_empty());
        assert_eq!(r.theme_color, DEFAULT_THEME_COLOR);
        assert!(!r.is_premium);
        assert_eq!(r.menu_views, 0);

        let by_slug = find_by_slug(&store, "mario-s-pizza").await.unwrap().unwrap();
        assert_eq!(by_slug.id, r.id);
        assert!(find_by_slug(&store, "other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_premium_transitions() {
        let store = MemoryStore::new();
        let r = create(&store, &payload("Luigi's"), "luigi-s").await.unwrap();

        activate_premium(&store, &r.id, Some("cus_1"), Some("sub_1"))
            .await
            .unwrap();
        let active = get(&store, &r.id).await.unwrap();
        assert!(active.is_premium);
        assert!(active.trial_started_at.is_some());
        assert_eq!(active.stripe_customer_id.as_deref(), Some("cus_1"));

        let by_sub = find_by_subscription(&store, "sub_1").await.unwrap().unwrap();
        assert_eq!(by_sub.id, r.id);

        deactivate_premium(&store, &r.id).await.unwrap();
        let canceled = get(&store, &r.id).await.unwrap();
        assert!(!canceled.is_premium);
        assert_eq!(canceled.stripe_subscription_id, None);
        assert_eq!(canceled.stripe_customer_id.as_deref(), Some("cus_1"));
    }

    #[tokio::test]
    async fn test_increment_views() {
        let store = MemoryStore::new();
        let r = create(&store, &payload("Cafe"), "cafe").await.unwrap();
        increment_views(&store, &r.id).await.unwrap();
        increment_views(&store, &r.id).await.unwrap();
        assert_eq!(get(&store, &r.id).await.unwrap().menu_views, 2);
    }
}
