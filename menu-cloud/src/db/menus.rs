//! Menu documents
//!
//! New menus use the restaurant id as their document id, so the
//! one-menu-per-restaurant rule is enforced by the store's insert. Menus
//! created before that rule carry random ids and are found by `restaurantId`.

use serde_json::{Value, json};
use shared::models::{DisplaySettings, INITIAL_MENU_VERSION, Menu, Section};
use shared::util::now_millis;

use super::touched;
use crate::store::{DocumentStore, Fields, MENUS, StoreError, into_fields};

/// Outcome of [`create`]
#[derive(Debug)]
pub enum CreateMenu {
    Created(Menu),
    AlreadyExists(Menu),
}

/// Create the restaurant's empty, active menu unless one exists
pub async fn create(
    store: &dyn DocumentStore,
    restaurant_id: &str,
) -> Result<CreateMenu, StoreError> {
    if let Some(existing) = find_by_restaurant(store, restaurant_id).await? {
        return Ok(CreateMenu::AlreadyExists(existing));
    }

    let now = now_millis();
    let menu = Menu {
        id: restaurant_id.to_string(),
        restaurant_id: restaurant_id.to_string(),
        sections: Vec::new(),
        is_active: true,
        settings: DisplaySettings::default(),
        version: INITIAL_MENU_VERSION,
        created_at: now,
        updated_at: now,
    };

    if !store
        .insert(MENUS, restaurant_id, serde_json::to_value(&menu)?)
        .await?
    {
        // Lost a race with a concurrent create
        let existing = get(store, restaurant_id).await?;
        return Ok(CreateMenu::AlreadyExists(existing));
    }
    Ok(CreateMenu::Created(menu))
}

pub async fn get(store: &dyn DocumentStore, menu_id: &str) -> Result<Menu, StoreError> {
    store
        .get(MENUS, menu_id)
        .await?
        .ok_or_else(|| StoreError::not_found(MENUS, menu_id))?
        .into_model()
}

/// The restaurant's menu, if created
///
/// Documents written before versioning get `version` backfilled so that the
/// conditional writes below can match on it.
pub async fn find_by_restaurant(
    store: &dyn DocumentStore,
    restaurant_id: &str,
) -> Result<Option<Menu>, StoreError> {
    let Some(doc) = store
        .query(MENUS, "restaurantId", &json!(restaurant_id))
        .await?
        .into_iter()
        .next()
    else {
        return Ok(None);
    };

    if !doc.has_field("version") {
        let mut fields = Fields::new();
        fields.insert("version".into(), json!(INITIAL_MENU_VERSION));
        store.update(MENUS, &doc.id, fields).await?;
        tracing::info!(menu_id = %doc.id, "Backfilled menu version");
    }

    doc.into_model().map(Some)
}

/// Replace the whole `sections` tree if the stored version is still
/// `expected_version`; returns the menu as stored after the write
pub async fn apply_mutation(
    store: &dyn DocumentStore,
    menu_id: &str,
    expected_version: u64,
    sections: &[Section],
) -> Result<Menu, StoreError> {
    let fields = touched([
        ("sections", serde_json::to_value(sections)?),
        ("version", json!(expected_version + 1)),
    ]);
    write_versioned(store, menu_id, expected_version, fields).await
}

/// Replace the display flags and footer, guarded like [`apply_mutation`]
pub async fn update_settings(
    store: &dyn DocumentStore,
    menu_id: &str,
    expected_version: u64,
    settings: &DisplaySettings,
) -> Result<Menu, StoreError> {
    let mut fields = into_fields(serde_json::to_value(settings)?)?;
    // Absent optional fields are skipped on serialize; clear them explicitly
    fields.entry("customFooter").or_insert(Value::Null);
    fields.insert("version".into(), json!(expected_version + 1));
    fields.insert("updatedAt".into(), json!(now_millis()));
    write_versioned(store, menu_id, expected_version, fields).await
}

async fn write_versioned(
    store: &dyn DocumentStore,
    menu_id: &str,
    expected_version: u64,
    fields: Fields,
) -> Result<Menu, StoreError> {
    let written = store
        .update_if(MENUS, menu_id, "version", &json!(expected_version), fields)
        .await?;
    if !written {
        return Err(StoreError::version_conflict(MENUS, menu_id));
    }
    get(store, menu_id).await
}
