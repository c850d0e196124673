//! Restaurant onboarding and public menu reads

use shared::error::{AppError, ErrorCode};
use shared::models::{
    DEFAULT_THEME_COLOR, Menu, Restaurant, RestaurantCreate, derive_slug, is_valid_theme_color,
};
use shared::util::new_id;

use crate::db;
use crate::error::ServiceResult;
use crate::store::DocumentStore;

/// Upper bound on `-N` suffixes tried for a colliding slug
const MAX_SLUG_SUFFIX: u32 = 1000;

pub(crate) fn validate_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "Restaurant name is required",
        )
        .with_detail("field", "name"));
    }
    Ok(name.to_string())
}

pub(crate) fn validate_email(email: &str) -> Result<String, AppError> {
    let email = email.trim();
    let ok = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !ok {
        return Err(AppError::validation("A valid email is required").with_detail("field", "email"));
    }
    Ok(email.to_string())
}

pub(crate) fn validate_theme_color(color: &str) -> Result<String, AppError> {
    let color = color.trim();
    if !is_valid_theme_color(color) {
        return Err(AppError::new(ErrorCode::InvalidThemeColor).with_detail("themeColor", color));
    }
    Ok(color.to_string())
}

/// Onboard a restaurant
///
/// The slug is derived from the name; a slug already in use gets the first
/// free `-2`, `-3`, … suffix.
pub async fn create_restaurant(
    store: &dyn DocumentStore,
    req: &RestaurantCreate,
) -> ServiceResult<Restaurant> {
    let name = validate_name(&req.name)?;
    let email = validate_email(&req.email)?;
    let theme_color = match req.theme_color.as_deref() {
        Some(color) => validate_theme_color(color)?,
        None => DEFAULT_THEME_COLOR.to_string(),
    };

    let base = derive_slug(&name);
    if base.is_empty() {
        return Err(AppError::new(ErrorCode::InvalidSlug)
            .with_detail("field", "name")
            .into());
    }
    let id = new_id();
    let slug = reserve_unique_slug(store, &base, &id).await?;

    let data = RestaurantCreate {
        name,
        email,
        location: req.location.trim().to_string(),
        theme_color: Some(theme_color),
        logo_url: req
            .logo_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(String::from),
    };
    let restaurant = db::restaurants::insert(store, &id, &data, &slug).await?;

    tracing::info!(
        restaurant_id = %restaurant.id,
        slug = %restaurant.slug,
        "Restaurant created"
    );
    Ok(restaurant)
}

/// Claim `base`, or the first free `base-N`, for `restaurant_id`
///
/// Each candidate is reserved with a first-writer-wins insert, so concurrent
/// onboardings with the same name never share a slug. Restaurants registered
/// before reservations existed are skipped by a slug lookup.
async fn reserve_unique_slug(
    store: &dyn DocumentStore,
    base: &str,
    restaurant_id: &str,
) -> ServiceResult<String> {
    let candidates =
        std::iter::once(base.to_string()).chain((2..=MAX_SLUG_SUFFIX).map(|n| format!("{base}-{n}")));
    for candidate in candidates {
        if !db::restaurants::reserve_slug(store, &candidate, restaurant_id).await? {
            continue;
        }
        if db::restaurants::find_by_slug(store, &candidate).await?.is_none() {
            return Ok(candidate);
        }
    }
    Err(AppError::with_message(ErrorCode::AlreadyExists, "Restaurant name is already taken")
        .with_detail("slug", base)
        .into())
}

/// Public page read: count the view, then load the active menu
///
/// The view is counted even when the menu turns out to be missing. A failed
/// counter bump is logged and does not block the page.
pub async fn public_menu(store: &dyn DocumentStore, slug: &str) -> ServiceResult<(Restaurant, Menu)> {
    let mut restaurant = db::restaurants::find_by_slug(store, slug)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound).with_detail("slug", slug))?;

    match db::restaurants::increment_views(store, &restaurant.id).await {
        Ok(()) => restaurant.menu_views += 1,
        Err(e) => {
            tracing::warn!(restaurant_id = %restaurant.id, error = %e, "Failed to count menu view")
        }
    }

    let menu = db::menus::find_by_restaurant(store, &restaurant.id)
        .await?
        .filter(|m| m.is_active)
        .ok_or_else(|| AppError::menu_not_found(&restaurant.id))?;

    Ok((restaurant, menu))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn req(name: &str) -> RestaurantCreate {
        RestaurantCreate {
            name: name.into(),
            email: "owner@example.com".into(),
            location: " Naples ".into(),
            theme_color: None,
            logo_url: Some("".into()),
        }
    }

    #[tokio::test]
    async fn test_create_derives_slug_and_defaults() {
        let store = MemoryStore::new();
        let r = create_restaurant(&store, &req("Mario's Pizza")).await.unwrap();
        assert_eq!(r.slug, "mario-s-pizza");
        assert_eq!(r.theme_color, DEFAULT_THEME_COLOR);
        assert_eq!(r.location, "Naples");
        assert_eq!(r.logo_url, None);
    }

    #[tokio::test]
    async fn test_colliding_slugs_get_suffix() {
        let store = MemoryStore::new();
        let a = create_restaurant(&store, &req("Mario's Pizza")).await.unwrap();
        let b = create_restaurant(&store, &req("Mario's Pizza!")).await.unwrap();
        let c = create_restaurant(&store, &req("MARIO'S PIZZA")).await.unwrap();
        assert_eq!(a.slug, "mario-s-pizza");
        assert_eq!(b.slug, "mario-s-pizza-2");
        assert_eq!(c.slug, "mario-s-pizza-3");
    }

    #[tokio::test]
    async fn test_reserved_slug_is_skipped() {
        let store = MemoryStore::new();
        assert!(
            db::restaurants::reserve_slug(&store, "cafe", "other")
                .await
                .unwrap()
        );

        let r = create_restaurant(&store, &req("Cafe")).await.unwrap();
        assert_eq!(r.slug, "cafe-2");

        // The new restaurant now holds its own reservation
        assert!(
            !db::restaurants::reserve_slug(&store, "cafe-2", "third")
                .await
                .unwrap()
        );
        let stored = db::restaurants::find_by_id(&store, &r.id).await.unwrap();
        assert_eq!(stored, Some(r));
    }

    #[tokio::test]
    async fn test_unreserved_legacy_slug_is_skipped() {
        let store = MemoryStore::new();
        // Written directly, without a reservation
        db::restaurants::create(&store, &req("Cafe"), "cafe").await.unwrap();

        let r = create_restaurant(&store, &req("Cafe")).await.unwrap();
        assert_eq!(r.slug, "cafe-2");
    }

    #[tokio::test]
    async fn test_concurrent_onboarding_gets_distinct_slugs() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { create_restaurant(store.as_ref(), &req("Cafe")).await })
            })
            .collect();

        let mut slugs = std::collections::HashSet::new();
        for task in tasks {
            let r = task.await.unwrap().unwrap();
            assert!(slugs.insert(r.slug));
        }
        assert_eq!(slugs.len(), 8);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let store = MemoryStore::new();

        let err: AppError = create_restaurant(&store, &req("   ")).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::RequiredField);

        let err: AppError = create_restaurant(&store, &req("!!!")).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::InvalidSlug);

        let bad_email = RestaurantCreate {
            email: "nope".into(),
            ..req("Cafe")
        };
        let err: AppError = create_restaurant(&store, &bad_email).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let bad_color = RestaurantCreate {
            theme_color: Some("blue".into()),
            ..req("Cafe")
        };
        let err: AppError = create_restaurant(&store, &bad_color).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::InvalidThemeColor);
    }

    #[tokio::test]
    async fn test_public_menu_counts_views() {
        let store = MemoryStore::new();
        let r = create_restaurant(&store, &req("Cafe")).await.unwrap();

        // No menu yet: not found, but the view still counts
        let err: AppError = public_menu(&store, "cafe").await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::MenuNotFound);

        db::menus::create(&store, &r.id).await.unwrap();
        let (restaurant, menu) = public_menu(&store, "cafe").await.unwrap();
        assert_eq!(restaurant.menu_views, 2);
        assert_eq!(menu.restaurant_id, r.id);

        let err: AppError = public_menu(&store, "nope").await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::RestaurantNotFound);
    }
}
