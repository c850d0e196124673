//! Restaurant Model

use serde::{Deserialize, Serialize};

use super::serde_helpers::double_option;

/// Default theme color for new restaurants
pub const DEFAULT_THEME_COLOR: &str = "#3B82F6";

/// Restaurant entity
///
/// `is_premium`, `trial_started_at` and the Stripe references are written only
/// by the subscription reconciler; `menu_views` only by public menu reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// Store-assigned id (not part of the stored document body)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub location: String,
    /// Public lookup key, derived from the name at creation
    pub slug: String,
    /// `#RRGGBB`
    pub theme_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub menu_views: u64,
    /// Milliseconds since epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_started_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_subscription_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantCreate {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub location: String,
    pub theme_color: Option<String>,
    pub logo_url: Option<String>,
}

/// Update restaurant payload
///
/// `logo_url: Some(None)` removes the logo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub theme_color: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub logo_url: Option<Option<String>>,
}

impl RestaurantUpdate {
    /// True if the update touches branding (theme color or logo)
    pub fn touches_branding(&self) -> bool {
        self.theme_color.is_some() || self.logo_url.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.location.is_none()
            && !self.touches_branding()
    }
}

/// Derive the URL-safe slug for a restaurant name.
///
/// Lower-cases, collapses every run of characters outside `[a-z0-9]` into a
/// single hyphen, and trims leading/trailing hyphens. Total and idempotent;
/// the empty string maps to the empty string.
pub fn derive_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Check a `#RRGGBB` theme color
pub fn is_valid_theme_color(color: &str) -> bool {
    color
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_slug_examples() {
        assert_eq!(derive_slug("Mario's Pizza!"), "mario-s-pizza");
        assert_eq!(derive_slug("  The   Golden  Fork  "), "the-golden-fork");
        assert_eq!(derive_slug("Café 42"), "caf-42");
        assert_eq!(derive_slug("---"), "");
        assert_eq!(derive_slug(""), "");
        assert_eq!(derive_slug("ABC"), "abc");
    }

    #[test]
    fn test_derive_slug_charset_and_idempotence() {
        let names = [
            "Mario's Pizza!",
            "-leading and trailing-",
            "a--b__c  d",
            "Ünïcödé Bistro",
            "123 Main St. #4",
            "🍕🍕 Pizza 🍕",
            "already-a-slug",
        ];
        for name in names {
            let slug = derive_slug(name);
            assert!(
                slug.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "bad char in {slug:?}"
            );
            assert!(!slug.starts_with('-') && !slug.ends_with('-'), "{slug:?}");
            assert!(!slug.contains("--"), "{slug:?}");
            assert_eq!(derive_slug(&slug), slug);
        }
    }

    #[test]
    fn test_theme_color_validation() {
        assert!(is_valid_theme_color("#3B82F6"));
        assert!(is_valid_theme_color("#abcdef"));
        assert!(!is_valid_theme_color("3B82F6"));
        assert!(!is_valid_theme_color("#3B82F"));
        assert!(!is_valid_theme_color("#GGGGGG"));
    }

    #[test]
    fn test_restaurant_document_shape() {
        let r = Restaurant {
            id: String::new(),
            name: "Mario's Pizza".into(),
            email: "mario@example.com".into(),
            location: "Naples".into(),
            slug: "mario-s-pizza".into(),
            theme_color: DEFAULT_THEME_COLOR.into(),
            logo_url: None,
            is_premium: false,
            menu_views: 0,
            trial_started_at: None,
            stripe_customer_id: None,
            stripe_subscription_id: None,
            created_at: 1,
            updated_at: 1,
        };
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["themeColor"], "#3B82F6");
        assert_eq!(json["isPremium"], false);
        assert_eq!(json["menuViews"], 0);

        let back: Restaurant = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_update_branding_detection() {
        let update: RestaurantUpdate = serde_json::from_str(r#"{"name":"New"}"#).unwrap();
        assert!(!update.touches_branding());
        let update: RestaurantUpdate = serde_json::from_str(r#"{"logoUrl":null}"#).unwrap();
        assert!(update.touches_branding());
        assert!(RestaurantUpdate::default().is_empty());
    }
}
